//! Bins and the `SIMPLER1` merge rule.
//!
//! A column is sorted, cut into small bins, and adjacent bins are merged
//! whenever combining them does not raise diversity above the size-weighted
//! average of the parts:
//!
//! ```text
//! div(b1 ++ b2) <= (n1·div(b1) + n2·div(b2)) / (n1 + n2)
//! ```
//!
//! Bins that fail the test are statistically distinguishable and stay apart.
//! [`merge_all`] repeats left-to-right passes until no adjacent pair merges,
//! so its output is a fixed point of the rule.
//!
//! A bin judges either its own members ([`discretize`]) or a label attached
//! to each member ([`discretize_labelled`]), the supervised variant where a
//! numeric column is cut wherever the class mix changes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::summary::{Summary, SummaryConfig};
use crate::value::{Kind, Value};

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// The part of a column a bin covers.
#[derive(Debug, Clone, PartialEq)]
pub enum Range {
    /// `lo <= x < hi`, or exactly `x` when `lo == hi`.
    Num { lo: f64, hi: f64 },
    Sym(BTreeSet<String>),
}

impl Range {
    fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Num => Range::Num {
                lo: f64::INFINITY,
                hi: f64::NEG_INFINITY,
            },
            Kind::Sym => Range::Sym(BTreeSet::new()),
        }
    }

    fn extend(&mut self, value: &Value) {
        match (self, value) {
            (Range::Num { lo, hi }, Value::Num(x)) => {
                *lo = lo.min(*x);
                *hi = hi.max(*x);
            }
            (Range::Sym(set), Value::Sym(s)) => {
                set.insert(s.clone());
            }
            _ => {}
        }
    }

    fn union(&self, other: &Range) -> Range {
        match (self, other) {
            (Range::Num { lo: a, hi: b }, Range::Num { lo: c, hi: d }) => Range::Num {
                lo: a.min(*c),
                hi: b.max(*d),
            },
            (Range::Sym(a), Range::Sym(b)) => Range::Sym(a.union(b).cloned().collect()),
            (a, _) => a.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bin
// ---------------------------------------------------------------------------

/// A contiguous group of same-kind values from one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    at: usize,
    kind: Kind,
    range: Range,
    members: Vec<Value>,
    summary: Summary,
    labelled: bool,
}

impl Bin {
    /// An empty bin for column `at` that judges its own members.
    pub fn new(at: usize, kind: Kind, config: SummaryConfig) -> Self {
        Self {
            at,
            kind,
            range: Range::empty(kind),
            members: Vec::new(),
            summary: Summary::new(kind, config),
            labelled: false,
        }
    }

    /// An empty bin for column `at` whose diversity is measured over labels
    /// of kind `label_kind` rather than over the members.
    pub fn labelled(at: usize, kind: Kind, label_kind: Kind, config: SummaryConfig) -> Self {
        Self {
            at,
            kind,
            range: Range::empty(kind),
            members: Vec::new(),
            summary: Summary::new(label_kind, config),
            labelled: true,
        }
    }

    /// Builds an unlabelled bin from `values`, skipping missing ones.
    ///
    /// # Examples
    /// ```
    /// use u_simpler::bins::Bin;
    /// use u_simpler::summary::SummaryConfig;
    /// use u_simpler::value::Value;
    ///
    /// let bin = Bin::from_values(0, &[Value::Num(1.0), Value::Num(1.0)], SummaryConfig::default())
    ///     .unwrap();
    /// assert_eq!(bin.n(), 2);
    /// assert_eq!(bin.div().unwrap(), 0.0);
    /// ```
    pub fn from_values(at: usize, values: &[Value], config: SummaryConfig) -> Result<Self> {
        let kind = values
            .iter()
            .find_map(Value::kind)
            .ok_or(Error::EmptyBin)?;
        let mut bin = Bin::new(at, kind, config);
        for v in values {
            bin.push(v.clone())?;
        }
        Ok(bin)
    }

    /// Adds a member to an unlabelled bin.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.labelled {
            return Err(Error::Schema(format!(
                "bin for column {} is labelled; use push_labelled",
                self.at
            )));
        }
        if value.is_missing() {
            return Ok(());
        }
        self.summary.add(&value)?;
        self.range.extend(&value);
        self.members.push(value);
        Ok(())
    }

    /// Adds a member and the label it is judged by.
    pub fn push_labelled(&mut self, value: Value, label: &Value) -> Result<()> {
        if !self.labelled {
            return Err(Error::Schema(format!(
                "bin for column {} is unlabelled; use push",
                self.at
            )));
        }
        if value.is_missing() {
            return Ok(());
        }
        self.check_kind(&value)?;
        self.summary.add(label)?;
        self.range.extend(&value);
        self.members.push(value);
        Ok(())
    }

    fn check_kind(&self, value: &Value) -> Result<()> {
        match value.kind() {
            Some(kind) if kind != self.kind => Err(Error::KindMismatch {
                expected: self.kind,
                got: kind,
            }),
            _ => Ok(()),
        }
    }

    pub fn at(&self) -> usize {
        self.at
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn lo(&self) -> Option<f64> {
        match self.range {
            Range::Num { lo, .. } => Some(lo),
            Range::Sym(_) => None,
        }
    }

    pub fn hi(&self) -> Option<f64> {
        match self.range {
            Range::Num { hi, .. } => Some(hi),
            Range::Sym(_) => None,
        }
    }

    pub fn members(&self) -> &[Value] {
        &self.members
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Number of judged values (members, or labels for a labelled bin).
    pub fn n(&self) -> u64 {
        self.summary.n()
    }

    pub fn mid(&self) -> Result<Value> {
        self.summary.mid()
    }

    pub fn div(&self) -> Result<f64> {
        self.summary.div()
    }

    /// Whether `value` falls inside this bin. Missing values select every bin.
    pub fn selects(&self, value: &Value) -> bool {
        match (&self.range, value) {
            (_, Value::Missing) => true,
            (Range::Num { lo, hi }, Value::Num(x)) => {
                (*lo == *x && *x == *hi) || (*lo <= *x && *x < *hi)
            }
            (Range::Sym(set), Value::Sym(s)) => set.contains(s),
            _ => false,
        }
    }

    /// Concatenates two bins of the same column into a new one.
    pub fn concat(&self, other: &Bin) -> Result<Bin> {
        self.check_joinable(other)?;
        let summary = self.summary.merged(&other.summary)?;
        Ok(self.joined(other, summary))
    }

    /// Bins join only within one column, one kind and one labelling.
    fn check_joinable(&self, other: &Bin) -> Result<()> {
        if self.at != other.at {
            return Err(Error::Schema(format!(
                "cannot merge bins from columns {} and {}",
                self.at, other.at
            )));
        }
        if self.kind != other.kind {
            return Err(Error::KindMismatch {
                expected: self.kind,
                got: other.kind,
            });
        }
        if self.labelled != other.labelled {
            return Err(Error::Schema(format!(
                "cannot merge labelled and unlabelled bins of column {}",
                self.at
            )));
        }
        Ok(())
    }

    fn joined(&self, other: &Bin, summary: Summary) -> Bin {
        let mut members = Vec::with_capacity(self.members.len() + other.members.len());
        members.extend_from_slice(&self.members);
        members.extend_from_slice(&other.members);
        Bin {
            at: self.at,
            kind: self.kind,
            range: self.range.union(&other.range),
            members,
            summary,
            labelled: self.labelled,
        }
    }
}

// ---------------------------------------------------------------------------
// SIMPLER1
// ---------------------------------------------------------------------------

/// The merge test applied to adjacent bins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeRule {
    /// Bins judging fewer than `small` values merge unconditionally.
    /// `0.0` leaves only the diversity test.
    pub small: f64,
}

impl MergeRule {
    pub fn new(small: f64) -> Result<Self> {
        if !small.is_finite() || small < 0.0 {
            return Err(Error::invalid("small", small, "must be finite and >= 0"));
        }
        Ok(Self { small })
    }

    /// Returns the merged bin if `a` and `b` should be combined.
    ///
    /// # Errors
    /// `EmptyBin` if either bin is empty; `KindMismatch` or `Schema` if the
    /// bins belong to different kinds, columns or labellings.
    pub fn try_merge(&self, a: &Bin, b: &Bin) -> Result<Option<Bin>> {
        a.check_joinable(b)?;
        let (n1, n2) = (a.n() as f64, b.n() as f64);
        let (d1, d2) = (a.div()?, b.div()?);
        // members are only copied once the test passes
        let summary = a.summary.merged(&b.summary)?;
        let accept = n1 < self.small
            || n2 < self.small
            || summary.div()? <= (n1 * d1 + n2 * d2) / (n1 + n2);
        Ok(accept.then(|| a.joined(b, summary)))
    }

    /// Whether `a` and `b` should be combined.
    ///
    /// # Examples
    /// ```
    /// use u_simpler::bins::{Bin, MergeRule};
    /// use u_simpler::summary::SummaryConfig;
    /// use u_simpler::value::Value;
    ///
    /// let bin = |xs: &[f64]| {
    ///     let vs: Vec<Value> = xs.iter().copied().map(Value::Num).collect();
    ///     Bin::from_values(0, &vs, SummaryConfig::default()).unwrap()
    /// };
    /// let rule = MergeRule::default();
    /// assert!(rule.should_merge(&bin(&[3.0]), &bin(&[3.0, 3.0])).unwrap());
    /// assert!(!rule.should_merge(&bin(&[1.0, 1.0, 1.0]), &bin(&[1.0, 1.0, 2.0])).unwrap());
    /// ```
    pub fn should_merge(&self, a: &Bin, b: &Bin) -> Result<bool> {
        Ok(self.try_merge(a, b)?.is_some())
    }
}

/// Merges adjacent bins until no pair passes `rule`.
///
/// Each pass scans left to right; when `(j, j+1)` merges, the merged bin is
/// kept and the scan resumes at `j + 2`. Passes repeat until one makes no
/// merge. Empty and single-bin inputs are returned unchanged.
pub fn merge_all(bins: Vec<Bin>, rule: &MergeRule) -> Result<Vec<Bin>> {
    let mut bins = bins;
    let mut pass = 0_usize;
    loop {
        if bins.len() < 2 {
            return Ok(bins);
        }
        pass += 1;
        let before = bins.len();
        let mut out = Vec::with_capacity(before);
        let mut iter = bins.into_iter().peekable();
        while let Some(a) = iter.next() {
            if let Some(b) = iter.peek() {
                if let Some(merged) = rule.try_merge(&a, b)? {
                    iter.next();
                    out.push(merged);
                    continue;
                }
            }
            out.push(a);
        }
        debug!(pass, before, after = out.len(), "merge pass");
        if out.len() == before {
            return Ok(out);
        }
        bins = out;
    }
}

/// Stretches numeric bins so they tile the whole line: the first starts at
/// `-inf`, the last ends at `+inf`, and each ends where the next begins.
pub fn complete(bins: &mut [Bin]) {
    let n = bins.len();
    if n == 0 || bins[0].kind != Kind::Num {
        return;
    }
    for j in 0..n {
        let next_lo = match bins.get(j + 1) {
            Some(next) => next.lo().unwrap_or(f64::INFINITY),
            None => f64::INFINITY,
        };
        if let Range::Num { lo, hi } = &mut bins[j].range {
            if j == 0 {
                *lo = f64::NEG_INFINITY;
            }
            *hi = next_lo;
        }
    }
}

// ---------------------------------------------------------------------------
// Discretizers
// ---------------------------------------------------------------------------

/// Settings for cutting a column into bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    pub summary: SummaryConfig,
    /// Equal-width buckets used to pre-bin numeric columns before labelled
    /// merging; `0` starts from one bin per distinct value.
    pub max_bins: usize,
    /// Overrides the size below which bins always merge. Unlabelled binning
    /// defaults to `0`, labelled binning to `rows / max_bins`.
    pub small: Option<f64>,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            summary: SummaryConfig::default(),
            max_bins: 16,
            small: None,
        }
    }
}

/// Sorts column `at` and coarsens it under `SIMPLER1`.
///
/// Missing values are dropped. Each value starts in its own bin; the result
/// is [`merge_all`] of those singletons, tiled with [`complete`] for numeric
/// columns. An all-missing column yields no bins.
///
/// # Examples
/// ```
/// use u_simpler::bins::{discretize, BinningConfig};
/// use u_simpler::value::Value;
///
/// let column: Vec<Value> = [3.0, 1.0, 1.0, 3.0, 1.0]
///     .iter()
///     .copied()
///     .map(Value::Num)
///     .collect();
/// let bins = discretize(0, &column, &BinningConfig::default()).unwrap();
/// assert_eq!(bins.len(), 2);
/// assert_eq!(bins[0].n(), 3);
/// ```
pub fn discretize(at: usize, values: &[Value], config: &BinningConfig) -> Result<Vec<Bin>> {
    let mut present: Vec<&Value> = values.iter().filter(|v| !v.is_missing()).collect();
    let Some(kind) = present.first().and_then(|v| v.kind()) else {
        return Ok(Vec::new());
    };
    present.sort_by(|a, b| a.sort_cmp(b));

    let mut singletons = Vec::with_capacity(present.len());
    for v in present {
        let mut bin = Bin::new(at, kind, config.summary);
        bin.push(v.clone())?;
        singletons.push(bin);
    }
    let rule = MergeRule::new(config.small.unwrap_or(0.0))?;
    let mut bins = merge_all(singletons, &rule)?;
    complete(&mut bins);
    debug!(at, bins = bins.len(), "discretized column");
    Ok(bins)
}

/// Cuts column `at` wherever the distribution of `labels` changes.
///
/// Numeric columns are pre-binned into `max_bins` equal-width buckets (or one
/// bucket per distinct value when `max_bins == 0`), merged under
/// `SIMPLER1` with the `small` threshold, then tiled. Symbolic columns get one
/// bin per symbol and are not merged, having no order to be contiguous in.
///
/// # Errors
/// `ArityMismatch` if `values` and `labels` differ in length.
pub fn discretize_labelled(
    at: usize,
    values: &[Value],
    labels: &[Value],
    config: &BinningConfig,
) -> Result<Vec<Bin>> {
    if values.len() != labels.len() {
        return Err(Error::ArityMismatch {
            expected: values.len(),
            got: labels.len(),
        });
    }
    let rows: Vec<(&Value, &Value)> = values
        .iter()
        .zip(labels)
        .filter(|(x, y)| !x.is_missing() && !y.is_missing())
        .collect();
    let Some(kind) = rows.first().and_then(|(x, _)| x.kind()) else {
        return Ok(Vec::new());
    };
    let label_kind = rows
        .first()
        .and_then(|(_, y)| y.kind())
        .unwrap_or(Kind::Sym);
    let new_bin = || Bin::labelled(at, kind, label_kind, config.summary);

    match kind {
        Kind::Sym => {
            let mut by_symbol: BTreeMap<&str, Bin> = BTreeMap::new();
            for (x, y) in rows {
                let Value::Sym(s) = x else {
                    return Err(Error::KindMismatch {
                        expected: Kind::Sym,
                        got: Kind::Num,
                    });
                };
                by_symbol
                    .entry(s.as_str())
                    .or_insert_with(new_bin)
                    .push_labelled(x.clone(), y)?;
            }
            Ok(by_symbol.into_values().collect())
        }
        Kind::Num => {
            let (lo, hi) = numeric_extent(&rows)?;
            let mut buckets: BTreeMap<Bucket, Bin> = BTreeMap::new();
            for (x, y) in &rows {
                let key = bucket_of(x, lo, hi, config.max_bins);
                buckets
                    .entry(key)
                    .or_insert_with(new_bin)
                    .push_labelled((*x).clone(), y)?;
            }
            let small = match config.small {
                Some(small) => small,
                None if config.max_bins > 0 => rows.len() as f64 / config.max_bins as f64,
                None => 0.0,
            };
            let rule = MergeRule::new(small)?;
            let mut bins = merge_all(buckets.into_values().collect(), &rule)?;
            complete(&mut bins);
            debug!(at, bins = bins.len(), small, "discretized labelled column");
            Ok(bins)
        }
    }
}

/// Sort key for numeric pre-binning: a bucket index or the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Index(usize),
    Exact(i64),
}

fn numeric_extent(rows: &[(&Value, &Value)]) -> Result<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (x, _) in rows {
        let x = x.as_num().ok_or(Error::KindMismatch {
            expected: Kind::Num,
            got: Kind::Sym,
        })?;
        lo = lo.min(x);
        hi = hi.max(x);
    }
    Ok((lo, hi))
}

fn bucket_of(x: &Value, lo: f64, hi: f64, max_bins: usize) -> Bucket {
    let x = x.as_num().unwrap_or(lo);
    if max_bins == 0 {
        return Bucket::Exact(order_key(x));
    }
    let norm = (x - lo) / (hi - lo + 1e-30);
    let index = (max_bins as f64 * norm) as usize;
    Bucket::Index(index.min(max_bins - 1))
}

/// Maps an `f64` to an `i64` with the same total order.
fn order_key(x: f64) -> i64 {
    let bits = x.to_bits() as i64;
    bits ^ (((bits >> 63) as u64) >> 1) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(xs: &[f64]) -> Bin {
        let vs: Vec<Value> = xs.iter().copied().map(Value::Num).collect();
        Bin::from_values(0, &vs, SummaryConfig::default()).unwrap()
    }

    fn nums(xs: &[f64]) -> Vec<Value> {
        xs.iter().copied().map(Value::Num).collect()
    }

    fn syms(xs: &[&str]) -> Vec<Value> {
        xs.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_simpler1_scenario_does_not_merge() {
        // div([1,1,1]) = 0, div([1,1,2]) = 0.577, weighted = 0.289,
        // div(both) = 0.408 > 0.289
        let rule = MergeRule::default();
        assert!(!rule.should_merge(&bin(&[1.0, 1.0, 1.0]), &bin(&[1.0, 1.0, 2.0])).unwrap());
    }

    #[test]
    fn test_simpler1_scenario_population_spread() {
        // div([1,1,2]) = 0.471, weighted = 0.236, div(both) = 0.373 > 0.236
        let config = SummaryConfig {
            spread: crate::summary::Spread::Population,
            ..Default::default()
        };
        let a = Bin::from_values(0, &nums(&[1.0, 1.0, 1.0]), config).unwrap();
        let b = Bin::from_values(0, &nums(&[1.0, 1.0, 2.0]), config).unwrap();
        assert!((b.div().unwrap() - 0.4714045207910317).abs() < 1e-12);
        assert!(!MergeRule::default().should_merge(&a, &b).unwrap());
    }

    #[test]
    fn test_zero_div_neighbours_merge() {
        let rule = MergeRule::default();
        assert!(rule.should_merge(&bin(&[5.0]), &bin(&[5.0, 5.0])).unwrap());
        assert!(!rule.should_merge(&bin(&[5.0]), &bin(&[6.0])).unwrap());
    }

    #[test]
    fn test_try_merge_matches_concat() {
        let rule = MergeRule::default();
        let (a, b) = (bin(&[1.0, 1.0]), bin(&[1.0]));
        assert_eq!(rule.try_merge(&a, &b).unwrap(), Some(a.concat(&b).unwrap()));
        let (a, b) = (bin(&[1.0, 1.0, 1.0]), bin(&[1.0, 1.0, 2.0]));
        assert_eq!(rule.try_merge(&a, &b).unwrap(), None);
        assert_eq!(a.members().len(), 3);
    }

    #[test]
    fn test_concat_rejects_mixed_labelling() {
        let mut labelled = Bin::labelled(0, Kind::Num, Kind::Sym, SummaryConfig::default());
        labelled.push_labelled(Value::Num(1.0), &Value::from("a")).unwrap();
        let plain = bin(&[1.0]);
        assert!(matches!(labelled.concat(&plain), Err(Error::Schema(_))));
        assert!(matches!(plain.concat(&labelled), Err(Error::Schema(_))));
        assert!(MergeRule::new(100.0).unwrap().try_merge(&plain, &labelled).is_err());
    }

    #[test]
    fn test_small_bins_merge_unconditionally() {
        let rule = MergeRule::new(2.0).unwrap();
        assert!(rule.should_merge(&bin(&[5.0]), &bin(&[6.0])).unwrap());
        assert!(MergeRule::new(-1.0).is_err());
        assert!(MergeRule::new(f64::NAN).is_err());
    }

    #[test]
    fn test_empty_bin_is_error() {
        let empty = Bin::new(0, Kind::Num, SummaryConfig::default());
        let err = MergeRule::default().should_merge(&empty, &bin(&[1.0]));
        assert!(matches!(err, Err(Error::EmptyBin)));
    }

    #[test]
    fn test_concat_rejects_other_column_or_kind() {
        let a = bin(&[1.0]);
        let b = Bin::from_values(1, &nums(&[1.0]), SummaryConfig::default()).unwrap();
        assert!(matches!(a.concat(&b), Err(Error::Schema(_))));
        let s = Bin::from_values(0, &syms(&["a"]), SummaryConfig::default()).unwrap();
        assert!(matches!(a.concat(&s), Err(Error::KindMismatch { .. })));
    }

    #[test]
    fn test_merge_all_single_and_empty_unchanged() {
        let rule = MergeRule::default();
        assert!(merge_all(Vec::new(), &rule).unwrap().is_empty());
        let one = vec![bin(&[1.0, 9.0])];
        assert_eq!(merge_all(one.clone(), &rule).unwrap(), one);
    }

    #[test]
    fn test_merge_all_left_to_right_order() {
        // Three equal singletons: pass 1 merges (0,1) and keeps 2; pass 2
        // merges the pair with 2.
        let rule = MergeRule::default();
        let out = merge_all(vec![bin(&[4.0]), bin(&[4.0]), bin(&[4.0])], &rule).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].n(), 3);

        let out = merge_all(
            vec![bin(&[1.0]), bin(&[1.0]), bin(&[2.0]), bin(&[2.0])],
            &rule,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].members(), nums(&[1.0, 1.0]).as_slice());
        assert_eq!(out[1].members(), nums(&[2.0, 2.0]).as_slice());
    }

    #[test]
    fn test_discretize_groups_distinct_values() {
        let column = nums(&[3.0, 1.0, 2.0, 1.0, 3.0, 3.0]);
        let bins = discretize(0, &column, &BinningConfig::default()).unwrap();
        let sizes: Vec<u64> = bins.iter().map(Bin::n).collect();
        assert_eq!(sizes, vec![2, 1, 3]);
        assert_eq!(bins[0].lo(), Some(f64::NEG_INFINITY));
        assert_eq!(bins[2].hi(), Some(f64::INFINITY));
        assert_eq!(bins[1].lo(), bins[0].hi());
    }

    #[test]
    fn test_discretize_skips_missing() {
        let column = vec![Value::Missing, Value::Num(1.0), Value::Missing];
        let bins = discretize(0, &column, &BinningConfig::default()).unwrap();
        assert_eq!(bins.len(), 1);
        assert!(discretize(0, &[Value::Missing], &BinningConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_discretize_symbols() {
        let column = syms(&["b", "a", "b", "a", "c"]);
        let bins = discretize(3, &column, &BinningConfig::default()).unwrap();
        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(|b| b.at() == 3 && b.div().unwrap() == 0.0));
        assert!(bins[0].selects(&Value::from("a")));
        assert!(!bins[0].selects(&Value::from("b")));
    }

    #[test]
    fn test_selects() {
        let bins = discretize(0, &nums(&[1.0, 1.0, 5.0]), &BinningConfig::default()).unwrap();
        assert!(bins[0].selects(&Value::Num(-100.0)));
        assert!(bins[0].selects(&Value::Num(1.0)));
        assert!(!bins[0].selects(&Value::Num(5.0)));
        assert!(bins[1].selects(&Value::Num(5.0)));
        assert!(bins[1].selects(&Value::Missing));
        assert!(!bins[1].selects(&Value::from("x")));

        // an untiled single-point bin selects exactly its value
        let point = bin(&[2.0]);
        assert!(point.selects(&Value::Num(2.0)));
        assert!(!point.selects(&Value::Num(2.5)));
    }

    #[test]
    fn test_labelled_cuts_where_class_changes() {
        let xs = nums(&[1.0, 2.0, 3.0, 4.0, 10.0, 11.0, 12.0, 13.0]);
        let ys = syms(&["lo", "lo", "lo", "lo", "hi", "hi", "hi", "hi"]);
        let config = BinningConfig {
            max_bins: 0,
            small: Some(0.0),
            ..Default::default()
        };
        let bins = discretize_labelled(0, &xs, &ys, &config).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].mid().unwrap(), Value::from("lo"));
        assert_eq!(bins[1].mid().unwrap(), Value::from("hi"));
        assert_eq!(bins[0].members().len(), 4);
        assert!(bins[0].selects(&Value::Num(4.0)));
        assert!(bins[1].selects(&Value::Num(10.0)));
    }

    #[test]
    fn test_labelled_equal_width_prebinning() {
        let xs: Vec<Value> = (0..32).map(|i| Value::Num(i as f64)).collect();
        let ys: Vec<Value> = (0..32)
            .map(|i| Value::from(if i < 16 { "a" } else { "b" }))
            .collect();
        let bins = discretize_labelled(0, &xs, &ys, &BinningConfig::default()).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].n(), 16);
        assert_eq!(bins[0].div().unwrap(), 0.0);
    }

    #[test]
    fn test_labelled_symbolic_one_bin_per_symbol() {
        let xs = syms(&["red", "blue", "red", "green"]);
        let ys = syms(&["y", "n", "y", "n"]);
        let bins = discretize_labelled(2, &xs, &ys, &BinningConfig::default()).unwrap();
        assert_eq!(bins.len(), 3);
        let red = bins.iter().find(|b| b.selects(&Value::from("red"))).unwrap();
        assert_eq!(red.n(), 2);
    }

    #[test]
    fn test_labelled_length_mismatch() {
        let err = discretize_labelled(0, &nums(&[1.0]), &[], &BinningConfig::default());
        assert!(matches!(err, Err(Error::ArityMismatch { .. })));
    }

    #[test]
    fn test_push_guards() {
        let mut plain = Bin::new(0, Kind::Num, SummaryConfig::default());
        assert!(plain.push_labelled(Value::Num(1.0), &Value::from("a")).is_err());
        assert!(plain.push(Value::from("a")).is_err());
        let mut labelled = Bin::labelled(0, Kind::Num, Kind::Sym, SummaryConfig::default());
        assert!(labelled.push(Value::Num(1.0)).is_err());
        assert!(labelled
            .push_labelled(Value::from("a"), &Value::from("a"))
            .is_err());
    }

    #[test]
    fn test_order_key_preserves_order() {
        let xs = [-1e9, -2.5, -0.0, 0.0, 1e-300, 3.0, 1e9];
        for w in xs.windows(2) {
            assert!(order_key(w[0]) <= order_key(w[1]), "{} vs {}", w[0], w[1]);
        }
    }
}
