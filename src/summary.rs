//! Incremental distribution summaries.
//!
//! A summary reports `(mid, div, n)` for a stream of values of one kind:
//!
//! | Kind | mid | div |
//! |---|---|---|
//! | numeric | mean (or median) | standard deviation |
//! | symbolic | mode | Shannon entropy (bits) |
//!
//! Adding a value is amortized O(1). Two summaries of the same kind can be
//! [`merged`](Summary::merged) without revisiting their members.
//!
//! Missing values are ignored by every summary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{self, WelfordAccumulator};
use crate::value::{Kind, Value};

/// Guards the `hi - lo` denominator of [`Num::norm`].
const TINY: f64 = 1e-30;

/// Central tendency reported as `mid` for numeric summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Center {
    #[default]
    Mean,
    /// Retains every value; `mid` sorts on demand.
    Median,
}

/// Denominator used for the numeric standard deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spread {
    /// `n - 1`; a single value has spread 0.
    #[default]
    Sample,
    Population,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub center: Center,
    pub spread: Spread,
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

/// Streaming summary of numbers: Welford moments plus the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct Num {
    acc: WelfordAccumulator,
    lo: f64,
    hi: f64,
    /// Only populated for [`Center::Median`].
    values: Vec<f64>,
    config: SummaryConfig,
}

impl Num {
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            acc: WelfordAccumulator::new(),
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
            values: Vec::new(),
            config,
        }
    }

    pub fn add(&mut self, x: f64) {
        self.acc.update(x);
        self.lo = self.lo.min(x);
        self.hi = self.hi.max(x);
        if self.config.center == Center::Median {
            self.values.push(x);
        }
    }

    pub fn n(&self) -> u64 {
        self.acc.count()
    }

    /// Smallest value seen, or `None` when empty.
    pub fn lo(&self) -> Option<f64> {
        (self.n() > 0).then_some(self.lo)
    }

    pub fn hi(&self) -> Option<f64> {
        (self.n() > 0).then_some(self.hi)
    }

    pub fn mid(&self) -> Option<f64> {
        match self.config.center {
            Center::Mean => self.acc.mean(),
            Center::Median => stats::median(&self.values),
        }
    }

    /// Standard deviation. A single value has spread 0 under either
    /// denominator.
    pub fn div(&self) -> Option<f64> {
        match (self.n(), self.config.spread) {
            (0, _) => None,
            (1, _) => Some(0.0),
            (_, Spread::Sample) => self.acc.sample_std_dev(),
            (_, Spread::Population) => self.acc.population_std_dev(),
        }
    }

    /// Maps `x` into `0..=1` relative to the observed range.
    pub fn norm(&self, x: f64) -> f64 {
        if self.n() == 0 {
            return x;
        }
        (x - self.lo) / (self.hi - self.lo + TINY)
    }

    pub fn merge(&mut self, other: &Num) {
        self.acc.merge(&other.acc);
        self.lo = self.lo.min(other.lo);
        self.hi = self.hi.max(other.hi);
        if self.config.center == Center::Median {
            self.values.extend_from_slice(&other.values);
        }
    }
}

// ---------------------------------------------------------------------------
// Symbolic
// ---------------------------------------------------------------------------

/// Frequency table of symbols in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sym {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
    n: u64,
}

impl Sym {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, s: &str) {
        self.add_count(s, 1);
    }

    fn add_count(&mut self, s: &str, count: u64) {
        match self.index.get(s) {
            Some(&i) => self.counts[i].1 += count,
            None => {
                self.index.insert(s.to_owned(), self.counts.len());
                self.counts.push((s.to_owned(), count));
            }
        }
        self.n += count;
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    /// How often `s` has been seen.
    pub fn count(&self, s: &str) -> u64 {
        self.index.get(s).map_or(0, |&i| self.counts[i].1)
    }

    /// Most frequent symbol; ties go to the one seen first.
    pub fn mid(&self) -> Option<&str> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.counts {
            match best {
                Some(b) if entry.1 <= b.1 => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(s, _)| s.as_str())
    }

    pub fn div(&self) -> Option<f64> {
        stats::entropy(self.counts.iter().map(|(_, c)| *c))
    }

    pub fn merge(&mut self, other: &Sym) {
        for (s, c) in &other.counts {
            self.add_count(s, *c);
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// A numeric or symbolic summary.
///
/// # Examples
/// ```
/// use u_simpler::summary::{Summary, SummaryConfig};
/// use u_simpler::value::{Kind, Value};
///
/// let mut s = Summary::new(Kind::Sym, SummaryConfig::default());
/// for c in "aaaabbc".chars() {
///     s.add(&Value::from(c.to_string())).unwrap();
/// }
/// assert_eq!(s.mid().unwrap(), Value::from("a"));
/// assert!((s.div().unwrap() - 1.379).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Num(Num),
    Sym(Sym),
}

impl Summary {
    pub fn new(kind: Kind, config: SummaryConfig) -> Self {
        match kind {
            Kind::Num => Summary::Num(Num::new(config)),
            Kind::Sym => Summary::Sym(Sym::new()),
        }
    }

    /// Builds a summary of `values`, taking the kind from the first
    /// non-missing value. Returns `EmptyBin` when every value is missing.
    pub fn of(values: &[Value], config: SummaryConfig) -> Result<Self> {
        let kind = values
            .iter()
            .find_map(Value::kind)
            .ok_or(Error::EmptyBin)?;
        let mut summary = Summary::new(kind, config);
        for v in values {
            summary.add(v)?;
        }
        Ok(summary)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Summary::Num(_) => Kind::Num,
            Summary::Sym(_) => Kind::Sym,
        }
    }

    /// Adds one value. Missing values are skipped.
    ///
    /// # Errors
    /// `KindMismatch` if the value is of the other kind.
    pub fn add(&mut self, value: &Value) -> Result<()> {
        match (self, value) {
            (_, Value::Missing) => Ok(()),
            (Summary::Num(num), Value::Num(x)) => {
                num.add(*x);
                Ok(())
            }
            (Summary::Sym(sym), Value::Sym(s)) => {
                sym.add(s);
                Ok(())
            }
            (summary, v) => Err(Error::KindMismatch {
                expected: summary.kind(),
                got: v.kind().unwrap_or(summary.kind()),
            }),
        }
    }

    pub fn n(&self) -> u64 {
        match self {
            Summary::Num(num) => num.n(),
            Summary::Sym(sym) => sym.n(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n() == 0
    }

    /// Central tendency: mean/median for numbers, mode for symbols.
    pub fn mid(&self) -> Result<Value> {
        let mid = match self {
            Summary::Num(num) => num.mid().map(Value::Num),
            Summary::Sym(sym) => sym.mid().map(Value::from),
        };
        mid.ok_or(Error::EmptyBin)
    }

    /// Diversity: standard deviation for numbers, entropy for symbols.
    pub fn div(&self) -> Result<f64> {
        let div = match self {
            Summary::Num(num) => num.div(),
            Summary::Sym(sym) => sym.div(),
        };
        div.ok_or(Error::EmptyBin)
    }

    /// Returns a new summary describing the members of both.
    pub fn merged(&self, other: &Summary) -> Result<Summary> {
        let mut out = self.clone();
        match (&mut out, other) {
            (Summary::Num(a), Summary::Num(b)) => a.merge(b),
            (Summary::Sym(a), Summary::Sym(b)) => a.merge(b),
            _ => {
                return Err(Error::KindMismatch {
                    expected: self.kind(),
                    got: other.kind(),
                })
            }
        }
        Ok(out)
    }

    pub fn as_num(&self) -> Option<&Num> {
        match self {
            Summary::Num(num) => Some(num),
            Summary::Sym(_) => None,
        }
    }

    pub fn as_sym(&self) -> Option<&Sym> {
        match self {
            Summary::Sym(sym) => Some(sym),
            Summary::Num(_) => None,
        }
    }
}
