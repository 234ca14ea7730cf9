//! Descriptive statistics with numerical stability guarantees.
//!
//! These are the building blocks of [`crate::summary`]: a compensated sum,
//! a streaming mean/variance accumulator that can be merged, the median and
//! the Shannon entropy of a frequency table.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm, merged with Chan's
//!   pairwise update.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Entropy**: Shannon entropy in bits over positive counts.

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_simpler::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the sample standard deviation (n − 1 denominator).
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_simpler::stats::std_dev;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// let sd = std_dev(&v).unwrap();
/// assert!((sd - 2.138089935299395).abs() < 1e-10);
/// ```
pub fn std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    WelfordAccumulator::from_slice(data).sample_std_dev()
}

/// Computes the population standard deviation (n denominator).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    WelfordAccumulator::from_slice(data).population_std_dev()
}

/// Computes the median of `data` without mutating the input.
///
/// Returns the middle element, or the average of the two middle elements
/// for even-length data.
///
/// # Complexity
/// Time: O(n log n), Space: O(n)
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_simpler::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Shannon entropy, in bits, of a table of counts.
///
/// Non-positive counts are ignored. Returns `None` when no count is positive.
///
/// # Examples
/// ```
/// use u_simpler::stats::entropy;
/// // "aaaabbc"
/// let e = entropy([4_u64, 2, 1]).unwrap();
/// assert!((e - 1.379).abs() < 1e-3);
/// assert_eq!(entropy([5_u64]), Some(0.0));
/// ```
pub fn entropy<I>(counts: I) -> Option<f64>
where
    I: IntoIterator<Item = u64>,
    I::IntoIter: Clone,
{
    let counts = counts.into_iter().filter(|&c| c > 0);
    let total: u64 = counts.clone().sum();
    if total == 0 {
        return None;
    }
    let n = total as f64;
    let e = -counts
        .map(|c| {
            let p = c as f64 / n;
            p * p.log2()
        })
        .sum::<f64>();
    // -0.0 for a single category
    Some(e.max(0.0))
}

// ---------------------------------------------------------------------------
// Kahan compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for count, mean and variance.
///
/// O(1) memory and O(1) per update. Two accumulators can be combined with
/// [`merge`](Self::merge) without revisiting their samples, which is what
/// lets the bin merger test a candidate merge in constant time.
///
/// # Examples
/// ```
/// use u_simpler::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(data: &[f64]) -> Self {
        let mut acc = Self::new();
        for &x in data {
            acc.update(x);
        }
        acc
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the sample variance (n − 1 denominator), or `None` if fewer
    /// than 2 samples have been added.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Returns the population variance (n denominator), or `None` if no
    /// samples have been added.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    /// Merges another accumulator into this one.
    ///
    /// Reference: Chan, Golub & LeVeque (1979), "Updating Formulae and a
    /// Pairwise Algorithm for Computing Sample Variances".
    pub fn merge(&mut self, other: &WelfordAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean_acc - self.mean_acc;

        self.mean_acc += delta * (nb / n);
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = total;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
