//! TOML configuration covering every tunable in the crate.
//!
//! Every key is optional:
//!
//! ```toml
//! seed = 1234567891
//! bins = 16          # equal-width pre-bins for labelled discretization
//! small = 0.0        # bins smaller than this always merge
//! center = "mean"    # or "median"
//! spread = "sample"  # or "population"
//! cf = 0.3
//! f = 0.5
//! budget = 20
//! ```
//!
//! Values are validated when a typed setting is built from them, not at
//! parse time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bins::{BinningConfig, MergeRule};
use crate::error::Result;
use crate::mutate::MutationParams;
use crate::summary::{Center, Spread, SummaryConfig};
use crate::synth::SynthesisConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub seed: u64,
    pub bins: usize,
    pub small: f64,
    pub center: Center,
    pub spread: Spread,
    pub cf: f64,
    pub f: f64,
    pub budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 1234567891,
            bins: 16,
            small: 0.0,
            center: Center::Mean,
            spread: Spread::Sample,
            cf: 0.3,
            f: 0.5,
            budget: 20,
        }
    }
}

impl Config {
    /// # Examples
    /// ```
    /// use u_simpler::config::Config;
    /// let config = Config::from_toml_str("cf = 0.9\nbudget = 5").unwrap();
    /// assert_eq!(config.budget, 5);
    /// assert_eq!(config.bins, 16);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn summary(&self) -> SummaryConfig {
        SummaryConfig {
            center: self.center,
            spread: self.spread,
        }
    }

    pub fn merge_rule(&self) -> Result<MergeRule> {
        MergeRule::new(self.small)
    }

    /// Binning settings. A `small` of zero defers to the per-discretizer
    /// default.
    pub fn binning(&self) -> Result<BinningConfig> {
        let rule = self.merge_rule()?;
        Ok(BinningConfig {
            summary: self.summary(),
            max_bins: self.bins,
            small: (rule.small > 0.0).then_some(rule.small),
        })
    }

    pub fn mutation(&self) -> Result<MutationParams> {
        MutationParams::new(self.cf, self.f)
    }

    pub fn synthesis(&self) -> Result<SynthesisConfig> {
        Ok(SynthesisConfig {
            budget: self.budget,
            params: self.mutation()?,
            seed: self.seed,
        })
    }
}
