//! Budgeted example synthesis.
//!
//! The synthesizer is a thin driver around [`mutate`]: each of `budget`
//! iterations draws three distinct parents from the population (the first is
//! the target), builds a child, optionally evaluates it, and keeps it if the
//! acceptance predicate agrees. Parents are always drawn from the population
//! as it was when the run started.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::{Data, Example, Population};
use crate::error::{Error, Result};
use crate::mutate::{mutate, MutationParams};
use crate::random::{create_rng, sample_distinct};
use crate::value::Value;

/// Parents needed per draw.
const PARENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisConfig {
    /// Number of children to attempt.
    pub budget: usize,
    pub params: MutationParams,
    pub seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            budget: 20,
            params: MutationParams::default(),
            seed: 1234567891,
        }
    }
}

/// Counters from one synthesis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisStats {
    pub attempted: usize,
    pub accepted: usize,
}

type Evaluator<'a> = Box<dyn Fn(&[Value]) -> Vec<Value> + 'a>;
type Acceptance<'a> = Box<dyn Fn(&Example, &Example) -> bool + 'a>;

/// Grows a population by differential mutation.
///
/// # Examples
/// ```
/// use u_simpler::data::Example;
/// use u_simpler::synth::{SynthesisConfig, Synthesizer};
/// use u_simpler::value::Value;
///
/// let population: Vec<Example> = (0..5)
///     .map(|i| Example::new(vec![Value::Num(i as f64)], vec![Value::Missing]))
///     .collect();
/// let synth = Synthesizer::new(SynthesisConfig { budget: 8, ..Default::default() })
///     .with_evaluator(|x| vec![Value::Num(x[0].as_num().unwrap_or(0.0) * 2.0)]);
/// let children = synth.synthesize(&population).unwrap();
/// assert_eq!(children.len(), 8);
/// assert!(children.iter().all(|c| c.is_evaluated()));
/// ```
pub struct Synthesizer<'a> {
    config: SynthesisConfig,
    evaluate: Option<Evaluator<'a>>,
    accept: Option<Acceptance<'a>>,
}

impl fmt::Debug for Synthesizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synthesizer")
            .field("config", &self.config)
            .field("evaluate", &self.evaluate.is_some())
            .field("accept", &self.accept.is_some())
            .finish()
    }
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            config,
            evaluate: None,
            accept: None,
        }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Computes each child's `y` fields from its `x` fields. The returned
    /// vector must match the child's `y` arity.
    pub fn with_evaluator<F>(mut self, evaluate: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + 'a,
    {
        self.evaluate = Some(Box::new(evaluate));
        self
    }

    /// Keeps a child only when `accept(child, target)` holds.
    pub fn with_acceptance<F>(mut self, accept: F) -> Self
    where
        F: Fn(&Example, &Example) -> bool + 'a,
    {
        self.accept = Some(Box::new(accept));
        self
    }

    /// Accepts a child only if its distance to heaven in `data` is no worse
    /// than its target's. Unscorable children are rejected; an unscorable
    /// target accepts any scorable child.
    pub fn closer_to_heaven(self, data: &'a Data) -> Self {
        self.with_acceptance(move |child, target| match (data.d2h(child), data.d2h(target)) {
            (Some(c), Some(t)) => c <= t,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// Runs the configured budget with a generator seeded from the config.
    pub fn synthesize(&self, population: &[Example]) -> Result<Vec<Example>> {
        let mut rng = create_rng(self.config.seed);
        self.synthesize_with(population, &mut rng).map(|(children, _)| children)
    }

    /// Runs the configured budget drawing from `rng`.
    ///
    /// # Errors
    /// - `PopulationTooSmall` with fewer than three examples.
    /// - Any mutation error from inconsistent parents.
    /// - `ArityMismatch` if the evaluator returns the wrong number of fields.
    pub fn synthesize_with<R: Rng>(
        &self,
        population: &[Example],
        rng: &mut R,
    ) -> Result<(Vec<Example>, SynthesisStats)> {
        if population.len() < PARENTS {
            return Err(Error::PopulationTooSmall {
                needed: PARENTS,
                got: population.len(),
            });
        }
        let mut stats = SynthesisStats::default();
        let mut children = Vec::new();
        for draw in 0..self.config.budget {
            let idx = sample_distinct(population.len(), PARENTS, rng).ok_or(
                Error::PopulationTooSmall {
                    needed: PARENTS,
                    got: population.len(),
                },
            )?;
            let (a, b, c) = (&population[idx[0]], &population[idx[1]], &population[idx[2]]);
            let mut child = mutate(a, b, c, &self.config.params, rng)?;
            if let Some(evaluate) = &self.evaluate {
                let y = evaluate(child.x());
                if y.len() != child.y().len() {
                    return Err(Error::ArityMismatch {
                        expected: child.y().len(),
                        got: y.len(),
                    });
                }
                child = child.with_y(y);
            }
            stats.attempted += 1;
            let keep = self.accept.as_ref().map_or(true, |accept| accept(&child, a));
            debug!(draw, target = idx[0], keep, "synthesis draw");
            if keep {
                stats.accepted += 1;
                children.push(child);
            }
        }
        if stats.attempted > 0 && stats.accepted == 0 {
            warn!(attempted = stats.attempted, "acceptance rejected every child");
        }
        info!(
            attempted = stats.attempted,
            accepted = stats.accepted,
            population = population.len(),
            "synthesis finished"
        );
        Ok((children, stats))
    }

    /// Appends accepted children to `population` and returns how many were
    /// added.
    pub fn extend(&self, population: &mut Population) -> Result<usize> {
        let children = self.synthesize(population)?;
        let added = children.len();
        population.extend(children);
        Ok(added)
    }
}
