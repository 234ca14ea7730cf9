//! Differential mutation of examples.
//!
//! A child is built from a target parent `a` and two donors `b`, `c`, one
//! independent field at a time:
//!
//! ```text
//! r ~ U[0, 1)
//! r >= cf          → a[i]
//! numeric field    → a[i] + f · (b[i] − c[i])
//! symbolic field   → b[i] or c[i], each with probability 0.5
//! ```
//!
//! Dependent (`y`) fields are never computed here: the child's `y` is all
//! missing until an external evaluation fills it in.

use rand::Rng;
use tracing::trace;

use crate::data::Example;
use crate::error::{Error, Result};
use crate::value::{Kind, Value};

/// Largest differential weight accepted by [`MutationParams::new`].
pub const MAX_F: f64 = 2.0;

/// Crossover probability and differential weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    cf: f64,
    f: f64,
}

impl MutationParams {
    /// # Errors
    /// `InvalidParameter` unless `cf ∈ [0, 1]` and `f ∈ [0, MAX_F]`.
    pub fn new(cf: f64, f: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&cf) {
            return Err(Error::invalid("cf", cf, "must be in [0, 1]"));
        }
        if !(0.0..=MAX_F).contains(&f) {
            return Err(Error::invalid("f", f, "must be in [0, 2]"));
        }
        Ok(Self { cf, f })
    }

    pub fn cf(&self) -> f64 {
        self.cf
    }

    pub fn f(&self) -> f64 {
        self.f
    }
}

impl Default for MutationParams {
    fn default() -> Self {
        Self { cf: 0.3, f: 0.5 }
    }
}

/// Produces a child of `a` perturbed toward the difference `b − c`.
///
/// Consumes one draw per field, plus one more for each perturbed symbolic
/// field. The same seed and inputs therefore always yield the same child.
///
/// # Errors
/// - `ArityMismatch` if the parents' `x` (or `y`) lengths differ.
/// - `TypeMismatch` if a field position holds a number in one parent and a
///   symbol in another.
///
/// # Examples
/// ```
/// use u_simpler::data::Example;
/// use u_simpler::mutate::{mutate, MutationParams};
/// use u_simpler::random::create_rng;
/// use u_simpler::value::Value;
///
/// let ex = |x: f64| Example::new(vec![Value::Num(x)], vec![]);
/// let params = MutationParams::new(1.0, 0.5).unwrap();
/// let child = mutate(&ex(2.0), &ex(4.0), &ex(1.0), &params, &mut create_rng(1)).unwrap();
/// assert_eq!(child.x(), &[Value::Num(3.5)]);
/// ```
pub fn mutate<R: Rng>(
    a: &Example,
    b: &Example,
    c: &Example,
    params: &MutationParams,
    rng: &mut R,
) -> Result<Example> {
    check_parents(a, b, c)?;
    let mut x = Vec::with_capacity(a.x().len());
    for (i, ((ai, bi), ci)) in a.x().iter().zip(b.x()).zip(c.x()).enumerate() {
        let r: f64 = rng.random();
        if r >= params.cf {
            x.push(ai.clone());
            continue;
        }
        let child = perturb(ai, bi, ci, params.f, rng);
        trace!(field = i, r, from = %ai, to = %child, "perturbed field");
        x.push(child);
    }
    Ok(Example::unevaluated(x, a.y().len()))
}

fn perturb<R: Rng>(a: &Value, b: &Value, c: &Value, f: f64, rng: &mut R) -> Value {
    match (a, b, c) {
        (Value::Missing, _, _) => Value::Missing,
        (Value::Num(a), Value::Num(b), Value::Num(c)) => Value::Num(a + f * (b - c)),
        (Value::Num(_), _, _) => a.clone(),
        (Value::Sym(_), Value::Sym(_), Value::Sym(_)) => {
            if rng.random_bool(0.5) {
                b.clone()
            } else {
                c.clone()
            }
        }
        (Value::Sym(_), Value::Sym(_), Value::Missing) => b.clone(),
        (Value::Sym(_), Value::Missing, Value::Sym(_)) => c.clone(),
        (Value::Sym(_), _, _) => a.clone(),
    }
}

fn check_parents(a: &Example, b: &Example, c: &Example) -> Result<()> {
    let expected = a.x().len();
    for other in [b, c] {
        if other.x().len() != expected {
            return Err(Error::ArityMismatch {
                expected,
                got: other.x().len(),
            });
        }
        if other.y().len() != a.y().len() {
            return Err(Error::ArityMismatch {
                expected: a.y().len(),
                got: other.y().len(),
            });
        }
    }
    for (position, ((ai, bi), ci)) in a.x().iter().zip(b.x()).zip(c.x()).enumerate() {
        let mut kind: Option<Kind> = None;
        for v in [ai, bi, ci] {
            match (kind, v.kind()) {
                (Some(expected), Some(got)) if expected != got => {
                    return Err(Error::TypeMismatch {
                        position,
                        expected,
                        got,
                    });
                }
                (None, Some(got)) => kind = Some(got),
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn ex(x: Vec<Value>) -> Example {
        Example::new(x, vec![Value::Num(0.0)])
    }

    fn params(cf: f64, f: f64) -> MutationParams {
        MutationParams::new(cf, f).unwrap()
    }

    #[test]
    fn test_scenario_always_perturb() {
        let a = ex(vec![Value::Num(2.0)]);
        let b = ex(vec![Value::Num(4.0)]);
        let c = ex(vec![Value::Num(1.0)]);
        for seed in 0..20 {
            let child = mutate(&a, &b, &c, &params(1.0, 0.5), &mut create_rng(seed)).unwrap();
            assert_eq!(child.x(), &[Value::Num(3.5)]);
        }
    }

    #[test]
    fn test_cf_zero_copies_a() {
        let a = ex(vec![Value::Num(2.0), Value::from("red"), Value::Missing]);
        let b = ex(vec![Value::Num(9.0), Value::from("blue"), Value::Num(1.0)]);
        let c = ex(vec![Value::Num(-3.0), Value::from("green"), Value::Num(5.0)]);
        let mut rng = create_rng(5);
        for _ in 0..50 {
            let child = mutate(&a, &b, &c, &params(0.0, 1.5), &mut rng).unwrap();
            assert_eq!(child.x(), a.x());
        }
    }

    #[test]
    fn test_identical_donors_leave_numbers_unchanged() {
        let a = ex(vec![Value::Num(2.0), Value::Num(-7.5)]);
        let b = ex(vec![Value::Num(4.0), Value::Num(3.0)]);
        let child = mutate(&a, &b, &b, &params(1.0, 0.9), &mut create_rng(3)).unwrap();
        assert_eq!(child.x(), a.x());
    }

    #[test]
    fn test_symbols_come_from_donors() {
        let a = ex(vec![Value::from("a")]);
        let b = ex(vec![Value::from("b")]);
        let c = ex(vec![Value::from("c")]);
        let mut rng = create_rng(11);
        let mut seen_b = false;
        let mut seen_c = false;
        for _ in 0..100 {
            let child = mutate(&a, &b, &c, &params(1.0, 0.5), &mut rng).unwrap();
            match child.x()[0].as_sym() {
                Some("b") => seen_b = true,
                Some("c") => seen_c = true,
                other => panic!("unexpected symbol {other:?}"),
            }
        }
        assert!(seen_b && seen_c);
    }

    #[test]
    fn test_missing_cells() {
        let a = ex(vec![Value::Missing, Value::Num(1.0), Value::from("a")]);
        let b = ex(vec![Value::Num(1.0), Value::Missing, Value::Missing]);
        let c = ex(vec![Value::Num(2.0), Value::Num(3.0), Value::from("c")]);
        let child = mutate(&a, &b, &c, &params(1.0, 0.5), &mut create_rng(0)).unwrap();
        assert_eq!(
            child.x(),
            &[Value::Missing, Value::Num(1.0), Value::from("c")]
        );
    }

    #[test]
    fn test_child_is_unevaluated() {
        let a = ex(vec![Value::Num(1.0)]);
        let child = mutate(&a, &a, &a, &params(0.5, 0.5), &mut create_rng(0)).unwrap();
        assert_eq!(child.y(), &[Value::Missing]);
        assert!(!child.is_evaluated());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = ex(vec![Value::Num(1.0), Value::from("x"), Value::Num(10.0)]);
        let b = ex(vec![Value::Num(5.0), Value::from("y"), Value::Num(0.0)]);
        let c = ex(vec![Value::Num(2.0), Value::from("z"), Value::Num(4.0)]);
        let run = |seed| {
            let mut rng = create_rng(seed);
            (0..20)
                .map(|_| mutate(&a, &b, &c, &params(0.5, 0.8), &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_arity_mismatch() {
        let a = ex(vec![Value::Num(1.0)]);
        let b = ex(vec![Value::Num(1.0), Value::Num(2.0)]);
        let err = mutate(&a, &b, &a, &params(0.5, 0.5), &mut create_rng(0)).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { expected: 1, got: 2 }));

        let short_y = Example::new(vec![Value::Num(1.0)], vec![]);
        let err = mutate(&a, &a, &short_y, &params(0.5, 0.5), &mut create_rng(0)).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { expected: 1, got: 0 }));
    }

    #[test]
    fn test_type_mismatch() {
        let a = ex(vec![Value::Num(1.0), Value::from("s")]);
        let b = ex(vec![Value::Missing, Value::Num(2.0)]);
        let err = mutate(&a, &b, &a, &params(0.5, 0.5), &mut create_rng(0)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                position: 1,
                expected: Kind::Sym,
                got: Kind::Num
            }
        ));
    }

    #[test]
    fn test_invalid_params() {
        assert!(MutationParams::new(-0.1, 0.5).is_err());
        assert!(MutationParams::new(1.1, 0.5).is_err());
        assert!(MutationParams::new(0.5, -1.0).is_err());
        assert!(MutationParams::new(0.5, 2.5).is_err());
        assert!(MutationParams::new(f64::NAN, 0.5).is_err());
        assert!(MutationParams::new(0.5, f64::INFINITY).is_err());
        let p = MutationParams::new(1.0, 2.0).unwrap();
        assert_eq!((p.cf(), p.f()), (1.0, 2.0));
    }
}
