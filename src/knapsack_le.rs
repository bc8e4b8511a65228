use num_traits::Float;
use crate::prox::{Prox, ProjError, Summation, SumKahan, SumNaive, Thresholds};
use crate::prox::{count, partition, check_point};
use crate::knapsack_eq::{KnapsackParam, search_eq};

//

/// Inequality-constrained knapsack
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ l \le x_i \le h,\ \sum_i x_i \le r
/// \right\rbrace
/// \\]
pub struct ProxKnapsackLe<F: Float, R: Summation<F> = SumNaive, W: Summation<F> = SumKahan>
{
    par: KnapsackParam<F>,
    range_sum: R,
    sweep_sum: W,
}

impl<F: Float> ProxKnapsackLe<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxKnapsackLe`] instance with default parameters.
    pub fn new() -> Self
    {
        ProxKnapsackLe {
            par: KnapsackParam::default(),
            range_sum: SumNaive,
            sweep_sum: SumKahan,
        }
    }
}

impl<F: Float> Default for ProxKnapsackLe<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> ProxKnapsackLe<F, R, W>
{
    /// Changes parameters.
    ///
    /// Returns [`ProxKnapsackLe`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut KnapsackParam<F>)
    {
        f(&mut self.par);
        self
    }

    /// Changes the summation policy of the sum over the clipped point.
    pub fn summation<R2: Summation<F>>(self, range_sum: R2) -> ProxKnapsackLe<F, R2, W>
    {
        ProxKnapsackLe {
            par: self.par,
            range_sum,
            sweep_sum: self.sweep_sum,
        }
    }

    /// Changes the summation policy of the running sum.
    pub fn sweep_summation<W2: Summation<F>>(self, sweep_sum: W2) -> ProxKnapsackLe<F, R, W2>
    {
        ProxKnapsackLe {
            par: self.par,
            range_sum: self.range_sum,
            sweep_sum,
        }
    }

    /// Parameters.
    pub fn param(&self) -> &KnapsackParam<F>
    {
        &self.par
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> Prox<F> for ProxKnapsackLe<F, R, W>
{
    fn thresholds(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        self.par.check()?;
        check_point(x)?;

        let p = &self.par;
        let n = x.len();
        if count::<F>(n) * p.lo > p.rhs {
            log::error!("budget below the lower bounds for length {}", n);
            return Err(ProjError::EmptySet);
        }

        let m_begin = partition(x, |v| v >= p.hi);
        let m_end = m_begin + partition(&mut x[m_begin..], |v| v > p.lo);

        let s = self.range_sum.sum(&x[m_begin..m_end])
            + p.hi * count(m_begin)
            + p.lo * count(n - m_end);

        if s <= p.rhs {
            log::trace!("inactive budget");
            return Ok(Thresholds::new(F::zero(), p.lo, p.hi, m_begin, m_end));
        }

        search_eq(x, p.lo, p.hi, p.rhs, &self.sweep_sum).ok_or_else(|| {
            log::error!("no thresholds found for knapsack of length {}", n);
            ProjError::NoThresholds
        })
    }
}

//

#[test]
fn test_knapsack_le1()
{
    use float_eq::assert_float_eq;

    let ref_x = &[1., 0.5, 0.5];
    let x = &mut[3., 1., 1.];
    let p = ProxKnapsackLe::new().par(|p| {
        p.rhs = 2.;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 0.5, abs <= 1e-12);
}

#[test]
fn test_knapsack_le2()
{
    use float_eq::assert_float_eq;

    let ref_x = &[0.2, 0.2, 0.2];
    let x = &mut[0.2, 0.2, 0.2];
    let p = ProxKnapsackLe::new().par(|p| {
        p.rhs = 1.;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-15);
    assert_eq!(th.t, 0.);
}

#[test]
fn test_knapsack_le3()
{
    let x = &mut[-1., -1.];
    let p = ProxKnapsackLe::new().par(|p| {
        p.lo = 1.;
        p.hi = 2.;
        p.rhs = 1.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::EmptySet);
}
