use num_traits::Float;
use crate::prox::{Prox, ProjError, Summation, SumKahan, SumNaive, Thresholds};
use crate::prox::{count, sort_desc, partition, check_point};
use crate::knapsack_eq::{ProxKnapsackEq, search_eq, sweep_box};

//

/// Biased knapsack parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackBiasedParam<F: Float>
{
    /// Lower bound of each element.
    pub lo: F,
    /// Upper bound of each element.
    pub hi: F,
    /// Right hand side of the budget on the sum of elements.
    pub rhs: F,
    /// Strength of the bias on the sum of elements. Shall be positive.
    pub rho: F,
}

impl<F: Float> Default for KnapsackBiasedParam<F>
{
    fn default() -> Self
    {
        KnapsackBiasedParam {
            lo: F::zero(),
            hi: F::one(),
            rhs: F::one(),
            rho: F::one(),
        }
    }
}

impl<F: Float> KnapsackBiasedParam<F>
{
    pub(crate) fn check(&self) -> Result<(), ProjError>
    {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.rhs.is_finite() && self.rho.is_finite()) {
            log::error!("biased knapsack parameters must be finite");
            return Err(ProjError::InvalidParam);
        }
        if self.lo > self.hi {
            log::error!("biased knapsack lower bound must be <= upper bound");
            return Err(ProjError::InvalidParam);
        }
        if self.rho <= F::zero() {
            log::error!("biased knapsack rho must be positive");
            return Err(ProjError::InvalidParam);
        }
        Ok(())
    }
}

//

/// Sorts `x` in descending order and searches the thresholds with a slack budget, `t = rho * sum`.
fn search_biased<F, W>(x: &mut[F], p: &KnapsackBiasedParam<F>, sweep: &W) -> Option<Thresholds<F>>
where F: Float, W: Summation<F>
{
    sort_desc(x);

    let rho_rhs = p.rho * p.rhs;
    let rho_inv = F::one() / p.rho;

    sweep_box(x, p.lo, p.hi, sweep, |part| {
        //  t = (lo * num_L + hi * num_U + sum_M) / (1/rho + num_M)
        //  (5)  t <= rho * rhs
        let t = (p.lo * part.num_l + p.hi * part.num_u + part.sum_m) / (rho_inv + part.num_m);
        if t <= rho_rhs {Some(t)} else {None}
    })
}

//

/// Biased inequality-constrained knapsack
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \frac12 \\|x - a\\|_2^2 + \frac\rho2 \left( \sum_i x_i \right)^2 \\\\
/// {\rm subject \ to} & l \le x_i \le h \\\\
/// & \sum_i x_i \le r
/// \end{array}
/// \\]
/// for a point \\(a\\).
/// The solution is \\(x_i = \min(h, \max(l, a_i - t))\\) with \\(t = \rho \sum_i x_i + \nu\\),
/// where \\(\nu \ge 0\\) is the multiplier of the budget.
pub struct ProxKnapsackLeBiased<F: Float, R: Summation<F> = SumNaive, W: Summation<F> = SumKahan>
{
    par: KnapsackBiasedParam<F>,
    range_sum: R,
    sweep_sum: W,
}

impl<F: Float> ProxKnapsackLeBiased<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxKnapsackLeBiased`] instance with default parameters.
    pub fn new() -> Self
    {
        ProxKnapsackLeBiased {
            par: KnapsackBiasedParam::default(),
            range_sum: SumNaive,
            sweep_sum: SumKahan,
        }
    }
}

impl<F: Float> Default for ProxKnapsackLeBiased<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> ProxKnapsackLeBiased<F, R, W>
{
    /// Changes parameters.
    ///
    /// Returns [`ProxKnapsackLeBiased`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut KnapsackBiasedParam<F>)
    {
        f(&mut self.par);
        self
    }

    /// Changes the summation policy of the sum over the clipped point.
    pub fn summation<R2: Summation<F>>(self, range_sum: R2) -> ProxKnapsackLeBiased<F, R2, W>
    {
        ProxKnapsackLeBiased {
            par: self.par,
            range_sum,
            sweep_sum: self.sweep_sum,
        }
    }

    /// Changes the summation policy of the running sum in the threshold search.
    pub fn sweep_summation<W2: Summation<F>>(self, sweep_sum: W2) -> ProxKnapsackLeBiased<F, R, W2>
    {
        ProxKnapsackLeBiased {
            par: self.par,
            range_sum: self.range_sum,
            sweep_sum,
        }
    }

    /// Parameters.
    pub fn param(&self) -> &KnapsackBiasedParam<F>
    {
        &self.par
    }

    /// Computes thresholds with the budget held as an equality \\(\sum_i x_i = r\\).
    ///
    /// The bias is then constant and takes no effect.
    /// Returns `Ok` with [`Thresholds`], or `Err` with [`ProjError`] if something fails.
    /// * `x` is a point, sorted in descending order on exit.
    pub fn thresholds_eq(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        self.par.check()?;

        let p = &self.par;
        ProxKnapsackEq::new()
            .sweep_summation(self.sweep_sum)
            .par(|q| {
                q.lo = p.lo;
                q.hi = p.hi;
                q.rhs = p.rhs;
            })
            .thresholds(x)
    }

    fn search_binding(&self, x: &mut[F]) -> Option<Thresholds<F>>
    {
        let p = &self.par;
        search_eq(x, p.lo, p.hi, p.rhs, &self.sweep_sum)
            .filter(|th| th.t >= p.rho * p.rhs)
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> Prox<F> for ProxKnapsackLeBiased<F, R, W>
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

        // check if the budget is violated by the clipped point
        let m_begin = partition(x, |v| v >= p.hi);
        let m_end = m_begin + partition(&mut x[m_begin..], |v| v > p.lo);

        let s = self.range_sum.sum(&x[m_begin..m_end])
            + p.hi * count(m_begin)
            + p.lo * count(n - m_end);

        if s > p.rhs {
            if let Some(th) = self.search_binding(x) {
                log::trace!("equality budget");
                return Ok(th);
            }
        }
        else if p.rho * s == F::zero() {
            log::trace!("zero sum");
            return Ok(Thresholds::new(F::zero(), p.lo, p.hi, m_begin, m_end));
        }

        log::trace!("slack budget");
        if let Some(th) = search_biased(x, p, &self.sweep_sum) {
            return Ok(th);
        }

        // a negative budget binds even though the clipped point satisfies it
        if s <= p.rhs {
            if let Some(th) = self.search_binding(x) {
                log::trace!("equality budget");
                return Ok(th);
            }
        }

        log::error!("no thresholds found for biased knapsack of length {}", n);
        Err(ProjError::NoThresholds)
    }
}

//

#[test]
fn test_knapsack_le_biased1()
{
    use float_eq::assert_float_eq;

    // the budget is slack but the bias pulls the sum down
    let ref_x = &[1., 0., 0.];
    let x = &mut[3., 1., 1.];
    let p = ProxKnapsackLeBiased::new().par(|p| {
        p.rhs = 2.;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 1., abs <= 1e-12);
}

#[test]
fn test_knapsack_le_biased2()
{
    use float_eq::assert_float_eq;

    let ref_x = &[0.05, 0.05, 0.05];
    let x = &mut[0.2, 0.2, 0.2];
    let p = ProxKnapsackLeBiased::new();
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 0.15, abs <= 1e-12);
}

#[test]
fn test_knapsack_le_biased3()
{
    use float_eq::assert_float_eq;

    // equality budget: t = 2 >= rho * rhs
    let ref_x = &[1., 0., 0.];
    let x = &mut[3., 1., 1.];
    let p = ProxKnapsackLeBiased::new();
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 2., abs <= 1e-12);
}

#[test]
fn test_knapsack_le_biased4()
{
    let x = &mut[0.5_f64, 0.5];

    let p = ProxKnapsackLeBiased::new().par(|p| {
        p.rho = 0.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);

    let p = ProxKnapsackLeBiased::new().par(|p| {
        p.hi = -1.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);

    let x = &mut[0.5, f64::NAN];
    let p = ProxKnapsackLeBiased::new();
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);

    let x: &mut[f64] = &mut[];
    let p = ProxKnapsackLeBiased::new();
    let th = p.proj(x).unwrap();
    assert_eq!(th.t, 0.);
}

#[test]
fn test_knapsack_le_biased5()
{
    use float_eq::assert_float_eq;

    // the bias pulls the sum up to the negative budget
    let ref_x = &[-0.7];
    let x = &mut[-0.9];
    let p = ProxKnapsackLeBiased::new().par(|p| {
        p.lo = -1.;
        p.rhs = -0.7;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, -0.2, abs <= 1e-12);

    let x = &mut[-0.9];
    let th = p.thresholds_eq(x).unwrap();
    assert_float_eq!(th.t, -0.2, abs <= 1e-12);
}
