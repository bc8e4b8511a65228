use num_traits::Float;
use crate::prox::{Prox, ProjError, Summation, SumKahan, SumNaive, Thresholds};
use crate::prox::{count, check_point};
use crate::{ProxTopKConeBiased, ConeCase, ProxKnapsackLeBiased};

//

/// Top-k simplex parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TopKParam<F: Float>
{
    /// Cardinality \\(k\\), not necessarily an integer. Shall be nonnegative;
    /// zero drops the top-k constraint.
    pub k: F,
    /// Strength of the bias on the sum of elements. Shall be positive.
    pub rho: F,
    /// Right hand side of the budget on the sum of elements. Shall be nonnegative.
    pub rhs: F,
}

impl<F: Float> Default for TopKParam<F>
{
    fn default() -> Self
    {
        TopKParam {
            k: F::one(),
            rho: F::one(),
            rhs: F::one(),
        }
    }
}

impl<F: Float> TopKParam<F>
{
    fn check(&self) -> Result<(), ProjError>
    {
        if !(self.k.is_finite() && self.rho.is_finite() && self.rhs.is_finite()) {
            log::error!("top-k simplex parameters must be finite");
            return Err(ProjError::InvalidParam);
        }
        if self.k < F::zero() || self.rho <= F::zero() || self.rhs < F::zero() {
            log::error!("top-k simplex requires k >= 0, rho > 0 and rhs >= 0");
            return Err(ProjError::InvalidParam);
        }
        Ok(())
    }
}

//

/// Biased top-k simplex
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \frac12 \\|x - a\\|_2^2 + \frac\rho2 \left( \sum_i x_i \right)^2 \\\\
/// {\rm subject \ to} & 0 \le x_i \le \frac1k \sum_j x_j \\\\
/// & \sum_i x_i \le r
/// \end{array}
/// \\]
/// for a point \\(a\\),
/// combining [`ProxTopKConeBiased`] and [`ProxKnapsackLeBiased`] with box \\([0, r/k]\\).
pub struct ProxTopKSimplexBiased<F: Float, R: Summation<F> = SumNaive, W: Summation<F> = SumKahan>
{
    par: TopKParam<F>,
    cone: ProxTopKConeBiased<F, W>,
    knapsack: ProxKnapsackLeBiased<F, R, W>,
    range_sum: R,
    rho_rhs: F,
}

impl<F: Float> ProxTopKSimplexBiased<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxTopKSimplexBiased`] instance with default parameters.
    pub fn new() -> Self
    {
        Self::build(TopKParam::default(), SumNaive, SumKahan)
    }
}

impl<F: Float> Default for ProxTopKSimplexBiased<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> ProxTopKSimplexBiased<F, R, W>
{
    fn build(par: TopKParam<F>, range_sum: R, sweep_sum: W) -> Self
    {
        let cone = ProxTopKConeBiased::new()
            .sweep_summation(sweep_sum)
            .par(|p| {
                p.k = par.k;
                p.rho = par.rho;
            });

        // sum <= rhs and x >= 0 already bound each element by rhs when k = 0
        let hi = if par.k > F::zero() {par.rhs / par.k} else {par.rhs};
        let knapsack = ProxKnapsackLeBiased::new()
            .summation(range_sum)
            .sweep_summation(sweep_sum)
            .par(|p| {
                p.lo = F::zero();
                p.hi = hi;
                p.rhs = par.rhs;
                p.rho = par.rho;
            });

        ProxTopKSimplexBiased {
            rho_rhs: par.rho * par.rhs,
            par,
            cone,
            knapsack,
            range_sum,
        }
    }

    /// Changes parameters.
    ///
    /// Returns [`ProxTopKSimplexBiased`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut TopKParam<F>)
    {
        f(&mut self.par);
        Self::build(self.par, self.range_sum, self.cone.sweep_sum())
    }

    /// Changes the summation policy of sums over partitioned ranges.
    pub fn summation<R2: Summation<F>>(self, range_sum: R2) -> ProxTopKSimplexBiased<F, R2, W>
    {
        ProxTopKSimplexBiased::build(self.par, range_sum, self.cone.sweep_sum())
    }

    /// Changes the summation policy of the running sums in the threshold searches.
    pub fn sweep_summation<W2: Summation<F>>(self, sweep_sum: W2) -> ProxTopKSimplexBiased<F, R, W2>
    {
        ProxTopKSimplexBiased::build(self.par, self.range_sum, sweep_sum)
    }

    /// Parameters.
    pub fn param(&self) -> &TopKParam<F>
    {
        &self.par
    }

    /// Checks if the knapsack solution fails to be the projection,
    /// in which case the top-k constraint has to be solved instead.
    fn check_proj_onto_cone(&self, x: &[F], th: &Thresholds<F>) -> bool
    {
        // slack budget: elements at rhs / k exceed sum / k
        if th.t < self.rho_rhs {
            return true;
        }

        let rhs = self.par.rhs;
        let u = th.range_hi_end;

        if u > 0 {
            // sign of the budget multiplier
            let num_u = count::<F>(u);
            let sum_k_largest = self.range_sum.sum(&x[..u]);
            let k = self.cone.k();
            let rho_k_k = self.cone.rho_k_k();

            k * (sum_k_largest + (k - num_u) * th.t) < rhs * (num_u + rho_k_k)
        }
        else {
            false
        }
    }

    fn proj_onto_cone(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        let th = self.cone.general_case(x)?;

        if self.par.k * th.hi > self.par.rhs {
            log::trace!("general: budget exceeded by cone");
            self.knapsack.thresholds_eq(x)
        }
        else {
            log::trace!("general: cone");
            Ok(th)
        }
    }
}

impl<F: Float, R: Summation<F>, W: Summation<F>> Prox<F> for ProxTopKSimplexBiased<F, R, W>
{
    fn thresholds(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        self.par.check()?;

        if self.par.k == F::zero() {
            log::trace!("k = 0: knapsack only");
            return self.knapsack.thresholds(x);
        }

        check_point(x)?;

        match self.cone.classify(x) {
            ConeCase::Zero(th) => {
                log::trace!("zero");
                Ok(th)
            },
            ConeCase::Constant(th) => {
                if self.par.k * th.hi > self.par.rhs {
                    // the budget binds and caps the common value
                    log::trace!("constant: budget exceeded");
                    Ok(Thresholds {
                        hi: self.par.rhs / self.par.k,
                        ..th
                    })
                }
                else {
                    log::trace!("constant");
                    Ok(th)
                }
            },
            ConeCase::General => {
                let th = self.knapsack.thresholds(x)?;
                if self.check_proj_onto_cone(x, &th) {
                    self.proj_onto_cone(x)
                }
                else {
                    log::trace!("general: knapsack");
                    Ok(th)
                }
            },
        }
    }
}

//

#[test]
fn test_topk_simplex_biased1()
{
    use float_eq::assert_float_eq;

    // loose budget, corrected onto the cone
    let ref_x = &[15. / 22., 13. / 22., 2. / 22.];
    let x = &mut[3., 1., 0.5];
    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = 2.;
        p.rhs = 10.;
    });
    p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
}

#[test]
fn test_topk_simplex_biased2()
{
    use float_eq::assert_float_eq;

    // constant case exceeding the budget
    let ref_x = &[0.1, 0.1, 0.];
    let x = &mut[1., 1., -5.];
    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = 2.;
        p.rhs = 0.2;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.hi, 0.1, abs <= 1e-12);
    assert_float_eq!(th.t, -5., abs <= 1e-12);
}

#[test]
fn test_topk_simplex_biased3()
{
    let x = &mut[0.5, 0.5];

    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.k = -1.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);

    let p = ProxTopKSimplexBiased::new().par(|p| {
        p.rhs = -1.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);
}
