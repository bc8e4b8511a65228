use num_traits::Float;
use crate::prox::{Prox, ProjError, Summation, SumKahan, Thresholds};
use crate::prox::{count, sort_desc, check_point};

//

/// Knapsack parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackParam<F: Float>
{
    /// Lower bound of each element.
    pub lo: F,
    /// Upper bound of each element.
    pub hi: F,
    /// Right hand side of the budget on the sum of elements.
    pub rhs: F,
}

impl<F: Float> Default for KnapsackParam<F>
{
    fn default() -> Self
    {
        KnapsackParam {
            lo: F::zero(),
            hi: F::one(),
            rhs: F::one(),
        }
    }
}

impl<F: Float> KnapsackParam<F>
{
    pub(crate) fn check(&self) -> Result<(), ProjError>
    {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.rhs.is_finite()) {
            log::error!("knapsack parameters must be finite");
            return Err(ProjError::InvalidParam);
        }
        if self.lo > self.hi {
            log::error!("knapsack lower bound must be <= upper bound");
            return Err(ProjError::InvalidParam);
        }
        Ok(())
    }
}

//

/// Counts and sums of a partition `U`, `M`, `L` visited by [`sweep_box`].
pub(crate) struct Partition<F: Float>
{
    pub num_u: F,
    pub num_m: F,
    pub num_l: F,
    pub sum_m: F,
    pub min_u: F,
    pub max_l: F,
}

/// Sweeps partitions of `x` sorted in descending order along a decreasing shift `t`.
///
/// Each step moves one element either from `L` to `M` (at `t = x - lo`) or from `M` to `U` (at `t = x - hi`),
/// whichever comes first, so both boundaries only advance and the sweep visits at most `2n + 1` partitions.
/// `shift` gives the candidate `t` of a partition, or `None` to skip it.
///
/// Returns the first partition whose candidate lies inside the interval of that partition.
pub(crate) fn sweep_box<F, W, T>(x: &[F], lo: F, hi: F, sweep: &W, shift: T) -> Option<Thresholds<F>>
where F: Float, W: Summation<F>, T: Fn(&Partition<F>) -> Option<F>
{
    let n = x.len();
    let f0 = F::zero();
    let f1 = F::one();
    let mut m_begin = 0;
    let mut m_end = 0;
    let mut sum_m_comp = f0;
    let mut part = Partition {
        num_u: f0,
        num_m: f0,
        num_l: count(n),
        sum_m: f0,
        min_u: F::infinity(),
        max_l: F::neg_infinity(),
    };

    loop {
        part.max_l = if m_end < n {x[m_end]} else {F::neg_infinity()};
        let (max_m, min_m) = if m_end > m_begin {
            (x[m_begin], x[m_end - 1])
        }
        else {
            (F::neg_infinity(), F::infinity())
        };

        if let Some(t) = shift(&part) {
            //  (1)  lo + t >= max_L
            //  (2)  lo + t <= min_M
            //  (3)  hi + t >= max_M
            //  (4)  hi + t <= min_U
            let tt = hi + t;
            if max_m <= tt && tt <= part.min_u {
                let tt = lo + t;
                if tt <= min_m && part.max_l <= tt {
                    return Some(Thresholds::new(t, lo, hi, m_begin, m_end));
                }
            }
        }

        if m_begin == n {
            return None;
        }

        if m_end < n && (m_begin == m_end || x[m_end] - lo >= x[m_begin] - hi) {
            // L -> M
            sweep.add(&mut part.sum_m, &mut sum_m_comp, x[m_end]);
            part.num_m = part.num_m + f1;
            part.num_l = part.num_l - f1;
            m_end += 1;
        }
        else {
            // M -> U
            part.min_u = x[m_begin];
            part.num_u = part.num_u + f1;
            part.num_m = part.num_m - f1;
            m_begin += 1;
            if m_begin == m_end {
                part.sum_m = f0;
                sum_m_comp = f0;
            }
            else {
                sweep.add(&mut part.sum_m, &mut sum_m_comp, -part.min_u);
            }
        }
    }
}

/// Sorts `x` in descending order and searches the thresholds of the equality-constrained knapsack.
///
/// Returns `None` if no partition satisfies the optimality conditions.
pub(crate) fn search_eq<F, W>(x: &mut[F], lo: F, hi: F, rhs: F, sweep: &W) -> Option<Thresholds<F>>
where F: Float, W: Summation<F>
{
    sort_desc(x);

    sweep_box(x, lo, hi, sweep, |part| {
        let fixed = lo * part.num_l + hi * part.num_u;
        if part.num_m > F::zero() {
            Some((fixed + part.sum_m - rhs) / part.num_m)
        }
        else if fixed == rhs {
            // any t between the neighbors works; take the smallest
            if part.num_l > F::zero() {
                Some(part.max_l - lo)
            }
            else if part.num_u > F::zero() {
                Some(part.min_u - hi)
            }
            else {
                Some(F::zero())
            }
        }
        else {
            None
        }
    })
}

//

/// Equality-constrained knapsack
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ l \le x_i \le h,\ \sum_i x_i = r
/// \right\rbrace
/// \\]
pub struct ProxKnapsackEq<F: Float, W: Summation<F> = SumKahan>
{
    par: KnapsackParam<F>,
    sweep_sum: W,
}

impl<F: Float> ProxKnapsackEq<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxKnapsackEq`] instance with default parameters.
    pub fn new() -> Self
    {
        ProxKnapsackEq {
            par: KnapsackParam::default(),
            sweep_sum: SumKahan,
        }
    }
}

impl<F: Float> Default for ProxKnapsackEq<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float, W: Summation<F>> ProxKnapsackEq<F, W>
{
    /// Changes parameters.
    ///
    /// Returns [`ProxKnapsackEq`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut KnapsackParam<F>)
    {
        f(&mut self.par);
        self
    }

    /// Changes the summation policy of the running sum.
    pub fn sweep_summation<W2: Summation<F>>(self, sweep_sum: W2) -> ProxKnapsackEq<F, W2>
    {
        ProxKnapsackEq {
            par: self.par,
            sweep_sum,
        }
    }

    /// Parameters.
    pub fn param(&self) -> &KnapsackParam<F>
    {
        &self.par
    }
}

impl<F: Float, W: Summation<F>> Prox<F> for ProxKnapsackEq<F, W>
{
    fn thresholds(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        self.par.check()?;
        check_point(x)?;

        let p = &self.par;
        let num_x = count::<F>(x.len());
        if num_x * p.lo > p.rhs || num_x * p.hi < p.rhs {
            log::error!("budget out of the box range for length {}", x.len());
            return Err(ProjError::EmptySet);
        }

        search_eq(x, p.lo, p.hi, p.rhs, &self.sweep_sum).ok_or_else(|| {
            log::error!("no thresholds found for equality knapsack of length {}", x.len());
            ProjError::NoThresholds
        })
    }
}

//

#[test]
fn test_knapsack_eq1()
{
    use float_eq::assert_float_eq;

    let ref_x = &[1., 0.5, 0.5];
    let x = &mut[3., 1., 1.];
    let p = ProxKnapsackEq::new().par(|p| {
        p.lo = 0.;
        p.hi = 1.;
        p.rhs = 2.;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 0.5, abs <= 1e-12);
    assert_eq!((th.range_hi_end, th.range_mid_end), (1, 3));
}

#[test]
fn test_knapsack_eq2()
{
    use float_eq::assert_float_eq;

    // budget met only by raising
    let ref_x = &[1., 1., 0.5];
    let x = &mut[0.2, 0.1, -0.6];
    let p = ProxKnapsackEq::new().par(|p| {
        p.rhs = 2.5;
    });
    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, -1.1, abs <= 1e-12);
}

#[test]
fn test_knapsack_eq3()
{
    let x = &mut[0.5, 0.5];

    let p = ProxKnapsackEq::new().par(|p| {
        p.rhs = 3.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::EmptySet);

    let p = ProxKnapsackEq::new().par(|p| {
        p.lo = 2.;
    });
    assert_eq!(p.proj(x).unwrap_err(), ProjError::InvalidParam);
}
