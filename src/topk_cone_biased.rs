use num_traits::Float;
use crate::prox::{Prox, ProjError, Summation, SumKahan, Thresholds};
use crate::prox::{count, sort_desc, desc, check_point};

//

/// Top-k cone parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TopKConeParam<F: Float>
{
    /// Cardinality \\(k\\), not necessarily an integer. Shall be positive.
    pub k: F,
    /// Strength of the bias on the sum of elements. Shall be positive.
    pub rho: F,
}

impl<F: Float> Default for TopKConeParam<F>
{
    fn default() -> Self
    {
        TopKConeParam {
            k: F::one(),
            rho: F::one(),
        }
    }
}

impl<F: Float> TopKConeParam<F>
{
    pub(crate) fn check(&self) -> Result<(), ProjError>
    {
        if !(self.k.is_finite() && self.rho.is_finite()) {
            log::error!("top-k cone parameters must be finite");
            return Err(ProjError::InvalidParam);
        }
        if self.k <= F::zero() || self.rho <= F::zero() {
            log::error!("top-k cone k and rho must be positive");
            return Err(ProjError::InvalidParam);
        }
        Ok(())
    }
}

//

/// Classification of a point against the top-k cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConeCase<F: Float>
{
    /// The projection is zero.
    Zero(Thresholds<F>),
    /// The `k` largest elements share a single value and the rest are zero.
    Constant(Thresholds<F>),
    /// Neither of the above.
    General,
}

//

/// Biased top-k cone
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \frac12 \\|x - a\\|_2^2 + \frac\rho2 \left( \sum_i x_i \right)^2 \\\\
/// {\rm subject \ to} & 0 \le x_i \le \frac1k \sum_j x_j
/// \end{array}
/// \\]
/// for a point \\(a\\).
pub struct ProxTopKConeBiased<F: Float, W: Summation<F> = SumKahan>
{
    par: TopKConeParam<F>,
    rho_k_k: F,
    sweep_sum: W,
}

impl<F: Float> ProxTopKConeBiased<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxTopKConeBiased`] instance with default parameters.
    pub fn new() -> Self
    {
        let par = TopKConeParam::default();

        ProxTopKConeBiased {
            rho_k_k: par.rho * par.k * par.k,
            par,
            sweep_sum: SumKahan,
        }
    }
}

impl<F: Float> Default for ProxTopKConeBiased<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float, W: Summation<F>> ProxTopKConeBiased<F, W>
{
    /// Changes parameters.
    ///
    /// Returns [`ProxTopKConeBiased`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut TopKConeParam<F>)
    {
        f(&mut self.par);
        self.rho_k_k = self.par.rho * self.par.k * self.par.k;
        self
    }

    /// Changes the summation policy of the running sum in the threshold search.
    pub fn sweep_summation<W2: Summation<F>>(self, sweep_sum: W2) -> ProxTopKConeBiased<F, W2>
    {
        ProxTopKConeBiased {
            par: self.par,
            rho_k_k: self.rho_k_k,
            sweep_sum,
        }
    }

    /// Parameters.
    pub fn param(&self) -> &TopKConeParam<F>
    {
        &self.par
    }

    pub(crate) fn sweep_sum(&self) -> W
    {
        self.sweep_sum
    }

    /// Cardinality \\(k\\).
    pub fn k(&self) -> F
    {
        self.par.k
    }

    /// \\(\rho k^2\\).
    pub fn rho_k_k(&self) -> F
    {
        self.rho_k_k
    }

    /// Classifies a point, solving the special cases.
    ///
    /// Returns [`ConeCase`], carrying the thresholds of the projection unless it is [`ConeCase::General`].
    /// * `x` is a point, partially reordered on exit so that the largest elements come first.
    pub fn classify(&self, x: &mut[F]) -> ConeCase<F>
    {
        let n = x.len();
        let k = self.par.k;

        // the cone is {0} when k exceeds the length
        if n == 0 || k > count(n) {
            return ConeCase::Zero(Thresholds::zero());
        }

        let k_floor = k.floor();
        let k_frac = k - k_floor;
        let kf = k_floor.to_usize().unwrap_or(n).min(n);

        // x[..kf] are the kf largest, x[kf] the next one
        if kf < n {
            x.select_nth_unstable_by(kf, desc);
        }
        let next = if kf < n {x[kf]} else {F::neg_infinity()};

        let sum_k_largest = x[..kf].iter().fold(F::zero(), |s, &v| s + v);
        let mass = if k_frac > F::zero() {
            sum_k_largest + k_frac * next
        }
        else {
            sum_k_largest
        };

        if mass <= F::zero() {
            return ConeCase::Zero(Thresholds::zero());
        }

        if k_frac == F::zero() {
            let hi = sum_k_largest / (k + self.rho_k_k);
            let min_u = x[..kf].iter().fold(F::infinity(), |m, &v| m.min(v));

            if next <= min_u - hi {
                let t = if kf < n {next} else {min_u - hi};
                return ConeCase::Constant(Thresholds::new(t, F::zero(), hi, kf, kf));
            }
        }

        ConeCase::General
    }

    /// Solves the general case by a threshold search.
    ///
    /// Returns `Ok` with [`Thresholds`], or `Err` with [`ProjError::NoThresholds`]
    /// if the search fails, which never happens unless `x` is a special case.
    /// * `x` is a point, sorted in descending order on exit.
    pub fn general_case(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        sort_desc(x);

        let n = x.len();
        let k = self.par.k;
        let rho_k_k = self.rho_k_k;
        let f0 = F::zero();
        let f1 = F::one();

        let mut m_begin = 0;
        let mut m_end = 0;
        let mut num_u = f0;
        let mut sum_u = f0;
        let mut sum_u_comp = f0;
        let mut min_u = F::infinity();
        let mut num_m = f0;
        let mut sum_m = f0;
        let mut sum_m_comp = f0;

        // Along the path, the lower boundary t is an increasing function of the upper one q = hi + t:
        //   (k + rho k^2) t = rho k^2 q - sum_U (x - q)
        // so that both boundaries only go down as elements move L -> M -> U.
        while num_u < k {
            let (max_m, min_m) = if m_end > m_begin {
                (x[m_begin], x[m_end - 1])
            }
            else {
                (F::neg_infinity(), F::infinity())
            };
            let max_l = if m_end < n {x[m_end]} else {F::neg_infinity()};

            // solve
            //   (k - u) hi + m t = sum_M
            //   -(rho k^2 + u) hi + (k - u) t = -sum_U
            // and check that
            //  (1)  t >= max_L
            //  (2)  t <= min_M
            //  (3)  hi + t >= max_M
            //  (4)  hi + t <= min_U
            let k_u = k - num_u;
            let rho_u = rho_k_k + num_u;
            let d = k_u * k_u + num_m * rho_u;
            let hi = (k_u * sum_m + num_m * sum_u) / d;
            let t = (rho_u * sum_m - k_u * sum_u) / d;

            let tt = hi + t;
            if max_m <= tt && tt <= min_u && t <= min_m && max_l <= t {
                return Ok(Thresholds::new(t, f0, hi, m_begin, m_end));
            }

            if m_begin == n {
                break;
            }

            let to_m = if m_begin == m_end {
                true
            }
            else if m_end == n {
                false
            }
            else {
                // lower boundary when the upper one reaches the largest of M
                let q = x[m_begin];
                let t_q = (rho_k_k * q - (sum_u - num_u * q)) / (k + rho_k_k);
                t_q <= x[m_end]
            };

            if to_m {
                // L -> M
                self.sweep_sum.add(&mut sum_m, &mut sum_m_comp, x[m_end]);
                num_m = num_m + f1;
                m_end += 1;
            }
            else {
                // M -> U
                min_u = x[m_begin];
                self.sweep_sum.add(&mut sum_u, &mut sum_u_comp, min_u);
                num_u = num_u + f1;
                num_m = num_m - f1;
                m_begin += 1;
                if m_begin == m_end {
                    sum_m = f0;
                    sum_m_comp = f0;
                }
                else {
                    self.sweep_sum.add(&mut sum_m, &mut sum_m_comp, -min_u);
                }
            }
        }

        log::error!("no thresholds found for top-k cone of length {}", n);
        Err(ProjError::NoThresholds)
    }
}

impl<F: Float, W: Summation<F>> Prox<F> for ProxTopKConeBiased<F, W>
{
    fn thresholds(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>
    {
        self.par.check()?;
        check_point(x)?;

        match self.classify(x) {
            ConeCase::Zero(th) | ConeCase::Constant(th) => Ok(th),
            ConeCase::General => self.general_case(x),
        }
    }
}

//

#[test]
fn test_topk_cone_biased1()
{
    let p = ProxTopKConeBiased::new().par(|p| {
        p.k = 2.;
    });

    let x = &mut[1., -3., -1.5];
    assert_eq!(p.classify(x), ConeCase::Zero(Thresholds::zero()));

    // the cone is {0} for k > n
    let x = &mut[1.];
    assert_eq!(p.classify(x), ConeCase::Zero(Thresholds::zero()));
}

#[test]
fn test_topk_cone_biased2()
{
    use float_eq::assert_float_eq;

    let ref_x = &[0.2, 0.2, 0.];
    let x = &mut[1., 0.2, -1.];
    let p = ProxTopKConeBiased::new().par(|p| {
        p.k = 2.;
    });
    assert!(matches!(p.classify(&mut x.clone()), ConeCase::Constant(_)));

    p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
}

#[test]
fn test_topk_cone_biased3()
{
    use float_eq::assert_float_eq;

    let ref_x = &[15. / 22., 13. / 22., 2. / 22.];
    let x = &mut[3., 1., 0.5];
    let p = ProxTopKConeBiased::new().par(|p| {
        p.k = 2.;
    });
    assert_eq!(p.classify(&mut x.clone()), ConeCase::General);

    let th = p.proj(x).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
    assert_float_eq!(th.t, 9. / 22., abs <= 1e-12);
    assert_float_eq!(th.hi, 15. / 22., abs <= 1e-12);
    assert_float_eq!(p.rho_k_k(), 4., abs <= 0.);
}
