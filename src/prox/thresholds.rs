use num_traits::Float;

//

/// Thresholds that characterize a projection.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The projected point is \\(\min(h, \max(l, x_i - t))\\) elementwise.
/// The index ranges refer to the point as reordered by the threshold computation,
/// which splits it into three contiguous segments:
/// * `U = [0, range_hi_end)` clamped to `hi`,
/// * `M = [range_hi_end, range_mid_end)` mapped to `x - t`,
/// * `L = [range_mid_end, len)` clamped to `lo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds<F: Float>
{
    /// Shift \\(t\\), that is the dual variable of the budget-like constraint.
    pub t: F,
    /// Lower clamping value \\(l\\).
    pub lo: F,
    /// Upper clamping value \\(h\\).
    pub hi: F,
    /// End of the segment clamped to `hi`.
    pub range_hi_end: usize,
    /// End of the interior segment.
    pub range_mid_end: usize,
}

impl<F: Float> Thresholds<F>
{
    /// Creates an instance.
    ///
    /// Returns [`Thresholds`] instance.
    pub fn new(t: F, lo: F, hi: F, range_hi_end: usize, range_mid_end: usize) -> Self
    {
        debug_assert!(range_hi_end <= range_mid_end);

        Thresholds {
            t, lo, hi, range_hi_end, range_mid_end,
        }
    }

    /// Thresholds of the zero projection.
    pub fn zero() -> Self
    {
        let f0 = F::zero();
        Thresholds::new(f0, f0, f0, 0, 0)
    }

    /// Clips a single value.
    pub fn clip_value(&self, v: F) -> F
    {
        self.lo.max((v - self.t).min(self.hi))
    }

    /// Clips every element of `x`, regardless of its order.
    ///
    /// * `x` is a point before entry, and the projected point on exit.
    pub fn clip(&self, x: &mut[F])
    {
        for e in x {
            *e = self.clip_value(*e);
        }
    }

    /// Applies the thresholds segment by segment.
    ///
    /// * `x` is a point in the order left by the threshold computation before entry,
    ///   and the projected point on exit.
    pub fn apply(&self, x: &mut[F])
    {
        let len = x.len();
        let (x_u, rest) = x.split_at_mut(self.range_hi_end.min(len));
        let (x_m, x_l) = rest.split_at_mut(self.range_mid_end.min(len) - self.range_hi_end.min(len));

        for e in x_u {
            *e = self.hi;
        }
        for e in x_m {
            *e = *e - self.t;
        }
        for e in x_l {
            *e = self.lo;
        }
    }
}

//

#[test]
fn test_thresholds1()
{
    use float_eq::assert_float_eq;

    let th = Thresholds::new(0.5, 0., 1., 1, 3);

    let x = &mut[3., 1., 1., -2.];
    th.apply(x);
    assert_float_eq!(&[1., 0.5, 0.5, 0.], x, abs_all <= 1e-12);

    let x = &mut[1., -2., 3., 1.];
    th.clip(x);
    assert_float_eq!(&[0.5, 0., 1., 0.5], x, abs_all <= 1e-12);
}

#[test]
fn test_thresholds2()
{
    let th = Thresholds::<f64>::zero();

    let x = &mut[3., -1.];
    th.apply(x);
    assert_eq!(x, &[0., 0.]);
}
