//! Summation policies

use num_traits::Float;

/// Summation policy trait.
///
/// Selects how threshold searches accumulate values,
/// trading numerical stability for speed.
pub trait Summation<F: Float>: Copy
{
    /// Adds `v` to a running sum.
    ///
    /// * `sum` is the running sum before entry, and the updated sum on exit.
    /// * `comp` is a compensation term kept alongside `sum`,
    ///   which shall be zero at the start of the summation.
    ///   A policy without compensation leaves it untouched.
    /// * `v` is a value to be added.
    fn add(&self, sum: &mut F, comp: &mut F, v: F);

    /// Sums up all elements of `x`.
    ///
    /// Returns the sum.
    fn sum(&self, x: &[F]) -> F
    {
        let mut sum = F::zero();
        let mut comp = F::zero();
        for v in x {
            self.add(&mut sum, &mut comp, *v);
        }
        sum
    }
}

//

/// Plain summation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SumNaive;

impl<F: Float> Summation<F> for SumNaive
{
    fn add(&self, sum: &mut F, _comp: &mut F, v: F)
    {
        *sum = *sum + v;
    }
}

//

/// Kahan compensated summation.
///
/// The absolute error is bounded by a few ulps of the sum of magnitudes
/// regardless of the number of terms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SumKahan;

impl<F: Float> Summation<F> for SumKahan
{
    fn add(&self, sum: &mut F, comp: &mut F, v: F)
    {
        let y = v - *comp;
        let s = *sum + y;
        *comp = (s - *sum) - y;
        *sum = s;
    }
}

//

#[test]
fn test_summation1()
{
    // 1 followed by many values lost below the ulp of 1 in f32
    let mut x = [1e-8_f32; 1001];
    x[0] = 1.;

    let naive = SumNaive.sum(&x);
    let kahan = SumKahan.sum(&x);

    assert_eq!(naive, 1.);
    assert!((kahan - 1.00001).abs() < 1e-6);
}

#[test]
fn test_summation2()
{
    let x = [0.5, -1.5, 2., 4.];

    assert_eq!(SumNaive.sum(&x), 5.);
    assert_eq!(SumKahan.sum(&x), 5.);
    assert_eq!(SumKahan.sum(&[] as &[f64]), 0.);
}
