use num_traits::Float;
use core::cmp::Ordering;
use crate::prox::ProjError;

//

/// Number of elements as a floating point value.
pub(crate) fn count<F: Float>(n: usize) -> F
{
    F::from(n).unwrap_or_else(F::nan)
}

/// Sorts in descending order.
pub(crate) fn sort_desc<F: Float>(x: &mut[F])
{
    x.sort_unstable_by(desc);
}

/// Descending comparison; a point is checked to have no NaN beforehand.
pub(crate) fn desc<F: Float>(a: &F, b: &F) -> Ordering
{
    b.partial_cmp(a).unwrap_or(Ordering::Equal)
}

/// Moves the elements satisfying `pred` to the front.
///
/// Returns the number of such elements.
pub(crate) fn partition<F: Float, P: Fn(F) -> bool>(x: &mut[F], pred: P) -> usize
{
    let mut first = 0;
    for i in 0.. x.len() {
        if pred(x[i]) {
            x.swap(first, i);
            first += 1;
        }
    }
    first
}

pub(crate) fn check_point<F: Float>(x: &[F]) -> Result<(), ProjError>
{
    if x.iter().any(|e| e.is_nan()) {
        log::error!("point of length {} contains NaN", x.len());
        return Err(ProjError::InvalidParam);
    }
    Ok(())
}

//

#[test]
fn test_partition1()
{
    let x = &mut[0.5, 2., -1., 1., 3.];

    let n = partition(x, |v| v >= 1.);
    assert_eq!(n, 3);
    assert!(x[.. n].iter().all(|&v| v >= 1.));
    assert!(x[n ..].iter().all(|&v| v < 1.));

    sort_desc(x);
    assert_eq!(x, &[3., 2., 1., 0.5, -1.]);
}
