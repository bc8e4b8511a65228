//! Projection

use num_traits::Float;
use crate::prox::{SliceLike, Thresholds, ProjError};

/// Projection trait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// An implementor computes [`Thresholds`] which determine the projection of a point,
/// and the provided methods apply them.
pub trait Prox<F: Float>
{
    /// Computes thresholds of the projection of `x`.
    ///
    /// Returns `Ok` with [`Thresholds`], or `Err` with [`ProjError`] if something fails.
    /// * `x` is a point, which is reordered (sorted or partitioned in descending order) on exit.
    ///   The index ranges of the returned thresholds refer to this order.
    fn thresholds(&self, x: &mut[F]) -> Result<Thresholds<F>, ProjError>;

    /// Calculates the projection in place.
    ///
    /// Returns `Ok` with [`Thresholds`] used, or `Err` with [`ProjError`] if something fails.
    /// * `x` is a point to be projected before entry, and shall be replaced with the projected point on exit.
    ///   The elements are reordered, mostly in descending order.
    fn proj<S>(&self, x: &mut S) -> Result<Thresholds<F>, ProjError>
    where S: SliceLike<F=F> + ?Sized
    {
        let x = x.get_mut();
        let th = self.thresholds(x)?;
        th.apply(x);
        Ok(th)
    }

    /// Calculates the projection in place, preserving the order of elements.
    ///
    /// Returns `Ok` with [`Thresholds`] used, or `Err` with [`ProjError`] if something fails.
    /// * `x` is a point to be projected before entry, and shall be replaced with the projected point on exit.
    /// * `aux` slice is used for a reordered copy of `x`.
    ///   Its length shall be at least the length of `x`.
    fn proj_aux<S, A>(&self, x: &mut S, aux: &mut A) -> Result<Thresholds<F>, ProjError>
    where S: SliceLike<F=F> + ?Sized, A: SliceLike<F=F> + ?Sized
    {
        let x = x.get_mut();
        let aux = aux.get_mut();

        if aux.len() < x.len() {
            log::error!("aux length {} must be >= {}", aux.len(), x.len());
            return Err(ProjError::SizeMismatch);
        }

        let (aux, _) = aux.split_at_mut(x.len());
        aux.copy_from_slice(x);
        let th = self.thresholds(aux)?;
        th.clip(x);
        Ok(th)
    }

    /// Calculates the projections of blocks independently, preserving the order of elements.
    ///
    /// Returns `Ok`, or `Err` with [`ProjError`] if something fails.
    /// * `dim` is a number of blocks.
    /// * `x` is `dim` points of the same length packed contiguously before entry,
    ///   and shall be replaced with the projected points on exit.
    ///   Its length shall be divisible by `dim`.
    /// * `aux` slice is used for a reordered copy of each block.
    ///   Its length shall be at least the block length.
    fn proj_batch<S, A>(&self, dim: usize, x: &mut S, aux: &mut A) -> Result<(), ProjError>
    where S: SliceLike<F=F> + ?Sized, A: SliceLike<F=F> + ?Sized
    {
        let x = x.get_mut();

        if x.is_empty() {
            return Ok(());
        }
        if dim == 0 || x.len() % dim != 0 {
            log::error!("length {} is not divisible into {} blocks", x.len(), dim);
            return Err(ProjError::SizeMismatch);
        }

        let blk_len = x.len() / dim;
        log::debug!("{} blocks of length {}", dim, blk_len);

        for (i, blk) in x.chunks_mut(blk_len).enumerate() {
            log::trace!("block {}/{}", i, dim);
            self.proj_aux(blk, &mut *aux)?;
        }
        Ok(())
    }
}

//

#[test]
fn test_proj1()
{
    use float_eq::assert_float_eq;
    use crate::ProxKnapsackLe;

    let p = ProxKnapsackLe::new();

    let x = &mut[0.5, 0.5];
    let aux = &mut[0.; 1];
    assert_eq!(p.proj_aux(x, aux).unwrap_err(), ProjError::SizeMismatch);
    assert_eq!(p.proj_batch(0, x, aux).unwrap_err(), ProjError::SizeMismatch);
    assert_eq!(p.proj_batch(3, x, aux).unwrap_err(), ProjError::SizeMismatch);

    let ref_x = &[1., 0., 0.2, 0.3];
    let x = &mut[2., -1., 0.2, 0.3];
    let aux = &mut[0.; 2];
    p.proj_batch(2, x, aux).unwrap();
    assert_float_eq!(ref_x, x, abs_all <= 1e-12);
}
