use num_traits::Float;

//

/// Random-access buffer of floating point values, used as a point to be projected.
///
/// Projections sort or partition the underlying slice in place,
/// so the element order of a point is not preserved unless stated otherwise.
pub trait SliceLike
{
    /// Floating point data type of the elements.
    type F: Float;

    /// Returns the underlying slice.
    fn get_ref(&self) -> &[Self::F];

    /// Returns the underlying mutable slice.
    fn get_mut(&mut self) -> &mut[Self::F];

    /// Returns the number of elements.
    fn len(&self) -> usize
    {
        self.get_ref().len()
    }

    /// Returns `true` if there is no element.
    fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}

//

impl<F: Float> SliceLike for [F]
{
    type F = F;

    fn get_ref(&self) -> &[F]
    {
        self
    }

    fn get_mut(&mut self) -> &mut[F]
    {
        self
    }
}

impl<F: Float, const N: usize> SliceLike for [F; N]
{
    type F = F;

    fn get_ref(&self) -> &[F]
    {
        self
    }

    fn get_mut(&mut self) -> &mut[F]
    {
        self
    }
}

#[cfg(feature = "std")]
impl<F: Float> SliceLike for std::vec::Vec<F>
{
    type F = F;

    fn get_ref(&self) -> &[F]
    {
        self
    }

    fn get_mut(&mut self) -> &mut[F]
    {
        self
    }
}
