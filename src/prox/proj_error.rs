/// Projection errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjError
{
    /// Invalid parameter, such as non-positive `rho` or `lo > hi`, or a point containing NaN.
    InvalidParam,
    /// The constraint set is empty for the given point length.
    EmptySet,
    /// Shortage of auxiliary slice length, or a batch not divisible into blocks.
    SizeMismatch,
    /// No thresholds satisfied the optimality conditions.
    ///
    /// This never happens for valid parameters unless floating point rounding breaks
    /// the ordering assumed by the search, and is to be treated as a bug rather than bad input.
    NoThresholds,
}

impl core::fmt::Display for ProjError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            ProjError::InvalidParam => "InvalidParam: invalid parameter or point",
            ProjError::EmptySet     => "EmptySet: empty constraint set",
            ProjError::SizeMismatch => "SizeMismatch: shortage or mismatch of slice length",
            ProjError::NoThresholds => "NoThresholds: internal inconsistency in threshold search",
        })
    }
}

//

#[cfg(feature = "std")]
impl std::error::Error for ProjError {}
