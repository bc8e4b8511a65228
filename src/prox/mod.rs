
mod slicelike;
mod summation;
mod thresholds;
mod proj;
mod proj_error;
mod ops;

pub use slicelike::*;
pub use summation::*;
pub use thresholds::*;
pub use proj::*;
pub use proj_error::*;
pub(crate) use ops::*;
