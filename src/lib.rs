//! Exact euclidean projections onto biased knapsack and top-k simplex sets,
//! used by dual coordinate ascent solvers once per block per iteration.
//!
//! Each projection computes [`prox::Thresholds`] by sorting and sweeping the point,
//! then clips the point with them through the provided methods of [`prox::Prox`].

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod prox;

//

mod knapsack_eq;
mod knapsack_le;
mod knapsack_le_biased;

pub use knapsack_eq::*;
pub use knapsack_le::*;
pub use knapsack_le_biased::*;

//

mod topk_cone_biased;
mod topk_simplex_biased;

pub use topk_cone_biased::*;
pub use topk_simplex_biased::*;

/// Prelude
pub mod prelude {
    pub use crate::prox::{Prox, SliceLike, Summation};
}
