//! Schema module - Run configuration, seed vocabulary and result types.

mod evolution;
mod seed;

pub use evolution::*;
pub use seed::*;
