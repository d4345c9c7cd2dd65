pub mod analysis;
pub mod generation;

pub use analysis::*;
pub use generation::*;
