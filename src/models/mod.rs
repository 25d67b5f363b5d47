pub mod attribute;
pub mod measurement;
pub mod verdict;

pub use attribute::*;
pub use measurement::*;
pub use verdict::*;
