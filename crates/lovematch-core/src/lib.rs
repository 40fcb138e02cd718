pub mod scorer;
pub mod verdict;

pub use scorer::*;
pub use verdict::*;
