mod claim;
mod counter;
mod interface;
mod probing;
mod status;

pub use claim::*;
pub use counter::*;
pub use interface::*;
pub use probing::*;
pub use status::*;

#[cfg(all(test, feature = "memory"))]
mod tests;
