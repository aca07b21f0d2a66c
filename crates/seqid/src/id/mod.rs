mod sequential;
mod suffix;

pub use sequential::*;
pub use suffix::*;
