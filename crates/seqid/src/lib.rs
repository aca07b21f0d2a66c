#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod category;
mod error;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod store;
mod time;

pub use crate::allocator::*;
pub use crate::category::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::store::*;
pub use crate::time::*;
