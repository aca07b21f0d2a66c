//! String representations for identifier and category types.
//!
//! [`SequentialId`](crate::SequentialId) serializes as its rendered form
//! (`"RA-COMRESH0042"`) and [`ListingCategory`](crate::ListingCategory) as its
//! slug (`"commercial-rent-shop"`).

mod category;
mod sequential;
