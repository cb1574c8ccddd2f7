//! Comment text processing
//!
//! The mobile API returns comment bodies as HTML fragments; this module turns
//! them into the plain text stored in [`crate::models::Comment`].

pub mod sanitize;

pub use sanitize::{strip_markup, strip_markup_all};
