//! # Story Content
//!
//! The "Story Bible" crate - all narrative and quiz content as immutable,
//! index-addressed tables. This crate is the single source of truth for
//! story data and does not contain any engine logic.
//!
//! Content is either authored programmatically ([`Catalog::new`]) or loaded
//! from a TOML document ([`Catalog::from_toml_str`]); both paths run the
//! same load-time validation. After construction a [`Catalog`] is never
//! mutated.

pub mod catalog;
pub mod model;

pub use catalog::*;
pub use model::*;
