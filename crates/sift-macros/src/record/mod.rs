//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates typed field constants and the name lookup table from a struct
//! definition.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
