//! Core types and trait definitions for the Bazaar listing service.
//!
//! No HTTP or database dependencies live here. Every other crate depends on
//! this one.

pub mod error;
pub mod image;
pub mod item;
pub mod policy;
pub mod position;
pub mod store;

pub use error::{Error, Result};
