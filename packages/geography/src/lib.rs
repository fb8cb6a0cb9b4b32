#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postcode resolution and marker jitter for the worker globe.
//!
//! [`resolver`] turns a raw postcode into the centre of its two-digit
//! prefix region. [`jitter`] spreads markers that share a region so they
//! do not render on top of each other. Both are pure: no I/O, no
//! randomness, no shared mutable state.

pub mod jitter;
pub mod resolver;

pub use jitter::jitter;
pub use resolver::PostcodeResolver;
