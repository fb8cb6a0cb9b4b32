#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived views over raw worker records.
//!
//! * [`fields`] resolves location, industry, employer and visa fields by
//!   falling back from the record's own columns to its survey payloads.
//! * [`status`] classifies a worker's wellbeing from open alerts and the
//!   employer rating they reported.

pub mod fields;
pub mod status;

pub use fields::{ResolvedFields, WorkerField};
pub use status::classify;
