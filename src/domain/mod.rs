//! Domain types used throughout the submission flow.
//!
//! This module defines:
//!
//! - the request built from the form (`DecisionRequest`)
//! - the service's answer (`DecisionResponse`) and its two accepted layouts

pub mod types;

pub use types::*;
