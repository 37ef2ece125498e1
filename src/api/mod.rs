//! HTTP integration with the decision service.

pub mod client;

pub use client::{DecisionClient, DecisionService};
