//! `clarity` library crate.
//!
//! The binary (`clarity`) is a thin wrapper around this library so that:
//!
//! - the form, controller and HTTP client are testable without a terminal
//! - the TUI and the one-shot CLI share one submission flow

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod debug;
pub mod domain;
pub mod error;
pub mod form;
pub mod logging;
pub mod render;
pub mod tui;
