//! Cinegen - guided movie generation over remote generation services
//!
//! This library crate exposes the wizard, pipeline and clients for the
//! `cinegen` binary and for integration testing.

pub mod client;
pub mod config;
pub mod history;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod wizard;
