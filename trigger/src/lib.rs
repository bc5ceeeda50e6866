//! ZaneOps Deploy Trigger Library
//!
//! Core modules for the `zane-trigger` CLI: configuration resolution,
//! the CSRF/session handshake, the dashboard API client, and console
//! reporting.

pub mod app;
pub mod config;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod report;
pub mod utils;
