//! Core library for the `hookload` CLI.
//!
//! This crate provides the internal building blocks used by the binary:
//! configuration loading, the locator/tracker correlation machinery, the
//! callback receiver, the paced request firer, metrics aggregation, and
//! output sinks. The primary user-facing interface is the `hookload`
//! command-line application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod firer;
pub mod locator;
pub mod metrics;
pub mod receiver;
pub mod session;
pub mod sinks;
pub mod system;
pub mod tracker;
pub mod wait;
