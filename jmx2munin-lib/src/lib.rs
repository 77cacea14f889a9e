#![doc(hidden)]

//! Core library for jmx2munin
//!
//! This library holds all functionality of the jmx2munin tool, which polls a JMX
//! attribute registry and renders the attributes as Munin plugin output.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, settings and mode dispatch
//! - [`registry`]: Object names, attribute values, attribute sources and the poll loop
//! - [`metrics`]: Naming, flattening, enum resolution and attribute filtering
//! - [`output`]: Munin value and listing sinks
//! - [`graph`]: Graph configuration files used in per-field mode

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod graph;
pub mod metrics;
pub mod output;
pub mod registry;

pub use crate::commands::{Host, run};
