//! Command-line interface for jmx2munin
//!
//! # Implementation Model
//!
//! The `run` function parses the command line with clap, sets up logging, and routes to one
//! of three modes:
//!
//! - **fetch**: poll the attributes matching `--query` and print their values, or, with
//!   `--conf`, print the value of each field of a graph configuration
//! - **list**: poll like fetch but print the enum keys of the attributes instead
//! - **config**: print a graph configuration as Munin expects it
//!
//! Options come from three layers. Flags win over `JMX_*` environment variables (which is how
//! Munin passes `env.*` plugin settings), and both win over a TOML settings file. The merged
//! result is an `Options` value that each mode checks for the entries it needs.
//!
//! All protocol output goes through the `Host`, so tests can capture it.

mod common;
mod config;
mod fetch;
mod host;
mod list;
mod run;
mod settings;

pub use common::{CommonArgs, LogLevel, init_logging};
pub use config::print_config;
pub use fetch::fetch_values;
pub use host::Host;
pub use list::list_sections;
pub use run::run;
pub use settings::{DEFAULT_SETTINGS_FILE, Options, Settings};
