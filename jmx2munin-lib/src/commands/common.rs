//! Arguments and setup shared by every mode.

use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    #[default]
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by all modes.
///
/// Munin hands plugin configuration over as environment variables, so every option can also
/// be set through the `JMX_*` variable named in its help text.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Attribute source: a Jolokia endpoint such as `http://localhost:8778/jolokia`, or a snapshot file
    #[arg(long, value_name = "LOCATOR", env = "JMX_URL")]
    pub url: Option<String>,

    /// Object name pattern selecting the instances to poll, e.g. `java.lang:type=Memory`
    #[arg(long, value_name = "EXPR", env = "JMX_QUERY")]
    pub query: Option<String>,

    /// Rule file mapping text values to numbers
    #[arg(long, value_name = "PATH", env = "JMX_ENUMS")]
    pub enums: Option<Utf8PathBuf>,

    /// Only report these fields; a `_size` suffix selects the whole collection
    #[arg(long = "attribute", value_name = "FIELD", env = "JMX_ATTRIBUTES", value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// User name passed to the attribute source
    #[arg(long, value_name = "USER", env = "JMX_USER")]
    pub user: Option<String>,

    /// Password passed to the attribute source
    #[arg(long, value_name = "PASSWORD", env = "JMX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Graph configuration file; switches to per-field mode
    #[arg(long, value_name = "PATH", env = "JMX_CONF")]
    pub conf: Option<Utf8PathBuf>,

    /// Settings file (default is `jmx2munin.toml` if it exists)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

/// Route `log` output to stderr at the requested level; `RUST_LOG` takes precedence.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a second initialization (e.g. repeated runs in one test binary) keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
