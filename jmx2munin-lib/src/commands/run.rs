//! Command dispatch logic for jmx2munin

use super::{CommonArgs, Settings, fetch_values, init_logging, list_sections, print_config};
use crate::{Host, Result};
use camino::Utf8Path;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, ValueEnum};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "jmx2munin", version, author, long_about = None)]
#[command(about = "Munin plugin exposing JMX attributes as graph values")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// What to print; Munin passes `config` when it wants the graph definition
    #[arg(value_enum, default_value = "fetch")]
    mode: Mode,

    #[command(flatten)]
    args: CommonArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print `field.value` lines for the selected attributes, or for the fields of --conf
    Fetch,
    /// Print a `[key]` header for every enum key, to start an enum rule file from
    List,
    /// Print the graph configuration from --conf
    Config,
}

/// Dispatch command-line arguments to the appropriate mode
///
/// Fatal errors are written to the host's error stream before the host is asked to exit
/// with status 1.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the selected mode fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.args.log_level);

    let result = dispatch(host, cli.mode, &cli.args);
    if let Err(e) = &result {
        let _ = writeln!(host.error(), "{e:#}");
        host.exit(1);
    }

    result
}

fn dispatch<H: Host>(host: &mut H, mode: Mode, args: &CommonArgs) -> Result<()> {
    let settings = Settings::load(Utf8Path::new("."), args.settings.as_deref())?;
    let options = settings.merge(args)?;

    match mode {
        Mode::Fetch => fetch_values(host, &options),
        Mode::List => list_sections(host, &options),
        Mode::Config => print_config(host, &options),
    }
}
