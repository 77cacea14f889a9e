use super::{Host, Options};
use crate::Result;
use crate::graph::{GraphConfig, fetch_fields};
use crate::output::MuninOutput;
use crate::registry::{connect, run_query};
use ohno::EnrichableExt;

const LOG_TARGET: &str = "     fetch";

/// Print the current values, either of every polled attribute or of every configured field.
pub fn fetch_values<H: Host>(host: &mut H, options: &Options) -> Result<()> {
    if options.conf.is_some() {
        return fetch_configured_fields(host, options);
    }

    let locator = options.locator()?;
    let query = options.query()?;
    let enums = options.load_enums()?;

    let mut output = MuninOutput::new(host.output(), &enums);
    let _ = run_query(&locator, options.credentials.as_ref(), query, &options.filter, &mut output)?;
    Ok(())
}

fn fetch_configured_fields<H: Host>(host: &mut H, options: &Options) -> Result<()> {
    let config = GraphConfig::load(options.conf()?)?;
    let locator = options.locator()?;

    let mut source = connect(&locator, options.credentials.as_ref())?;
    let result = fetch_fields(&config, source.as_mut(), &mut host.output());

    if let Err(e) = source.close() {
        log::warn!(target: LOG_TARGET, "Could not close connection to {locator}: {e:#}");
    }

    let printed = result.map_err(|e| e.enrich_with(|| format!("fetching fields from {locator}")))?;
    log::info!(target: LOG_TARGET, "Printed {printed} of {} field(s)", config.fields().len());
    Ok(())
}
