use super::{Host, Options};
use crate::Result;
use crate::output::ListOutput;
use crate::registry::run_query;

/// Print a `[key]` section header for every enum key of the polled attributes.
pub fn list_sections<H: Host>(host: &mut H, options: &Options) -> Result<()> {
    let locator = options.locator()?;
    let query = options.query()?;

    let mut output = ListOutput::new(host.output());
    let _ = run_query(&locator, options.credentials.as_ref(), query, &options.filter, &mut output)?;
    Ok(())
}
