use super::{AttributeSource, Credentials, Locator, ObjectNamePattern, connect};
use crate::Result;
use crate::metrics::AttributeFilter;
use crate::output::Output;
use ohno::EnrichableExt;

const LOG_TARGET: &str = "     query";

/// What a single poll touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    /// Instances whose attributes were listed.
    pub instances: usize,

    /// Attribute values handed to the output.
    pub attributes: usize,

    /// Instances or attributes that were skipped because the source failed.
    pub failures: usize,
}

/// Poll every readable, selected attribute of every instance matching `pattern`.
///
/// Failures to describe one instance or to read one attribute are logged and skipped.
///
/// # Errors
///
/// Returns an error if the instances cannot be queried or the output fails.
pub fn poll<S, O>(source: &mut S, pattern: &ObjectNamePattern, filter: &AttributeFilter, output: &mut O) -> Result<PollStats>
where
    S: AttributeSource + ?Sized,
    O: Output + ?Sized,
{
    let instances = source
        .query_instances(pattern)
        .map_err(|e| e.enrich_with(|| format!("querying instances matching '{pattern}'")))?;

    log::debug!(target: LOG_TARGET, "{} instance(s) match '{pattern}'", instances.len());

    let mut stats = PollStats::default();
    for name in &instances {
        let attributes = match source.attribute_info(name) {
            Ok(attributes) => attributes,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping '{name}': could not list its attributes: {e:#}");
                stats.failures += 1;
                continue;
            }
        };

        stats.instances += 1;

        for info in attributes {
            if !info.readable {
                log::trace!(target: LOG_TARGET, "Skipping unreadable attribute '{}' of '{name}'", info.name);
                continue;
            }

            if !filter.include(name, &info.name) {
                continue;
            }

            match source.attribute_value(name, &info.name) {
                Ok(value) => {
                    output.output(name, &info.name, &value)?;
                    stats.attributes += 1;
                }
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Skipping attribute '{}' of '{name}': {e:#}", info.name);
                    stats.failures += 1;
                }
            }
        }
    }

    Ok(stats)
}

/// Connect to a source, poll it once, and close it again.
///
/// # Errors
///
/// Returns an error if `expression` is not a valid pattern, the source cannot be reached, or
/// the poll itself fails.
pub fn run_query<O: Output + ?Sized>(
    locator: &Locator,
    credentials: Option<&Credentials>,
    expression: &str,
    filter: &AttributeFilter,
    output: &mut O,
) -> Result<PollStats> {
    let pattern = ObjectNamePattern::parse(expression)?;
    let mut source = connect(locator, credentials)?;

    let result = poll(source.as_mut(), &pattern, filter, output);

    if let Err(e) = source.close() {
        log::warn!(target: LOG_TARGET, "Could not close connection to {locator}: {e:#}");
    }

    let stats = result?;
    log::info!(
        target: LOG_TARGET,
        "Polled {} attribute(s) on {} instance(s), {} failure(s)",
        stats.attributes,
        stats.instances,
        stats.failures
    );

    Ok(stats)
}
