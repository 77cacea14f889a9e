use super::{Host, Options};
use crate::Result;
use crate::graph::GraphConfig;

/// Answer Munin's `config` request from the graph configuration; no source is contacted.
pub fn print_config<H: Host>(host: &mut H, options: &Options) -> Result<()> {
    let config = GraphConfig::load(options.conf()?)?;
    config.report(&mut host.output())
}
