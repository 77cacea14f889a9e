//! A Munin plugin that graphs attributes of a JMX registry.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use jmx2munin_lib::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host bound to the process's standard streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout().lock()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args())
}
