use super::{Output, UNKNOWN, format_number};
use crate::Result;
use crate::metrics::{Enums, Listener, enum_key, field_name, flatten};
use crate::registry::{AttributeValue, Number, ObjectName};
use ohno::IntoAppError;
use std::io::Write;

/// Prints one `field.value number` line per leaf.
#[derive(Debug)]
pub struct MuninOutput<'a, W> {
    writer: W,
    enums: &'a Enums,
}

impl<'a, W: Write> MuninOutput<'a, W> {
    pub const fn new(writer: W, enums: &'a Enums) -> Self {
        Self { writer, enums }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, name: &ObjectName, path: &str, value: &str) -> Result<()> {
        writeln!(self.writer, "{}.value {value}", field_name(name, path)).into_app_err("writing plugin output")
    }
}

impl<W: Write> Listener for MuninOutput<'_, W> {
    fn text(&mut self, name: &ObjectName, path: &str, value: &str) -> Result<()> {
        match self.enums.resolve(&enum_key(name, path), value) {
            Some(rank) => self.number(name, path, Number::Integer(rank)),
            None => self.line(name, path, UNKNOWN),
        }
    }

    fn number(&mut self, name: &ObjectName, path: &str, value: Number) -> Result<()> {
        self.line(name, path, &format_number(value))
    }
}

impl<W: Write> Output for MuninOutput<'_, W> {
    fn output(&mut self, name: &ObjectName, attribute: &str, value: &AttributeValue) -> Result<()> {
        flatten(name, attribute, value, self)
    }
}
