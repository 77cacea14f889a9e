use super::Output;
use crate::Result;
use crate::metrics::{Listener, enum_key, flatten};
use crate::registry::{AttributeValue, Number, ObjectName};
use ohno::IntoAppError;
use std::collections::HashSet;
use std::io::Write;

/// Prints a `[key]` header for every distinct enum key encountered during a run.
///
/// Numeric leaves are listed too, so the output names every field of the queried instances.
/// Only the sections of text leaves are ever consulted when rules are resolved.
#[derive(Debug)]
pub struct ListOutput<W> {
    writer: W,
    seen: HashSet<String>,
}

impl<W: Write> ListOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            seen: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn section(&mut self, name: &ObjectName, path: &str) -> Result<()> {
        let key = enum_key(name, path);
        if !self.seen.contains(&key) {
            writeln!(self.writer, "[{key}]").into_app_err("writing section list")?;
            let _ = self.seen.insert(key);
        }
        Ok(())
    }
}

impl<W: Write> Listener for ListOutput<W> {
    fn text(&mut self, name: &ObjectName, path: &str, _value: &str) -> Result<()> {
        self.section(name, path)
    }

    fn number(&mut self, name: &ObjectName, path: &str, _value: Number) -> Result<()> {
        self.section(name, path)
    }
}

impl<W: Write> Output for ListOutput<W> {
    fn output(&mut self, name: &ObjectName, attribute: &str, value: &AttributeValue) -> Result<()> {
        flatten(name, attribute, value, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(values: &[(&str, &str, AttributeValue)]) -> String {
        let mut output = ListOutput::new(Vec::new());
        for (name, attribute, value) in values {
            output.output(&ObjectName::parse(name).unwrap(), attribute, value).unwrap();
        }
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_each_key_listed_once() {
        let state = AttributeValue::Text("OK".into());
        let output = render(&[
            ("app:type=Cache,name=a", "state", state.clone()),
            ("app:type=Cache,name=b", "state", state.clone()),
            ("app:type=Cache,name=a", "state", state),
        ]);
        assert_eq!(output, "[app.Cache:state]\n");
    }

    #[test]
    fn test_first_seen_order() {
        let output = render(&[
            ("app:type=Pool", "mode", AttributeValue::Text("x".into())),
            ("app:name=x", "hits", AttributeValue::Number(Number::Integer(3))),
            (
                "app:type=Cache",
                "peers",
                AttributeValue::Sequence(vec![AttributeValue::Text("up".into())]),
            ),
        ]);
        insta::assert_snapshot!(output, @r"
        [app.Pool:mode]
        [app:hits]
        [app.Cache:peers.size]
        [app.Cache:peers[0]]
        ");
    }

    #[test]
    fn test_unsupported_lists_nothing() {
        assert_eq!(render(&[("app:type=Cache", "flag", AttributeValue::Unsupported)]), "");
    }
}
