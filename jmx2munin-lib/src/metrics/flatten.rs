use crate::Result;
use crate::registry::{AttributeValue, Number, ObjectName};

const LOG_TARGET: &str = "   flatten";

/// Containers nested deeper than this are not descended into.
pub const MAX_DEPTH: usize = 32;

/// Receives the leaves produced by [`flatten`].
pub trait Listener {
    fn text(&mut self, name: &ObjectName, path: &str, value: &str) -> Result<()>;
    fn number(&mut self, name: &ObjectName, path: &str, value: Number) -> Result<()>;
}

/// Turn an attribute value into scalar leaves.
///
/// Numbers and text are passed through under `path`. Collections first report their size as
/// `path.size`, then their members:
///
/// - sequences recurse into each element under `path[index]`
/// - mappings recurse into each value under `path[key]`
/// - sets report `1` under `path[element]` for every element, discarding the element itself
///
/// Unsupported values produce nothing.
///
/// # Errors
///
/// Only errors returned by the listener are propagated.
pub fn flatten<L: Listener + ?Sized>(name: &ObjectName, path: &str, value: &AttributeValue, listener: &mut L) -> Result<()> {
    flatten_at(name, path, value, listener, 0)
}

fn flatten_at<L: Listener + ?Sized>(name: &ObjectName, path: &str, value: &AttributeValue, listener: &mut L, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        log::warn!(target: LOG_TARGET, "Value of '{path}' on '{name}' is nested deeper than {MAX_DEPTH} levels, ignoring the rest");
        return Ok(());
    }

    match value {
        AttributeValue::Number(n) => listener.number(name, path, *n),
        AttributeValue::Text(s) => listener.text(name, path, s),

        AttributeValue::Set(elements) => {
            listener.number(name, &format!("{path}.size"), Number::from(elements.len()))?;
            for element in elements {
                listener.number(name, &format!("{path}[{element}]"), Number::Integer(1))?;
            }
            Ok(())
        }

        AttributeValue::Sequence(items) => {
            listener.number(name, &format!("{path}.size"), Number::from(items.len()))?;
            for (index, item) in items.iter().enumerate() {
                flatten_at(name, &format!("{path}[{index}]"), item, listener, depth + 1)?;
            }
            Ok(())
        }

        AttributeValue::Mapping(entries) => {
            listener.number(name, &format!("{path}.size"), Number::from(entries.len()))?;
            for (key, item) in entries {
                flatten_at(name, &format!("{path}[{key}]"), item, listener, depth + 1)?;
            }
            Ok(())
        }

        AttributeValue::Unsupported => {
            log::debug!(target: LOG_TARGET, "Skipping '{path}' on '{name}': unsupported value");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Leaf {
        Text(String),
        Number(Number),
    }

    #[derive(Default)]
    struct Recorder {
        leaves: Vec<(String, Leaf)>,
    }

    impl Listener for Recorder {
        fn text(&mut self, _name: &ObjectName, path: &str, value: &str) -> Result<()> {
            self.leaves.push((path.to_string(), Leaf::Text(value.to_string())));
            Ok(())
        }

        fn number(&mut self, _name: &ObjectName, path: &str, value: Number) -> Result<()> {
            self.leaves.push((path.to_string(), Leaf::Number(value)));
            Ok(())
        }
    }

    fn record(value: &AttributeValue) -> Vec<(String, Leaf)> {
        let name = ObjectName::parse("app:type=Cache").unwrap();
        let mut recorder = Recorder::default();
        flatten(&name, "attr", value, &mut recorder).unwrap();
        recorder.leaves
    }

    fn int(i: i64) -> AttributeValue {
        AttributeValue::Number(Number::Integer(i))
    }

    fn leaf(path: &str, i: i64) -> (String, Leaf) {
        (path.to_string(), Leaf::Number(Number::Integer(i)))
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(record(&AttributeValue::Number(Number::Float(0.5))), vec![(
            "attr".to_string(),
            Leaf::Number(Number::Float(0.5))
        )]);
        assert_eq!(record(&AttributeValue::Text("UP".into())), vec![(
            "attr".to_string(),
            Leaf::Text("UP".into())
        )]);
    }

    #[test]
    fn test_sequence_yields_size_then_elements_in_order() {
        let leaves = record(&AttributeValue::Sequence(vec![int(10), int(20), int(30)]));
        assert_eq!(leaves.len(), 4);
        assert_eq!(leaves, vec![leaf("attr.size", 3), leaf("attr[0]", 10), leaf("attr[1]", 20), leaf("attr[2]", 30)]);
    }

    #[test]
    fn test_empty_sequence_yields_only_size() {
        assert_eq!(record(&AttributeValue::Sequence(vec![])), vec![leaf("attr.size", 0)]);
    }

    #[test]
    fn test_set_reports_membership_only() {
        let leaves = record(&AttributeValue::Set(vec!["eu".into(), "us".into()]));
        assert_eq!(leaves, vec![leaf("attr.size", 2), leaf("attr[eu]", 1), leaf("attr[us]", 1)]);
    }

    #[test]
    fn test_mapping_recurses_into_values() {
        let value = AttributeValue::Mapping(vec![
            ("used".into(), int(5)),
            ("state".into(), AttributeValue::Text("OK".into())),
        ]);
        assert_eq!(record(&value), vec![
            leaf("attr.size", 2),
            leaf("attr[used]", 5),
            ("attr[state]".to_string(), Leaf::Text("OK".into())),
        ]);
    }

    #[test]
    fn test_nested_paths() {
        let value = AttributeValue::Sequence(vec![AttributeValue::Mapping(vec![(
            "peers".into(),
            AttributeValue::Set(vec!["a".into()]),
        )])]);
        assert_eq!(record(&value), vec![
            leaf("attr.size", 1),
            leaf("attr[0].size", 1),
            leaf("attr[0][peers].size", 1),
            leaf("attr[0][peers][a]", 1),
        ]);
    }

    #[test]
    fn test_unsupported_yields_nothing() {
        assert!(record(&AttributeValue::Unsupported).is_empty());

        let leaves = record(&AttributeValue::Sequence(vec![AttributeValue::Unsupported, int(1)]));
        assert_eq!(leaves, vec![leaf("attr.size", 2), leaf("attr[1]", 1)]);
    }

    #[test]
    fn test_depth_is_capped() {
        let mut value = int(7);
        for _ in 0..MAX_DEPTH + 8 {
            value = AttributeValue::Sequence(vec![value]);
        }

        let leaves = record(&value);
        assert_eq!(leaves.len(), MAX_DEPTH + 1);
        assert!(leaves.iter().all(|(path, _)| path.ends_with(".size")));
    }
}
