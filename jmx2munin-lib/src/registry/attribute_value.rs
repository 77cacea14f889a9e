use serde_json::Value;

/// A numeric attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` for values Munin cannot graph (NaN and infinities).
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        match self {
            Self::Integer(_) => false,
            Self::Float(f) => !f.is_finite(),
        }
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// The shape of an attribute value as delivered by an attribute source.
///
/// Sources translate whatever their wire format carries into one of these variants. Anything
/// without a sensible numeric interpretation (booleans, nulls, opaque objects) becomes
/// [`AttributeValue::Unsupported`], which flattens to nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(Number),
    Text(String),

    /// Ordered collection; elements are flattened recursively.
    Sequence(Vec<Self>),

    /// Unordered collection, held as the string form of each element. Only membership is reported.
    Set(Vec<String>),

    /// Key/value entries in the order the source delivered them.
    Mapping(Vec<(String, Self)>),

    Unsupported,
}

impl AttributeValue {
    /// Build a set from JSON elements, which has no set type of its own.
    ///
    /// Strings are taken as is; any other element is held in its JSON text form.
    #[must_use]
    pub fn set_from_json(elements: &[Value]) -> Self {
        Self::Set(
            elements
                .iter()
                .map(|element| match element {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_i64().map_or_else(
                || n.as_f64().map_or(Self::Unsupported, |f| Self::Number(Number::Float(f))),
                |i| Self::Number(Number::Integer(i)),
            ),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Mapping(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
            Value::Bool(_) | Value::Null => Self::Unsupported,
        }
    }
}
