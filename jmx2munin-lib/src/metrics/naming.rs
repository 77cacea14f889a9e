use crate::registry::ObjectName;

const KEYSPACE: &str = "keyspace";
const TYPE: &str = "type";

/// Munin field name for an attribute path of an instance.
///
/// The instance contributes its domain, then its `keyspace` and `type` property values, then
/// every other property value in key order. Everything outside `[A-Za-z0-9]` becomes `_` and
/// the result is lowercased:
///
/// ```
/// # use jmx2munin_lib::metrics::field_name;
/// # use jmx2munin_lib::registry::ObjectName;
/// let name = ObjectName::parse("app:type=Cache,name=users").unwrap();
/// assert_eq!(field_name(&name, "hitRate"), "app_cache_users_hitrate");
/// ```
#[must_use]
pub fn field_name(name: &ObjectName, attribute: &str) -> String {
    let mut result = sanitize(&bean_string(name));
    result.push('_');
    result.push_str(&sanitize(attribute));
    result.make_ascii_lowercase();
    result
}

/// Key of the enum rule section governing an attribute path: `domain.type:attribute`.
///
/// Nothing is sanitized. Without a `type` property the key is `domain:attribute`.
#[must_use]
pub fn enum_key(name: &ObjectName, attribute: &str) -> String {
    match name.key_property(TYPE) {
        Some(ty) => format!("{}.{ty}:{attribute}", name.domain()),
        None => format!("{}:{attribute}", name.domain()),
    }
}

fn bean_string(name: &ObjectName) -> String {
    let mut result = String::from(name.domain());

    for key in [KEYSPACE, TYPE] {
        if let Some(value) = name.key_property(key) {
            result.push('.');
            result.push_str(value);
        }
    }

    for (key, value) in name.properties() {
        if key != KEYSPACE && key != TYPE {
            result.push('.');
            result.push_str(value);
        }
    }

    result
}

fn sanitize(s: &str) -> String {
    s.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}
