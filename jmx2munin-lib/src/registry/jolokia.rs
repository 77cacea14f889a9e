//! Attribute source speaking the Jolokia JSON-over-HTTP protocol.
//!
//! Every call is a single blocking `POST` of a Jolokia request object. The agent wraps each
//! answer in an envelope carrying its own `status`; anything other than 200 is an error.
//!
//! Jolokia serializes every collection as a JSON array. The declared type reported by a `list`
//! request tells sets apart, so those attributes are delivered as [`AttributeValue::Set`].

use super::{AttributeInfo, AttributeSource, AttributeValue, Credentials, ObjectName, ObjectNamePattern};
use crate::Result;
use ohno::{EnrichableExt, IntoAppError, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use url::Url;

const LOG_TARGET: &str = "   jolokia";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: u16,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug)]
pub struct JolokiaSource {
    client: Client,
    url: Url,
    credentials: Option<Credentials>,

    /// `(canonical instance name, attribute)` pairs whose declared type is a set.
    set_attributes: HashSet<(String, String)>,
}

impl JolokiaSource {
    /// Connect to the agent at `url` and check that it answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or rejects the request, e.g. because of bad credentials.
    pub fn connect(url: Url, credentials: Option<&Credentials>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jmx2munin/", env!("CARGO_PKG_VERSION")))
            .build()
            .into_app_err("creating HTTP client")?;

        let source = Self {
            client,
            url,
            credentials: credentials.cloned(),
            set_attributes: HashSet::new(),
        };

        let version = source
            .request(&json!({ "type": "version" }))
            .map_err(|e| e.enrich_with(|| format!("connecting to Jolokia agent at {}", source.url)))?;

        log::debug!(
            target: LOG_TARGET,
            "Connected to Jolokia agent version {}",
            version.get("agent").and_then(Value::as_str).unwrap_or("unknown")
        );

        Ok(source)
    }

    fn request(&self, body: &Value) -> Result<Value> {
        let mut request = self.client.post(self.url.clone()).json(body);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.password));
        }

        let response = request
            .send()
            .into_app_err_with(|| format!("sending request to {}", self.url))?
            .error_for_status()
            .into_app_err_with(|| format!("request to {} was rejected", self.url))?;

        let envelope: Envelope = response.json().into_app_err("decoding Jolokia response")?;
        if envelope.status != 200 {
            bail!(
                "Jolokia request failed with status {}: {}",
                envelope.status,
                envelope.error.as_deref().unwrap_or("no error message")
            );
        }

        Ok(envelope.value)
    }
}

impl AttributeSource for JolokiaSource {
    fn query_instances(&mut self, pattern: &ObjectNamePattern) -> Result<Vec<ObjectName>> {
        let value = self.request(&json!({ "type": "search", "mbean": pattern.as_str() }))?;
        let Value::Array(names) = value else {
            bail!("unexpected search result for '{pattern}': expected a list of names");
        };

        let mut result = Vec::with_capacity(names.len());
        for name in names {
            let Some(text) = name.as_str() else {
                log::warn!(target: LOG_TARGET, "Ignoring non-string search result {name}");
                continue;
            };

            match ObjectName::parse(text) {
                Ok(name) => result.push(name),
                Err(e) => log::warn!(target: LOG_TARGET, "Ignoring search result '{text}': {e:#}"),
            }
        }

        Ok(result)
    }

    fn attribute_info(&mut self, name: &ObjectName) -> Result<Vec<AttributeInfo>> {
        let path = format!("{}/{}", escape_path(name.domain()), escape_path(&name.key_list()));
        let value = self.request(&json!({ "type": "list", "path": path }))?;

        let Some(attrs) = value.get("attr").and_then(Value::as_object) else {
            return Ok(Vec::new());
        };

        let instance = name.to_string();
        let mut result = Vec::with_capacity(attrs.len());
        for (attribute, meta) in attrs {
            let key = (instance.clone(), attribute.clone());
            if meta.get("type").and_then(Value::as_str).is_some_and(is_set_type) {
                log::trace!(target: LOG_TARGET, "Attribute '{attribute}' of '{name}' is a set");
                let _ = self.set_attributes.insert(key);
            } else {
                let _ = self.set_attributes.remove(&key);
            }

            // The agent only lists attributes it can read.
            result.push(AttributeInfo::readable(attribute));
        }

        Ok(result)
    }

    fn attribute_value(&mut self, name: &ObjectName, attribute: &str) -> Result<AttributeValue> {
        let value = self.request(&json!({
            "type": "read",
            "mbean": name.to_string(),
            "attribute": attribute,
        }))?;

        match value {
            Value::Array(elements) if self.set_attributes.contains(&(name.to_string(), attribute.to_string())) => {
                Ok(AttributeValue::set_from_json(&elements))
            }
            value => Ok(AttributeValue::from(value)),
        }
    }
}

fn is_set_type(declared: &str) -> bool {
    matches!(
        declared,
        "java.util.Set"
            | "java.util.SortedSet"
            | "java.util.NavigableSet"
            | "java.util.HashSet"
            | "java.util.LinkedHashSet"
            | "java.util.TreeSet"
            | "java.util.EnumSet"
            | "java.util.concurrent.CopyOnWriteArraySet"
            | "java.util.concurrent.ConcurrentSkipListSet"
    )
}

/// Escape one segment of a Jolokia path: `!` becomes `!!` and `/` becomes `!/`.
fn escape_path(segment: &str) -> String {
    segment.replace('!', "!!").replace('/', "!/")
}
