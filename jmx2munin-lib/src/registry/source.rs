use super::jolokia::JolokiaSource;
use super::snapshot::SnapshotSource;
use super::{AttributeValue, ObjectName, ObjectNamePattern};
use crate::Result;
use camino::Utf8PathBuf;
use core::fmt::{Debug, Display, Formatter};
use ohno::{IntoAppError, bail};
use url::Url;

const LOG_TARGET: &str = "    source";

/// A remote (or recorded) attribute registry.
///
/// All calls block until the registry answers. No timeout is imposed here; sources that talk to
/// the network configure their own.
pub trait AttributeSource: Debug {
    /// Names of all instances matching `pattern`.
    fn query_instances(&mut self, pattern: &ObjectNamePattern) -> Result<Vec<ObjectName>>;

    /// Attributes exposed by one instance.
    fn attribute_info(&mut self, name: &ObjectName) -> Result<Vec<AttributeInfo>>;

    /// Current value of one attribute.
    fn attribute_value(&mut self, name: &ObjectName, attribute: &str) -> Result<AttributeValue>;

    /// Release the connection.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Metadata for a single attribute of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub readable: bool,
}

impl AttributeInfo {
    #[must_use]
    pub fn readable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
        }
    }
}

/// User name and password handed through to the source.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where to find the attribute registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A Jolokia agent endpoint, e.g. `http://localhost:8778/jolokia`.
    Jolokia(Url),

    /// A JSON snapshot of a registry on disk.
    Snapshot(Utf8PathBuf),
}

impl Locator {
    /// Interpret a `--url` value.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed HTTP URLs and for JMX remoting URLs, which cannot be
    /// spoken without a JVM.
    pub fn parse(s: &str) -> Result<Self> {
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).into_app_err_with(|| format!("invalid Jolokia URL '{s}'"))?;
            return Ok(Self::Jolokia(url));
        }

        if s.starts_with("service:jmx:") {
            bail!("'{s}' is a JMX remoting URL; point --url at a Jolokia agent such as http://host:8778/jolokia instead");
        }

        let path = s.strip_prefix("file://").unwrap_or(s);
        if path.is_empty() {
            bail!("empty attribute source locator");
        }

        Ok(Self::Snapshot(Utf8PathBuf::from(path)))
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Jolokia(url) => write!(f, "{url}"),
            Self::Snapshot(path) => write!(f, "file://{path}"),
        }
    }
}

/// Open the attribute source a locator points at.
///
/// # Errors
///
/// Returns an error if the source is unreachable or rejects the credentials.
pub fn connect(locator: &Locator, credentials: Option<&Credentials>) -> Result<Box<dyn AttributeSource>> {
    log::info!(target: LOG_TARGET, "Connecting to {locator}");

    match locator {
        Locator::Jolokia(url) => Ok(Box::new(JolokiaSource::connect(url.clone(), credentials)?)),
        Locator::Snapshot(path) => {
            if credentials.is_some() {
                log::debug!(target: LOG_TARGET, "Credentials are not used by snapshot sources");
            }
            Ok(Box::new(SnapshotSource::load(path)?))
        }
    }
}
