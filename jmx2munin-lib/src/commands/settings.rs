use super::CommonArgs;
use crate::Result;
use crate::metrics::{AttributeFilter, Enums};
use crate::registry::{Credentials, Locator};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err, bail};
use serde::Deserialize;
use std::fs;
use std::io;

/// Settings file looked up in the working directory when `--settings` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "jmx2munin.toml";

/// Contents of a settings file; every entry is optional and overridden by flags and `JMX_*` variables.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub url: Option<String>,
    pub query: Option<String>,
    pub enums: Option<Utf8PathBuf>,
    #[serde(default)]
    pub attributes: Vec<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub conf: Option<Utf8PathBuf>,
}

impl Settings {
    /// Load settings from a file, or from `jmx2munin.toml` in `base_dir` if there is one
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(base_dir: &Utf8Path, settings_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = settings_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading settings file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_SETTINGS_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading settings file '{path}'")),
            }
        };

        toml::from_str(&text).into_app_err_with(|| format!("parsing settings file '{final_path}'"))
    }

    /// Combine with command-line arguments, which win over anything set here.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of user and password ends up being set.
    pub fn merge(self, args: &CommonArgs) -> Result<Options> {
        let attributes = if args.attributes.is_empty() { self.attributes } else { args.attributes.clone() };

        let credentials = match (args.user.clone().or(self.user), args.password.clone().or(self.password)) {
            (Some(user), Some(password)) => Some(Credentials { user, password }),
            (None, None) => None,
            _ => bail!("a user and a password must be given together"),
        };

        Ok(Options {
            url: args.url.clone().or(self.url),
            query: args.query.clone().or(self.query),
            enums: args.enums.clone().or(self.enums),
            filter: AttributeFilter::named(attributes),
            credentials,
            conf: args.conf.clone().or(self.conf),
        })
    }
}

/// Effective options after merging all configuration layers.
#[derive(Debug)]
pub struct Options {
    pub url: Option<String>,
    pub query: Option<String>,
    pub enums: Option<Utf8PathBuf>,
    pub filter: AttributeFilter,
    pub credentials: Option<Credentials>,
    pub conf: Option<Utf8PathBuf>,
}

impl Options {
    pub fn locator(&self) -> Result<Locator> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| app_err!("no attribute source given; use --url or set JMX_URL"))?;
        Locator::parse(url)
    }

    pub fn query(&self) -> Result<&str> {
        self.query
            .as_deref()
            .ok_or_else(|| app_err!("no query expression given; use --query or set JMX_QUERY"))
    }

    pub fn conf(&self) -> Result<&Utf8Path> {
        self.conf
            .as_deref()
            .ok_or_else(|| app_err!("no graph configuration given; use --conf or set JMX_CONF"))
    }

    /// Rule table from `--enums`, or an empty one.
    pub fn load_enums(&self) -> Result<Enums> {
        self.enums.as_deref().map_or_else(|| Ok(Enums::new()), Enums::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(text: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(dir.join(DEFAULT_SETTINGS_FILE), text).unwrap();
        (tmp, dir)
    }

    #[test]
    fn test_load_default_file() {
        let (_tmp, dir) = write_settings("url = \"http://localhost:8778/jolokia\"\nattributes = [\"a\", \"b\"]\n");
        let settings = Settings::load(&dir, None).unwrap();
        assert_eq!(settings.url.as_deref(), Some("http://localhost:8778/jolokia"));
        assert_eq!(settings.attributes, ["a", "b"]);
        assert_eq!(settings.query, None);
    }

    #[test]
    fn test_load_missing_default_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        assert_eq!(Settings::load(&dir, None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        assert!(Settings::load(&dir, Some(&dir.join("absent.toml"))).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let (_tmp, dir) = write_settings("uri = \"http://localhost\"\n");
        let err = Settings::load(&dir, None).unwrap_err();
        assert!(format!("{err:#}").contains("parsing settings file"));
    }

    #[test]
    fn test_arguments_override_settings() {
        let settings = Settings {
            url: Some("settings.json".into()),
            query: Some("app:*".into()),
            attributes: vec!["app_cache_state".into()],
            ..Settings::default()
        };
        let args = CommonArgs {
            url: Some("args.json".into()),
            ..CommonArgs::default()
        };

        let options = settings.merge(&args).unwrap();
        assert_eq!(options.url.as_deref(), Some("args.json"));
        assert_eq!(options.query().unwrap(), "app:*");
        assert_eq!(options.filter, AttributeFilter::named(["app_cache_state"]));
    }

    #[test]
    fn test_credentials_must_be_paired() {
        let args = CommonArgs {
            user: Some("monitor".into()),
            ..CommonArgs::default()
        };
        assert!(Settings::default().merge(&args).is_err());

        let settings = Settings {
            password: Some("secret".into()),
            ..Settings::default()
        };
        let options = settings.merge(&args).unwrap();
        assert_eq!(options.credentials.unwrap().user, "monitor");
    }

    #[test]
    fn test_missing_required_options() {
        let options = Settings::default().merge(&CommonArgs::default()).unwrap();
        assert!(options.locator().is_err());
        assert!(options.query().is_err());
        assert!(options.conf().is_err());
        assert!(options.load_enums().unwrap().is_empty());
        assert_eq!(options.filter, AttributeFilter::All);
    }
}
