//! User configuration: servers, aliases and display preferences.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::{Error, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "BUGZ_CONFIG";

/// Fields shown by `info` when the configuration names none.
const DEFAULT_SHOW_FIELDS: &[&str] = &[
    "summary",
    "status",
    "resolution",
    "product",
    "component",
    "assigned_to",
];

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Server used when `--server` is not given.
    pub default_server: Option<String>,
    /// Named server sections.
    pub servers: BTreeMap<String, ServerConfig>,
    /// Alias name to command-line fragment.
    pub aliases: BTreeMap<String, String>,
    /// Fields printed by `info`.
    pub show_fields: Vec<String>,
}

/// One `servers:` section. Every value may be overridden on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the tracker.
    pub url: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Password for `user`.
    pub password: Option<String>,
    /// API key; preferred over login and password.
    pub api_key: Option<String>,
}

/// How to authenticate against a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication.
    Anonymous,
    /// Sent as a request header.
    ApiKey(String),
    /// Sent as query parameters.
    Login {
        /// Login name.
        user: String,
        /// Password.
        password: String,
    },
}

/// A fully resolved server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// Base URL, always ending in `/`.
    pub url: Url,
    /// Authentication to use.
    pub credentials: Credentials,
}

impl Config {
    /// Default location: `<config dir>/bugz/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("bugz").join("config.yaml"))
    }

    /// Load the configuration at `path`, or at the default location.
    ///
    /// A missing file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read and
    /// [`Error::Config`] if it is not valid YAML of the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    context: format!("reading {}", path.display()),
                    source,
                });
            }
        };
        Self::parse(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error message.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Fields to print in `info`.
    #[must_use]
    pub fn show_fields(&self) -> Vec<String> {
        if self.show_fields.is_empty() {
            DEFAULT_SHOW_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            self.show_fields.clone()
        }
    }

    /// Combine the selected server section with command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown server name, a missing or
    /// malformed URL, or a user without a password (or the reverse).
    pub fn resolve_server(&self, args: &GlobalArgs) -> Result<Server> {
        let name = args.server.as_ref().or(self.default_server.as_ref());
        let section = match name {
            Some(name) => self
                .servers
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Config(format!("no configuration for server '{name}'")))?,
            None => ServerConfig::default(),
        };

        let url = args
            .url
            .clone()
            .or(section.url)
            .ok_or_else(|| Error::Config("missing args: url".into()))?;
        let url = parse_url(&url)?;

        let user = args.user.clone().or(section.user);
        let password = args.password.clone().or(section.password);
        let api_key = args.api_key.clone().or(section.api_key);
        let credentials = match (api_key, user, password) {
            (Some(key), _, _) => Credentials::ApiKey(key),
            (None, Some(user), Some(password)) => Credentials::Login { user, password },
            (None, None, None) => Credentials::Anonymous,
            (None, Some(_), None) => {
                return Err(Error::Config("missing args: password (user given)".into()))
            }
            (None, None, Some(_)) => {
                return Err(Error::Config("missing args: user (password given)".into()))
            }
        };

        tracing::debug!(url = %url, server = ?name, "server resolved");
        Ok(Server { url, credentials })
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("invalid url '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "invalid url '{raw}': scheme must be http or https"
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::Config(format!("invalid url '{raw}': no host")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::Config(format!(
            "invalid url '{raw}': query and fragment not allowed"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
