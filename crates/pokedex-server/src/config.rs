//! Configuration loading and typed config structures for the Pokedex server.
//!
//! The configuration lives in `pokedex-config.yaml` in the working
//! directory. Every field has a default, so the file (and any section or
//! key in it) may be omitted. A few environment variables override the
//! file so deployments can relocate the database without editing it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pokedex_api::{DEFAULT_CORS_ORIGINS, ServerConfig};
use pokedex_db::SqliteConfig;
use serde::Deserialize;

/// Default location of the configuration file.
pub const CONFIG_FILE: &str = "pokedex-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the configuration file.
    File,
    /// The file does not exist; defaults apply.
    Defaults,
}

/// Top-level server configuration. Mirrors `pokedex-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PokedexConfig {
    /// HTTP listener and CORS.
    #[serde(default)]
    pub server: ServerSettings,

    /// Species store and seed file.
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl PokedexConfig {
    /// Load the configuration file at `path`, falling back to defaults when
    /// it does not exist, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// or [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let (mut config, source) = if path.exists() {
            (Self::from_file(path)?, ConfigSource::File)
        } else {
            (Self::default(), ConfigSource::Defaults)
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, source))
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string. An empty document yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override settings from environment-style variables:
    ///
    /// - `DATABASE_URL` overrides `database.url`
    /// - `POKEDEX_SEED_PATH` overrides `database.seed_path`
    /// - `POKEDEX_HOST` overrides `server.host`
    /// - `POKEDEX_PORT` overrides `server.port` when it is a valid port
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(path) = lookup("POKEDEX_SEED_PATH") {
            self.database.seed_path = PathBuf::from(path);
        }
        if let Some(host) = lookup("POKEDEX_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("POKEDEX_PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dashboard origins allowed by CORS. Empty allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl ServerSettings {
    /// Listener configuration for the API server.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Species store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// `SQLite` URL. Relative paths resolve against the working directory.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds before an idle connection is closed. `0` keeps it open.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// JSON dataset imported when the store is empty.
    #[serde(default = "default_seed_path")]
    pub seed_path: PathBuf,
}

impl DatabaseSettings {
    /// Pool configuration for the species store.
    pub fn sqlite_config(&self) -> SqliteConfig {
        let idle_timeout =
            (self.idle_timeout_secs > 0).then_some(Duration::from_secs(self.idle_timeout_secs));
        SqliteConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_idle_timeout(idle_timeout)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            seed_path: default_seed_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Log level or filter directive (trace, debug, info, warn, error).
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5001
}

fn default_cors_origins() -> Vec<String> {
    Vec::from(DEFAULT_CORS_ORIGINS.map(String::from))
}

fn default_database_url() -> String {
    String::from("sqlite://pokemon.db")
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("static/pokemon_.json")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn default_config_matches_dashboard_setup() {
        let config = PokedexConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
        assert_eq!(config.database.url, "sqlite://pokemon.db");
        assert_eq!(config.database.seed_path, PathBuf::from("static/pokemon_.json"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8080
  cors_origins: []

database:
  url: "sqlite://data/dex.db"
  max_connections: 2
  connect_timeout_secs: 10
  idle_timeout_secs: 0
  seed_path: "fixtures/dex.json"

logging:
  level: "debug"
  format: json
"#;
        let config = PokedexConfig::parse(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.database.url, "sqlite://data/dex.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.connect_timeout_secs, 10);
        assert_eq!(config.database.idle_timeout_secs, 0);
        assert_eq!(config.database.seed_path, PathBuf::from("fixtures/dex.json"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = PokedexConfig::parse("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database, DatabaseSettings::default());
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(PokedexConfig::parse("").unwrap(), PokedexConfig::default());
        assert_eq!(PokedexConfig::parse("  \n").unwrap(), PokedexConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = PokedexConfig::parse("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));

        let result = PokedexConfig::parse("logging:\n  format: xml\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars = BTreeMap::from([
            ("DATABASE_URL", "sqlite://override.db"),
            ("POKEDEX_SEED_PATH", "/srv/pokemon.json"),
            ("POKEDEX_HOST", "localhost"),
            ("POKEDEX_PORT", " 6001 "),
        ]);
        let mut config = PokedexConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| (*v).to_owned()));

        assert_eq!(config.database.url, "sqlite://override.db");
        assert_eq!(config.database.seed_path, PathBuf::from("/srv/pokemon.json"));
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 6001);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = PokedexConfig::default();
        config.apply_overrides(|key| (key == "POKEDEX_PORT").then(|| String::from("70000")));
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = PokedexConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.server.cors_origins.len(), 2);
    }

    #[test]
    fn existing_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "database:\n  max_connections: 3\n").unwrap();

        let (config, source) = PokedexConfig::load(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.database.sqlite_config().max_connections, 3);
    }

    #[test]
    fn database_timeouts_reach_pool_config() {
        let defaults = DatabaseSettings::default().sqlite_config();
        assert_eq!(defaults.connect_timeout, Duration::from_secs(5));
        assert_eq!(defaults.idle_timeout, Some(Duration::from_secs(300)));

        let config = PokedexConfig::parse(
            "database:\n  connect_timeout_secs: 2\n  idle_timeout_secs: 0\n",
        )
        .unwrap();
        let sqlite = config.database.sqlite_config();
        assert_eq!(sqlite.connect_timeout, Duration::from_secs(2));
        assert_eq!(sqlite.idle_timeout, None);
    }
}
