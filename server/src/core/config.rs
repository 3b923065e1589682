use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::query::{DuplicateFieldPolicy, QueryLimits};
use crate::utils::crypto;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_QUERY_MAX_CONDITIONS,
    DEFAULT_QUERY_MAX_DEPTH, DEFAULT_QUERY_MAX_PARAM_BYTES, MAX_QUERY_DEPTH,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    /// Hex-encoded JWT signing key; random per process when absent
    pub signing_key: Option<String>,
}

/// List query limits section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QueryFileConfig {
    pub max_depth: Option<usize>,
    pub max_conditions: Option<usize>,
    pub max_param_bytes: Option<usize>,
    pub reject_duplicate_fields: Option<bool>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub query: Option<QueryFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.enabled.is_some() {
                tracing::trace!(enabled = ?auth.enabled, "Merging auth.enabled");
                current.enabled = auth.enabled;
            }
            if auth.signing_key.is_some() {
                tracing::trace!("Merging auth.signing_key");
                current.signing_key = auth.signing_key;
            }
        }

        if let Some(query) = other.query {
            let current = self.query.get_or_insert_with(QueryFileConfig::default);
            if query.max_depth.is_some() {
                tracing::trace!(max_depth = ?query.max_depth, "Merging query.max_depth");
                current.max_depth = query.max_depth;
            }
            if query.max_conditions.is_some() {
                tracing::trace!(max_conditions = ?query.max_conditions, "Merging query.max_conditions");
                current.max_conditions = query.max_conditions;
            }
            if query.max_param_bytes.is_some() {
                tracing::trace!(max_param_bytes = ?query.max_param_bytes, "Merging query.max_param_bytes");
                current.max_param_bytes = query.max_param_bytes;
            }
            if query.reject_duplicate_fields.is_some() {
                tracing::trace!(
                    reject = ?query.reject_duplicate_fields,
                    "Merging query.reject_duplicate_fields"
                );
                current.reject_duplicate_fields = query.reject_duplicate_fields;
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    pub signing_key: Option<String>,
}

/// Survey list query configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryConfig {
    pub limits: QueryLimits,
    pub duplicates: DuplicateFieldPolicy,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub query: QueryConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.surveyseat/surveyseat.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.surveyseat/surveyseat.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            auth_enabled = config.auth.enabled,
            max_depth = config.query.limits.max_depth,
            max_conditions = config.query.limits.max_conditions,
            duplicates = ?config.query.duplicates,
            debug = config.debug,
            "Configuration loaded"
        );

        if is_all_interfaces(&config.server.host) && !config.auth.enabled {
            tracing::warn!(
                host = %config.server.host,
                "Authentication is disabled while listening on all interfaces"
            );
        }

        Ok(config)
    }

    /// Layer defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_query = file_config.query.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(true)
        };
        let signing_key = cli.auth_signing_key.clone().or(file_auth.signing_key);

        let limits = QueryLimits {
            max_depth: cli
                .query_max_depth
                .or(file_query.max_depth)
                .unwrap_or(DEFAULT_QUERY_MAX_DEPTH),
            max_conditions: cli
                .query_max_conditions
                .or(file_query.max_conditions)
                .unwrap_or(DEFAULT_QUERY_MAX_CONDITIONS),
            max_param_bytes: cli
                .query_max_param_bytes
                .or(file_query.max_param_bytes)
                .unwrap_or(DEFAULT_QUERY_MAX_PARAM_BYTES),
        };

        let reject_duplicates = cli
            .query_reject_duplicates
            .or(file_query.reject_duplicate_fields)
            .unwrap_or(false);
        let duplicates = if reject_duplicates {
            DuplicateFieldPolicy::Reject
        } else {
            DuplicateFieldPolicy::LastWriteWins
        };

        // debug: CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                enabled: auth_enabled,
                signing_key,
            },
            query: QueryConfig { limits, duplicates },
            debug,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would cause bind failure
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        let limits = &self.query.limits;
        if limits.max_depth == 0 || limits.max_depth > MAX_QUERY_DEPTH {
            anyhow::bail!(
                "Configuration error: query.max_depth must be between 1 and {}. Got: {}",
                MAX_QUERY_DEPTH,
                limits.max_depth
            );
        }
        if limits.max_conditions == 0 {
            anyhow::bail!("Configuration error: query.max_conditions must be greater than 0");
        }
        if limits.max_param_bytes == 0 {
            anyhow::bail!("Configuration error: query.max_param_bytes must be greater than 0");
        }

        if let Some(ref key) = self.auth.signing_key {
            crypto::decode_signing_key(key)
                .context("Configuration error: auth.signing_key must be at least 32 hex-encoded bytes")?;
        }

        Ok(())
    }
}

/// Get the profile config path (~/.surveyseat/surveyseat.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "auth": { "enabled": false },
            "query": { "max_depth": 4, "reject_duplicate_fields": true },
            "debug": true
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("0.0.0.0".to_string())
        );
        assert_eq!(config.server.as_ref().unwrap().port, Some(8080));
        assert_eq!(config.auth.as_ref().unwrap().enabled, Some(false));
        let query = config.query.as_ref().unwrap();
        assert_eq!(query.max_depth, Some(4));
        assert!(query.max_conditions.is_none());
        assert_eq!(query.reject_duplicate_fields, Some(true));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.auth.is_none());
        assert!(config.query.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "auth": { "enabled": true },
                "query": { "max_depth": 4, "max_conditions": 10 }
            }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{
                "server": { "port": 2000 },
                "query": { "max_conditions": 20 },
                "debug": true
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));
        assert_eq!(base.auth.as_ref().unwrap().enabled, Some(true));
        let query = base.query.as_ref().unwrap();
        assert_eq!(query.max_depth, Some(4));
        assert_eq!(query.max_conditions, Some(20));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.auth.enabled);
        assert!(config.auth.signing_key.is_none());
        assert_eq!(config.query.limits, QueryLimits::default());
        assert_eq!(config.query.duplicates, DuplicateFieldPolicy::LastWriteWins);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "file.host", "port": 1000 },
                "query": { "max_depth": 4, "reject_duplicate_fields": false }
            }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(3000),
            no_auth: true,
            query_max_depth: Some(6),
            query_reject_duplicates: Some(true),
            ..Default::default()
        };

        let config = AppConfig::from_layers(&cli, file);
        assert_eq!(config.server.host, "file.host");
        assert_eq!(config.server.port, 3000);
        assert!(!config.auth.enabled);
        assert_eq!(config.query.limits.max_depth, 6);
        assert_eq!(config.query.duplicates, DuplicateFieldPolicy::Reject);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.query.limits.max_depth = MAX_QUERY_DEPTH + 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.query.limits.max_conditions = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.auth.signing_key = Some("not-hex".to_string());
        assert!(config.validate().is_err());

        config.auth.signing_key = Some("ab".repeat(16));
        assert!(config.validate().is_err());

        config.auth.signing_key = Some("ab".repeat(32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "server": {{ "port": 7001 }}, "query": {{ "max_param_bytes": 512 }} }}"#
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.query.limits.max_param_bytes, 512);
    }

    #[test]
    fn test_load_missing_cli_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/surveyseat.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
