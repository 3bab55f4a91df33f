use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::models::FieldPolicy;
use crate::orbit::CentralBody;
use crate::tle::ParseOptions;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub parsing: ParsingConfig,
    pub orbit: OrbitConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub field_policy: String, // "zero_fill" or "strict"
    pub verify_checksum: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitConfig {
    pub mu_km3_s2: f64,
    pub body_radius_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub manifest_path: String,
    pub tle_directory: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/tle.db".to_string(),
            max_connections: 4,
            connection_timeout_secs: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            parsing: ParsingConfig {
                field_policy: FieldPolicy::default().as_str().to_string(),
                verify_checksum: false,
            },
            orbit: OrbitConfig {
                mu_km3_s2: CentralBody::EARTH.mu_km3_s2,
                body_radius_km: CentralBody::EARTH.radius_km,
            },
            sources: SourcesConfig {
                manifest_path: "sources.csv".to_string(),
                tle_directory: "tle".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from multiple sources with precedence:
    /// defaults, `config/default`, `config/local`, `explicit`, then `TLE_INGEST__*` variables
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in Self::default().flatten() {
            builder = builder.set_default(key, value)?;
        }

        builder = builder
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("TLE_INGEST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let app_config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate database config
        if self.database.path.trim().is_empty() {
            return Err(anyhow::anyhow!("database.path cannot be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be greater than 0"));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(anyhow::anyhow!("connection_timeout_secs must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate parsing config
        if FieldPolicy::from_name(&self.parsing.field_policy).is_none() {
            return Err(anyhow::anyhow!(
                "Invalid field policy: {}. Must be one of: [\"zero_fill\", \"strict\"]",
                self.parsing.field_policy
            ));
        }

        // Validate orbit config
        self.central_body()?;

        Ok(())
    }

    /// Field policy named by `parsing.field_policy`
    pub fn field_policy(&self) -> Result<FieldPolicy> {
        FieldPolicy::from_name(&self.parsing.field_policy)
            .ok_or_else(|| anyhow::anyhow!("Invalid field policy: {}", self.parsing.field_policy))
    }

    /// Parser options built from the parsing section
    pub fn parse_options(&self) -> Result<ParseOptions> {
        Ok(ParseOptions {
            policy: self.field_policy()?,
            verify_checksum: self.parsing.verify_checksum,
        })
    }

    /// Central body built from the orbit section
    pub fn central_body(&self) -> Result<CentralBody> {
        CentralBody::new(self.orbit.mu_km3_s2, self.orbit.body_radius_km)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }

    /// Get database path from environment or config
    #[must_use]
    pub fn get_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database.path.clone())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Flatten the configuration into dotted key-value pairs
    fn flatten(self) -> Vec<(&'static str, config::Value)> {
        let mut values = vec![
            ("database.path", config::Value::from(self.database.path)),
            ("database.max_connections", config::Value::from(i64::from(self.database.max_connections))),
            ("database.connection_timeout_secs", config::Value::from(self.database.connection_timeout_secs)),
            ("logging.level", config::Value::from(self.logging.level)),
            ("logging.format", config::Value::from(self.logging.format)),
            ("parsing.field_policy", config::Value::from(self.parsing.field_policy)),
            ("parsing.verify_checksum", config::Value::from(self.parsing.verify_checksum)),
            ("orbit.mu_km3_s2", config::Value::from(self.orbit.mu_km3_s2)),
            ("orbit.body_radius_km", config::Value::from(self.orbit.body_radius_km)),
            ("sources.manifest_path", config::Value::from(self.sources.manifest_path)),
            ("sources.tle_directory", config::Value::from(self.sources.tle_directory)),
        ];
        if let Some(file_path) = self.logging.file_path {
            values.push(("logging.file_path", config::Value::from(file_path)));
        }
        values
    }
}
