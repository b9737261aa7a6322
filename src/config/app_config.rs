use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::domain::DomainError;
use crate::infrastructure::logging::{filter_directive, LoggingConfig};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
///
/// Keys are flat and read case-insensitively from the environment, e.g.
/// `POSTGRES_HOST` fills `postgres_host`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(ip)]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,

    #[validate(length(min = 1))]
    pub postgres_host: String,
    #[validate(range(min = 1))]
    pub postgres_port: u16,
    #[validate(length(min = 1))]
    pub postgres_database: String,
    #[validate(length(min = 1))]
    pub postgres_user: String,
    #[validate(length(min = 1))]
    pub postgres_password: String,
    #[validate(range(min = 1))]
    pub postgres_max_connections: u32,

    #[validate(length(min = 1))]
    pub api_version: String,
    #[validate(length(min = 1))]
    pub resume_path_json: String,
    /// Empty disables the PDF resume
    pub resume_path_pdf: String,

    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            postgres_host: String::new(),
            postgres_port: 5432,
            postgres_database: "postgres".to_string(),
            postgres_user: String::new(),
            postgres_password: String::new(),
            postgres_max_connections: 10,
            api_version: "v1".to_string(),
            resume_path_json: "etc/resume.json".to_string(),
            resume_path_pdf: "etc/resume.pdf".to_string(),
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::default().try_parsing(true));

        Self::from_builder(builder)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Check field rules, the log level vocabulary and the resume files
    pub fn check(&self) -> Result<(), DomainError> {
        Validate::validate(self)
            .map_err(|e| DomainError::configuration(format!("Invalid configuration: {}", e)))?;

        if filter_directive(&self.log_level).is_none() {
            return Err(DomainError::configuration(format!(
                "Invalid LOG_LEVEL '{}': expected one of trace, debug, info, warn, error, fatal, panic",
                self.log_level
            )));
        }

        if !Path::new(&self.resume_path_json).is_file() {
            return Err(DomainError::configuration(format!(
                "RESUME_PATH_JSON '{}' is not a file",
                self.resume_path_json
            )));
        }

        if !self.resume_path_pdf.is_empty() && !Path::new(&self.resume_path_pdf).is_file() {
            return Err(DomainError::configuration(format!(
                "RESUME_PATH_PDF '{}' is not a file",
                self.resume_path_pdf
            )));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, DomainError> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|e| DomainError::configuration(format!("Invalid HOST '{}': {}", self.host, e)))?;

        Ok(SocketAddr::from((ip, self.port)))
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    pub fn postgres(&self) -> PostgresConfig {
        PostgresConfig {
            host: self.postgres_host.clone(),
            port: self.postgres_port,
            database: self.postgres_database.clone(),
            user: self.postgres_user.clone(),
            password: self.postgres_password.clone(),
            ..PostgresConfig::default()
        }
        .with_max_connections(self.postgres_max_connections)
    }

    pub fn metrics(&self) -> MetricsConfig {
        MetricsConfig {
            enabled: self.metrics_enabled,
            ..MetricsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn valid_config(resume: &NamedTempFile) -> AppConfig {
        AppConfig {
            postgres_host: "db".to_string(),
            postgres_user: "site".to_string(),
            postgres_password: "secret".to_string(),
            resume_path_json: resume.path().display().to_string(),
            resume_path_pdf: String::new(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.postgres_port, 5432);
        assert_eq!(config.postgres_database, "postgres");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_from_builder_reads_flat_keys() {
        let builder = config::Config::builder()
            .set_override("postgres_host", "db.internal")
            .unwrap()
            .set_override("port", 9090)
            .unwrap()
            .set_override("log_format", "json")
            .unwrap();

        let config = AppConfig::from_builder(builder).unwrap();

        assert_eq!(config.postgres_host, "db.internal");
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.api_version, "v1");
    }

    #[test]
    fn test_valid_config_passes() {
        let resume = NamedTempFile::new().unwrap();
        assert!(valid_config(&resume).check().is_ok());
    }

    #[test]
    fn test_missing_postgres_host_fails() {
        let resume = NamedTempFile::new().unwrap();
        let config = AppConfig {
            postgres_host: String::new(),
            ..valid_config(&resume)
        };

        assert!(matches!(config.check(), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_port_zero_fails() {
        let resume = NamedTempFile::new().unwrap();
        let config = AppConfig {
            port: 0,
            ..valid_config(&resume)
        };

        assert!(config.check().is_err());
    }

    #[test]
    fn test_log_level_vocabulary() {
        let resume = NamedTempFile::new().unwrap();

        for level in ["debug", "fatal", "panic"] {
            let config = AppConfig {
                log_level: level.to_string(),
                ..valid_config(&resume)
            };
            assert!(config.check().is_ok(), "{} should be accepted", level);
        }

        let config = AppConfig {
            log_level: "loud".to_string(),
            ..valid_config(&resume)
        };
        assert!(config.check().is_err());
    }

    #[test]
    fn test_resume_files_must_exist() {
        let resume = NamedTempFile::new().unwrap();

        let missing_json = AppConfig {
            resume_path_json: "/nonexistent/resume.json".to_string(),
            ..valid_config(&resume)
        };
        assert!(missing_json.check().is_err());

        let missing_pdf = AppConfig {
            resume_path_pdf: "/nonexistent/resume.pdf".to_string(),
            ..valid_config(&resume)
        };
        assert!(missing_pdf.check().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_postgres_config_from_parts() {
        let config = AppConfig {
            postgres_host: "db".to_string(),
            postgres_max_connections: 3,
            ..AppConfig::default()
        };

        let postgres = config.postgres();
        assert_eq!(postgres.host, "db");
        assert_eq!(postgres.port, 5432);
        assert_eq!(postgres.max_connections, 3);
    }
}
