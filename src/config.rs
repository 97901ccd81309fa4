use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` is treated as a development deployment.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must be set to a non-empty value");
        }

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "projectdesk".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "projectdesk-users".into()),
        };

        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {v}"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            environment: std::env::var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(Environment::Development),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            static_dir: std::env::var("STATIC_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: [(&str, Option<&str>); 7] = [
        ("JWT_ISSUER", None),
        ("JWT_AUDIENCE", None),
        ("APP_ENV", None),
        ("APP_HOST", None),
        ("APP_PORT", None),
        ("STATIC_DIR", None),
        ("DB_MAX_CONNECTIONS", None),
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let mut all: Vec<(&str, Option<&str>)> = CLEAN.to_vec();
        all.extend_from_slice(vars);
        temp_env::with_vars(all, f);
    }

    #[test]
    fn loads_defaults() {
        with_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/projectdesk")),
                ("JWT_SECRET", Some("s3cret")),
            ],
            || {
                let cfg = AppConfig::from_env().expect("config loads");
                assert_eq!(cfg.jwt.secret, "s3cret");
                assert_eq!(cfg.jwt.issuer, "projectdesk");
                assert_eq!(cfg.jwt.audience, "projectdesk-users");
                assert_eq!(cfg.environment, Environment::Development);
                assert!(!cfg.is_production());
                assert_eq!(cfg.port, 8080);
                assert_eq!(cfg.db_max_connections, 10);
                assert!(cfg.static_dir.is_none());
                assert_eq!(cfg.listen_addr().unwrap().to_string(), "0.0.0.0:8080");
            },
        );
    }

    #[test]
    fn missing_secret_fails_startup() {
        with_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/projectdesk")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = AppConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn blank_secret_fails_startup() {
        with_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/projectdesk")),
                ("JWT_SECRET", Some("   ")),
            ],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn production_env_and_overrides() {
        with_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/projectdesk")),
                ("JWT_SECRET", Some("s3cret")),
                ("APP_ENV", Some("Production")),
                ("APP_HOST", Some("127.0.0.1")),
                ("APP_PORT", Some("9000")),
                ("STATIC_DIR", Some("./web/dist")),
            ],
            || {
                let cfg = AppConfig::from_env().expect("config loads");
                assert!(cfg.is_production());
                assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:9000");
                assert_eq!(cfg.static_dir, Some(PathBuf::from("./web/dist")));
            },
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        with_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/projectdesk")),
                ("JWT_SECRET", Some("s3cret")),
                ("APP_PORT", Some("eighty")),
            ],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PRODUCTION "), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Development);
        assert_eq!(Environment::parse(""), Environment::Development);
    }
}
