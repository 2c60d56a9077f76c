// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Description:
//   Configuration de l'application chargée une seule fois au démarrage depuis
//   les variables d'environnement (fichier .env supporté via dotenv).
//
// Variables:
//   - HOST / PORT : adresse d'écoute (défaut 127.0.0.1:8080)
//   - DATABASE_URL : postgres://... ou sqlite:... (OBLIGATOIRE)
//   - DATABASE_MAX_CONNECTIONS : taille du pool (défaut 10)
//   - ADMIN_KEY : secret partagé pour /api/admin (optionnel)
//   - TOKEN_PREFIX : préfixe des tokens d'accès (défaut BREW)
//   - MAIL_API_URL / MAIL_API_KEY / MAIL_FROM : fournisseur mail (optionnel)
//   - JSON_BODY_LIMIT : taille max d'un body JSON en octets (défaut 1 Mio)
//   - LOG_FORMAT : pretty | json (défaut pretty)
//
// ============================================================================

use std::env;

use thiserror::Error;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_JSON_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin_key: Option<String>,
    pub token_prefix: String,
    pub mail: Option<MailConfig>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub json_limit: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl AppConfig {
    /// Charge la configuration depuis l'environnement (+ .env)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture des clés.
    /// Séparé de from_env pour pouvoir tester sans toucher aux variables du process.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", get("PORT"), 8080u16)?;
        let json_limit = parse_or("JSON_BODY_LIMIT", get("JSON_BODY_LIMIT"), DEFAULT_JSON_LIMIT)?;

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let supported = url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("sqlite:");
        if !supported {
            return Err(ConfigError::Invalid { key: "DATABASE_URL", value: url });
        }
        let max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 10u32)?;

        let token_prefix = get("TOKEN_PREFIX").unwrap_or_else(|| "BREW".to_string());
        if !token_prefix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(ConfigError::Invalid { key: "TOKEN_PREFIX", value: token_prefix });
        }

        // Pas de clé API => mailer "log only" (dev)
        let mail = match get("MAIL_API_KEY") {
            Some(api_key) => Some(MailConfig {
                api_url: get("MAIL_API_URL").unwrap_or_else(|| DEFAULT_MAIL_API_URL.to_string()),
                api_key,
                from: get("MAIL_FROM").ok_or(ConfigError::Missing("MAIL_FROM"))?,
            }),
            None => None,
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid { key: "LOG_FORMAT", value: other.to_string() });
            }
        };

        Ok(AppConfig {
            server: ServerConfig { host, port, json_limit },
            database: DatabaseConfig { url, max_connections },
            admin_key: get("ADMIN_KEY"),
            token_prefix,
            mail,
            log_format,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
