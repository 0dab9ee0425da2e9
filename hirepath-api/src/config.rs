/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST` / `API_PORT`: Bind address (default: 0.0.0.0:8080)
/// - `CORS_ORIGINS`: Comma separated origins, `*` for any (default: `*`)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `FRONTEND_URL` / `BACKEND_URL`: Public URLs used in email links
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 chars)
/// - `JWT_EXPIRATION_HOURS`: Access token lifetime (default: 24)
/// - `REVIEW_LINK_EXPIRATION_HOURS`: Document review link lifetime (default: 168)
/// - `MAIL_TRANSPORT`: `smtp`, `file` or `memory` (default: memory)
/// - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USERNAME`, `SMTP_PASSWORD`
/// - `MAIL_FROM`: Sender address
/// - `MAIL_SPOOL_DIR`: Directory for the file transport (default: ./mail)
/// - `ADMIN_EMAIL`: Recruitment office address receiving review requests
/// - `UPLOAD_DIR`: Document storage root (default: ./uploads)
/// - `UPLOAD_MAX_BYTES`: Upload size limit (default: 10 MiB)
/// - `REQUIRED_DOCUMENT_COUNT`: Documents needed to pass step 3 (default: 5)
/// - `EVALUATION_FEE_AMOUNT` / `EVALUATION_FEE_CURRENCY`: (default: 150 USD)
/// - `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD`: Optional first admin
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use hirepath_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use hirepath_shared::mail::SmtpSettings;
use hirepath_shared::workflow::progression::ProgressionPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub uploads: UploadConfig,
    pub workflow: WorkflowConfig,

    /// Admin account created on startup when missing
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub production: bool,

    /// Base URL of the web app, used in password reset links
    pub frontend_url: String,

    /// Public base URL of this API, used in document review links
    pub backend_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,

    pub expiration_hours: i64,
    pub review_link_expiration_hours: i64,
}

/// Which mail transport to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    Smtp,
    File,
    Memory,
}

impl FromStr for MailTransport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailTransport::Smtp),
            "file" => Ok(MailTransport::File),
            "memory" => Ok(MailTransport::Memory),
            other => anyhow::bail!("Unknown MAIL_TRANSPORT '{}' (expected smtp, file or memory)", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,

    #[serde(skip_serializing)]
    pub smtp_password: String,

    pub from: String,
    pub spool_dir: PathBuf,

    /// Recruitment office inbox
    pub admin_email: String,
}

impl MailConfig {
    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub required_documents: usize,
    pub evaluation_fee: Decimal,
    pub evaluation_fee_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,

    #[serde(skip_serializing)]
    pub password: String,
}

const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Reads `key` and parses it, falling back to `default` when unset
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a key/value map
    pub fn from_map(values: &HashMap<String, String>) -> anyhow::Result<Self> {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = get("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let port = parse_or(&get, "API_PORT", 8080u16)?;
        let backend_url = get("BACKEND_URL").unwrap_or_else(|| format!("http://localhost:{}", port));

        let transport = parse_or(&get, "MAIL_TRANSPORT", MailTransport::Memory)?;
        let mail = MailConfig {
            transport,
            smtp_host: get("SMTP_HOST").unwrap_or_default(),
            smtp_port: parse_or(&get, "SMTP_PORT", 587u16)?,
            smtp_username: get("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: get("SMTP_PASSWORD").unwrap_or_default(),
            from: get("MAIL_FROM").unwrap_or_else(|| "HirePath <noreply@hirepath.local>".to_string()),
            spool_dir: get("MAIL_SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./mail")),
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| "admin@hirepath.local".to_string()),
        };
        if transport == MailTransport::Smtp && mail.smtp_host.is_empty() {
            anyhow::bail!("SMTP_HOST is required when MAIL_TRANSPORT=smtp");
        }

        let required_documents = parse_or(&get, "REQUIRED_DOCUMENT_COUNT", 5usize)?;
        if required_documents == 0 {
            anyhow::bail!("REQUIRED_DOCUMENT_COUNT must be at least 1");
        }

        let evaluation_fee = parse_or(&get, "EVALUATION_FEE_AMOUNT", Decimal::from(150))?;
        if evaluation_fee <= Decimal::ZERO {
            anyhow::bail!("EVALUATION_FEE_AMOUNT must be positive");
        }

        let bootstrap_admin = match (get("BOOTSTRAP_ADMIN_EMAIL"), get("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                cors_origins,
                production: parse_or(&get, "PRODUCTION", false)?,
                frontend_url: get("FRONTEND_URL")
                    .unwrap_or_else(|| "http://localhost:3000".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                backend_url: backend_url.trim_end_matches('/').to_string(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10u32)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours: parse_or(&get, "JWT_EXPIRATION_HOURS", 24i64)?,
                review_link_expiration_hours: parse_or(&get, "REVIEW_LINK_EXPIRATION_HOURS", 168i64)?,
            },
            mail,
            uploads: UploadConfig {
                dir: get("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./uploads")),
                max_bytes: parse_or(&get, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            },
            workflow: WorkflowConfig {
                required_documents,
                evaluation_fee,
                evaluation_fee_currency: get("EVALUATION_FEE_CURRENCY")
                    .unwrap_or_else(|| "USD".to_string())
                    .trim()
                    .to_uppercase(),
            },
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Progression tunables for the workflow executor
    pub fn progression_policy(&self) -> ProgressionPolicy {
        ProgressionPolicy {
            required_documents: self.workflow.required_documents,
            evaluation_fee: self.workflow.evaluation_fee,
            evaluation_fee_currency: self.workflow.evaluation_fee_currency.clone(),
        }
    }
}
