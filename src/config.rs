use std::env;
use std::fmt;

use crate::error::DigestError;
use crate::report::ReportFormat;

/// Settings for the account-state provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub testnet: bool,
    pub timeout_ms: u64,
    /// Overrides the mainnet/testnet API host, e.g. `http://127.0.0.1:3001`.
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            testnet: false,
            timeout_ms: 10_000,
            base_url: None,
        }
    }
}

/// SMTP connection parameters, passed explicitly to the mailer.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub domain: String,
    pub username: String,
    pub password: String,
    /// Sender address. Falls back to `username` when unset.
    pub from: Option<String>,
}

impl SmtpConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

/// Where and how the digest is mailed.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub recipient_email: String,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub wallet_address: String,
    pub format: ReportFormat,
    pub provider: ProviderConfig,
    pub dry_run: bool,
    /// `None` in a dry run; no mail settings are read then.
    pub delivery: Option<DeliveryConfig>,
}

impl DigestConfig {
    /// Loads the configuration from the process environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self, DigestError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `RECIPIENT_EMAIL` and the `SMTP_*` variables are only required when
    /// `DIGEST_DRY_RUN` is off.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DigestError::Config(format!("{} is not set", key)))
        };
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let format = match optional("DIGEST_FORMAT") {
            Some(raw) => raw.parse::<ReportFormat>()?,
            None => ReportFormat::default(),
        };

        let mut provider = ProviderConfig::default();
        if let Some(raw) = optional("HYPERLIQUID_TESTNET") {
            provider.testnet = parse_flag("HYPERLIQUID_TESTNET", &raw)?;
        }
        if let Some(raw) = optional("REQUEST_TIMEOUT_MS") {
            provider.timeout_ms = raw.parse::<u64>().map_err(|e| {
                DigestError::Config(format!("REQUEST_TIMEOUT_MS {:?}: {}", raw, e))
            })?;
        }
        provider.base_url = optional("HYPERLIQUID_API_URL");

        let dry_run = match optional("DIGEST_DRY_RUN") {
            Some(raw) => parse_flag("DIGEST_DRY_RUN", &raw)?,
            None => false,
        };

        let wallet_address = required("WALLET_ADDRESS")?;

        let delivery = if dry_run {
            None
        } else {
            let port = required("SMTP_PORT")?;
            let port = port
                .parse::<u16>()
                .map_err(|e| DigestError::Config(format!("SMTP_PORT {:?}: {}", port, e)))?;

            Some(DeliveryConfig {
                recipient_email: required("RECIPIENT_EMAIL")?,
                smtp: SmtpConfig {
                    host: required("SMTP_ADDRESS")?,
                    port,
                    domain: optional("SMTP_DOMAIN").unwrap_or_else(|| "localhost".to_string()),
                    username: required("SMTP_USERNAME")?,
                    password: required("SMTP_PASSWORD")?,
                    from: optional("SMTP_FROM"),
                },
            })
        };

        Ok(Self {
            wallet_address,
            format,
            provider,
            dry_run,
            delivery,
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, DigestError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DigestError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}
