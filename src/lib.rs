pub mod config;
pub mod digest;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod report;


pub use config::{DeliveryConfig, DigestConfig, ProviderConfig, SmtpConfig};
pub use digest::HyperDigest;
pub use error::DigestError;
pub use fetcher::hyperliquid::HyperliquidProvider;
pub use notifier::{DigestMailer, SmtpMailer};
pub use report::ReportFormat;
