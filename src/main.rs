use anyhow::Result;
use hyper_digest::{DigestConfig, HyperDigest, HyperliquidProvider, SmtpMailer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = DigestConfig::from_env()?;
    let provider = HyperliquidProvider::new(&config.provider)?;
    let digest = HyperDigest::new(provider, config.format);

    let Some(delivery) = &config.delivery else {
        let rendered = digest.preview(&config.wallet_address).await?;
        info!(subject = %rendered.subject, "dry run, digest not sent");
        println!("{}", rendered.body);
        return Ok(());
    };

    let mailer = SmtpMailer::new(&delivery.smtp)?;
    digest
        .send(&config.wallet_address, &delivery.recipient_email, &mailer)
        .await?;

    Ok(())
}
