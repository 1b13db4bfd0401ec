use chrono::Utc;
use tracing::info;

use crate::error::DigestError;
use crate::fetcher::fetch_snapshot;
use crate::fetcher::traits::AccountProvider;
use crate::fetcher::types::WalletAddress;
use crate::notifier::DigestMailer;
use crate::report::{DigestReport, RenderedDigest, ReportFormat};

/// Fetch, format and send a digest for one wallet.
pub struct HyperDigest<P> {
    provider: P,
    format: ReportFormat,
}

impl<P: AccountProvider> HyperDigest<P> {
    pub fn new(provider: P, format: ReportFormat) -> Self {
        Self { provider, format }
    }

    /// Builds and renders the digest without sending it.
    pub async fn preview(&self, wallet_address: &str) -> Result<RenderedDigest, DigestError> {
        let wallet = WalletAddress::parse(wallet_address)?;
        let snapshot = fetch_snapshot(&self.provider, &wallet).await?;

        let report = DigestReport::from_snapshot(&wallet, &snapshot, Utc::now());
        info!(
            %wallet,
            positions = report.positions.len(),
            balances = report.balances.len(),
            format = %self.format,
            "digest report built"
        );

        Ok(self.format.renderer().render(&report))
    }

    pub async fn send<M>(
        &self,
        wallet_address: &str,
        recipient: &str,
        mailer: &M,
    ) -> Result<RenderedDigest, DigestError>
    where
        M: DigestMailer + ?Sized,
    {
        let digest = self.preview(wallet_address).await?;
        mailer.deliver(recipient, &digest).await?;
        Ok(digest)
    }
}
