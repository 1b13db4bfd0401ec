pub mod hyperliquid;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

use tracing::{info, warn};

use crate::error::DigestError;
use traits::AccountProvider;
use types::{AccountSnapshot, WalletAddress};

/// Fetches perp state and spot balances for `wallet`.
///
/// A failed perp-state call is fatal. A provider failure on the spot-balance
/// call degrades to an empty balance list; any other error kind still propagates.
pub async fn fetch_snapshot<P>(provider: &P, wallet: &WalletAddress) -> Result<AccountSnapshot, DigestError>
where
    P: AccountProvider + ?Sized,
{
    info!(%wallet, "fetching account state");
    let mut snapshot = provider.user_state(wallet).await?;

    snapshot.spot_balances = match provider.spot_balances(wallet).await {
        Ok(balances) => balances,
        Err(DigestError::Provider(reason)) => {
            warn!(%wallet, %reason, "spot balances unavailable, reporting none");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    Ok(snapshot)
}
