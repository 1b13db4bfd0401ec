use async_trait::async_trait;

use super::types::{AccountSnapshot, BalanceEntry, WalletAddress};
use crate::error::DigestError;

#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Perp account state. `spot_balances` on the returned snapshot is left empty.
    async fn user_state(&self, wallet: &WalletAddress) -> Result<AccountSnapshot, DigestError>;

    async fn spot_balances(&self, wallet: &WalletAddress) -> Result<Vec<BalanceEntry>, DigestError>;
}
