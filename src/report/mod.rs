pub mod format;
pub mod html;
pub mod text;
pub mod traits;


use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::DigestError;
use crate::fetcher::types::{AccountSnapshot, PositionEntry, Side, WalletAddress};
use format::{fmt_quantity, fmt_usd, leverage_label, liquidation_label};
pub use html::HtmlRenderer;
pub use text::TextRenderer;
pub use traits::ReportRenderer;

pub const DIGEST_TITLE: &str = "HyperDigest";

/// A normalized, display-ready view of an account snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestReport {
    pub wallet: String,
    pub account_value: String,
    pub withdrawable: String,
    pub total_margin_used: String,
    pub positions: Vec<PositionRow>,
    pub balances: Vec<BalanceRow>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub coin: String,
    pub side: Side,
    pub size: String,
    pub margin_used: String,
    pub position_value: String,
    pub unrealized_pnl: String,
    pub leverage: String,
    pub liquidation_price: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub asset: String,
    pub amount: String,
}

impl DigestReport {
    pub fn from_snapshot(
        wallet: &WalletAddress,
        snapshot: &AccountSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let positions = snapshot
            .positions
            .iter()
            .filter(|p| p.side() != Side::Flat)
            .map(PositionRow::from_entry)
            .collect();

        let mut balances: Vec<_> = snapshot
            .spot_balances
            .iter()
            .filter(|b| !b.amount.is_zero())
            .collect();
        // stable: equal amounts keep provider order
        balances.sort_by(|a, b| b.amount.cmp(&a.amount));

        Self {
            wallet: wallet.to_string(),
            account_value: fmt_usd(snapshot.account_value),
            withdrawable: fmt_usd(snapshot.withdrawable),
            total_margin_used: fmt_usd(snapshot.total_margin_used),
            positions,
            balances: balances
                .into_iter()
                .map(|b| BalanceRow {
                    asset: b.asset.clone(),
                    amount: fmt_quantity(b.amount),
                })
                .collect(),
            generated_at,
        }
    }

    pub fn subject(&self) -> String {
        format!("{} — {}", DIGEST_TITLE, self.wallet)
    }
}

impl PositionRow {
    fn from_entry(entry: &PositionEntry) -> Self {
        Self {
            coin: entry.coin.clone(),
            side: entry.side(),
            size: fmt_quantity(entry.signed_size.abs()),
            margin_used: fmt_usd(entry.margin_used),
            position_value: fmt_usd(entry.position_value),
            unrealized_pnl: fmt_usd(entry.unrealized_pnl),
            leverage: leverage_label(entry.leverage_type.as_deref(), entry.leverage_value),
            liquidation_price: liquidation_label(entry.liquidation_price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Html,
    PlainText,
}

/// The rendered email: subject line plus a body in one format.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDigest {
    pub subject: String,
    pub body: String,
    pub kind: BodyKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Html,
    Text,
}

impl ReportFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Html => Box::new(HtmlRenderer),
            ReportFormat::Text => Box::new(TextRenderer),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "text" | "txt" | "plain" => Ok(ReportFormat::Text),
            other => Err(DigestError::Config(format!(
                "unknown digest format {:?}, expected html or text",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Html => f.write_str("html"),
            ReportFormat::Text => f.write_str("text"),
        }
    }
}
