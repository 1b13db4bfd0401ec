use std::fmt;

use primitive_types::H160;
use rust_decimal::Decimal;

use crate::error::DigestError;

/// A validated 20-byte account address, rendered as lowercase `0x…` hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAddress(H160);

impl WalletAddress {
    pub fn parse(raw: &str) -> Result<Self, DigestError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 {
            return Err(DigestError::Config(format!(
                "wallet address {:?} must be 40 hex digits",
                raw
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| DigestError::Config(format!("wallet address {:?}: {}", raw, e)))?;

        Ok(Self(H160::from_slice(&bytes)))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSnapshot {
    pub account_value: Decimal,
    pub withdrawable: Decimal,
    pub total_margin_used: Decimal,
    pub positions: Vec<PositionEntry>,
    pub spot_balances: Vec<BalanceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionEntry {
    pub coin: String,
    pub signed_size: Decimal,
    pub margin_used: Decimal,
    pub position_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub leverage_type: Option<String>,
    pub leverage_value: Option<Decimal>,
    pub liquidation_price: Option<Decimal>,
}

impl PositionEntry {
    pub fn side(&self) -> Side {
        Side::from_size(self.signed_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceEntry {
    pub asset: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
    Flat,
}

impl Side {
    pub fn from_size(size: Decimal) -> Self {
        if size.is_zero() {
            Side::Flat
        } else if size.is_sign_positive() {
            Side::Long
        } else {
            Side::Short
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Side::Long => "Long",
            Side::Short => "Short",
            Side::Flat => "Flat",
        };
        f.write_str(label)
    }
}
