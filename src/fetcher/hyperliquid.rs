use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::traits::AccountProvider;
use super::types::{AccountSnapshot, BalanceEntry, PositionEntry, WalletAddress};
use crate::config::ProviderConfig;
use crate::error::DigestError;

const MAINNET_API: &str = "https://api.hyperliquid.xyz";
const TESTNET_API: &str = "https://api.hyperliquid-testnet.xyz";

const SPOT_ASSET_KEYS: [&str; 3] = ["coin", "asset", "name"];
const SPOT_AMOUNT_KEYS: [&str; 3] = ["total", "balance", "amount"];

/// Reads account state from the Hyperliquid `/info` endpoint.
#[derive(Debug, Clone)]
pub struct HyperliquidProvider {
    client: reqwest::Client,
    info_url: String,
}

impl HyperliquidProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DigestError> {
        let base = match &config.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if config.testnet => TESTNET_API,
            None => MAINNET_API,
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DigestError::Provider(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            info_url: format!("{}/info", base),
        })
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    async fn post_info(&self, request: Value) -> Result<String, DigestError> {
        let response = self
            .client
            .post(&self.info_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DigestError::Provider(format!("request to {} failed: {}", self.info_url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DigestError::Provider(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(DigestError::Provider(format!(
                "{} returned {}: {}",
                self.info_url, status, body
            )));
        }

        debug!(url = %self.info_url, bytes = body.len(), "info response received");
        Ok(body)
    }
}

#[async_trait]
impl AccountProvider for HyperliquidProvider {
    async fn user_state(&self, wallet: &WalletAddress) -> Result<AccountSnapshot, DigestError> {
        let body = self
            .post_info(serde_json::json!({
                "type": "clearinghouseState",
                "user": wallet.to_string(),
            }))
            .await?;
        decode_user_state(&body)
    }

    async fn spot_balances(&self, wallet: &WalletAddress) -> Result<Vec<BalanceEntry>, DigestError> {
        let body = self
            .post_info(serde_json::json!({
                "type": "spotClearinghouseState",
                "user": wallet.to_string(),
            }))
            .await?;
        decode_spot_balances(&body)
    }
}

/// Decodes a `clearinghouseState` response. Missing objects and fields read as zero.
pub fn decode_user_state(body: &str) -> Result<AccountSnapshot, DigestError> {
    let state: ClearinghouseState = serde_json::from_str(body)
        .map_err(|e| DigestError::Provider(format!("invalid clearinghouseState response: {}", e)))?;

    let summary = state.margin_summary.unwrap_or_default();
    let positions = state
        .asset_positions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.position)
        .map(PositionDetail::into_entry)
        .collect();

    Ok(AccountSnapshot {
        account_value: value_or_zero(summary.account_value),
        withdrawable: value_or_zero(state.withdrawable),
        total_margin_used: value_or_zero(summary.total_margin_used),
        positions,
        spot_balances: Vec::new(),
    })
}

/// Decodes a `spotClearinghouseState` response into non-zero balances, in response order.
pub fn decode_spot_balances(body: &str) -> Result<Vec<BalanceEntry>, DigestError> {
    let response: Value = serde_json::from_str(body)
        .map_err(|e| DigestError::Provider(format!("invalid spotClearinghouseState response: {}", e)))?;

    let Some(raw_balances) = response.get("balances").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut balances = Vec::with_capacity(raw_balances.len());
    for raw in raw_balances {
        let Some(entry) = raw.as_object() else { continue };

        let asset = first_present(entry, &SPOT_ASSET_KEYS).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            _ => None,
        });
        let total = first_present(entry, &SPOT_AMOUNT_KEYS);
        let (Some(asset), Some(total)) = (asset, total) else { continue };

        let amount = match decimal_from_value(total) {
            Ok(amount) => amount,
            Err(e) => {
                warn!(asset = %asset, error = %e, "skipping spot balance with unreadable amount");
                continue;
            }
        };
        if amount.is_zero() {
            continue;
        }
        balances.push(BalanceEntry { asset, amount });
    }

    Ok(balances)
}

fn first_present<'a>(entry: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find(|v| !v.is_null())
}

fn decimal_from_value(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        other => Err(format!("expected a number, got {}", other)),
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| format!("{:?}: {}", raw, e))
}

fn value_or_zero(value: Option<WireDecimal>) -> Decimal {
    value.map(|v| v.0).unwrap_or(Decimal::ZERO)
}

/// A decimal that arrives either as a JSON string or a JSON number.
#[derive(Debug, Clone, Copy)]
struct WireDecimal(Decimal);

impl<'de> Deserialize<'de> for WireDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value(&value)
            .map(WireDecimal)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClearinghouseState {
    margin_summary: Option<MarginSummary>,
    withdrawable: Option<WireDecimal>,
    asset_positions: Option<Vec<AssetPosition>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarginSummary {
    account_value: Option<WireDecimal>,
    total_margin_used: Option<WireDecimal>,
}

#[derive(Debug, Deserialize)]
struct AssetPosition {
    position: Option<PositionDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionDetail {
    coin: Option<String>,
    szi: Option<WireDecimal>,
    margin_used: Option<WireDecimal>,
    position_value: Option<WireDecimal>,
    unrealized_pnl: Option<WireDecimal>,
    leverage: Option<WireLeverage>,
    liquidation_px: Option<WireDecimal>,
}

impl PositionDetail {
    fn into_entry(self) -> PositionEntry {
        let (leverage_type, leverage_value) = match self.leverage {
            Some(l) => (l.kind, l.value.map(|v| v.0)),
            None => (None, None),
        };

        PositionEntry {
            coin: self.coin.unwrap_or_default(),
            signed_size: value_or_zero(self.szi),
            margin_used: value_or_zero(self.margin_used),
            position_value: value_or_zero(self.position_value),
            unrealized_pnl: value_or_zero(self.unrealized_pnl),
            leverage_type,
            leverage_value,
            liquidation_price: self.liquidation_px.map(|v| v.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireLeverage {
    #[serde(rename = "type")]
    kind: Option<String>,
    value: Option<WireDecimal>,
}
