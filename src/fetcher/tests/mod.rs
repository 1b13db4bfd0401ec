use anyhow::Result;
use tracing::info;

use super::fetch_snapshot;
use super::hyperliquid::{decode_spot_balances, decode_user_state, HyperliquidProvider};
use super::traits::AccountProvider;
use super::types::{BalanceEntry, Side, WalletAddress};
use crate::config::ProviderConfig;
use crate::error::DigestError;
use crate::test_support::{
    closed_port, dec, init_logging, sample_snapshot, serve_once, wallet, FakeProvider, SpotOutcome,
};

fn local_provider(base_url: String) -> HyperliquidProvider {
    HyperliquidProvider::new(&ProviderConfig {
        base_url: Some(base_url),
        timeout_ms: 2_000,
        ..Default::default()
    })
    .unwrap()
}

const USER_STATE: &str = r#"{
    "marginSummary": {"accountValue": "1000.005", "totalNtlPos": "9000.0", "totalRawUsd": "1000.0", "totalMarginUsed": "10.0"},
    "crossMarginSummary": {"accountValue": "1000.005", "totalMarginUsed": "10.0"},
    "withdrawable": "500.0",
    "assetPositions": [
        {"type": "oneWay", "position": {
            "coin": "BTC", "szi": "1.5", "entryPx": "6000.0", "positionValue": "9000.0",
            "unrealizedPnl": "-50.0", "returnOnEquity": "-0.5", "liquidationPx": "8000.0",
            "marginUsed": "100.0", "leverage": {"type": "cross", "value": 10}
        }},
        {"type": "oneWay", "position": {
            "coin": "ETH", "szi": "-0.25", "positionValue": "700.0", "unrealizedPnl": "12.5",
            "liquidationPx": null, "marginUsed": "70.0", "leverage": {"value": 3}
        }}
    ],
    "time": 1760000000000
}"#;

#[test]
fn decodes_user_state() -> Result<()> {
    let snapshot = decode_user_state(USER_STATE)?;

    assert_eq!(snapshot.account_value, dec("1000.005"));
    assert_eq!(snapshot.withdrawable, dec("500"));
    assert_eq!(snapshot.total_margin_used, dec("10"));
    assert_eq!(snapshot.positions.len(), 2);

    let btc = &snapshot.positions[0];
    assert_eq!(btc.coin, "BTC");
    assert_eq!(btc.side(), Side::Long);
    assert_eq!(btc.leverage_type.as_deref(), Some("cross"));
    assert_eq!(btc.leverage_value, Some(dec("10")));
    assert_eq!(btc.liquidation_price, Some(dec("8000")));

    let eth = &snapshot.positions[1];
    assert_eq!(eth.side(), Side::Short);
    assert_eq!(eth.leverage_type, None);
    assert_eq!(eth.leverage_value, Some(dec("3")));
    assert_eq!(eth.liquidation_price, None);
    assert!(snapshot.spot_balances.is_empty());
    Ok(())
}

#[test]
fn missing_nested_fields_read_as_zero() -> Result<()> {
    let snapshot = decode_user_state(r#"{"assetPositions": [{"position": {"coin": "SOL"}}, {"type": "oneWay"}]}"#)?;

    assert_eq!(snapshot.account_value, dec("0"));
    assert_eq!(snapshot.withdrawable, dec("0"));
    assert_eq!(snapshot.total_margin_used, dec("0"));
    assert_eq!(snapshot.positions.len(), 1);
    assert_eq!(snapshot.positions[0].side(), Side::Flat);
    assert_eq!(snapshot.positions[0].leverage_value, None);
    Ok(())
}

#[test]
fn malformed_numbers_are_provider_errors() {
    let err = decode_user_state(r#"{"withdrawable": "lots"}"#).unwrap_err();
    assert!(matches!(err, DigestError::Provider(_)));

    let err = decode_user_state("<html>bad gateway</html>").unwrap_err();
    assert!(matches!(err, DigestError::Provider(_)));
}

#[test]
fn decodes_spot_balances_with_aliases() -> Result<()> {
    let body = r#"{"balances": [
        {"coin": "USDC", "token": 0, "hold": "0.0", "total": "0.0", "entryNtl": "0.0"},
        {"coin": "HYPE", "token": 150, "hold": "0.0", "total": "12.75", "entryNtl": "300.0"},
        {"asset": "PURR", "balance": 4000},
        {"name": "JEFF", "amount": "1e2"},
        {"coin": "NOAMOUNT"},
        {"total": "5.0"},
        {"coin": "GARBAGE", "total": "n/a"}
    ]}"#;

    let balances = decode_spot_balances(body)?;
    assert_eq!(
        balances,
        vec![
            BalanceEntry { asset: "HYPE".to_string(), amount: dec("12.75") },
            BalanceEntry { asset: "PURR".to_string(), amount: dec("4000") },
            BalanceEntry { asset: "JEFF".to_string(), amount: dec("100") },
        ]
    );
    Ok(())
}

#[test]
fn spot_response_without_balance_list_is_empty() -> Result<()> {
    assert!(decode_spot_balances(r#"{"balances": null}"#)?.is_empty());
    assert!(decode_spot_balances(r#"{}"#)?.is_empty());
    Ok(())
}

#[test]
fn wallet_address_is_validated_and_normalized() {
    let parsed = WalletAddress::parse(" 0xAbCdEf0123456789abcdef0123456789ABCDEF01 ").unwrap();
    assert_eq!(parsed.to_string(), "0xabcdef0123456789abcdef0123456789abcdef01");

    let bare = WalletAddress::parse("abcdef0123456789abcdef0123456789abcdef01").unwrap();
    assert_eq!(bare, parsed);

    assert!(matches!(WalletAddress::parse("0x1234"), Err(DigestError::Config(_))));
    assert!(matches!(
        WalletAddress::parse("0xzzcdef0123456789abcdef0123456789abcdef01"),
        Err(DigestError::Config(_))
    ));
}

#[test]
fn provider_targets_selected_network() -> Result<()> {
    let mainnet = HyperliquidProvider::new(&ProviderConfig::default())?;
    assert_eq!(mainnet.info_url(), "https://api.hyperliquid.xyz/info");

    let testnet = HyperliquidProvider::new(&ProviderConfig { testnet: true, ..Default::default() })?;
    assert_eq!(testnet.info_url(), "https://api.hyperliquid-testnet.xyz/info");

    let local = local_provider("http://127.0.0.1:3001/".to_string());
    assert_eq!(local.info_url(), "http://127.0.0.1:3001/info");
    Ok(())
}

#[tokio::test]
async fn provider_reads_user_state_over_http() -> Result<()> {
    init_logging();
    let provider = local_provider(serve_once("200 OK", USER_STATE).await);

    let snapshot = provider.user_state(&wallet()).await?;
    assert_eq!(snapshot.account_value, dec("1000.005"));
    assert_eq!(snapshot.positions.len(), 2);
    Ok(())
}

#[tokio::test]
async fn server_error_status_is_provider_error() {
    init_logging();
    let provider = local_provider(serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await);

    match provider.user_state(&wallet()).await {
        Err(DigestError::Provider(msg)) => assert!(msg.contains("500")),
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_provider_error() {
    let provider = local_provider(format!("http://127.0.0.1:{}", closed_port().await));

    let result = provider.user_state(&wallet()).await;
    assert!(matches!(result, Err(DigestError::Provider(_))));
}

#[tokio::test]
async fn unreachable_spot_endpoint_degrades_to_empty() -> Result<()> {
    init_logging();
    // the local endpoint answers the perp-state request only
    let provider = local_provider(serve_once("200 OK", USER_STATE).await);

    let snapshot = fetch_snapshot(&provider, &wallet()).await?;
    assert_eq!(snapshot.positions.len(), 2);
    assert!(snapshot.spot_balances.is_empty());
    Ok(())
}

#[tokio::test]
async fn snapshot_includes_spot_balances() -> Result<()> {
    init_logging();
    let provider = FakeProvider::serving(sample_snapshot());

    let snapshot = fetch_snapshot(&provider, &wallet()).await?;
    info!(positions = snapshot.positions.len(), "snapshot fetched");

    assert_eq!(snapshot, sample_snapshot());
    Ok(())
}

#[tokio::test]
async fn spot_provider_failure_degrades_to_empty() -> Result<()> {
    init_logging();
    let mut provider = FakeProvider::serving(sample_snapshot());
    provider.spot = SpotOutcome::ProviderFailure;

    let snapshot = fetch_snapshot(&provider, &wallet()).await?;
    assert!(snapshot.spot_balances.is_empty());
    assert_eq!(snapshot.positions.len(), 1);
    Ok(())
}

#[tokio::test]
async fn other_spot_errors_still_propagate() {
    let mut provider = FakeProvider::serving(sample_snapshot());
    provider.spot = SpotOutcome::ConfigFailure;

    let result = fetch_snapshot(&provider, &wallet()).await;
    assert!(matches!(result, Err(DigestError::Config(_))));
}

#[tokio::test]
async fn user_state_failure_is_fatal() {
    let provider = FakeProvider { snapshot: None, spot: SpotOutcome::Balances(Vec::new()) };

    let result = fetch_snapshot(&provider, &wallet()).await;
    assert!(matches!(result, Err(DigestError::Provider(_))));
}
