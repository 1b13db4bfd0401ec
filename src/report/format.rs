use rust_decimal::{Decimal, RoundingStrategy};

pub const NO_LEVERAGE: &str = "—";
pub const NO_LIQUIDATION: &str = "N/A";

/// Rounds to cents, half away from zero.
pub fn round_usd(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1234.50`, `-$50.00`. No thousands separators.
pub fn fmt_usd(amount: Decimal) -> String {
    let rounded = round_usd(amount);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Plain quantity without trailing zeros, e.g. `1.5`.
pub fn fmt_quantity(amount: Decimal) -> String {
    amount.normalize().to_string()
}

pub fn leverage_label(kind: Option<&str>, value: Option<Decimal>) -> String {
    match (kind, value) {
        (Some(kind), Some(value)) => format!("{} {}x", kind, fmt_quantity(value)),
        (None, Some(value)) => format!("{}x", fmt_quantity(value)),
        _ => NO_LEVERAGE.to_string(),
    }
}

pub fn liquidation_label(price: Option<Decimal>) -> String {
    price.map(fmt_usd).unwrap_or_else(|| NO_LIQUIDATION.to_string())
}
