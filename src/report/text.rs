use super::traits::ReportRenderer;
use super::{BodyKind, DigestReport, DIGEST_TITLE};

/// Plain-text digest: KPI lines, then one line per position and per balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn kind(&self) -> BodyKind {
        BodyKind::PlainText
    }

    fn render_body(&self, report: &DigestReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", report.subject()));
        output.push_str(&format!("Account Value:     {:>16}\n", report.account_value));
        output.push_str(&format!("Withdrawable:      {:>16}\n", report.withdrawable));
        output.push_str(&format!("Total Margin Used: {:>16}\n", report.total_margin_used));

        output.push_str("\nOpen Perp Positions\n");
        if report.positions.is_empty() {
            output.push_str("  No open perp positions.\n");
        }
        for p in &report.positions {
            output.push_str(&format!(
                "  {} {} {} | margin {} | value {} | uPnL {} | {} | liq {}\n",
                p.coin,
                p.side,
                p.size,
                p.margin_used,
                p.position_value,
                p.unrealized_pnl,
                p.leverage,
                p.liquidation_price
            ));
        }

        output.push_str("\nSpot Balances\n");
        if report.balances.is_empty() {
            output.push_str("  No spot balances found.\n");
        }
        for b in &report.balances {
            output.push_str(&format!("  {} {}\n", b.asset, b.amount));
        }

        output.push_str(&format!(
            "\nGenerated by {} at {}\n",
            DIGEST_TITLE,
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        output
    }
}
