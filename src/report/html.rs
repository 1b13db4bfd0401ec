use super::traits::ReportRenderer;
use super::{BodyKind, DigestReport, PositionRow, DIGEST_TITLE};

const STYLE: &str = "body{font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial,sans-serif;color:#111;margin:0;padding:24px;background:#fafafa} \
h1{font-size:20px;margin:0 0 16px} \
h2{font-size:16px;margin:24px 0 8px} \
table{border-collapse:collapse;width:100%;background:#fff} \
th,td{border:1px solid #e5e7eb;padding:8px 10px;font-size:13px} \
th{background:#f3f4f6;text-align:left} \
.muted{color:#6b7280} \
.kpi{display:flex;gap:16px;flex-wrap:wrap;margin:8px 0 16px} \
.kpi div{background:#fff;border:1px solid #e5e7eb;border-radius:6px;padding:10px 12px;min-width:160px} \
.right{text-align:right}";

const POSITION_HEADER: &str = "<thead><tr><th>Asset</th><th>Side</th><th class=\"right\">Size</th>\
<th class=\"right\">Margin Used</th><th class=\"right\">Position Value</th>\
<th class=\"right\">Unrealized PnL</th><th>Leverage</th><th class=\"right\">Liq Px</th></tr></thead>";

/// Self-contained HTML document with inline styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn kind(&self) -> BodyKind {
        BodyKind::Html
    }

    fn render_body(&self, report: &DigestReport) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("<!DOCTYPE html>".to_string());
        lines.push("<html>".to_string());
        lines.push("<head>".to_string());
        lines.push("  <meta charset=\"utf-8\">".to_string());
        lines.push("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string());
        lines.push(format!("  <title>{}</title>", escape(&report.subject())));
        lines.push(format!("  <style>{}</style>", STYLE));
        lines.push("</head>".to_string());
        lines.push("<body>".to_string());
        lines.push(format!("  <h1>{}</h1>", escape(&report.subject())));

        lines.push("  <div class=\"kpi\">".to_string());
        for (label, value) in [
            ("Account Value", &report.account_value),
            ("Withdrawable", &report.withdrawable),
            ("Total Margin Used", &report.total_margin_used),
        ] {
            lines.push(format!(
                "    <div><div class=\"muted\">{}</div><div><strong>{}</strong></div></div>",
                label, value
            ));
        }
        lines.push("  </div>".to_string());

        lines.push("  <h2>Open Perp Positions</h2>".to_string());
        if report.positions.is_empty() {
            lines.push("  <div class=\"muted\">No open perp positions.</div>".to_string());
        } else {
            lines.push("  <table>".to_string());
            lines.push(format!("    {}", POSITION_HEADER));
            lines.push("    <tbody>".to_string());
            lines.extend(report.positions.iter().map(position_row));
            lines.push("    </tbody>".to_string());
            lines.push("  </table>".to_string());
        }

        lines.push("  <h2>Spot Balances</h2>".to_string());
        if report.balances.is_empty() {
            lines.push("  <div class=\"muted\">No spot balances found.</div>".to_string());
        } else {
            lines.push("  <table>".to_string());
            lines.push("    <thead><tr><th>Asset</th><th class=\"right\">Amount</th></tr></thead>".to_string());
            lines.push("    <tbody>".to_string());
            for balance in &report.balances {
                lines.push(format!(
                    "      <tr><td>{}</td><td class=\"right\">{}</td></tr>",
                    escape(&balance.asset),
                    balance.amount
                ));
            }
            lines.push("    </tbody>".to_string());
            lines.push("  </table>".to_string());
        }

        lines.push(format!(
            "  <div class=\"muted\" style=\"margin-top:24px\">Generated by {} at {}</div>",
            DIGEST_TITLE,
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        lines.push("</body>".to_string());
        lines.push("</html>".to_string());

        lines.join("\n")
    }
}

fn position_row(row: &PositionRow) -> String {
    let mut out = String::from("      <tr>");
    out.push_str(&format!("<td>{}</td>", escape(&row.coin)));
    out.push_str(&format!("<td>{}</td>", row.side));
    out.push_str(&format!("<td class=\"right\">{}</td>", row.size));
    out.push_str(&format!("<td class=\"right\">{}</td>", row.margin_used));
    out.push_str(&format!("<td class=\"right\">{}</td>", row.position_value));
    out.push_str(&format!("<td class=\"right\">{}</td>", row.unrealized_pnl));
    out.push_str(&format!("<td>{}</td>", escape(&row.leverage)));
    out.push_str(&format!("<td class=\"right\">{}</td>", row.liquidation_price));
    out.push_str("</tr>");
    out
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
