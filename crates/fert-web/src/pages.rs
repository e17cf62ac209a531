use fert_core::metrics::display_amount;
use fert_core::{DerivedMetrics, OutputConfig, TokenRecord};

use crate::canvas::escape;

pub const INDEX_PATH: &str = "index.html";
const SOURCE_URL: &str = "https://github.com/BeanstalkFarms/Fertilizer-Metadata";
const FOOTNOTE: &str = "Fertilizer is an ERC-1155 token. Its metadata will be updated to reflect the number of Beans remaining to be minted per Fertilizer (BPF).";

fn updated_at(metrics: &DerivedMetrics) -> String {
    metrics
        .observed_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// Human readable page for one token.
pub fn render_token_page(
    token: &TokenRecord,
    metrics: &DerivedMetrics,
    output_id: &str,
    config: &OutputConfig,
) -> String {
    let uri = escape(&format!("{}/{output_id}", config.base_url));
    let marketplace = escape(&format!("{}/{output_id}", config.marketplace_url));
    let total = display_amount(token.id.saturating_sub(token.start_progress));
    format!(
        r#"<html>
  <head><title>Fertilizer {id}</title></head>
  <body>
    <h1>Fertilizer {id}</h1>
    <p>Showing currently minted Fertilizer tokens. For more information, see <a href="https://bean.money">bean.money</a>.</p>
    <ul>
      <li>Season minted: {season}</li>
      <li>Humidity: {humidity:.2}%</li>
      <li>BPF Remaining: {remaining:.2} of {total:.2} ({pct:.2}%)</li>
      <li>Updated At: {updated}</li>
    </ul>
    <p>
      Metadata: <a href="{uri}.json">{uri}.json</a><br/>
      Image: <a href="{uri}.svg">{uri}.svg</a><br/>
      OpenSea: <a href="{marketplace}" target="_blank" rel="noreferrer">{id}</a>
    </p>
    <p style="font-size: 12px; opacity: 0.7;">{footnote} <a href="{source}" target="_blank" rel="noreferrer">View source</a> &middot; <a href="{index}">Home</a></p>
  </body>
</html>"#,
        id = output_id,
        season = token.season,
        humidity = token.humidity * 100.0,
        remaining = display_amount(metrics.remaining),
        total = total,
        pct = metrics.percent(),
        updated = updated_at(metrics),
        uri = uri,
        marketplace = marketplace,
        footnote = FOOTNOTE,
        source = SOURCE_URL,
        index = INDEX_PATH,
    )
}

/// Site index linking every token in the given order.
///
/// Links point at the token page when pages are emitted, otherwise at the
/// metadata document.
pub fn render_index(tokens: &[TokenRecord], config: &OutputConfig) -> String {
    let extension = if config.emit_pages { "html" } else { "json" };
    let mut items = String::new();
    for token in tokens {
        let output_id = config.id_encoding.encode(token.id);
        items.push_str(&format!(
            "\n      <li><a href=\"{output_id}.{extension}\">{output_id}</a></li>"
        ));
    }
    format!(
        r#"<html>
  <head><title>Fertilizer</title></head>
  <body>
    <h1>Fertilizer</h1>
    <p>Showing currently minted Fertilizer tokens. For more information, see <a href="https://bean.money">bean.money</a>.</p>
    <ul>{items}
    </ul>
    <p style="font-size: 12px; opacity: 0.7;">{footnote} <a href="{source}" target="_blank" rel="noreferrer">View source</a></p>
  </body>
</html>"#,
        items = items,
        footnote = FOOTNOTE,
        source = SOURCE_URL,
    )
}
