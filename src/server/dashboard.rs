//! HTML dashboard rendering

use crate::db::sqlite::format_timestamp;
use crate::services::DashboardView;
use std::fmt::Write;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn change_class(change: &str) -> &'static str {
    if change.starts_with('-') {
        "down"
    } else {
        "up"
    }
}

pub fn render_dashboard(view: &DashboardView, flash: Option<&str>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Crypto Tracker</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem; background: #0f172a; color: #e2e8f0; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #334155; text-align: left; }
a { color: #93c5fd; }
.up { color: #4ade80; }
.down { color: #f87171; }
.card { background: #1e293b; border-radius: 8px; padding: 1rem; margin-bottom: 1.5rem; }
.flash { background: #166534; padding: 0.6rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.muted { color: #94a3b8; }
</style>
</head>
<body>
<h1>Crypto Tracker</h1>
"#,
    );

    if let Some(message) = flash {
        let _ = writeln!(html, r#"<div class="flash">{}</div>"#, escape_html(message));
    }

    let _ = writeln!(
        html,
        r#"<div class="card"><div>{}</div><div>{} ({})</div><div class="muted">Last update: {} UTC &middot; <a href="/refresh">Refresh now</a></div></div>"#,
        escape_html(&view.current_date),
        escape_html(&view.current_time),
        escape_html(&view.timezone),
        escape_html(&view.last_update),
    );

    html.push_str("<div class=\"card\"><h2>Weather</h2>\n");
    match &view.weather {
        Some(weather) => {
            let _ = writeln!(
                html,
                "<p><strong>{}</strong>: {} &middot; {} &middot; Humidity {} &middot; Wind {}</p><p class=\"muted\">Updated {} UTC</p>",
                escape_html(&weather.city),
                escape_html(&weather.temperature),
                escape_html(&weather.description),
                escape_html(&weather.humidity),
                escape_html(&weather.wind_speed),
                format_timestamp(&weather.last_updated),
            );
        }
        None => html.push_str("<p class=\"muted\">Weather data unavailable</p>\n"),
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"card\"><h2>Prices</h2>\n");
    if view.prices.is_empty() {
        html.push_str("<p class=\"muted\">No price data yet</p>\n");
    } else {
        html.push_str(
            "<table><thead><tr><th>#</th><th>Name</th><th>Symbol</th><th>Price</th><th>24h</th><th>Market Cap</th><th>Volume (24h)</th></tr></thead><tbody>\n",
        );
        for (rank, price) in view.prices.iter().enumerate() {
            let _ = writeln!(
                html,
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td><td>{}</td><td>{}</td></tr>"#,
                rank + 1,
                escape_html(&price.name),
                escape_html(&price.symbol),
                escape_html(&price.price),
                change_class(&price.change_24h),
                escape_html(&price.change_24h),
                escape_html(&price.market_cap),
                escape_html(&price.volume_24h),
            );
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"card\"><h2>News</h2>\n");
    if view.news.is_empty() {
        html.push_str("<p class=\"muted\">No news yet</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in &view.news {
            let _ = writeln!(
                html,
                r#"<li><a href="{}" target="_blank" rel="noopener">{}</a> <span class="muted">{} &middot; {}</span></li>"#,
                escape_html(&item.link),
                escape_html(&item.title),
                escape_html(&item.source),
                format_timestamp(&item.published),
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n</body>\n</html>\n");

    html
}
