//! Minimal HTML rendering for the report inspector.
//!
//! Pages are assembled from strings; every value that came from a client
//! passes through [`escape`] before it is interpolated.

use axum::http::StatusCode;
use bug_report_core::report::{BugReport, DeviceInfo, LogEntry, UserInfo};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:.4rem .6rem;text-align:left;vertical-align:top}\
th{background:#f4f4f4}\
.muted{color:#777}\
.level-error{color:#b00020}.level-warn{color:#a05a00}\
pre{white-space:pre-wrap;margin:0}\
img{max-width:360px;border:1px solid #ccc}";

/// Escape text for safe inclusion in HTML element content and attributes.
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// The report list. `reports` are rendered in the order given.
pub fn index_page(reports: &[BugReport]) -> String {
    let noun = if reports.len() == 1 { "report" } else { "reports" };
    let mut body = format!(
        "<h1>Bug Reports</h1>\n<p class=\"muted\">{} {noun}</p>\n",
        reports.len()
    );

    if reports.is_empty() {
        body.push_str("<p>No bug reports yet.</p>");
        return layout("Bug Reports", &body);
    }

    body.push_str(
        "<table>\n<tr><th>Submitted</th><th>Title</th><th>Route</th><th>Platform</th><th>App</th><th>Screenshot</th></tr>\n",
    );
    for report in reports {
        body.push_str(&format!(
            "<tr><td>{ts}</td><td><a href=\"/reports/{id}\">{title}</a><br><span class=\"muted\">{id}</span></td>\
             <td>{route}</td><td>{platform}</td><td>{version} ({build})</td><td>{shot}</td></tr>\n",
            ts = report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            id = escape(&report.id),
            title = escape(&report.title),
            route = escape(&report.current_route),
            platform = escape(&report.device_info.platform),
            version = escape(&report.device_info.app_version),
            build = escape(&report.device_info.build_number),
            shot = if report.has_screenshot() { "yes" } else { "" },
        ));
    }
    body.push_str("</table>");

    layout("Bug Reports", &body)
}

/// Everything known about one report.
pub fn detail_page(report: &BugReport) -> String {
    let mut body = format!(
        "<p><a href=\"/\">&larr; All reports</a></p>\n<h1>{title}</h1>\n\
         <p class=\"muted\">{id} &middot; {ts}</p>\n<h2>Description</h2>\n<pre>{description}</pre>\n",
        title = escape(&report.title),
        id = escape(&report.id),
        ts = report.timestamp.to_rfc3339(),
        description = escape(&report.description),
    );

    if let Some(steps) = &report.steps_to_reproduce {
        body.push_str(&format!(
            "<h2>Steps to reproduce</h2>\n<pre>{}</pre>\n",
            escape(steps)
        ));
    }

    body.push_str(&format!(
        "<h2>Route</h2>\n<p><code>{}</code></p>\n",
        escape(&report.current_route)
    ));
    if let Some(trace_id) = &report.trace_id {
        body.push_str(&format!(
            "<p>Trace ID: <code>{}</code></p>\n",
            escape(trace_id)
        ));
    }

    body.push_str("<h2>Navigation history</h2>\n");
    if report.navigation_history.is_empty() {
        body.push_str("<p class=\"muted\">None recorded.</p>\n");
    } else {
        body.push_str("<ol>\n");
        for route in &report.navigation_history {
            body.push_str(&format!("<li><code>{}</code></li>\n", escape(route)));
        }
        body.push_str("</ol>\n");
    }

    body.push_str(&device_section(&report.device_info));
    if let Some(user) = &report.user_info {
        body.push_str(&user_section(user));
    }

    if let Some(url) = &report.screenshot_url {
        body.push_str(&format!(
            "<h2>Screenshot</h2>\n<a href=\"{url}\"><img src=\"{url}\" alt=\"Screenshot\"></a>\n",
            url = escape(url),
        ));
    }

    body.push_str(&logs_section(&report.logs));

    layout(&report.title, &body)
}

/// A page explaining why a request failed.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{code} {reason}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Back to all reports</a></p>",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
    );
    layout("Error", &body)
}

fn device_section(device: &DeviceInfo) -> String {
    let mut rows = vec![
        ("Platform", device.platform.as_str()),
        ("OS", device.os.as_str()),
        ("OS version", device.os_version.as_str()),
        ("App version", device.app_version.as_str()),
        ("Build", device.build_number.as_str()),
    ];
    if let Some(model) = &device.device_model {
        rows.push(("Model", model.as_str()));
    }
    if let Some(manufacturer) = &device.manufacturer {
        rows.push(("Manufacturer", manufacturer.as_str()));
    }
    key_value_table("Device", &rows)
}

fn user_section(user: &UserInfo) -> String {
    let rows: Vec<(&str, &str)> = [
        ("User ID", user.user_id.as_deref()),
        ("Username", user.username.as_deref()),
        ("Email", user.email.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();
    key_value_table("User", &rows)
}

fn key_value_table(heading: &str, rows: &[(&str, &str)]) -> String {
    let mut out = format!("<h2>{}</h2>\n<table>\n", escape(heading));
    for (label, value) in rows {
        out.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            escape(label),
            escape(value)
        ));
    }
    out.push_str("</table>\n");
    out
}

fn logs_section(logs: &[LogEntry]) -> String {
    let mut out = format!("<h2>Logs ({})</h2>\n", logs.len());
    if logs.is_empty() {
        out.push_str("<p class=\"muted\">No logs attached.</p>\n");
        return out;
    }

    out.push_str("<table>\n<tr><th>Time</th><th>Level</th><th>Message</th><th>Context</th></tr>\n");
    for entry in logs {
        let context = entry
            .context
            .as_ref()
            .and_then(|c| serde_json::to_string_pretty(c).ok())
            .unwrap_or_default();
        out.push_str(&format!(
            "<tr><td>{ts}</td><td class=\"level-{level}\">{level}</td><td><pre>{message}</pre></td><td><pre>{context}</pre></td></tr>\n",
            ts = escape(&entry.timestamp),
            level = escape(&entry.level),
            message = escape(&entry.message),
            context = escape(&context),
        ));
    }
    out.push_str("</table>\n");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
