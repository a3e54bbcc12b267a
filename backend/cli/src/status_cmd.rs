//! CLI Status Command
//!
//! Fetches `/api/state` from a running dashboard and prints a summary.

use anyhow::{Context, Result};
use simdash_core::{RecordStatus, StateSnapshot};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Records shown in the summary, newest first.
const SHOWN_RECORDS: usize = 10;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/state");
    let response = match reqwest::get(&url).await {
        Ok(resp) => resp,
        Err(_) => {
            println!("Dashboard is not running on port {port}");
            return Ok(());
        }
    };
    let snapshot: StateSnapshot = response
        .error_for_status()
        .context("Dashboard returned an error")?
        .json()
        .await
        .context("Malformed state response")?;

    print!("{}", render(&snapshot));
    Ok(())
}

fn status_color(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Pending => YELLOW,
        RecordStatus::Success => GREEN,
        RecordStatus::Error => RED,
    }
}

pub fn render(snapshot: &StateSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}Simulator Automation Dashboard{RESET}\n\n"));
    out.push_str(&format!("  Uptime:      {:.0}s\n", snapshot.uptime));
    out.push_str(&format!("  Total calls: {}\n", snapshot.total_count));
    out.push_str(&format!(
        "  Recording:   {}\n",
        if snapshot.recording_active { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "  Screenshot:  {}\n",
        snapshot.last_screenshot_path.as_deref().unwrap_or("-")
    ));
    let device = snapshot
        .device_info
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("none");
    out.push_str(&format!("  Device:      {device}\n\n"));

    for record in snapshot.records.iter().rev().take(SHOWN_RECORDS) {
        let duration = record
            .duration_ms
            .map(|ms| format!("{ms:.0}ms"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {} {}{:<8}{RESET} {:<24} {}\n",
            record.time_label,
            status_color(record.status),
            record.status.to_string(),
            record.name,
            duration
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_summary() {
        let snapshot: StateSnapshot = serde_json::from_value(json!({
            "uptime": 12.4,
            "records": [{
                "id": 1,
                "createdAt": "2026-01-01T10:00:00Z",
                "timeLabel": "10:00:00",
                "name": "get_screenshot",
                "arguments": {},
                "status": "success",
                "result": "Screenshot saved: /tmp/a.png",
                "error": null,
                "durationMs": 42.0
            }],
            "deviceInfo": {"name": "iPhone 15"},
            "bridgeStatus": {},
            "lastScreenshotPath": "/tmp/a.png",
            "recordingActive": false,
            "totalCount": 1
        }))
        .unwrap();

        let text = render(&snapshot);
        assert!(text.contains("Total calls: 1"));
        assert!(text.contains("iPhone 15"));
        assert!(text.contains("get_screenshot"));
        assert!(text.contains("42ms"));
    }
}
