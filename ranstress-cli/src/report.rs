//! JSON report persistence
//!
//! Writes the final report as `flood_results_<timestamp>.json` under
//! the configured output directory, in the shape the downstream
//! analysis scripts consume.

use ranstress_core::{AttackReport, Error, Result};
use std::path::{Path, PathBuf};

pub fn write_report(report: &AttackReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("flood_results_{timestamp}.json"));
    let json = serde_json::to_string_pretty(report).map_err(|e| Error::Report(e.to_string()))?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ranstress_core::{AttackConfig, AttackInfo, RunStats};

    #[test]
    fn test_write_report_roundtrip() {
        let config = AttackConfig::default();
        let stats = RunStats {
            total_sent: 10,
            total_responses: 8,
            timeouts: 2,
            errors: 0,
            connect_errors: 0,
            write_errors: 0,
            bytes_sent: 80,
            elapsed_secs: 1.0,
            messages_per_second: 10.0,
            response_rate: 80.0,
            avg_response_time_ms: 2.0,
        };
        let now = Utc::now();
        let report = AttackReport::new(
            AttackInfo::from_config(&config, "paging"),
            &stats,
            0,
            now,
            now,
        );

        let dir = std::env::temp_dir().join("ranstress-report-test");
        let path = write_report(&report, &dir).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["attack_info"]["message_type"], "paging");
        assert_eq!(value["results"]["total_messages"], 10);
        std::fs::remove_file(path).unwrap();
    }
}
