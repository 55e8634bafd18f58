//! JSON output for validation reports.
//!
//! Human output is written by [`Reporter::report`](crate::Reporter::report).
//! JSON output always carries the full report.

use std::io::Write;

use crate::report::ValidationReport;

/// Format a `ValidationReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{Finding, Location};
    use std::path::Path;

    fn sample_report() -> ValidationReport {
        ValidationReport::new(
            3,
            2,
            vec![
                Finding::new(None, "Missing required file ./LICENSE.md"),
                Finding::new(
                    Some(Location::at_line(Path::new("./setup.md"), 12)),
                    "Unknown or missing codeblock type language-python",
                ),
            ],
        )
    }

    #[test]
    fn test_write_json_contract() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["documents_found"], 3);
        assert_eq!(json["documents_checked"], 2);
        assert_eq!(json["ok"], false);
        assert!(json["findings"][0]["location"].is_null());
        assert_eq!(json["findings"][1]["location"]["line"], 12);
    }
}
