//! Console reporter: plain listing grouped by entity.

use super::{AuditReport, Reporter};
use crate::audit::Severity;

pub struct ConsoleReporter {
    pub use_color: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::DccAction => "\x1b[35m",    // magenta
            Severity::Error => "\x1b[31m",        // red
            Severity::NotCompliant => "\x1b[33m", // yellow
            Severity::Warning => "\x1b[36m",      // cyan
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, report: &AuditReport) -> Result<String, String> {
        let mut output = String::new();

        for entity in &report.entities {
            output.push_str(&format!("{} ({} findings)\n", entity.id, entity.total()));
            // Most severe first.
            for (severity, findings) in entity.findings.iter().rev() {
                let cs = self.color_start(*severity);
                let ce = self.color_end();
                for finding in findings {
                    output.push_str(&format!(
                        "  {cs}{severity}{ce} {}: {}\n",
                        finding.code, finding.detail
                    ));
                }
            }
            output.push('\n');
        }

        let breakdown: Vec<String> = Severity::ALL
            .iter()
            .rev()
            .map(|s| format!("{} {s}", report.count(*s)))
            .collect();
        output.push_str(&format!(
            "--- Summary: {} entities audited, {} with findings ({}) ---\n",
            report.evaluated,
            report.entities.len(),
            breakdown.join(", ")
        ));
        Ok(output)
    }
}
