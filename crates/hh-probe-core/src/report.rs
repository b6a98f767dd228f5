//! Check results and report rendering

use serde::Serialize;

use crate::expect::{FailureKind, Mismatch};

/// Terminal outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed { kind: FailureKind, message: String },
}

impl From<Mismatch> for CheckOutcome {
    fn from(mismatch: Mismatch) -> Self {
        CheckOutcome::Failed {
            kind: mismatch.kind,
            message: mismatch.message,
        }
    }
}

/// Outcome of a named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub group: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    /// `found` per request, for comparison checks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub found: Vec<u64>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Passed
    }

    /// Failure kind, if the check failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            CheckOutcome::Passed => None,
            CheckOutcome::Failed { kind, .. } => Some(*kind),
        }
    }

    fn render_line(&self) -> String {
        match &self.outcome {
            CheckOutcome::Passed if self.found.is_empty() => format!("PASS {}", self.name),
            CheckOutcome::Passed => format!("PASS {} (found {:?})", self.name, self.found),
            CheckOutcome::Failed { kind, message } => {
                format!("FAIL {} [{}] {}", self.name, kind, message)
            }
        }
    }
}

/// Results of a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub results: Vec<CheckResult>,
}

impl Report {
    /// True when every check passed (and at least one ran)
    pub fn passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(CheckResult::passed)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// First failed check, in execution order
    pub fn first_failure(&self) -> Option<&CheckResult> {
        self.results.iter().find(|r| !r.passed())
    }

    /// Human-readable report, one line per check plus a summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            out.push_str(&result.render_line());
            out.push('\n');
        }
        out.push_str(&format!(
            "{} passed, {} failed\n",
            self.passed_count(),
            self.failed_count()
        ));
        out
    }

    /// JSON report
    pub fn render_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, outcome: CheckOutcome) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            group: "smoke".to_string(),
            outcome,
            found: Vec::new(),
        }
    }

    #[test]
    fn test_empty_report_does_not_pass() {
        assert!(!Report::default().passed());
    }

    #[test]
    fn test_render_text() {
        let report = Report {
            results: vec![
                result("connectivity", CheckOutcome::Passed),
                result(
                    "invalid-auth",
                    CheckOutcome::Failed {
                        kind: FailureKind::UnexpectedStatus,
                        message: "expected HTTP 403, got HTTP 200".to_string(),
                    },
                ),
            ],
        };

        assert!(!report.passed());
        assert_eq!(report.first_failure().unwrap().name, "invalid-auth");
        assert_eq!(
            report.render_text(),
            "PASS connectivity\n\
             FAIL invalid-auth [unexpected-status] expected HTTP 403, got HTTP 200\n\
             1 passed, 1 failed\n"
        );
    }

    #[test]
    fn test_render_json() {
        let mut passed = result("or", CheckOutcome::Passed);
        passed.found = vec![10, 7];
        let report = Report {
            results: vec![passed],
        };

        let value: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();
        assert_eq!(value["results"][0]["outcome"], "passed");
        assert_eq!(value["results"][0]["found"], serde_json::json!([10, 7]));
    }

    #[test]
    fn test_failed_json_carries_kind() {
        let report = Report {
            results: vec![result(
                "connectivity",
                CheckOutcome::Failed {
                    kind: FailureKind::AuthRejected,
                    message: "expected HTTP 200, got HTTP 403".to_string(),
                },
            )],
        };
        let value: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();
        assert_eq!(value["results"][0]["outcome"], "failed");
        assert_eq!(value["results"][0]["kind"], "auth-rejected");
    }
}
