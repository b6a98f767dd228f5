//! Success predicates over API responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiResponse;

/// Why a check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Connection, timeout or TLS failure
    Transport,
    /// The API rejected the credential (401/403)
    AuthRejected,
    /// Any other status than the expected one
    UnexpectedStatus,
    /// Body was not JSON or lacked an expected field
    MalformedBody,
    /// A field or comparison had the wrong value
    Assertion,
    /// The request could not be built (bad header override)
    InvalidRequest,
}

impl FailureKind {
    /// Short label used in text reports
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::AuthRejected => "auth-rejected",
            FailureKind::UnexpectedStatus => "unexpected-status",
            FailureKind::MalformedBody => "malformed-body",
            FailureKind::Assertion => "assertion",
            FailureKind::InvalidRequest => "invalid-request",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub kind: FailureKind,
    pub message: String,
}

impl Mismatch {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Assertion over a JSON response body
#[derive(Debug, Clone, PartialEq)]
pub enum BodyAssertion {
    /// Top-level field exists
    FieldPresent(String),
    /// Top-level field equals a value
    FieldEquals(String, Value),
    /// `items` array has exactly this many entries
    ItemsLen(usize),
}

/// Expected status plus body assertions
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub status: u16,
    pub body: Vec<BodyAssertion>,
}

impl Expectation {
    /// Expect the given status with no body assertions
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    /// Expect 200 OK
    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn field_present(mut self, name: &str) -> Self {
        self.body.push(BodyAssertion::FieldPresent(name.to_string()));
        self
    }

    pub fn field_equals(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.body
            .push(BodyAssertion::FieldEquals(name.to_string(), value.into()));
        self
    }

    pub fn items_len(mut self, len: usize) -> Self {
        self.body.push(BodyAssertion::ItemsLen(len));
        self
    }

    /// Check a response, returning the first mismatch
    pub fn evaluate(&self, response: &ApiResponse) -> Result<(), Mismatch> {
        if response.status != self.status {
            return Err(status_mismatch(self.status, response));
        }

        if self.body.is_empty() {
            return Ok(());
        }

        let body = response.json.as_ref().ok_or_else(|| {
            Mismatch::new(
                FailureKind::MalformedBody,
                format!("response body is not JSON: {}", snippet(&response.text)),
            )
        })?;

        for assertion in &self.body {
            check_assertion(assertion, body)?;
        }

        Ok(())
    }
}

fn check_assertion(assertion: &BodyAssertion, body: &Value) -> Result<(), Mismatch> {
    match assertion {
        BodyAssertion::FieldPresent(name) => {
            if body.get(name).is_none() {
                return Err(missing_field(name));
            }
        }
        BodyAssertion::FieldEquals(name, expected) => {
            let actual = body.get(name).ok_or_else(|| missing_field(name))?;
            if actual != expected {
                return Err(Mismatch::new(
                    FailureKind::Assertion,
                    format!("expected {} == {}, got {}", name, expected, actual),
                ));
            }
        }
        BodyAssertion::ItemsLen(len) => {
            let items = body
                .get("items")
                .and_then(Value::as_array)
                .ok_or_else(|| missing_field("items"))?;
            if items.len() != *len {
                return Err(Mismatch::new(
                    FailureKind::Assertion,
                    format!("expected {} items, got {}", len, items.len()),
                ));
            }
        }
    }
    Ok(())
}

/// Classify an unexpected status
pub(crate) fn status_mismatch(expected: u16, response: &ApiResponse) -> Mismatch {
    let kind = match response.status {
        401 | 403 => FailureKind::AuthRejected,
        _ => FailureKind::UnexpectedStatus,
    };
    Mismatch::new(
        kind,
        format!(
            "expected HTTP {}, got HTTP {}: {}",
            expected,
            response.status,
            snippet(&response.text)
        ),
    )
}

fn missing_field(name: &str) -> Mismatch {
    Mismatch::new(
        FailureKind::MalformedBody,
        format!("response body has no `{}` field", name),
    )
}

/// Body excerpt for diagnostics
pub(crate) fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
