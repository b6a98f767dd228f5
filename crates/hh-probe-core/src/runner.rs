//! Sequential check runner

use tracing::{info, warn};

use crate::checks::{Check, CheckKind, FoundRelation};
use crate::client::{HhClient, VacancyQuery};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::expect::{status_mismatch, snippet, FailureKind, Mismatch};
use crate::report::{CheckOutcome, CheckResult, Report};

/// Runs checks one after another against the API
pub struct Runner {
    client: HhClient,
    fail_fast: bool,
}

impl Runner {
    /// Create a runner for the given configuration
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        Ok(Self {
            client: HhClient::new(config)?,
            fail_fast: false,
        })
    }

    /// Stop after the first failed check
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run checks in order and collect a report
    pub async fn run(&self, checks: &[Check]) -> Report {
        info!(
            "Running {} check(s) against {}",
            checks.len(),
            self.client.vacancies_url()
        );

        let mut report = Report::default();
        for check in checks {
            let result = self.run_check(check).await;
            let stop = self.fail_fast && !result.passed();
            report.results.push(result);
            if stop {
                warn!("Stopping after first failure");
                break;
            }
        }
        report
    }

    /// Run a single check
    pub async fn run_check(&self, check: &Check) -> CheckResult {
        let (outcome, found) = match &check.kind {
            CheckKind::Single { query, expectation } => {
                let outcome = match self.client.vacancies(query).await {
                    Ok(response) => match expectation.evaluate(&response) {
                        Ok(()) => CheckOutcome::Passed,
                        Err(mismatch) => mismatch.into(),
                    },
                    Err(err) => transport_failure(err),
                };
                (outcome, Vec::new())
            }
            CheckKind::Compare { queries, relations } => {
                match self.collect_found(queries).await {
                    Ok(found) => {
                        let outcome = match check_relations(queries, relations, &found) {
                            Ok(()) => CheckOutcome::Passed,
                            Err(mismatch) => mismatch.into(),
                        };
                        (outcome, found)
                    }
                    Err(outcome) => (outcome, Vec::new()),
                }
            }
        };

        match &outcome {
            CheckOutcome::Passed => info!("PASS {}", check.name),
            CheckOutcome::Failed { kind, message } => {
                warn!("FAIL {} [{}] {}", check.name, kind, message)
            }
        }

        CheckResult {
            name: check.name.to_string(),
            group: check.group.to_string(),
            outcome,
            found,
        }
    }

    /// `found` for each query, which must all answer 200
    async fn collect_found(&self, queries: &[VacancyQuery]) -> std::result::Result<Vec<u64>, CheckOutcome> {
        let mut found = Vec::with_capacity(queries.len());
        for query in queries {
            let response = self
                .client
                .vacancies(query)
                .await
                .map_err(transport_failure)?;

            if response.status != 200 {
                return Err(status_mismatch(200, &response).into());
            }

            let count = response.found().ok_or_else(|| {
                CheckOutcome::from(Mismatch::new(
                    FailureKind::MalformedBody,
                    format!(
                        "response for {:?} has no numeric `found`: {}",
                        query.text,
                        snippet(&response.text)
                    ),
                ))
            })?;
            found.push(count);
        }
        Ok(found)
    }
}

fn check_relations(
    queries: &[VacancyQuery],
    relations: &[FoundRelation],
    found: &[u64],
) -> std::result::Result<(), Mismatch> {
    for relation in relations {
        let greater = found[relation.greater];
        let lesser = found[relation.lesser];
        if greater < lesser {
            return Err(Mismatch::new(
                FailureKind::Assertion,
                format!(
                    "expected found({:?}) = {} >= found({:?}) = {}",
                    queries[relation.greater].text, greater, queries[relation.lesser].text, lesser
                ),
            ));
        }
    }
    Ok(())
}

fn transport_failure(err: ProbeError) -> CheckOutcome {
    let kind = if err.is_config() {
        FailureKind::InvalidRequest
    } else {
        FailureKind::Transport
    };
    CheckOutcome::Failed {
        kind,
        message: err.to_string(),
    }
}
