//! Catalog of named smoke checks against the vacancies endpoint
//!
//! Counts returned by the live API move between requests as vacancies are
//! posted and withdrawn, so `found` comparisons can flake. They are run
//! once and reported as-is.

use crate::client::VacancyQuery;
use crate::error::{ProbeError, Result};
use crate::expect::Expectation;

/// Name of the default check
pub const DEFAULT_CHECK: &str = "connectivity";

/// `found[greater] >= found[lesser]`, indexing into the check's queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundRelation {
    pub greater: usize,
    pub lesser: usize,
}

/// What a check sends and how it is judged
#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    /// One request judged by an expectation
    Single {
        query: VacancyQuery,
        expectation: Expectation,
    },
    /// Several 200 requests whose `found` counts must be ordered
    Compare {
        queries: Vec<VacancyQuery>,
        relations: Vec<FoundRelation>,
    },
}

/// A named smoke check
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: &'static str,
    pub group: &'static str,
    pub kind: CheckKind,
}

impl Check {
    fn single(name: &'static str, group: &'static str, query: VacancyQuery, expectation: Expectation) -> Self {
        Self {
            name,
            group,
            kind: CheckKind::Single { query, expectation },
        }
    }

    /// Two queries where the first must find at least as many as the second
    fn at_least(name: &'static str, group: &'static str, broader: VacancyQuery, narrower: VacancyQuery) -> Self {
        Self::compare(name, group, vec![broader, narrower], &[(0, 1)])
    }

    fn compare(
        name: &'static str,
        group: &'static str,
        queries: Vec<VacancyQuery>,
        relations: &[(usize, usize)],
    ) -> Self {
        Self {
            name,
            group,
            kind: CheckKind::Compare {
                queries,
                relations: relations
                    .iter()
                    .map(|&(greater, lesser)| FoundRelation { greater, lesser })
                    .collect(),
            },
        }
    }

    /// Number of requests this check issues
    pub fn request_count(&self) -> usize {
        match &self.kind {
            CheckKind::Single { .. } => 1,
            CheckKind::Compare { queries, .. } => queries.len(),
        }
    }
}

fn text(value: &str) -> VacancyQuery {
    VacancyQuery::text(value)
}

/// Every known check, default first
pub fn catalog() -> Vec<Check> {
    vec![
        Check::single(
            DEFAULT_CHECK,
            "smoke",
            text("test"),
            Expectation::ok().field_present("found").field_present("items"),
        ),
        // encoding
        Check::single("valid-text", "encoding", text("test"), Expectation::ok()),
        Check::single("null-byte", "encoding", text("\u{0}"), Expectation::ok()),
        Check::single("unicode", "encoding", text("ਣ"), Expectation::ok()),
        // headers
        Check::single(
            "invalid-auth",
            "headers",
            text("test").header("Authorization", "invalid"),
            Expectation::status(403),
        ),
        Check::single(
            "non-json-accept-ignored",
            "headers",
            text("test").header("Accept", "application/x-www-form-urlencoded"),
            Expectation::ok(),
        ),
        // params
        Check::single(
            "pagination",
            "params",
            text("test").param("page", 0).param("per_page", 1),
            Expectation::ok()
                .field_equals("per_page", 1)
                .items_len(1)
                .field_equals("page", 0),
        ),
        Check::single(
            "too-big-pagination",
            "params",
            text("test").param("page", 0).param("per_page", 1000),
            Expectation::status(400),
        ),
        Check::single(
            "too-deep-pagination",
            "params",
            text("test").param("page", 2000).param("per_page", 10),
            Expectation::status(400),
        ),
        // Default host first, then the custom host
        Check::compare(
            "host-does-not-reduce-results",
            "params",
            vec![text("test"), text("test").param("host", "headhunter.ge")],
            &[(1, 0)],
        ),
        // text-query
        Check::at_least(
            "fixed-word-order",
            "text-query",
            text("Продажа оборудования"),
            text("\"Продажа оборудования\""),
        ),
        Check::at_least("fixed-word-form", "text-query", text("Продажи"), text("!Продажи")),
        Check::at_least("wildcard", "text-query", text("Гео*"), text("Геолог")),
        Check::at_least(
            "synonyms",
            "text-query",
            text("pr-менеджер"),
            text("pr-менеджер AND NOT !pr-manager"),
        ),
        Check::at_least("or", "text-query", text("нефть OR бензин"), text("нефть")),
        Check::at_least(
            "and",
            "text-query",
            text("\"холодильное оборудование\""),
            text("\"холодильное оборудование\" AND \"торговое оборудование\""),
        ),
        Check::at_least("not", "text-query", text("cola"), text("cola NOT pepsi")),
        Check::compare(
            "complex-condition",
            "text-query",
            vec![
                text("продажи AND алкоголь"),
                text("sales AND alcohol"),
                text("продажи OR sales"),
                text("алкоголь OR alcohol"),
                text("(продажи OR sales) AND (алкоголь OR alcohol)"),
            ],
            &[(4, 0), (4, 1), (2, 4), (3, 4)],
        ),
        Check::at_least(
            "field-search",
            "text-query",
            text("python OR java"),
            text("NAME:(python or java)"),
        ),
    ]
}

/// Filter the catalog by check names and groups
///
/// With neither given, only the default check is selected. Names and
/// groups combine as a union, keeping catalog order.
pub fn select(names: &[String], groups: &[String]) -> Result<Vec<Check>> {
    let all = catalog();

    for name in names {
        if !all.iter().any(|c| c.name == name) {
            return Err(ProbeError::UnknownCheck(name.clone()));
        }
    }
    for group in groups {
        if !all.iter().any(|c| c.group == group) {
            return Err(ProbeError::UnknownCheck(format!("group {}", group)));
        }
    }

    if names.is_empty() && groups.is_empty() {
        return Ok(all.into_iter().filter(|c| c.name == DEFAULT_CHECK).collect());
    }

    Ok(all
        .into_iter()
        .filter(|c| {
            names.iter().any(|n| n == c.name) || groups.iter().any(|g| g == c.group)
        })
        .collect())
}
