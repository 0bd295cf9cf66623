//! Independent pass/fail checks over the fixture.
//!
//! A check is a plain function over its context (parsed page, style rules or
//! a rendered page). A failing check never affects the others.

pub mod markup;
pub mod rendered;
pub mod style_rules;

use log::{info, warn};
use std::fmt;
use thiserror::Error;

/// Why a single check did not pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    #[error("{message}{}", detail_suffix(.detail))]
    Assertion {
        message: &'static str,
        detail: Option<String>,
    },

    /// An element the check navigates through is absent.
    #[error("{message} (hiányzó elem: {element})")]
    MissingElement {
        element: &'static str,
        message: &'static str,
    },

    /// The check could not be evaluated at all (browser or CSS errors).
    #[error("{0}")]
    Error(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({})", detail),
        None => String::new(),
    }
}

impl CheckFailure {
    pub fn assertion(message: &'static str) -> Self {
        CheckFailure::Assertion {
            message,
            detail: None,
        }
    }

    /// Assertion failure that records what was actually found.
    pub fn mismatch(message: &'static str, actual: impl fmt::Debug) -> Self {
        CheckFailure::Assertion {
            message,
            detail: Some(format!("kapott: {:?}", actual)),
        }
    }

    pub fn missing(element: &'static str, message: &'static str) -> Self {
        CheckFailure::MissingElement { element, message }
    }

    /// The fixed message of the failure, without details.
    pub fn message(&self) -> &str {
        match self {
            CheckFailure::Assertion { message, .. } => message,
            CheckFailure::MissingElement { message, .. } => message,
            CheckFailure::Error(message) => message,
        }
    }
}

pub type CheckResult = Result<(), CheckFailure>;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: &'static str) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckFailure::assertion(message))
    }
}

/// A named check over context `C`.
pub struct Check<C: ?Sized> {
    pub name: &'static str,
    pub run: fn(&C) -> CheckResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckGroup {
    Markup,
    Style,
    Rendered,
}

impl fmt::Display for CheckGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckGroup::Markup => "markup",
            CheckGroup::Style => "style",
            CheckGroup::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub group: CheckGroup,
    pub name: &'static str,
    pub result: CheckResult,
}

impl CheckOutcome {
    pub fn new(group: CheckGroup, name: &'static str, result: CheckResult) -> Self {
        match &result {
            Ok(()) => info!("{}::{} passed", group, name),
            Err(failure) => warn!("{}::{} failed: {}", group, name, failure),
        }
        CheckOutcome {
            group,
            name,
            result,
        }
    }

    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "ok      {}::{}", self.group, self.name),
            Err(failure) => write!(f, "FAILED  {}::{}: {}", self.group, self.name, failure),
        }
    }
}

/// Runs every check in `checks` against `context`, in order.
pub fn run_checks<C: ?Sized>(
    group: CheckGroup,
    checks: &[Check<C>],
    context: &C,
) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|check| CheckOutcome::new(group, check.name, (check.run)(context)))
        .collect()
}
