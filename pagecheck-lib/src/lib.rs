//! Acceptance checks for a static HTML exercise page.
//!
//! The fixture is checked three ways: its parsed markup, the declarations of
//! its `<style>` block, and the computed styles a headless browser reports.
//! [`page_suite::page_check::run`] drives all of them from a [`config::CheckConfig`].

pub mod browser;
pub mod checks;
pub mod config;
pub mod dom;
pub mod error;
pub mod page_suite;
pub mod parser;
pub mod style;

pub use checks::{CheckFailure, CheckGroup, CheckOutcome};
pub use config::{BrowserOptions, CheckConfig, SuiteSelection};
pub use error::PageCheckError;
pub use page_suite::SuiteReport;
