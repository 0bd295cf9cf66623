use crate::browser::LazySession;
use crate::checks::{self, markup, rendered, style_rules, CheckFailure, CheckGroup, CheckOutcome};
use crate::config::{CheckConfig, SuiteSelection};
use crate::error::{PageCheckError, Result};
use crate::parser::page_html::read_fixture;
use crate::style::style_block::{self, CssMode};
use std::fmt;

/// Outcomes of every check that ran, in execution order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SuiteReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn outcome(&self, group: CheckGroup, name: &str) -> Option<&CheckOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.group == group && o.name == name)
    }

    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = CheckOutcome>) {
        self.outcomes.extend(outcomes);
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        write!(
            f,
            "{} passed; {} failed",
            self.passed_count(),
            self.failed_count()
        )
    }
}

pub mod page_check {
    use super::*;
    use log::info;

    /// Runs the selected groups against the configured fixture.
    ///
    /// An unreadable fixture aborts the whole run; everything else is
    /// reported per check.
    pub fn run(config: &CheckConfig) -> Result<SuiteReport> {
        let html = read_fixture(&config.fixture)?;
        info!("checking {}", config.fixture.display());

        let mut report = run_static(&html, config.suites, config.css_mode);
        if config.suites.includes(CheckGroup::Rendered) {
            let mut session = LazySession::new(config.browser.clone(), &config.fixture);
            report.extend(run_rendered(&mut session));
            session.release();
        }
        Ok(report)
    }

    /// Markup and style block groups over already-read HTML.
    pub fn run_static(html: &str, suites: SuiteSelection, css_mode: CssMode) -> SuiteReport {
        let mut report = SuiteReport::default();
        if !suites.markup && !suites.style {
            return report;
        }

        let page = markup::ParsedPage::parse(html);
        if suites.includes(CheckGroup::Markup) {
            report.extend(checks::run_checks(
                CheckGroup::Markup,
                markup::CHECKS,
                &page,
            ));
        }
        if suites.includes(CheckGroup::Style) {
            match style_block::style_rules(&page.document, css_mode) {
                Ok(rules) => report.extend(checks::run_checks(
                    CheckGroup::Style,
                    style_rules::CHECKS,
                    &rules,
                )),
                Err(err) => {
                    let err = PageCheckError::from(err);
                    report.extend(style_rules::CHECKS.iter().map(|check| {
                        CheckOutcome::new(
                            CheckGroup::Style,
                            check.name,
                            Err(CheckFailure::Error(err.to_string())),
                        )
                    }))
                }
            }
        }
        report
    }

    /// Rendered group. The browser starts with the first check; if it cannot
    /// start, every check fails with the launch error.
    pub fn run_rendered(session: &mut LazySession) -> Vec<CheckOutcome> {
        rendered::CHECKS
            .iter()
            .map(|check| {
                let result = match session.acquire() {
                    Ok(browser) => (check.run)(browser),
                    Err(message) => Err(CheckFailure::Error(message)),
                };
                CheckOutcome::new(CheckGroup::Rendered, check.name, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::page_check::*;
    use super::*;
    use crate::config::BrowserOptions;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const FIXTURE: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
.container { margin: 5%; background-color: cyan; padding: 15px; }
aside { width: 95px; height: 95px; font-size: 14px; background-color: white;
        padding: 10px; float: left; margin-right: 10px; border-right: 6px solid goldenrod; }
</style>
</head>
<body>
<div class="container">
  <h1>Lorem ipsum dolor sit amet</h1>
  <h3>Dolor sit amet</h3>
  <aside>Lorem ipsum dolor sit amet consectetur adipiscing elit sed do</aside>
  <p>Lorem ipsum <b>dolor</b> sit amet.</p>
</div>
</body>
</html>"#;

    #[test]
    fn static_suite_passes_on_fixture() {
        let report = run_static(FIXTURE, SuiteSelection::STATIC, CssMode::Lenient);
        assert!(report.is_success(), "{}", report);
        assert_eq!(report.outcomes.len(), 10);
        assert!(report.to_string().ends_with("10 passed; 0 failed"));
    }

    #[test]
    fn missing_style_block_fails_style_checks_only() {
        let html = FIXTURE.replace("<style>", "<!--").replace("</style>", "-->");
        let report = run_static(&html, SuiteSelection::STATIC, CssMode::Lenient);
        let failed: Vec<(&str, &str)> = report
            .failures()
            .map(|o| {
                let message = o.result.as_ref().err().map(CheckFailure::message).unwrap_or("");
                (o.name, message)
            })
            .collect();
        assert_eq!(
            failed,
            vec![
                ("container_styles", "A .container osztály nem szerepel a CSS-ben!"),
                ("aside_styles", "Az aside elem nem szerepel a CSS-ben!"),
            ]
        );
    }

    #[test]
    fn strict_mode_error_fails_each_style_check() {
        let html = FIXTURE.replace("padding: 15px;", "padding 15px;");
        let lenient = run_static(&html, SuiteSelection::only(CheckGroup::Style), CssMode::Lenient);
        assert_eq!(
            lenient
                .outcome(CheckGroup::Style, "container_styles")
                .and_then(|o| o.result.clone().err())
                .map(|f| f.message().to_string()),
            Some("A .container belső margója nem megfelelő!".to_string())
        );

        let strict = run_static(&html, SuiteSelection::only(CheckGroup::Style), CssMode::Strict);
        assert_eq!(strict.failed_count(), 2);
        for outcome in strict.failures() {
            let failure = outcome.result.clone().expect_err("strict failure");
            assert!(matches!(failure, CheckFailure::Error(ref m) if m.contains("padding 15px")));
        }
    }

    #[test]
    fn selection_limits_groups() {
        let report = run_static(FIXTURE, SuiteSelection::only(CheckGroup::Markup), CssMode::Lenient);
        assert!(report.outcomes.iter().all(|o| o.group == CheckGroup::Markup));
        let report = run_static(FIXTURE, SuiteSelection::only(CheckGroup::Rendered), CssMode::Lenient);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn rendered_group_reports_launch_failure_per_check() {
        let options = BrowserOptions {
            chrome_path: Some(PathBuf::from("/no/such/chrome")),
            ..BrowserOptions::default()
        };
        let mut session = LazySession::new(options, "/no/such/index.html");
        let outcomes = run_rendered(&mut session);
        assert_eq!(outcomes.len(), rendered::CHECKS.len());
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(CheckFailure::Error(_)))));
    }

    #[test]
    fn unreadable_fixture_aborts_run() {
        let config = CheckConfig {
            fixture: PathBuf::from("/no/such/index.html"),
            ..CheckConfig::default()
        };
        assert!(matches!(
            run(&config),
            Err(crate::error::PageCheckError::Io { .. })
        ));
    }
}
