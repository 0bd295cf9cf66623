//! Checks on the authored declarations of the `<style>` block.

use super::{Check, CheckFailure, CheckResult};
use crate::style::owned_css::StyleRules;

/// One required `property: value` pair.
#[derive(Debug, Clone, Copy)]
pub struct StyleExpectation {
    pub property: &'static str,
    pub expected: &'static str,
    pub message: &'static str,
}

/// Required declarations of one selector.
#[derive(Debug, Clone, Copy)]
pub struct SelectorExpectations {
    pub selector: &'static str,
    pub missing_message: &'static str,
    pub properties: &'static [StyleExpectation],
}

pub const CONTAINER_STYLES: SelectorExpectations = SelectorExpectations {
    selector: ".container",
    missing_message: "A .container osztály nem szerepel a CSS-ben!",
    properties: &[
        StyleExpectation {
            property: "margin",
            expected: "5%",
            message: "A .container margója nem megfelelő!",
        },
        StyleExpectation {
            property: "background-color",
            expected: "cyan",
            message: "A .container háttérszíne nem cyan!",
        },
        StyleExpectation {
            property: "padding",
            expected: "15px",
            message: "A .container belső margója nem megfelelő!",
        },
    ],
};

pub const ASIDE_STYLES: SelectorExpectations = SelectorExpectations {
    selector: "aside",
    missing_message: "Az aside elem nem szerepel a CSS-ben!",
    properties: &[
        StyleExpectation {
            property: "width",
            expected: "95px",
            message: "Az aside szélessége nem megfelelő!",
        },
        StyleExpectation {
            property: "height",
            expected: "95px",
            message: "Az aside magassága nem megfelelő!",
        },
        StyleExpectation {
            property: "font-size",
            expected: "14px",
            message: "Az aside fontmérete nem megfelelő!",
        },
        StyleExpectation {
            property: "background-color",
            expected: "white",
            message: "Az aside háttérszíne nem fehér!",
        },
        StyleExpectation {
            property: "padding",
            expected: "10px",
            message: "Az aside belső margója nem megfelelő!",
        },
        StyleExpectation {
            property: "float",
            expected: "left",
            message: "Az aside nem lebeg balra!",
        },
        StyleExpectation {
            property: "margin-right",
            expected: "10px",
            message: "Az aside jobboldali margója nem megfelelő!",
        },
        StyleExpectation {
            property: "border-right",
            expected: "6px solid goldenrod",
            message: "Az aside jobb szegélye nem megfelelő!",
        },
    ],
};

pub const CHECKS: &[Check<StyleRules>] = &[
    Check {
        name: "container_styles",
        run: container_styles,
    },
    Check {
        name: "aside_styles",
        run: aside_styles,
    },
];

pub fn container_styles(rules: &StyleRules) -> CheckResult {
    check_selector(rules, &CONTAINER_STYLES)
}

pub fn aside_styles(rules: &StyleRules) -> CheckResult {
    check_selector(rules, &ASIDE_STYLES)
}

/// Stops at the first property that is absent or differs.
pub fn check_selector(rules: &StyleRules, expectations: &SelectorExpectations) -> CheckResult {
    let declarations = rules
        .get(expectations.selector)
        .ok_or(CheckFailure::assertion(expectations.missing_message))?;
    for expectation in expectations.properties {
        let actual = declarations.get(expectation.property).map(|v| v.trim());
        if actual != Some(expectation.expected) {
            return Err(CheckFailure::mismatch(expectation.message, actual));
        }
    }
    Ok(())
}
