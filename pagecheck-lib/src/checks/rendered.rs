//! Checks against the page as a browser renders it.
//!
//! Each check takes a [`PageProbe`] so the comparisons can run against a
//! live [`crate::browser::BrowserSession`] or a recorded snapshot.

use super::markup::{ASIDE_WORD_COUNT, CONTAINER_CLASS, H1_SUBSTRING, H3_TEXT};
use super::{Check, CheckFailure, CheckResult};
use crate::browser::{ElementSnapshot, Locator, PageProbe};
use crate::style::css_values::{parse_px, values_match};

/// Text the bold element of the last paragraph must have.
pub const BOLD_LITERAL: &str = "dolor";

/// Allowed difference when comparing resolved percentage lengths.
const PX_TOLERANCE: f64 = 0.05;

/// Expected computed value of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderedValue {
    /// Computed value must equal this text.
    Exact(&'static str),
    /// Computed color, compared in `rgba(r, g, b, a)` form.
    Color(&'static str),
    /// Percentage of the containing block's content width, in px.
    PercentOfContainer(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct RenderedExpectation {
    pub property: &'static str,
    pub expected: RenderedValue,
    pub message: &'static str,
}

pub const CONTAINER_RENDERED: &[RenderedExpectation] = &[
    RenderedExpectation {
        property: "margin",
        expected: RenderedValue::PercentOfContainer(5.0),
        message: "A .container margója nem megfelelő!",
    },
    RenderedExpectation {
        property: "background-color",
        expected: RenderedValue::Color("rgba(0, 255, 255, 1)"),
        message: "A .container háttérszíne nem cyan!",
    },
    RenderedExpectation {
        property: "padding",
        expected: RenderedValue::Exact("15px"),
        message: "A .container belső margója nem megfelelő!",
    },
];

pub const ASIDE_RENDERED: &[RenderedExpectation] = &[
    RenderedExpectation {
        property: "width",
        expected: RenderedValue::Exact("95px"),
        message: "Az aside szélessége nem megfelelő!",
    },
    RenderedExpectation {
        property: "height",
        expected: RenderedValue::Exact("95px"),
        message: "Az aside magassága nem megfelelő!",
    },
    RenderedExpectation {
        property: "font-size",
        expected: RenderedValue::Exact("14px"),
        message: "Az aside fontmérete nem megfelelő!",
    },
    RenderedExpectation {
        property: "background-color",
        expected: RenderedValue::Color("rgba(255, 255, 255, 1)"),
        message: "Az aside háttérszíne nem fehér!",
    },
    RenderedExpectation {
        property: "padding",
        expected: RenderedValue::Exact("10px"),
        message: "Az aside belső margója nem megfelelő!",
    },
    RenderedExpectation {
        property: "float",
        expected: RenderedValue::Exact("left"),
        message: "Az aside nem lebeg balra!",
    },
    RenderedExpectation {
        property: "margin-right",
        expected: RenderedValue::Exact("10px"),
        message: "Az aside jobboldali margója nem megfelelő!",
    },
    RenderedExpectation {
        property: "border-right",
        expected: RenderedValue::Exact("6px solid rgb(218, 165, 32)"),
        message: "Az aside jobb szegélye nem megfelelő!",
    },
];

pub const CHECKS: &[Check<dyn PageProbe>] = &[
    Check {
        name: "rendered_container_styles",
        run: rendered_container_styles,
    },
    Check {
        name: "rendered_aside_styles",
        run: rendered_aside_styles,
    },
    Check {
        name: "rendered_h1_text",
        run: rendered_h1_text,
    },
    Check {
        name: "rendered_h3_text",
        run: rendered_h3_text,
    },
    Check {
        name: "rendered_aside_word_count",
        run: rendered_aside_word_count,
    },
    Check {
        name: "rendered_last_paragraph_bold_dolor",
        run: rendered_last_paragraph_bold_dolor,
    },
];

/// Fetches the element, turning "not found" into `MissingElement`.
fn locate(
    probe: &dyn PageProbe,
    locator: &Locator,
    properties: &[&str],
    element: &'static str,
    message: &'static str,
) -> Result<ElementSnapshot, CheckFailure> {
    probe
        .snapshot(locator, properties)
        .map_err(|e| CheckFailure::Error(e.to_string()))?
        .ok_or(CheckFailure::missing(element, message))
}

fn property_names(expectations: &[RenderedExpectation]) -> Vec<&'static str> {
    expectations.iter().map(|e| e.property).collect()
}

pub fn rendered_container_styles(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::class_name(CONTAINER_CLASS),
        &property_names(CONTAINER_RENDERED),
        ".container",
        "A .container elem nem található!",
    )?;
    compare_snapshot(&snapshot, CONTAINER_RENDERED)
}

pub fn rendered_aside_styles(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::tag_name("aside"),
        &property_names(ASIDE_RENDERED),
        "aside",
        "Az aside elem nem található!",
    )?;
    compare_snapshot(&snapshot, ASIDE_RENDERED)
}

pub fn rendered_h1_text(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::within(Locator::class_name(CONTAINER_CLASS), "h1"),
        &[],
        "h1",
        "A h1 elem nem található a .container-en belül!",
    )?;
    if snapshot.text.contains(H1_SUBSTRING) {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(
            "A h1 elem szövege nem megfelelő!",
            snapshot.text,
        ))
    }
}

pub fn rendered_h3_text(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::tag_name("h3"),
        &[],
        "h3",
        "A h3 elem nem található!",
    )?;
    if snapshot.text.trim() == H3_TEXT {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(
            "A h3 elem szövege nem megfelelő!",
            snapshot.text.trim(),
        ))
    }
}

pub fn rendered_aside_word_count(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::tag_name("aside"),
        &[],
        "aside",
        "Az aside elem nem található!",
    )?;
    let count = snapshot.text.split_whitespace().count();
    if count == ASIDE_WORD_COUNT {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(
            "Az aside elem szövege nem 10 szóból áll!",
            count,
        ))
    }
}

/// Looks for a `<b>` with the literal text `dolor` in the last paragraph,
/// independent of word position.
pub fn rendered_last_paragraph_bold_dolor(probe: &dyn PageProbe) -> CheckResult {
    let snapshot = locate(
        probe,
        &Locator::last_of_tag("p"),
        &[],
        "p",
        "Nem található <p> elem!",
    )?;
    if snapshot.bold_texts.iter().any(|b| b == BOLD_LITERAL) {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(
            "A harmadik szó nem félkövér!",
            snapshot.bold_texts,
        ))
    }
}

/// Compares computed values with `expectations`, stopping at the first
/// mismatch.
pub fn compare_snapshot(
    snapshot: &ElementSnapshot,
    expectations: &[RenderedExpectation],
) -> CheckResult {
    for expectation in expectations {
        let actual = snapshot.property(expectation.property);
        let matched = match (actual, expectation.expected) {
            (None, _) => false,
            (Some(actual), RenderedValue::Exact(expected)) => actual.trim() == expected,
            (Some(actual), RenderedValue::Color(expected)) => {
                values_match(expectation.property, actual, expected)
            }
            (Some(actual), RenderedValue::PercentOfContainer(percent)) => {
                match (parse_px(actual), snapshot.containing_width) {
                    (Some(px), Some(width)) => (px - width * percent / 100.0).abs() <= PX_TOLERANCE,
                    _ => false,
                }
            }
        };
        if !matched {
            return Err(CheckFailure::mismatch(expectation.message, actual));
        }
    }
    Ok(())
}
