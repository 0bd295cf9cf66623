//! Structural checks on the parsed markup.

use super::{ensure, Check, CheckFailure, CheckResult};
use crate::dom::dom_tree::{self, Document, NodeRef};
use crate::parser::dom_indices::DomIndices;
use crate::parser::page_html::create_dom_tree;
use std::rc::Rc;

pub const CONTAINER_CLASS: &str = "container";
pub const H1_SUBSTRING: &str = "Lorem ipsum";
pub const H3_TEXT: &str = "Dolor sit amet";
pub const ASIDE_WORD_COUNT: usize = 10;
/// Zero-based index of the word that must be bold in the last paragraph.
pub const BOLD_WORD_INDEX: usize = 2;

/// A parsed fixture together with its lookup tables.
#[derive(Debug)]
pub struct ParsedPage {
    pub document: Document,
    pub indices: DomIndices,
}

impl ParsedPage {
    pub fn parse(html: &str) -> Self {
        let document = create_dom_tree(html);
        let indices = DomIndices::build(&document);
        ParsedPage { document, indices }
    }

    /// First `div.container`.
    pub fn container(&self) -> Option<NodeRef> {
        self.indices
            .first_tag_with_class("div", CONTAINER_CLASS)
            .map(Rc::clone)
    }

    pub fn first(&self, tag: &str) -> Option<NodeRef> {
        self.indices.first_tag(tag).map(Rc::clone)
    }
}

pub const CHECKS: &[Check<ParsedPage>] = &[
    Check {
        name: "container_exists",
        run: container_exists,
    },
    Check {
        name: "h1_exists",
        run: h1_exists,
    },
    Check {
        name: "h1_text",
        run: h1_text,
    },
    Check {
        name: "h3_exists",
        run: h3_exists,
    },
    Check {
        name: "h3_text",
        run: h3_text,
    },
    Check {
        name: "aside_exists",
        run: aside_exists,
    },
    Check {
        name: "aside_text_word_count",
        run: aside_text_word_count,
    },
    Check {
        name: "last_paragraph_third_word_bold",
        run: last_paragraph_third_word_bold,
    },
];

pub fn container_exists(page: &ParsedPage) -> CheckResult {
    ensure(
        page.container().is_some(),
        "A .container elem nem található!",
    )
}

pub fn h1_exists(page: &ParsedPage) -> CheckResult {
    let h1 = page
        .container()
        .and_then(|container| dom_tree::find_tag(&container, "h1"));
    ensure(
        h1.is_some(),
        "A h1 elem nem található a .container-en belül!",
    )
}

pub fn h1_text(page: &ParsedPage) -> CheckResult {
    const MESSAGE: &str = "A h1 elem szövege nem megfelelő!";
    let container = page
        .container()
        .ok_or(CheckFailure::missing(".container", MESSAGE))?;
    let h1 = dom_tree::find_tag(&container, "h1").ok_or(CheckFailure::missing("h1", MESSAGE))?;
    let text = dom_tree::text_content(&h1);
    if text.contains(H1_SUBSTRING) {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(MESSAGE, text))
    }
}

pub fn h3_exists(page: &ParsedPage) -> CheckResult {
    ensure(page.first("h3").is_some(), "A h3 elem nem található!")
}

pub fn h3_text(page: &ParsedPage) -> CheckResult {
    const MESSAGE: &str = "A h3 elem szövege nem megfelelő!";
    let h3 = page.first("h3").ok_or(CheckFailure::missing("h3", MESSAGE))?;
    let text = dom_tree::text_content(&h3);
    if text.trim() == H3_TEXT {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(MESSAGE, text.trim()))
    }
}

pub fn aside_exists(page: &ParsedPage) -> CheckResult {
    ensure(page.first("aside").is_some(), "Az aside elem nem található!")
}

pub fn aside_text_word_count(page: &ParsedPage) -> CheckResult {
    const MESSAGE: &str = "Az aside elem szövege nem 10 szóból áll!";
    let aside = page
        .first("aside")
        .ok_or(CheckFailure::missing("aside", MESSAGE))?;
    let count = dom_tree::text_content(&aside).split_whitespace().count();
    if count == ASIDE_WORD_COUNT {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(MESSAGE, count))
    }
}

/// The third word of the last `<p>` must equal the text of one of its `<b>`
/// descendants.
pub fn last_paragraph_third_word_bold(page: &ParsedPage) -> CheckResult {
    let last_p = page
        .indices
        .last_tag("p")
        .ok_or(CheckFailure::assertion("Nem található <p> elem!"))?;

    let text = dom_tree::text_content(last_p);
    let words: Vec<&str> = text.split_whitespace().collect();
    let bold_words: Vec<String> = dom_tree::find_all_tag(last_p, "b")
        .iter()
        .map(dom_tree::text_content)
        .collect();

    let third = words.get(BOLD_WORD_INDEX).ok_or(CheckFailure::mismatch(
        "A bekezdésnek legalább 3 szóból kell állnia!",
        words.len(),
    ))?;
    if bold_words.iter().any(|bold| bold == third) {
        Ok(())
    } else {
        Err(CheckFailure::mismatch(
            "A harmadik szó nem félkövér!",
            (third, &bold_words),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{run_checks, CheckGroup};
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Lorem</title></head>
<body>
  <div class="container">
    <h1>Lorem ipsum dolor</h1>
    <h3> Dolor sit amet </h3>
    <aside>one two three four five six seven eight nine ten</aside>
    <p>First paragraph.</p>
    <p>Lorem ipsum <b>dolor</b> sit amet.</p>
  </div>
</body>
</html>"#;

    fn failure_of(html: &str, check: fn(&ParsedPage) -> CheckResult) -> CheckFailure {
        check(&ParsedPage::parse(html)).expect_err("check should fail")
    }

    #[test]
    fn all_markup_checks_pass_on_wellformed_page() {
        let page = ParsedPage::parse(PAGE);
        let outcomes = run_checks(CheckGroup::Markup, CHECKS, &page);
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.passed()).collect();
        assert!(failed.is_empty(), "unexpected failures: {:?}", failed);
        assert_eq!(outcomes.len(), 8);
    }

    #[test]
    fn container_must_be_a_div() {
        let html = r#"<section class="container"><h1>Lorem ipsum</h1></section>"#;
        assert_eq!(
            failure_of(html, container_exists).message(),
            "A .container elem nem található!"
        );
        assert_eq!(
            failure_of(html, h1_text),
            CheckFailure::missing(".container", "A h1 elem szövege nem megfelelő!")
        );
    }

    #[test]
    fn h1_outside_container_is_not_found() {
        let html = r#"<h1>Lorem ipsum</h1><div class="container"></div>"#;
        assert_eq!(
            failure_of(html, h1_exists).message(),
            "A h1 elem nem található a .container-en belül!"
        );
        assert_eq!(
            failure_of(html, h1_text),
            CheckFailure::missing("h1", "A h1 elem szövege nem megfelelő!")
        );
    }

    #[test]
    fn h1_text_is_substring_match() {
        let html = r#"<div class="container"><h1>Lorem <i>ipsum</i></h1></div>"#;
        assert!(h1_text(&ParsedPage::parse(html)).is_ok());
        let html = r#"<div class="container"><h1>Lorem  ipsum</h1></div>"#;
        assert_eq!(
            failure_of(html, h1_text).message(),
            "A h1 elem szövege nem megfelelő!"
        );
    }

    #[test]
    fn h3_text_must_match_exactly_after_trim() {
        assert!(h3_text(&ParsedPage::parse("<h3>\n Dolor sit amet\n</h3>")).is_ok());
        assert_eq!(
            failure_of("<h3>dolor sit amet</h3>", h3_text),
            CheckFailure::mismatch("A h3 elem szövege nem megfelelő!", "dolor sit amet")
        );
        assert_eq!(
            failure_of("<p>x</p>", h3_exists).message(),
            "A h3 elem nem található!"
        );
    }

    #[test]
    fn aside_word_count_counts_nested_text() {
        let html = "<aside>one two <b>three four</b> five six seven eight nine ten</aside>";
        assert!(aside_text_word_count(&ParsedPage::parse(html)).is_ok());
        assert_eq!(
            failure_of("<aside>one two three</aside>", aside_text_word_count),
            CheckFailure::mismatch("Az aside elem szövege nem 10 szóból áll!", 3)
        );
        assert_eq!(
            failure_of("<p>x</p>", aside_exists).message(),
            "Az aside elem nem található!"
        );
    }

    #[test]
    fn bold_word_check_uses_last_paragraph_only() {
        let html = "<p>a b <b>c</b></p><p>x y z</p>";
        assert_eq!(
            failure_of(html, last_paragraph_third_word_bold).message(),
            "A harmadik szó nem félkövér!"
        );
    }

    #[test]
    fn bold_word_check_edge_cases() {
        assert_eq!(
            failure_of("<div>none</div>", last_paragraph_third_word_bold).message(),
            "Nem található <p> elem!"
        );
        assert_eq!(
            failure_of("<p>two <b>words</b></p>", last_paragraph_third_word_bold).message(),
            "A bekezdésnek legalább 3 szóból kell állnia!"
        );
        // Bold text must equal the word exactly, punctuation included.
        let html = "<p>Lorem ipsum <b>dolor</b>, sit</p>";
        assert!(last_paragraph_third_word_bold(&ParsedPage::parse(html)).is_err());
        let html = "<p>Lorem ipsum <b>consectetur</b> adipiscing</p>";
        assert!(last_paragraph_third_word_bold(&ParsedPage::parse(html)).is_ok());
    }

    #[test]
    fn reparsing_gives_identical_outcomes() {
        let first = run_checks(CheckGroup::Markup, CHECKS, &ParsedPage::parse(PAGE));
        let second = run_checks(CheckGroup::Markup, CHECKS, &ParsedPage::parse(PAGE));
        assert_eq!(first, second);
    }
}
