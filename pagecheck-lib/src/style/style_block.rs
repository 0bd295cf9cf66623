//! Extraction of the `<style>` block into a [`StyleRules`] mapping.
//!
//! Two extractors exist. The lenient one splits on braces, semicolons and
//! colons and silently drops anything that does not fit; it is the default
//! because the fixture is a known file. The strict one walks the text
//! character by character and reports the first malformed construct.

use crate::dom::dom_tree::{self, Document};
use crate::style::owned_css::{OwnedDeclaration, OwnedRule, StyleRules};
use log::{debug, warn};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// How the style block text is turned into rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CssMode {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssBlockError {
    #[error("line {line}: rule `{selector}` is never closed")]
    UnclosedBlock { selector: String, line: usize },

    #[error("line {line}: `}}` without a matching `{{`")]
    UnexpectedCloseBrace { line: usize },

    #[error("line {line}: nested `{{` inside a declaration block")]
    NestedBlock { line: usize },

    #[error("line {line}: rule has no selector")]
    EmptySelector { line: usize },

    #[error("line {line}: declaration `{declaration}` has no `:`")]
    MissingColon { declaration: String, line: usize },

    #[error("line {line}: declaration `{declaration}` has an empty property name")]
    EmptyProperty { declaration: String, line: usize },

    #[error("line {line}: comment is never closed")]
    UnterminatedComment { line: usize },

    #[error("line {line}: `{text}` is not part of any rule")]
    TrailingText { text: String, line: usize },
}

/// Text of the first `<style>` element, if the document has one.
pub fn style_block_text(document: &Document) -> Option<String> {
    dom_tree::find_tag(&document.root, "style").map(|style| dom_tree::text_content(&style))
}

/// Builds the rule mapping for `document`. No `<style>` element yields an
/// empty mapping in both modes.
pub fn style_rules(document: &Document, mode: CssMode) -> Result<StyleRules, CssBlockError> {
    let Some(css) = style_block_text(document) else {
        debug!("document has no <style> block");
        return Ok(StyleRules::new());
    };
    match mode {
        CssMode::Lenient => Ok(extract_rules(&css)),
        CssMode::Strict => parse_rules_strict(&css),
    }
}

/// Brace/semicolon/colon splitting. Pieces without exactly one `{` and
/// declarations without a `:` are skipped.
pub fn extract_rules(css: &str) -> StyleRules {
    let mut rules = StyleRules::new();
    for chunk in css.split('}') {
        let chunk = chunk.trim();
        let parts: Vec<&str> = chunk.split('{').collect();
        if parts.len() != 2 {
            if !chunk.is_empty() {
                warn!("skipping malformed css rule: {:?}", chunk);
            }
            continue;
        }
        let declarations = parts[1]
            .trim()
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(property, value)| OwnedDeclaration {
                property: property.trim().to_string(),
                value: value.trim().to_string(),
            })
            .collect();
        rules.insert(OwnedRule {
            selector: parts[0].trim().to_string(),
            declarations,
        });
    }
    rules
}

/// Tokenizing parser that rejects malformed input.
pub fn parse_rules_strict(css: &str) -> Result<StyleRules, CssBlockError> {
    let rules = StrictParser::new(css).parse()?;
    for rule in &rules {
        debug!("{}", rule);
    }
    Ok(StyleRules::from_rules(rules))
}

struct StrictParser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    buffer: String,
    /// Line of the first non-blank character in `buffer`.
    token_line: usize,
}

impl<'a> StrictParser<'a> {
    fn new(css: &'a str) -> Self {
        StrictParser {
            chars: css.chars().peekable(),
            line: 1,
            buffer: String::new(),
            token_line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn push(&mut self, ch: char) {
        if !ch.is_whitespace() && self.buffer.trim().is_empty() {
            self.token_line = self.line;
        }
        self.buffer.push(ch);
    }

    fn take_buffer(&mut self) -> (String, usize) {
        let text = std::mem::take(&mut self.buffer).trim().to_string();
        (text, self.token_line)
    }

    fn skip_comment(&mut self) -> Result<(), CssBlockError> {
        let start = self.line;
        self.bump();
        while let Some(ch) = self.bump() {
            if ch == '*' && self.chars.peek() == Some(&'/') {
                self.bump();
                return Ok(());
            }
        }
        Err(CssBlockError::UnterminatedComment { line: start })
    }

    fn copy_string(&mut self, quote: char) {
        self.push(quote);
        while let Some(ch) = self.bump() {
            self.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.bump() {
                    self.push(escaped);
                }
            } else if ch == quote {
                return;
            }
        }
    }

    fn parse(mut self) -> Result<Vec<OwnedRule>, CssBlockError> {
        let mut rules = Vec::new();
        let mut open: Option<(String, usize)> = None;
        let mut declarations = Vec::new();

        while let Some(ch) = self.bump() {
            match ch {
                '/' if self.chars.peek() == Some(&'*') => self.skip_comment()?,
                '"' | '\'' => self.copy_string(ch),
                '{' => {
                    if open.is_some() {
                        return Err(CssBlockError::NestedBlock { line: self.line });
                    }
                    let (selector, line) = self.take_buffer();
                    if selector.is_empty() {
                        return Err(CssBlockError::EmptySelector { line: self.line });
                    }
                    open = Some((selector, line));
                }
                ';' if open.is_some() => {
                    let (text, line) = self.take_buffer();
                    push_declaration(&mut declarations, text, line)?;
                }
                '}' => {
                    let Some((selector, _)) = open.take() else {
                        return Err(CssBlockError::UnexpectedCloseBrace { line: self.line });
                    };
                    let (text, line) = self.take_buffer();
                    push_declaration(&mut declarations, text, line)?;
                    rules.push(OwnedRule {
                        selector,
                        declarations: std::mem::take(&mut declarations),
                    });
                }
                _ => self.push(ch),
            }
        }

        if let Some((selector, line)) = open {
            return Err(CssBlockError::UnclosedBlock { selector, line });
        }
        let (text, line) = self.take_buffer();
        if !text.is_empty() {
            return Err(CssBlockError::TrailingText { text, line });
        }
        Ok(rules)
    }
}

fn push_declaration(
    declarations: &mut Vec<OwnedDeclaration>,
    text: String,
    line: usize,
) -> Result<(), CssBlockError> {
    if text.is_empty() {
        return Ok(());
    }
    let Some((property, value)) = text.split_once(':') else {
        return Err(CssBlockError::MissingColon {
            declaration: text,
            line,
        });
    };
    let property = property.trim();
    if property.is_empty() {
        return Err(CssBlockError::EmptyProperty {
            declaration: text.clone(),
            line,
        });
    }
    declarations.push(OwnedDeclaration {
        property: property.to_string(),
        value: value.trim().to_string(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::page_html::create_dom_tree;
    use pretty_assertions::assert_eq;

    const BLOCK: &str = r#"
        .container {
            margin: 5%;
            background-color: cyan;
            padding: 15px;
        }
        aside {
            width: 95px;
            border-right: 6px solid goldenrod;
        }
    "#;

    #[test]
    fn lenient_extracts_selectors_and_values() {
        let rules = extract_rules(BLOCK);
        assert_eq!(rules.selectors(), vec![".container", "aside"]);
        assert_eq!(rules.value(".container", "margin"), Some("5%"));
        assert_eq!(
            rules.value("aside", "border-right"),
            Some("6px solid goldenrod")
        );
    }

    #[test]
    fn lenient_splits_on_first_colon_only() {
        let rules = extract_rules("a { background: url(http://x/y.png) }");
        assert_eq!(rules.value("a", "background"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn lenient_skips_malformed_pieces() {
        let rules = extract_rules("p { color red; margin: 0 } div { a { b } h1 { color: blue }");
        assert_eq!(rules.value("p", "margin"), Some("0"));
        assert_eq!(rules.get("p").map(|d| d.len()), Some(1));
        assert!(!rules.contains("div"));
        assert_eq!(rules.value("h1", "color"), Some("blue"));
    }

    #[test]
    fn strict_matches_lenient_on_wellformed_input() {
        assert_eq!(parse_rules_strict(BLOCK), Ok(extract_rules(BLOCK)));
    }

    #[test]
    fn strict_skips_comments_and_keeps_strings() {
        let rules = parse_rules_strict(
            "/* header */ q { quotes: \"}\" \"{\"; /* inner */ color: red; }",
        )
        .expect("valid css");
        assert_eq!(rules.value("q", "quotes"), Some("\"}\" \"{\""));
        assert_eq!(rules.value("q", "color"), Some("red"));
    }

    #[test]
    fn strict_reports_missing_colon_with_line() {
        let err = parse_rules_strict("p {\n  color: red;\n  margin 0;\n}").expect_err("bad decl");
        assert_eq!(
            err,
            CssBlockError::MissingColon {
                declaration: "margin 0".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn strict_reports_structural_errors() {
        assert_eq!(
            parse_rules_strict("p { color: red;"),
            Err(CssBlockError::UnclosedBlock {
                selector: "p".to_string(),
                line: 1
            })
        );
        assert_eq!(
            parse_rules_strict("p { }\n}"),
            Err(CssBlockError::UnexpectedCloseBrace { line: 2 })
        );
        assert_eq!(
            parse_rules_strict("p { a { } }"),
            Err(CssBlockError::NestedBlock { line: 1 })
        );
        assert_eq!(
            parse_rules_strict("{ color: red }"),
            Err(CssBlockError::EmptySelector { line: 1 })
        );
        assert_eq!(
            parse_rules_strict("p { : red }"),
            Err(CssBlockError::EmptyProperty {
                declaration: ": red".to_string(),
                line: 1
            })
        );
        assert_eq!(
            parse_rules_strict("p { }\n/* open"),
            Err(CssBlockError::UnterminatedComment { line: 2 })
        );
        assert_eq!(
            parse_rules_strict("p { } stray"),
            Err(CssBlockError::TrailingText {
                text: "stray".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn document_without_style_yields_empty_rules() {
        let doc = create_dom_tree("<html><body><p>x</p></body></html>");
        assert_eq!(style_block_text(&doc), None);
        for mode in [CssMode::Lenient, CssMode::Strict] {
            assert!(style_rules(&doc, mode).expect("no error").is_empty());
        }
    }

    #[test]
    fn style_block_is_read_from_head() {
        let doc = create_dom_tree("<html><head><style>p { color: red; }</style></head></html>");
        let rules = style_rules(&doc, CssMode::Lenient).expect("rules");
        assert_eq!(rules.value("p", "color"), Some("red"));
    }
}
