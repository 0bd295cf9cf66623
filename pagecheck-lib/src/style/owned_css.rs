use std::collections::HashMap;
use std::fmt;

/// Property name => value of one selector's block.
pub type Declarations = HashMap<String, String>;

/// One rule as extracted from a style block, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRule {
    /// Literal selector text, e.g. ".container" or "aside".
    pub selector: String,
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selector: {}", self.selector)?;
        for decl in &self.declarations {
            writeln!(f, "  {}: {}", decl.property, decl.value)?;
        }
        Ok(())
    }
}

/// Selector text => declarations.
///
/// A later rule with the same selector text replaces the earlier one; inside
/// a rule the last declaration of a property wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StyleRules {
    rules: HashMap<String, Declarations>,
}

impl StyleRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = OwnedRule>,
    {
        let mut style_rules = StyleRules::new();
        for rule in rules {
            style_rules.insert(rule);
        }
        style_rules
    }

    pub fn insert(&mut self, rule: OwnedRule) {
        let declarations = rule
            .declarations
            .into_iter()
            .map(|d| (d.property, d.value))
            .collect();
        self.rules.insert(rule.selector, declarations);
    }

    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.rules.get(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.rules.contains_key(selector)
    }

    /// Value of `property` under `selector`, if both exist.
    pub fn value(&self, selector: &str, property: &str) -> Option<&str> {
        self.get(selector)
            .and_then(|decls| decls.get(property))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Selectors in sorted order.
    pub fn selectors(&self) -> Vec<&str> {
        let mut selectors: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        selectors.sort_unstable();
        selectors
    }
}
