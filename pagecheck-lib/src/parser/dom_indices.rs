use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{Document, Node, NodeRef};

/// Lookup tables over a parsed document. Every list is in document order.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Maps an element's "id" attribute to the corresponding node.
    pub id_map: HashMap<String, NodeRef>,
    /// Maps a class name to all nodes that have that class.
    pub class_map: HashMap<String, Vec<NodeRef>>,
    /// Maps a lowercase tag name (e.g., "div") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<NodeRef>>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        Self::traverse(&document.root, &mut indices);
        indices
    }

    fn traverse(node: &NodeRef, indices: &mut DomIndices) {
        match &*node.borrow() {
            Node::DocumentRoot(root) => {
                for child in &root.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Element(elem) => {
                indices
                    .tag_map
                    .entry(elem.tag.to_lowercase())
                    .or_default()
                    .push(Rc::clone(node));

                // First id wins, matching getElementById.
                if let Some(id_value) = elem.attributes.get("id") {
                    indices
                        .id_map
                        .entry(id_value.clone())
                        .or_insert_with(|| Rc::clone(node));
                }
                if let Some(class_attr) = elem.attributes.get("class") {
                    for class in class_attr.split_whitespace() {
                        indices
                            .class_map
                            .entry(class.to_string())
                            .or_default()
                            .push(Rc::clone(node));
                    }
                }
                for child in &elem.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Text(_) => {}
        }
    }

    pub fn by_tag(&self, tag: &str) -> &[NodeRef] {
        self.tag_map
            .get(&tag.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_class(&self, class: &str) -> &[NodeRef] {
        self.class_map.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_id(&self, id: &str) -> Option<&NodeRef> {
        self.id_map.get(id)
    }

    pub fn first_tag(&self, tag: &str) -> Option<&NodeRef> {
        self.by_tag(tag).first()
    }

    pub fn last_tag(&self, tag: &str) -> Option<&NodeRef> {
        self.by_tag(tag).last()
    }

    /// First `tag` element carrying `class`.
    pub fn first_tag_with_class(&self, tag: &str, class: &str) -> Option<&NodeRef> {
        self.by_class(class).iter().find(|node| match &*node.borrow() {
            Node::Element(elem) => elem.tag.eq_ignore_ascii_case(tag),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::dom_tree;
    use crate::parser::page_html::create_dom_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn indexes_tags_classes_and_ids_in_order() {
        let doc = create_dom_tree(
            r#"<span class="container">s</span>
               <div class="box container" id="main"><p>one</p></div>
               <p id="main">two</p>"#,
        );
        let indices = DomIndices::build(&doc);

        let texts: Vec<String> = indices.by_tag("P").iter().map(dom_tree::text_content).collect();
        assert_eq!(texts, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(indices.by_class("container").len(), 2);

        let container = indices
            .first_tag_with_class("div", "container")
            .expect("div.container");
        assert!(dom_tree::is_tag(container, "div"));

        let main = indices.by_id("main").expect("id main");
        assert!(dom_tree::is_tag(main, "div"));

        assert_eq!(
            indices.last_tag("p").map(dom_tree::text_content).as_deref(),
            Some("two")
        );
        assert!(indices.first_tag("aside").is_none());
    }
}
