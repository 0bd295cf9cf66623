//! Parsing of the fixture HTML into the crate's DOM tree.
//!
//! html5ever drives tree construction; `PageTreeSink` materializes the tree
//! into `crate::dom::dom_tree` nodes with parent pointers so checks can walk
//! both down and up.

use crate::dom::dom_tree::{self, Node, NodeRef};
use crate::error::PageCheckError;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use log::debug;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Void elements never get a closing tag in the outline.
const VOID_ELEMENTS: &[&str] = &[
    "meta", "img", "br", "hr", "input", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

/// Creates a DOM tree from the provided HTML content.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = PageTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content)
}

/// Reads `path` as UTF-8 and parses it.
pub fn load_document(path: &Path) -> Result<dom_tree::Document, PageCheckError> {
    let html_content = read_fixture(path)?;
    Ok(create_dom_tree(&html_content))
}

pub fn read_fixture(path: &Path) -> Result<String, PageCheckError> {
    fs::read_to_string(path).map_err(|source| PageCheckError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Indented outline of the tree: one line per element or non-blank text node.
pub fn outline(document: &dom_tree::Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &*document.doctype.borrow() {
        let _ = writeln!(out, "<!DOCTYPE {}>", doctype.name);
    }
    outline_node(&document.root, 0, &mut out);
    out
}

fn outline_node(node: &NodeRef, depth: usize, out: &mut String) {
    let indentation = "  ".repeat(depth);
    match &*node.borrow() {
        Node::DocumentRoot(root) => {
            for child in &root.children {
                outline_node(child, depth, out);
            }
        }
        Node::Element(elem) => {
            let _ = write!(out, "{}<{}", indentation, elem.tag);
            let mut attrs: Vec<_> = elem.attributes.iter().collect();
            attrs.sort();
            for (k, v) in attrs {
                let _ = write!(out, " {}=\"{}\"", k, v);
            }
            if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                out.push_str("/>\n");
            } else {
                out.push_str(">\n");
                for child in &elem.children {
                    outline_node(child, depth + 1, out);
                }
            }
        }
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                let _ = writeln!(out, "{}{}", indentation, trimmed);
            }
        }
    }
}

/// A custom TreeSink building `dom_tree` nodes.
pub struct PageTreeSink {
    document: dom_tree::Document,
}

impl PageTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
        }
    }

    fn new_node(node: Node) -> NodeRef {
        Rc::new(RefCell::new(node))
    }

    fn set_parent(child: &NodeRef, parent: &NodeRef) {
        if let Node::Element(ref mut elem) = *child.borrow_mut() {
            elem.parent = Some(Rc::downgrade(parent));
        }
    }

    fn detach(target: &NodeRef) {
        let Some(parent) = dom_tree::parent_of(target) else {
            return;
        };
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.retain(|c| !Rc::ptr_eq(c, target));
        }
        if let Node::Element(ref mut elem) = *target.borrow_mut() {
            elem.parent = None;
        }
    }

    fn into_node(child: NodeOrText<NodeRef>) -> NodeRef {
        match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => Self::new_node(Node::Text(text.to_string())),
        }
    }
}

impl Default for PageTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned element name handed back to html5ever.
#[derive(Debug)]
pub struct PageElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PageElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for PageTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = PageElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        debug!(
            "html tree finished, quirks mode {:?}",
            self.document.quirks_mode.get()
        );
        self.document
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &*target.borrow() {
            Node::Element(elem) => PageElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            // html5ever only asks for names of elements.
            _ => PageElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: html5ever::interface::ElementFlags,
    ) -> Self::Handle {
        let mut element = dom_tree::ElementNode::new(name.local.to_string(), name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        Self::new_node(Node::Element(element))
    }

    /// Comments contribute no text.
    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Self::new_node(Node::Text(String::new()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Self::new_node(Node::Text(format!("{} {}", target, data)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let child_node = Self::into_node(child);
        Self::set_parent(&child_node, parent);
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.push(child_node);
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom_tree::parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Template contents are kept inline with the template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.document.quirks_mode.set(mode);
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = dom_tree::parent_of(sibling) else {
            return;
        };
        let child_node = Self::into_node(child);
        Self::detach(&child_node);
        Self::set_parent(&child_node, &parent);
        let mut parent_borrow = parent.borrow_mut();
        if let Some(children) = parent_borrow.children_mut() {
            let index = children
                .iter()
                .position(|c| Rc::ptr_eq(c, sibling))
                .unwrap_or(children.len());
            children.insert(index, child_node);
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let Node::Element(ref mut elem) = *target.borrow_mut() {
            for attr in attrs {
                elem.attributes
                    .entry(attr.name.local.to_string())
                    .or_insert_with(|| attr.value.to_string());
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        Self::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let moved = match node.borrow_mut().children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        for child in &moved {
            Self::set_parent(child, new_parent);
        }
        if let Some(children) = new_parent.borrow_mut().children_mut() {
            children.extend(moved);
        }
    }
}
