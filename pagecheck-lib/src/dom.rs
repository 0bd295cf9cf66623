use html5ever::interface::QuirksMode;
use html5ever::QualName;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node in the tree.
    pub type NodeRef = Rc<RefCell<Node>>;

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
    }

    #[derive(Debug, Clone)]
    pub struct DocumentRootNode {
        pub children: Vec<NodeRef>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: HashMap<String, String>,
        pub children: Vec<NodeRef>,
        pub parent: Option<Weak<RefCell<Node>>>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
        pub quirks_mode: Cell<QuirksMode>,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl Default for DocumentRootNode {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: HashMap::new(),
                children: Vec::new(),
                parent: None,
            }
        }

        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes.get(name).map(String::as_str)
        }

        /// True if the whitespace-separated `class` attribute contains `class_name`.
        pub fn has_class(&self, class_name: &str) -> bool {
            self.attr("class")
                .map(|classes| classes.split_whitespace().any(|c| c == class_name))
                .unwrap_or(false)
        }
    }

    impl Node {
        pub fn children(&self) -> &[NodeRef] {
            match self {
                Node::DocumentRoot(root) => &root.children,
                Node::Element(elem) => &elem.children,
                Node::Text(_) => &[],
            }
        }

        pub fn children_mut(&mut self) -> Option<&mut Vec<NodeRef>> {
            match self {
                Node::DocumentRoot(root) => Some(&mut root.children),
                Node::Element(elem) => Some(&mut elem.children),
                Node::Text(_) => None,
            }
        }

        pub fn is_element(&self) -> bool {
            matches!(self, Node::Element(_))
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
        }
    }

    /// Lowercase tag name of an element node, `None` for anything else.
    pub fn tag_name(node: &NodeRef) -> Option<String> {
        match &*node.borrow() {
            Node::Element(elem) => Some(elem.tag.to_ascii_lowercase()),
            _ => None,
        }
    }

    pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
        match &*node.borrow() {
            Node::Element(elem) => elem.tag.eq_ignore_ascii_case(tag),
            _ => false,
        }
    }

    pub fn has_class(node: &NodeRef, class_name: &str) -> bool {
        match &*node.borrow() {
            Node::Element(elem) => elem.has_class(class_name),
            _ => false,
        }
    }

    /// Concatenation of every descendant text node, in document order.
    pub fn text_content(node: &NodeRef) -> String {
        let mut out = String::new();
        collect_text(node, &mut out);
        out
    }

    fn collect_text(node: &NodeRef, out: &mut String) {
        match &*node.borrow() {
            Node::Text(text) => out.push_str(text),
            other => {
                for child in other.children() {
                    collect_text(child, out);
                }
            }
        }
    }

    /// First descendant (not `node` itself) satisfying `pred`, in document order.
    pub fn find<F>(node: &NodeRef, pred: F) -> Option<NodeRef>
    where
        F: Fn(&NodeRef) -> bool,
    {
        fn walk<F: Fn(&NodeRef) -> bool>(node: &NodeRef, pred: &F) -> Option<NodeRef> {
            for child in node.borrow().children() {
                if pred(child) {
                    return Some(Rc::clone(child));
                }
                if let Some(found) = walk(child, pred) {
                    return Some(found);
                }
            }
            None
        }
        walk(node, &pred)
    }

    /// Every descendant satisfying `pred`, in document order.
    pub fn find_all<F>(node: &NodeRef, pred: F) -> Vec<NodeRef>
    where
        F: Fn(&NodeRef) -> bool,
    {
        fn walk<F: Fn(&NodeRef) -> bool>(node: &NodeRef, pred: &F, out: &mut Vec<NodeRef>) {
            for child in node.borrow().children() {
                if pred(child) {
                    out.push(Rc::clone(child));
                }
                walk(child, pred, out);
            }
        }
        let mut out = Vec::new();
        walk(node, &pred, &mut out);
        out
    }

    pub fn find_tag(node: &NodeRef, tag: &str) -> Option<NodeRef> {
        find(node, |n| is_tag(n, tag))
    }

    pub fn find_all_tag(node: &NodeRef, tag: &str) -> Vec<NodeRef> {
        find_all(node, |n| is_tag(n, tag))
    }

    pub fn parent_of(node: &NodeRef) -> Option<NodeRef> {
        match &*node.borrow() {
            Node::Element(elem) => elem.parent.as_ref().and_then(Weak::upgrade),
            _ => None,
        }
    }
}
