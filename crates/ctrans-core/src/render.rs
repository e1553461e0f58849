#![forbid(unsafe_code)]

//! Render adapter: re-issue the wrapped child with the driver's classes.
//!
//! The composition layer hands the driver its single child. When the content
//! is present, an element child comes back with the derived classes appended
//! to its own `class` attribute; a text child comes back unchanged, since it
//! has no class attribute and no style to measure. When the content is not
//! present nothing is rendered.
//!
//! Rendering also tells the driver what kind of child it wraps. While the
//! last rendered child is text, the attached target is not probed and the
//! cycle's timing is zero.

use crate::classes::merge_class;
use crate::driver::TransitionDriver;
use crate::target::TransitionTarget;

/// A minimal render-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A style-bearing element.
    Element(Element),
    /// Plain text; carries no class attribute.
    Text(String),
}

impl Node {
    /// Shorthand for an element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element(Element::new(tag))
    }

    /// Shorthand for a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Whether the node can carry classes and computed style.
    #[must_use]
    pub fn is_style_bearing(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

/// An element with a class attribute and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Caller-supplied class attribute.
    pub class_name: String,
    /// Child nodes, passed through untouched.
    pub children: Vec<Node>,
}

impl Element {
    /// An element with no classes and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the class attribute (builder).
    #[must_use]
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Append a child (builder).
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl<T: TransitionTarget> TransitionDriver<T> {
    /// Render `child` for the current state, or `None` when not present.
    ///
    /// Records whether `child` is style-bearing; the next timing probe
    /// depends on it.
    #[must_use]
    pub fn render(&mut self, child: &Node) -> Option<Node> {
        self.child_style_bearing = child.is_style_bearing();
        if !self.is_present() {
            return None;
        }
        Some(match child {
            Node::Element(el) => Node::Element(Element {
                class_name: merge_class(&el.class_name, self.class_name()),
                ..el.clone()
            }),
            Node::Text(_) => child.clone(),
        })
    }
}
