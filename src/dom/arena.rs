//! Arena-based DOM for content documents.
//!
//! html5ever parses into this arena; the extractor then works on a flattened
//! pre-order view of it (see [`Dom::flatten`]) instead of navigating sibling
//! links live.

use html5ever::QualName;

/// Elements whose boundaries separate words in collected text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        /// Boxed so the name keeps a stable address while the arena grows.
        name: Box<QualName>,
        attrs: Vec<Attribute>,
        /// Pre-split class tokens.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Qualified attribute name as written in markup (`xlink:href`).
    pub fn qualified_name(&self) -> String {
        match &self.name.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name.local),
            None => self.name.local.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// One entry of a flattened subtree.
///
/// `parent` indexes into the same flat list (`None` for children of the
/// flattened root) and `end` is the exclusive index just past the node's
/// last descendant, so `[index, end)` is the node's whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatNode {
    pub id: NodeId,
    pub parent: Option<usize>,
    pub end: usize,
}

/// Arena-allocated DOM tree.
///
/// Nodes are never freed; detaching only unlinks them.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        self.alloc(Node::new(NodeData::Element {
            name: Box::new(name),
            attrs,
            classes,
        }))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some((parent, prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling)) else {
            return;
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }
        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text, merging into a trailing text node when there is one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node (and with it its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, prev, next)) = self
            .get(id)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Detach every element with one of the given tag names.
    ///
    /// Returns the number of subtrees removed.
    pub fn detach_tags(&mut self, tags: &[&str]) -> usize {
        let mut doomed = Vec::new();
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if self.element_name(id).is_some_and(|name| tags.contains(&name)) {
                doomed.push(id);
                continue;
            }
            stack.extend(self.children(id));
        }

        for &id in &doomed {
            self.detach(id);
        }
        doomed.len()
    }

    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// First element with the given tag name, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if self.element_name(id) == Some(tag) {
                return Some(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// The `body` element, or the document root for fragments without one.
    pub fn body(&self) -> NodeId {
        self.find_by_tag("body").unwrap_or(self.document)
    }

    /// Flatten the descendants of `root` (elements and text only) in
    /// document order.
    pub fn flatten(&self, root: NodeId) -> Vec<FlatNode> {
        let mut out = Vec::new();
        self.flatten_into(root, None, &mut out);
        out
    }

    fn flatten_into(&self, id: NodeId, parent: Option<usize>, out: &mut Vec<FlatNode>) {
        for child in self.children(id) {
            let is_element = match self.get(child).map(|n| &n.data) {
                Some(NodeData::Element { .. }) => true,
                Some(NodeData::Text(_)) => false,
                _ => continue,
            };

            let index = out.len();
            out.push(FlatNode {
                id: child,
                parent,
                end: index + 1,
            });
            if is_element {
                self.flatten_into(child, Some(index), out);
            }
            out[index].end = out.len();
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Element accessors.
impl Dom {
    /// Local tag name of an element.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name.local.as_ref()),
            _ => None,
        })
    }

    pub fn element_attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// All descendant text with whitespace runs collapsed to single spaces.
    pub fn collect_text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        self.collect_text_recursive(id, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text_recursive(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) | Some(NodeData::Document) => {
                for child in self.children(id) {
                    let block = self
                        .element_name(child)
                        .is_some_and(|tag| BLOCK_ELEMENTS.contains(&tag));
                    if block {
                        out.push(' ');
                    }
                    self.collect_text_recursive(child, out);
                    if block {
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse the level out of a heading tag name.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}
