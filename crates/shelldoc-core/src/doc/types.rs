//! Types for representing extracted documentation

/// Kind of documented entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Class,
    Method,
    Property,
}

impl NodeKind {
    /// Element name used for this kind in intermediate markup
    pub fn element_name(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Class => "Class",
            NodeKind::Method => "Method",
            NodeKind::Property => "Property",
        }
    }

    /// Inverse of [`NodeKind::element_name`]
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "Module" => Some(NodeKind::Module),
            "Class" => Some(NodeKind::Class),
            "Method" => Some(NodeKind::Method),
            "Property" => Some(NodeKind::Property),
            _ => None,
        }
    }

    /// Get the display name for the node kind
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Class => "Class",
            NodeKind::Method => "Method",
            NodeKind::Property => "Property",
        }
    }

    /// Classes and modules get their own page section; members are table rows
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Module | NodeKind::Class)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A documented parameter, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    pub name: String,
    pub type_hint: Option<String>,
    pub description: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Documented return value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Returns {
    pub type_hint: Option<String>,
    pub description: String,
}

/// Any other block tag (`@deprecated`, `@since`, `@see`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// One documented entity and the entities nested under it
///
/// Children are owned by value, so a tree cannot contain cycles or shared
/// nodes. The root of every extracted tree is a [`NodeKind::Module`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationNode {
    pub kind: NodeKind,
    pub name: String,
    /// Free text; paragraphs are separated by blank lines
    pub summary: String,
    pub parameters: Vec<Parameter>,
    pub returns: Option<Returns>,
    /// Declared or `@type`-tagged type of a property
    pub type_hint: Option<String>,
    pub tags: Vec<Tag>,
    pub children: Vec<DocumentationNode>,
}

impl DocumentationNode {
    /// Create an undocumented node
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            summary: String::new(),
            parameters: Vec::new(),
            returns: None,
            type_hint: None,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create the root node for a source file
    pub fn module(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Module, name)
    }

    /// Set the summary
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: DocumentationNode) {
        self.children.push(child);
    }

    /// Child classes, in source order
    pub fn classes(&self) -> impl DoubleEndedIterator<Item = &DocumentationNode> {
        self.children.iter().filter(|c| c.kind.is_container())
    }

    /// Child methods and properties, in source order
    pub fn members(&self) -> impl DoubleEndedIterator<Item = &DocumentationNode> {
        self.children.iter().filter(|c| !c.kind.is_container())
    }

    /// Pre-order traversal of this node and all descendants
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// One-line signature for display
    pub fn signature(&self) -> String {
        match self.kind {
            NodeKind::Module => format!("module {}", self.name),
            NodeKind::Class => format!("class {}", self.name),
            NodeKind::Property => match &self.type_hint {
                Some(ty) => format!("{}: {}", self.name, ty),
                None => self.name.clone(),
            },
            NodeKind::Method => {
                let params: Vec<_> = self
                    .parameters
                    .iter()
                    .map(|p| match &p.type_hint {
                        Some(ty) => format!("{}: {}", p.name, ty),
                        None => p.name.clone(),
                    })
                    .collect();
                let mut sig = format!("{}({})", self.name, params.join(", "));
                if let Some(ty) = self.returns.as_ref().and_then(|r| r.type_hint.as_ref()) {
                    sig.push_str(" -> ");
                    sig.push_str(ty);
                }
                sig
            }
        }
    }
}

/// Iterator returned by [`DocumentationNode::walk`]
pub struct Walk<'a> {
    stack: Vec<&'a DocumentationNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DocumentationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Outcome of the pipeline for one successfully indexed source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndexEntry {
    /// Name shown on the index page (the source file stem)
    pub display_name: String,
    /// Page file name relative to the output directory
    pub output_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentationNode {
        let mut module = DocumentationNode::module("a");
        let mut class = DocumentationNode::new(NodeKind::Class, "Foo");
        let mut bar = DocumentationNode::new(NodeKind::Method, "bar");
        bar.parameters.push(Parameter::new("x").with_type("int"));
        bar.parameters.push(Parameter::new("y"));
        bar.returns = Some(Returns {
            type_hint: Some("bool".to_string()),
            description: String::new(),
        });
        class.add_child(bar);
        module.add_child(class);
        module.add_child(DocumentationNode::new(NodeKind::Property, "VERSION"));
        module
    }

    #[test]
    fn element_names_round_trip() {
        for kind in [
            NodeKind::Module,
            NodeKind::Class,
            NodeKind::Method,
            NodeKind::Property,
        ] {
            assert_eq!(NodeKind::from_element_name(kind.element_name()), Some(kind));
        }
        assert_eq!(NodeKind::from_element_name("param"), None);
    }

    #[test]
    fn walk_is_pre_order() {
        let module = sample();
        let names: Vec<_> = module.walk().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "Foo", "bar", "VERSION"]);
        assert_eq!(module.node_count(), 4);
    }

    #[test]
    fn classes_and_members_split_children() {
        let module = sample();
        assert_eq!(module.classes().count(), 1);
        assert_eq!(module.members().map(|m| m.name.as_str()).collect::<Vec<_>>(), ["VERSION"]);
    }

    #[test]
    fn method_signature() {
        let module = sample();
        let bar = &module.children[0].children[0];
        assert_eq!(bar.signature(), "bar(x: int, y) -> bool");
    }

    #[test]
    fn property_signature() {
        let mut prop = DocumentationNode::new(NodeKind::Property, "visible");
        assert_eq!(prop.signature(), "visible");
        prop.type_hint = Some("boolean".to_string());
        assert_eq!(prop.signature(), "visible: boolean");
    }
}
