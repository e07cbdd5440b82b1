//! Intermediate XML markup for documentation trees
//!
//! Each node becomes an element named after its kind with a `name`
//! attribute. Its documentation follows as `<summary>`, `<type>`, `<param>`,
//! `<returns>` and `<tag>` children, then its child nodes in order:
//!
//! ```xml
//! <Module name="panel">
//!   <Class name="Panel">
//!     <summary>The main panel.</summary>
//!     <Method name="show">
//!       <param name="animate" type="bool">whether to animate</param>
//!       <returns type="bool">true on success</returns>
//!     </Method>
//!   </Class>
//! </Module>
//! ```
//!
//! Text is only ever stored in element content, so newlines survive a
//! round trip through [`serialize`] and [`parse`].

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};
use sxd_document::{parser, writer, Package};

use super::error::{RenderError, SerializeError};
use super::types::{DocumentationNode, NodeKind, Parameter, Returns, Tag};

/// Deepest tree the serializer accepts
pub const MAX_DEPTH: usize = 64;

/// Largest tree the serializer accepts
pub const MAX_NODES: usize = 100_000;

/// Serialize a documentation tree to markup
pub fn serialize(node: &DocumentationNode) -> Result<String, SerializeError> {
    check_bounds(node)?;

    let package = Package::new();
    let doc = package.as_document();
    let root = build_element(&doc, node);
    doc.root().append_child(root);

    let mut output = Vec::new();
    writer::format_document(&doc, &mut output)?;
    Ok(String::from_utf8(output)?)
}

fn check_bounds(node: &DocumentationNode) -> Result<(), SerializeError> {
    let mut stack = vec![(node, 1usize)];
    let mut count = 0usize;
    while let Some((node, depth)) = stack.pop() {
        count += 1;
        if count > MAX_NODES {
            return Err(SerializeError::TooLarge { max: MAX_NODES });
        }
        if depth > MAX_DEPTH {
            return Err(SerializeError::TooDeep { max: MAX_DEPTH });
        }
        stack.extend(node.children.iter().map(|child| (child, depth + 1)));
    }
    Ok(())
}

fn build_element<'d>(doc: &Document<'d>, node: &DocumentationNode) -> Element<'d> {
    let element = doc.create_element(node.kind.element_name());
    element.set_attribute_value("name", &node.name);

    if !node.summary.is_empty() {
        element.append_child(text_element(doc, "summary", &node.summary));
    }
    if let Some(ty) = &node.type_hint {
        element.append_child(text_element(doc, "type", ty));
    }
    for param in &node.parameters {
        let child = text_element(doc, "param", &param.description);
        child.set_attribute_value("name", &param.name);
        if let Some(ty) = &param.type_hint {
            child.set_attribute_value("type", ty);
        }
        element.append_child(child);
    }
    if let Some(returns) = &node.returns {
        let child = text_element(doc, "returns", &returns.description);
        if let Some(ty) = &returns.type_hint {
            child.set_attribute_value("type", ty);
        }
        element.append_child(child);
    }
    for tag in &node.tags {
        let child = text_element(doc, "tag", &tag.value);
        child.set_attribute_value("name", &tag.name);
        element.append_child(child);
    }
    for child in &node.children {
        element.append_child(build_element(doc, child));
    }

    element
}

fn text_element<'d>(doc: &Document<'d>, name: &str, text: &str) -> Element<'d> {
    let element = doc.create_element(name);
    if !text.is_empty() {
        element.append_child(doc.create_text(text));
    }
    element
}

/// Parse markup produced by [`serialize`] back into a tree
pub fn parse(markup: &str) -> Result<DocumentationNode, RenderError> {
    let package = parser::parse(markup).map_err(|e| RenderError::Malformed(format!("{e:?}")))?;
    let doc = package.as_document();
    let root = doc
        .root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
        .ok_or(RenderError::MissingRoot)?;

    read_node(root, 1)
}

fn read_node(element: Element<'_>, depth: usize) -> Result<DocumentationNode, RenderError> {
    let element_name = element.name().local_part().to_string();
    let kind = NodeKind::from_element_name(&element_name)
        .ok_or_else(|| RenderError::UnknownElement(element_name.clone()))?;
    if depth > MAX_DEPTH {
        return Err(RenderError::Malformed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }

    let mut node = DocumentationNode::new(kind, required_name(element)?);
    for child in element.children() {
        let ChildOfElement::Element(child) = child else {
            continue;
        };
        match child.name().local_part() {
            "summary" => node.summary = text_of(child),
            "type" => node.type_hint = Some(text_of(child)),
            "param" => node.parameters.push(Parameter {
                name: required_name(child)?,
                type_hint: child.attribute_value("type").map(str::to_string),
                description: text_of(child),
            }),
            "returns" => {
                node.returns = Some(Returns {
                    type_hint: child.attribute_value("type").map(str::to_string),
                    description: text_of(child),
                });
            }
            "tag" => node.tags.push(Tag {
                name: required_name(child)?,
                value: text_of(child),
            }),
            _ => node.add_child(read_node(child, depth + 1)?),
        }
    }
    Ok(node)
}

fn required_name(element: Element<'_>) -> Result<String, RenderError> {
    element
        .attribute_value("name")
        .map(str::to_string)
        .ok_or_else(|| RenderError::MissingName {
            element: element.name().local_part().to_string(),
        })
}

fn text_of(element: Element<'_>) -> String {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Text(text) => Some(text.text().to_string()),
            _ => None,
        })
        .collect()
}
