// ABOUTME: Element builder for the openxml-pptx crate
// ABOUTME: Builds namespaced XML element trees and serializes them with quick-xml

use crate::errors::{PptxError, Result};
use crate::namespaces::{self, Namespace};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};

/// A name with an optional namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub namespace: Option<Namespace>,
    pub local: String,
}

impl QName {
    fn new(local: &str, namespace: Option<Namespace>) -> Self {
        Self {
            namespace,
            local: local.to_string(),
        }
    }

    /// Name as written in the document. A namespace equal to the in-scope
    /// default namespace is written without a prefix.
    fn qualified(&self, default_namespace: Option<Namespace>) -> String {
        match self.namespace {
            Some(ns) if Some(ns) != default_namespace => format!("{}:{}", ns.prefix, self.local),
            _ => self.local.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// An XML element owning its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: QName,
    attributes: Vec<Attribute>,
    text: Option<String>,
    children: Vec<Element>,
    declared: Vec<Namespace>,
    default_namespace: Option<Namespace>,
}

fn resolve_optional(prefix: Option<&str>) -> Result<Option<Namespace>> {
    prefix.map(namespaces::resolve).transpose()
}

/// Characters allowed in XML 1.0 character data
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Reject text that cannot appear in an XML 1.0 document
pub fn check_xml_text(text: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(PptxError::ValidationError(format!(
            "Text contains a character not allowed in XML: U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}

/// Create an element.
///
/// `prefix` selects the element namespace; `None` leaves it unqualified.
/// Every attribute of the call is placed in `attr_prefix`'s namespace, or left
/// unqualified when it is `None`.
pub fn make_element(
    tag: &str,
    prefix: Option<&str>,
    text: Option<&str>,
    attributes: &[(&str, &str)],
    attr_prefix: Option<&str>,
) -> Result<Element> {
    let namespace = resolve_optional(prefix)?;
    let attr_namespace = resolve_optional(attr_prefix)?;
    if let Some(text) = text {
        check_xml_text(text)?;
    }
    for (_, value) in attributes {
        check_xml_text(value)?;
    }

    Ok(Element {
        name: QName::new(tag, namespace),
        attributes: attributes
            .iter()
            .map(|(name, value)| Attribute {
                name: QName::new(name, attr_namespace),
                value: value.to_string(),
            })
            .collect(),
        text: text.map(str::to_string),
        children: Vec::new(),
        declared: Vec::new(),
        default_namespace: None,
    })
}

impl Element {
    /// Create an element with no text or attributes
    pub fn new(tag: &str, prefix: Option<&str>) -> Result<Self> {
        make_element(tag, prefix, None, &[], None)
    }

    /// Create an element with unqualified attributes
    pub fn with_attrs(tag: &str, prefix: Option<&str>, attributes: &[(&str, &str)]) -> Result<Self> {
        make_element(tag, prefix, None, attributes, None)
    }

    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.name.namespace
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder-style variant of [`Element::push`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set a single attribute, replacing an existing one with the same name
    pub fn set_attribute(&mut self, prefix: Option<&str>, name: &str, value: &str) -> Result<()> {
        check_xml_text(value)?;
        let qname = QName::new(name, resolve_optional(prefix)?);
        match self.attributes.iter_mut().find(|attr| attr.name == qname) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: qname,
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    /// Value of the first attribute with this local name, in any namespace
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.local == name)
            .map(|attr| attr.value.as_str())
    }

    /// Value of an attribute in a specific namespace
    pub fn attribute_ns(&self, prefix: &str, name: &str) -> Option<&str> {
        let namespace = namespaces::resolve(prefix).ok()?;
        self.attributes
            .iter()
            .find(|attr| attr.name.local == name && attr.name.namespace == Some(namespace))
            .map(|attr| attr.value.as_str())
    }

    /// Declare several namespaces as in scope on this element
    pub fn declare_namespaces(&mut self, prefixes: &[&str]) -> Result<()> {
        for prefix in prefixes {
            let namespace = namespaces::resolve(prefix)?;
            if !self.declared.contains(&namespace) {
                self.declared.push(namespace);
            }
        }
        Ok(())
    }

    /// Write this element's namespace as the unprefixed default namespace.
    /// Used for package parts such as `Types` and `Relationships`.
    pub fn set_default_namespace(&mut self, prefix: &str) -> Result<()> {
        self.default_namespace = Some(namespaces::resolve(prefix)?);
        Ok(())
    }

    /// Follow a path of local names from this element
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self
                .children
                .iter()
                .find(|child| child.name.local == *first)
                .and_then(|child| child.find(rest)),
        }
    }

    pub fn find_mut(&mut self, path: &[&str]) -> Option<&mut Element> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self
                .children
                .iter_mut()
                .find(|child| child.name.local == *first)
                .and_then(|child| child.find_mut(rest)),
        }
    }

    /// All elements below this one, depth first in document order
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(&mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            found.push(child);
            child.collect_descendants(found);
        }
    }

    /// Serialize to an indented XML document with a standalone declaration
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut declarations = self.declared.clone();
        self.collect_namespaces(None, &mut declarations);
        self.write(&mut writer, None, &declarations)?;

        Ok(writer.into_inner().into_inner())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        String::from_utf8(self.to_xml()?)
            .map_err(|e| PptxError::ValidationError(format!("Serialized XML is not UTF-8: {}", e)))
    }

    /// Default namespace in scope for this element and its children. An
    /// unqualified element below a default namespace undeclares it.
    fn scoped_default(&self, inherited_default: Option<Namespace>) -> Option<Namespace> {
        match (self.default_namespace, self.name.namespace) {
            (Some(namespace), _) => Some(namespace),
            (None, None) => None,
            (None, Some(_)) => inherited_default,
        }
    }

    // Prefixed namespaces used in this subtree, so the root can declare them
    fn collect_namespaces(&self, inherited_default: Option<Namespace>, found: &mut Vec<Namespace>) {
        let default_namespace = self.scoped_default(inherited_default);
        if let Some(namespace) = self.name.namespace {
            if Some(namespace) != default_namespace {
                note_namespace(found, namespace);
            }
        }
        for attr in &self.attributes {
            if let Some(namespace) = attr.name.namespace {
                note_namespace(found, namespace);
            }
        }
        for child in &self.children {
            child.collect_namespaces(default_namespace, found);
        }
    }

    fn write<W: Write>(
        &self,
        writer: &mut Writer<W>,
        inherited_default: Option<Namespace>,
        declarations: &[Namespace],
    ) -> Result<()> {
        let default_namespace = self.scoped_default(inherited_default);
        let name = self.name.qualified(default_namespace);

        let mut start = BytesStart::new(name.as_str());
        match (self.default_namespace, default_namespace, inherited_default) {
            (Some(namespace), _, _) => start.push_attribute(("xmlns", namespace.uri)),
            (None, None, Some(_)) => start.push_attribute(("xmlns", "")),
            _ => {}
        }
        for namespace in declarations {
            start.push_attribute((format!("xmlns:{}", namespace.prefix).as_str(), namespace.uri));
        }
        for attr in &self.attributes {
            start.push_attribute((attr.name.qualified(None).as_str(), attr.value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write(writer, default_namespace, &child.declared)?;
        }
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }
}

fn note_namespace(found: &mut Vec<Namespace>, namespace: Namespace) {
    if !found.contains(&namespace) {
        found.push(namespace);
    }
}
