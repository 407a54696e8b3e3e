// ABOUTME: Relationship ledger for slides and the presentation part
// ABOUTME: Allocates rIds in order and renders `.rels` parts

use crate::errors::Result;
use crate::xml::{make_element, Element};

/// Relationship type URIs used by the generated package
pub mod reltype {
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// A typed reference from one part to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Ordered relationships of a single part. Ids are `rId1`, `rId2`, ... in
/// allocation order and entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipLedger {
    entries: Vec<Relationship>,
}

/// Format a relationship id
pub fn rel_id(n: usize) -> String {
    format!("rId{}", n)
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to [`RelationshipLedger::allocate`] will return
    pub fn next_id(&self) -> String {
        rel_id(self.entries.len() + 1)
    }

    /// Append a relationship and return its id
    pub fn allocate(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    pub fn entries(&self) -> &[Relationship] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the `Relationships` element. Entries keep ledger order and their
    /// stored ids.
    pub fn to_element(&self) -> Result<Element> {
        let mut root = Element::new("Relationships", Some("pr"))?;
        root.set_default_namespace("pr")?;
        for rel in &self.entries {
            root.push(make_element(
                "Relationship",
                Some("pr"),
                None,
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type.as_str()),
                    ("Target", rel.target.as_str()),
                ],
                None,
            )?);
        }
        Ok(root)
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.to_element()?.to_xml()
    }
}
