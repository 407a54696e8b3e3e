// ABOUTME: Namespace registry for OOXML element construction
// ABOUTME: Maps short prefixes to namespace URIs through an immutable compile-time table

use crate::errors::{PptxError, Result};
use phf::phf_map;

static NAMESPACES: phf::Map<&'static str, &'static str> = phf_map! {
    // Documents, drawings and relationships
    "mv" => "urn:schemas-microsoft-com:mac:vml",
    "mo" => "http://schemas.microsoft.com/office/mac/office/2008/main",
    "ve" => "http://schemas.openxmlformats.org/markup-compatibility/2006",
    "o" => "urn:schemas-microsoft-com:office:office",
    "r" => "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
    "m" => "http://schemas.openxmlformats.org/officeDocument/2006/math",
    "v" => "urn:schemas-microsoft-com:vml",
    "w" => "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    "p" => "http://schemas.openxmlformats.org/presentationml/2006/main",
    "sl" => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
    "w10" => "urn:schemas-microsoft-com:office:word",
    "wne" => "http://schemas.microsoft.com/office/word/2006/wordml",
    "i" => "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image",
    // Drawing
    "wp" => "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing",
    "pd" => "http://schemas.openxmlformats.org/drawingml/2006/presentationDrawing",
    "a" => "http://schemas.openxmlformats.org/drawingml/2006/main",
    "pic" => "http://schemas.openxmlformats.org/drawingml/2006/picture",
    // Core and extended properties
    "cp" => "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    "dc" => "http://purl.org/dc/elements/1.1/",
    "dcterms" => "http://purl.org/dc/terms/",
    "dcmitype" => "http://purl.org/dc/dcmitype/",
    "xsi" => "http://www.w3.org/2001/XMLSchema-instance",
    "ep" => "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
    // Package parts
    "ct" => "http://schemas.openxmlformats.org/package/2006/content-types",
    "pr" => "http://schemas.openxmlformats.org/package/2006/relationships",
};

/// A namespace resolved from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

/// Resolve a prefix to its namespace
pub fn resolve(prefix: &str) -> Result<Namespace> {
    NAMESPACES
        .get_entry(prefix)
        .map(|(prefix, uri)| Namespace {
            prefix: *prefix,
            uri: *uri,
        })
        .ok_or_else(|| PptxError::UnknownNamespacePrefix(prefix.to_string()))
}

/// Look up the URI for a prefix
pub fn uri(prefix: &str) -> Result<&'static str> {
    resolve(prefix).map(|ns| ns.uri)
}
