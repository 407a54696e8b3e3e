// ABOUTME: Library module for the openxml-pptx crate.
// ABOUTME: Builds slide XML, tracks relationships and media, and writes .pptx packages.

// Reexport modules
pub mod config;
pub mod document;
pub mod errors;
pub mod media;
pub mod namespaces;
pub mod package;
pub mod relationships;
pub mod shapes;
pub mod slide;
pub mod utils;
pub mod xml;

// Reexport common types and functions
pub use config::Config;
pub use document::Document;
pub use errors::{PptxError, Result};
pub use relationships::{Relationship, RelationshipLedger};
pub use shapes::{Alignment, PictureOptions};
pub use slide::Slide;
pub use xml::{make_element, Element};
