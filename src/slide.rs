// ABOUTME: Slide aggregate for the openxml-pptx crate
// ABOUTME: Owns one slide's XML tree, relationship ledger and media references

use crate::errors::{PptxError, Result};
use crate::relationships::{reltype, RelationshipLedger};
use crate::shapes::{self, PictureOptions};
use crate::xml::Element;
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Path from the slide root to the shape tree container
const SHAPE_TREE: [&str; 2] = ["cSld", "spTree"];

/// One slide of a presentation
#[derive(Debug, Clone)]
pub struct Slide {
    number: usize,
    tree: Element,
    relationships: RelationshipLedger,
    media: BTreeSet<String>,
    package_root: PathBuf,
    next_shape_id: u32,
}

impl Slide {
    /// Create slide `number` whose layout relationship points at `layout_target`.
    /// Pictures are copied below `package_root`.
    pub fn new(number: usize, package_root: &Path, layout_target: &str) -> Result<Self> {
        let mut relationships = RelationshipLedger::new();
        relationships.allocate(reltype::SLIDE_LAYOUT, layout_target);

        Ok(Self {
            number,
            tree: shapes::empty_slide()?,
            relationships,
            media: BTreeSet::new(),
            package_root: package_root.to_path_buf(),
            // id 1 belongs to the group shape of the shape tree
            next_shape_id: 2,
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn tree(&self) -> &Element {
        &self.tree
    }

    pub fn relationships(&self) -> &RelationshipLedger {
        &self.relationships
    }

    /// Basenames of the media files this slide embeds
    pub fn media(&self) -> &BTreeSet<String> {
        &self.media
    }

    /// Part name of this slide inside the package
    pub fn part_name(&self) -> String {
        format!("ppt/slides/slide{}.xml", self.number)
    }

    /// Part name of this slide's relationships
    pub fn rels_part_name(&self) -> String {
        format!("ppt/slides/_rels/slide{}.xml.rels", self.number)
    }

    fn shape_tree(&mut self) -> Result<&mut Element> {
        let number = self.number;
        self.tree.find_mut(&SHAPE_TREE).ok_or_else(|| {
            PptxError::ValidationError(format!("Slide {} has no shape tree", number))
        })
    }

    /// Add a picture to the slide. On failure the slide is left unchanged.
    pub fn add_picture(&mut self, path: impl AsRef<Path>, options: &PictureOptions) -> Result<()> {
        let path = path.as_ref();
        info!("Adding picture {:?} to slide {}", path, self.number);

        // Fail before touching the ledger if the tree is malformed
        self.shape_tree()?;
        let picture = shapes::picture(
            path,
            &mut self.relationships,
            &self.package_root,
            self.next_shape_id,
            options,
        )?;

        self.shape_tree()?.push(picture.element);
        self.media.insert(picture.media_name);
        self.next_shape_id += 1;
        Ok(())
    }

    /// Add a centred text box to the slide
    pub fn add_text_box(&mut self, text: &str) -> Result<()> {
        info!("Adding text box to slide {}", self.number);
        let shape = shapes::text_box(text, self.next_shape_id)?;
        self.shape_tree()?.push(shape);
        self.next_shape_id += 1;
        Ok(())
    }

    /// Relationship ids referenced by `r:embed` and `r:id` attributes in the tree
    pub fn referenced_ids(&self) -> Vec<String> {
        self.tree
            .descendants()
            .into_iter()
            .flat_map(|element| {
                ["embed", "id"]
                    .into_iter()
                    .filter_map(move |name| element.attribute_ns("r", name))
            })
            .map(str::to_string)
            .collect()
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.tree.to_xml()
    }

    pub fn rels_xml(&self) -> Result<Vec<u8>> {
        self.relationships.to_xml()
    }
}
