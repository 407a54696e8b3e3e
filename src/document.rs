// ABOUTME: Document aggregate for the openxml-pptx crate
// ABOUTME: Owns the presentation tree, slides, package relationships and the working directory

use crate::config::Config;
use crate::errors::{PptxError, Result};
use crate::package::{self, PackageContents};
use crate::relationships::{rel_id, reltype, RelationshipLedger};
use crate::shapes::{PictureOptions, NOTES_HEIGHT, NOTES_WIDTH, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::slide::Slide;
use crate::utils;
use crate::xml::Element;
use log::info;
use std::collections::BTreeSet;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Id of the single slide master in `p:sldMasterIdLst`
pub const SLIDE_MASTER_ID: &str = "2147483648";

/// Id of the first entry in `p:sldIdLst`
pub const FIRST_SLIDE_ID: usize = 256;

/// Package relationships that precede the slide relationships (theme, master)
pub const FIXED_PACKAGE_RELATIONSHIPS: usize = 2;

/// Name of the template copy inside the working directory
const TEMPLATE_COPY: &str = "template";

/// An in-progress presentation
#[derive(Debug)]
pub struct Document {
    config: Config,
    presentation: Element,
    slides: Vec<Slide>,
    relationships: RelationshipLedger,
    work_dir: TempDir,
}

fn presentation_skeleton() -> Result<Element> {
    let mut master_id = Element::with_attrs("sldMasterId", Some("p"), &[("id", SLIDE_MASTER_ID)])?;
    master_id.set_attribute(Some("r"), "id", &rel_id(FIXED_PACKAGE_RELATIONSHIPS))?;

    Ok(Element::new("presentation", Some("p"))?.with_children([
        Element::new("sldMasterIdLst", Some("p"))?.with_child(master_id),
        Element::new("sldIdLst", Some("p"))?,
        Element::with_attrs(
            "sldSz",
            Some("p"),
            &[
                ("cx", SLIDE_WIDTH.to_string().as_str()),
                ("cy", SLIDE_HEIGHT.to_string().as_str()),
            ],
        )?,
        Element::with_attrs(
            "notesSz",
            Some("p"),
            &[
                ("cx", NOTES_WIDTH.to_string().as_str()),
                ("cy", NOTES_HEIGHT.to_string().as_str()),
            ],
        )?,
    ]))
}

fn package_relationships() -> RelationshipLedger {
    let mut ledger = RelationshipLedger::new();
    ledger.allocate(reltype::THEME, "theme/theme1.xml");
    ledger.allocate(reltype::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    ledger.allocate(reltype::SLIDE, "slides/slide1.xml");
    ledger
}

impl Document {
    /// Create a document from the default configuration
    pub fn create() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a document, copying the configured template into a private
    /// working directory
    pub fn with_config(config: Config) -> Result<Self> {
        if !config.template_dir.is_dir() {
            return Err(PptxError::MissingTemplate(config.template_dir.clone()));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("pptx-");
        let work_dir = match &config.scratch_dir {
            Some(dir) => {
                utils::ensure_directory_exists(dir)?;
                builder.tempdir_in(dir)?
            }
            None => builder.tempdir()?,
        };

        let template_copy = work_dir.path().join(TEMPLATE_COPY);
        let copied = utils::copy_dir_recursive(&config.template_dir, &template_copy)?;
        info!(
            "Copied {} template files from {:?} to {:?}",
            copied, config.template_dir, template_copy
        );

        Ok(Self {
            config,
            presentation: presentation_skeleton()?,
            slides: Vec::new(),
            relationships: package_relationships(),
            work_dir,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The working copy of the template tree
    pub fn template_dir(&self) -> PathBuf {
        self.work_dir.path().join(TEMPLATE_COPY)
    }

    pub fn presentation(&self) -> &Element {
        &self.presentation
    }

    pub fn relationships(&self) -> &RelationshipLedger {
        &self.relationships
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Append a new slide and return it
    pub fn add_slide(&mut self) -> Result<&mut Slide> {
        let number = self.slides.len() + 1;
        let slide_rel_id = rel_id(FIXED_PACKAGE_RELATIONSHIPS + number);

        // The first slide relationship is part of the seed
        if self.relationships.get(&slide_rel_id).is_none() {
            let allocated = self
                .relationships
                .allocate(reltype::SLIDE, &format!("slides/slide{}.xml", number));
            debug_assert_eq!(allocated, slide_rel_id);
        }

        let slide = Slide::new(number, &self.template_dir(), &self.config.layout_target())?;

        let mut slide_id = Element::with_attrs(
            "sldId",
            Some("p"),
            &[("id", (FIRST_SLIDE_ID + number - 1).to_string().as_str())],
        )?;
        slide_id.set_attribute(Some("r"), "id", &slide_rel_id)?;
        self.presentation
            .find_mut(&["sldIdLst"])
            .ok_or_else(|| {
                PptxError::ValidationError("Presentation has no slide id list".to_string())
            })?
            .push(slide_id);

        info!("Added slide {} ({})", number, slide_rel_id);
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        Ok(&mut self.slides[last])
    }

    /// Slide by its 1-based number
    pub fn slide_mut(&mut self, number: usize) -> Result<&mut Slide> {
        number
            .checked_sub(1)
            .and_then(|index| self.slides.get_mut(index))
            .ok_or(PptxError::SlideNotFound(number))
    }

    pub fn add_picture(
        &mut self,
        number: usize,
        path: impl AsRef<Path>,
        options: &PictureOptions,
    ) -> Result<()> {
        self.slide_mut(number)?.add_picture(path, options)
    }

    pub fn add_text_box(&mut self, number: usize, text: &str) -> Result<()> {
        self.slide_mut(number)?.add_text_box(text)
    }

    /// Basenames of all media referenced by any slide
    pub fn media(&self) -> BTreeSet<String> {
        self.slides
            .iter()
            .flat_map(|slide| slide.media().iter().cloned())
            .collect()
    }

    fn check_not_empty(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(PptxError::EmptyPresentation);
        }
        Ok(())
    }

    /// Save the presentation, appending `.pptx` to the path when missing.
    /// Returns the path written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        self.check_not_empty()?;
        let output = package::with_pptx_suffix(path.as_ref());
        info!("Saving presentation with {} slides to {:?}", self.slides.len(), output);

        let media = self.media();
        let template_dir = self.template_dir();
        package::save_package(
            &output,
            &PackageContents {
                presentation: &self.presentation,
                relationships: &self.relationships,
                slides: &self.slides,
                media: &media,
                template_dir: &template_dir,
            },
        )?;
        Ok(output)
    }

    /// Write the archive into any seekable sink and return it
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        self.check_not_empty()?;
        let media = self.media();
        let template_dir = self.template_dir();
        package::write_package(
            writer,
            &PackageContents {
                presentation: &self.presentation,
                relationships: &self.relationships,
                slides: &self.slides,
                media: &media,
                template_dir: &template_dir,
            },
        )
    }

    /// The archive as bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Remove the working directory
    pub fn close(self) -> Result<()> {
        info!("Removing working directory {:?}", self.work_dir.path());
        self.work_dir.close()?;
        Ok(())
    }
}
