// ABOUTME: Package serializer for the openxml-pptx crate
// ABOUTME: Writes slides, relationships, content types and template parts into a ZIP archive

use crate::config::LAYOUT_COUNT;
use crate::errors::{PptxError, Result};
use crate::relationships::RelationshipLedger;
use crate::slide::Slide;
use crate::utils;
use crate::xml::{make_element, Element};
use log::{debug, info};
use std::collections::BTreeSet;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Content types used in `[Content_Types].xml`
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const PNG: &str = "image/png";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
}

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// File extension appended to saved packages
pub const PPTX_SUFFIX: &str = ".pptx";

/// Everything the serializer needs from a document
pub struct PackageContents<'a> {
    pub presentation: &'a Element,
    pub relationships: &'a RelationshipLedger,
    pub slides: &'a [Slide],
    pub media: &'a BTreeSet<String>,
    pub template_dir: &'a Path,
}

/// Build `[Content_Types].xml` for a package with `slide_count` slides
pub fn content_types(slide_count: usize) -> Result<Element> {
    use content_type as ct;

    let mut types = Element::new("Types", Some("ct"))?;
    types.set_default_namespace("ct")?;

    let defaults = [
        ("rels", ct::RELATIONSHIPS),
        ("xml", ct::XML),
        ("jpeg", ct::JPEG),
        ("jpg", ct::JPEG),
        ("gif", ct::GIF),
        ("png", ct::PNG),
    ];
    for (extension, content_type) in defaults {
        types.push(make_element(
            "Default",
            Some("ct"),
            None,
            &[("Extension", extension), ("ContentType", content_type)],
            None,
        )?);
    }

    let mut overrides: Vec<(String, &str)> = vec![
        ("/_rels/.rels".to_string(), ct::RELATIONSHIPS),
        (format!("/{}", PRESENTATION_RELS_PART), ct::RELATIONSHIPS),
        (format!("/{}", PRESENTATION_PART), ct::PRESENTATION),
        ("/ppt/theme/theme1.xml".to_string(), ct::THEME),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), ct::SLIDE_MASTER),
        (
            "/ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            ct::RELATIONSHIPS,
        ),
    ];
    for i in 1..=LAYOUT_COUNT {
        overrides.push((
            format!("/ppt/slideLayouts/slideLayout{}.xml", i),
            ct::SLIDE_LAYOUT,
        ));
        overrides.push((
            format!("/ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i),
            ct::RELATIONSHIPS,
        ));
    }
    for i in 1..=slide_count {
        overrides.push((format!("/ppt/slides/slide{}.xml", i), ct::SLIDE));
        overrides.push((
            format!("/ppt/slides/_rels/slide{}.xml.rels", i),
            ct::RELATIONSHIPS,
        ));
    }

    for (part_name, content_type) in &overrides {
        types.push(make_element(
            "Override",
            Some("ct"),
            None,
            &[("PartName", part_name.as_str()), ("ContentType", *content_type)],
            None,
        )?);
    }

    Ok(types)
}

/// Whether a template file belongs in the archive
fn include_template_file(path: &Path, media: &BTreeSet<String>) -> bool {
    let is_xml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "xml" || ext == "rels")
        .unwrap_or(false);
    let is_media = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| media.contains(name))
        .unwrap_or(false);
    is_xml || is_media
}

fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    written: &mut BTreeSet<String>,
    name: String,
    data: &[u8],
) -> Result<()> {
    debug!("Writing part {}", name);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    zip.start_file(name.as_str(), options)?;
    zip.write_all(data)?;
    written.insert(name);
    Ok(())
}

/// Serialize a package into `writer` and return the writer
pub fn write_package<W: Write + Seek>(writer: W, contents: &PackageContents) -> Result<W> {
    let template_dir = contents.template_dir;
    if !template_dir.is_dir() {
        return Err(PptxError::MissingTemplate(template_dir.to_path_buf()));
    }

    let mut zip = ZipWriter::new(writer);
    let mut written = BTreeSet::new();

    info!("Creating PPTX structure: {}", CONTENT_TYPES_PART);
    let content_types_xml = content_types(contents.slides.len())?.to_xml()?;
    add_part(
        &mut zip,
        &mut written,
        CONTENT_TYPES_PART.to_string(),
        &content_types_xml,
    )?;

    info!("Creating PPTX structure: {}", PRESENTATION_PART);
    add_part(
        &mut zip,
        &mut written,
        PRESENTATION_PART.to_string(),
        &contents.presentation.to_xml()?,
    )?;

    info!("Creating PPTX structure: {}", PRESENTATION_RELS_PART);
    add_part(
        &mut zip,
        &mut written,
        PRESENTATION_RELS_PART.to_string(),
        &contents.relationships.to_xml()?,
    )?;

    for slide in contents.slides {
        info!("Creating slide XML: {}", slide.part_name());
        add_part(&mut zip, &mut written, slide.part_name(), &slide.to_xml()?)?;
        add_part(
            &mut zip,
            &mut written,
            slide.rels_part_name(),
            &slide.rels_xml()?,
        )?;
    }

    info!("Adding template parts from {:?}", template_dir);
    for file in utils::list_files_recursive(template_dir)? {
        let name = utils::archive_name(template_dir, &file)?;
        if !include_template_file(&file, contents.media) {
            debug!("Skipping template file {}", name);
            continue;
        }
        if written.contains(&name) {
            debug!("Template file {} replaced by generated part", name);
            continue;
        }
        let data = fs::read(&file)?;
        add_part(&mut zip, &mut written, name, &data)?;
    }

    info!("Finalizing PPTX file");
    Ok(zip.finish()?)
}

/// Append the `.pptx` suffix unless the path already carries it
pub fn with_pptx_suffix(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if text.ends_with(PPTX_SUFFIX) {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{}{}", text, PPTX_SUFFIX))
    }
}

/// Write a package to `output`. The archive is built in a temporary file next
/// to the destination and renamed into place once complete.
pub fn save_package(output: &Path, contents: &PackageContents) -> Result<()> {
    utils::ensure_parent_directory_exists(output)?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".pptx-");
    // Published files get the umask-derived mode of File::create
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder
        .tempfile_in(parent)
        .map_err(|source| PptxError::InvalidOutputPath {
            path: output.to_path_buf(),
            source,
        })?;
    write_package(temp.as_file(), contents)?;
    temp.persist(output)
        .map_err(|e| PptxError::InvalidOutputPath {
            path: output.to_path_buf(),
            source: e.error,
        })?;

    info!("PPTX file created at {:?}", output);
    Ok(())
}
