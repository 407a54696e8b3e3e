// ABOUTME: Shape factory for slide content
// ABOUTME: Builds the empty slide skeleton, picture shapes and text boxes

use crate::errors::{PptxError, Result};
use crate::media;
use crate::relationships::{reltype, RelationshipLedger};
use crate::utils;
use crate::xml::{make_element, Element};
use log::info;
use std::path::Path;

/// English Metric Units per pixel
pub const EMU_PER_PIXEL: u64 = 12667;

/// Slide size of the bundled template, in EMUs
pub const SLIDE_WIDTH: u64 = 10080625;
pub const SLIDE_HEIGHT: u64 = 7559675;

/// Notes page size, in EMUs
pub const NOTES_WIDTH: u64 = 7559675;
pub const NOTES_HEIGHT: u64 = 10691812;

/// Default on-slide position of a picture
pub const PICTURE_OFFSET: (u64, u64) = (3887640, 2838240);

/// Horizontal margin used for left and right aligned pictures
pub const PICTURE_MARGIN: u64 = 504000;

/// Position and size of a text box
pub const TEXT_BOX_OFFSET: (u64, u64) = (504000, 301320);
pub const TEXT_BOX_EXTENT: (u64, u64) = (9071640, 1262160);

/// Language tag of text runs
pub const TEXT_LANGUAGE: &str = "en-GB";

/// Horizontal placement of a picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Options for [`picture`]
#[derive(Debug, Clone, PartialEq)]
pub struct PictureOptions {
    pub description: String,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub scale: f64,
    pub alignment: Alignment,
    pub lock_aspect_ratio: bool,
    pub lock_arrowheads: bool,
}

impl Default for PictureOptions {
    fn default() -> Self {
        Self {
            description: "No Description".to_string(),
            pixel_width: None,
            pixel_height: None,
            scale: 1.0,
            alignment: Alignment::Center,
            lock_aspect_ratio: true,
            lock_arrowheads: true,
        }
    }
}

impl PictureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Use this pixel size instead of reading it from the file
    pub fn with_size(mut self, pixel_width: u32, pixel_height: u32) -> Self {
        self.pixel_width = Some(pixel_width);
        self.pixel_height = Some(pixel_height);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A built picture shape and the media file it embeds
#[derive(Debug, Clone)]
pub struct Picture {
    pub element: Element,
    pub media_name: String,
    pub relationship_id: String,
}

/// Convert a pixel length to EMUs
pub fn pixels_to_emu(pixels: u32, scale: f64) -> u64 {
    (f64::from(pixels) * EMU_PER_PIXEL as f64 * scale).round() as u64
}

fn offset_element(tag: &str, x: u64, y: u64) -> Result<Element> {
    make_element(
        tag,
        Some("a"),
        None,
        &[("x", x.to_string().as_str()), ("y", y.to_string().as_str())],
        None,
    )
}

fn extent_element(tag: &str, cx: u64, cy: u64) -> Result<Element> {
    make_element(
        tag,
        Some("a"),
        None,
        &[("cx", cx.to_string().as_str()), ("cy", cy.to_string().as_str())],
        None,
    )
}

fn rect_geometry() -> Result<Element> {
    Ok(Element::with_attrs("prstGeom", Some("a"), &[("prst", "rect")])?
        .with_child(Element::new("avLst", Some("a"))?))
}

/// Skeleton every new slide starts from
pub fn empty_slide() -> Result<Element> {
    let mut sld = Element::new("sld", Some("p"))?;
    sld.declare_namespaces(&["a", "r", "p"])?;

    let nv_grp_sp_pr = Element::new("nvGrpSpPr", Some("p"))?.with_children([
        Element::with_attrs("cNvPr", Some("p"), &[("id", "1"), ("name", "")])?,
        Element::new("cNvGrpSpPr", Some("p"))?,
        Element::new("nvPr", Some("p"))?,
    ]);

    let xfrm = Element::new("xfrm", Some("a"))?.with_children([
        offset_element("off", 0, 0)?,
        extent_element("ext", 0, 0)?,
        offset_element("chOff", 0, 0)?,
        extent_element("chExt", 0, 0)?,
    ]);
    let grp_sp_pr = Element::new("grpSpPr", Some("p"))?.with_child(xfrm);

    let sp_tree = Element::new("spTree", Some("p"))?
        .with_child(nv_grp_sp_pr)
        .with_child(grp_sp_pr);
    sld.push(Element::new("cSld", Some("p"))?.with_child(sp_tree));

    sld.push(
        Element::new("clrMapOvr", Some("p"))?.with_child(Element::new("masterClrMapping", Some("a"))?),
    );

    Ok(sld)
}

fn picture_offset(alignment: Alignment, cx: u64) -> (u64, u64) {
    let (default_x, y) = PICTURE_OFFSET;
    let x = match alignment {
        Alignment::Left => PICTURE_MARGIN,
        Alignment::Center => default_x,
        Alignment::Right => SLIDE_WIDTH.saturating_sub(PICTURE_MARGIN).saturating_sub(cx),
    };
    (x, y)
}

/// Build a picture shape for `image_path`.
///
/// The image is copied into `package_root/ppt/media` and an image relationship
/// is appended to `ledger`. Nothing is copied or allocated when validation or
/// dimension lookup fails.
pub fn picture(
    image_path: &Path,
    ledger: &mut RelationshipLedger,
    package_root: &Path,
    shape_id: u32,
    options: &PictureOptions,
) -> Result<Picture> {
    media::check_image_type(image_path)?;
    utils::validate_file_exists(image_path)?;
    if !options.scale.is_finite() || options.scale <= 0.0 {
        return Err(PptxError::ValidationError(format!(
            "Picture scale must be a positive number, got {}",
            options.scale
        )));
    }

    let media_name = media::media_name(image_path)?;
    let (pixel_width, pixel_height) = match (options.pixel_width, options.pixel_height) {
        (Some(width), Some(height)) => (width, height),
        _ => media::image_dimensions(image_path)?,
    };

    let cx = pixels_to_emu(pixel_width, options.scale);
    let cy = pixels_to_emu(pixel_height, options.scale);
    let (x, y) = picture_offset(options.alignment, cx);
    let relationship_id = ledger.next_id();

    let blip_fill = Element::new("blipFill", Some("p"))?.with_children([
        make_element("blip", Some("a"), None, &[("embed", relationship_id.as_str())], Some("r"))?,
        Element::new("srcRect", Some("a"))?,
        Element::new("stretch", Some("a"))?.with_child(Element::new("fillRect", Some("a"))?),
    ]);

    let mut pic_locks = Vec::new();
    if options.lock_aspect_ratio {
        pic_locks.push(("noChangeAspect", "1"));
    }
    if options.lock_arrowheads {
        pic_locks.push(("noChangeArrowheads", "1"));
    }
    let mut c_nv_pic_pr = Element::new("cNvPicPr", Some("p"))?;
    if !pic_locks.is_empty() {
        c_nv_pic_pr.push(Element::with_attrs("picLocks", Some("a"), &pic_locks)?);
    }

    let nv_pic_pr = Element::new("nvPicPr", Some("p"))?.with_children([
        Element::with_attrs(
            "cNvPr",
            Some("p"),
            &[
                ("id", shape_id.to_string().as_str()),
                ("name", media_name.as_str()),
                ("descr", options.description.as_str()),
            ],
        )?,
        c_nv_pic_pr,
        Element::new("nvPr", Some("p"))?,
    ]);

    let sp_pr = Element::new("spPr", Some("p"))?.with_children([
        Element::new("xfrm", Some("a"))?
            .with_child(offset_element("off", x, y)?)
            .with_child(extent_element("ext", cx, cy)?),
        rect_geometry()?,
    ]);

    let element = Element::new("pic", Some("p"))?
        .with_child(nv_pic_pr)
        .with_child(blip_fill)
        .with_child(sp_pr);

    media::copy_into_package(image_path, package_root, &media_name)?;
    let allocated = ledger.allocate(reltype::IMAGE, &format!("../media/{}", media_name));
    debug_assert_eq!(allocated, relationship_id);

    info!(
        "Built picture {} ({}x{} px, {}x{} EMU) as {}",
        media_name, pixel_width, pixel_height, cx, cy, relationship_id
    );

    Ok(Picture {
        element,
        media_name,
        relationship_id,
    })
}

/// Build a text box holding `text` in a single centred run
pub fn text_box(text: &str, shape_id: u32) -> Result<Element> {
    let nv_sp_pr = Element::new("nvSpPr", Some("p"))?.with_children([
        Element::with_attrs(
            "cNvPr",
            Some("p"),
            &[
                ("id", shape_id.to_string().as_str()),
                ("name", format!("TextShape {}", shape_id).as_str()),
            ],
        )?,
        Element::with_attrs("cNvSpPr", Some("p"), &[("txBox", "1")])?,
        Element::new("nvPr", Some("p"))?,
    ]);

    let (x, y) = TEXT_BOX_OFFSET;
    let (cx, cy) = TEXT_BOX_EXTENT;
    let sp_pr = Element::new("spPr", Some("p"))?.with_children([
        Element::new("xfrm", Some("a"))?
            .with_child(offset_element("off", x, y)?)
            .with_child(extent_element("ext", cx, cy)?),
        rect_geometry()?,
    ]);

    let run = Element::new("r", Some("a"))?.with_children([
        Element::with_attrs("rPr", Some("a"), &[("lang", TEXT_LANGUAGE)])?,
        make_element("t", Some("a"), Some(text), &[], None)?,
    ]);
    let paragraph = Element::new("p", Some("a"))?.with_children([
        Element::with_attrs("pPr", Some("a"), &[("algn", "ctr")])?,
        run,
        Element::new("endParaRPr", Some("a"))?,
    ]);
    let tx_body = Element::new("txBody", Some("p"))?.with_children([
        Element::with_attrs(
            "bodyPr",
            Some("a"),
            &[
                ("anchor", "ctr"),
                ("bIns", "0"),
                ("lIns", "0"),
                ("rIns", "0"),
                ("tIns", "0"),
                ("wrap", "none"),
            ],
        )?,
        paragraph,
    ]);

    Ok(Element::new("sp", Some("p"))?
        .with_child(nv_sp_pr)
        .with_child(sp_pr)
        .with_child(tx_body))
}
