// ABOUTME: Configuration module for the openxml-pptx crate
// ABOUTME: Provides document settings and environment variable handling

use crate::errors::{PptxError, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

/// Number of slide layouts in the bundled template
pub const LAYOUT_COUNT: usize = 12;

/// Layout used by new slides unless configured otherwise
pub const DEFAULT_SLIDE_LAYOUT: usize = 2;

/// Settings passed to a document at creation time
#[derive(Debug, Clone)]
pub struct Config {
    /// Template tree holding the slide master, layouts, theme and `_rels/.rels`
    pub template_dir: PathBuf,
    /// Where working directories are created; the system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
    /// 1-based index of the slide layout new slides point at
    pub slide_layout: usize,
}

/// Template shipped with the crate
pub fn bundled_template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("template")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: bundled_template_dir(),
            scratch_dir: None,
            slide_layout: DEFAULT_SLIDE_LAYOUT,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let template_dir = env::var("PPTX_TEMPLATE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(bundled_template_dir);
        let scratch_dir = env::var("PPTX_SCRATCH_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let slide_layout = match env::var("PPTX_SLIDE_LAYOUT") {
            Ok(value) => match value.parse::<usize>() {
                Ok(layout) if (1..=LAYOUT_COUNT).contains(&layout) => layout,
                _ => {
                    warn!(
                        "Ignoring PPTX_SLIDE_LAYOUT={:?}; expected 1-{}. Using layout {}.",
                        value, LAYOUT_COUNT, DEFAULT_SLIDE_LAYOUT
                    );
                    DEFAULT_SLIDE_LAYOUT
                }
            },
            Err(_) => DEFAULT_SLIDE_LAYOUT,
        };

        Self {
            template_dir,
            scratch_dir,
            slide_layout,
        }
    }

    pub fn with_template_dir(mut self, template_dir: impl Into<PathBuf>) -> Self {
        self.template_dir = template_dir.into();
        self
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(scratch_dir.into());
        self
    }

    /// Select the layout new slides reference
    pub fn with_slide_layout(mut self, layout: usize) -> Result<Self> {
        if !(1..=LAYOUT_COUNT).contains(&layout) {
            return Err(PptxError::ConfigError(format!(
                "Slide layout must be between 1 and {}, got {}",
                LAYOUT_COUNT, layout
            )));
        }
        self.slide_layout = layout;
        Ok(self)
    }

    /// Relationship target of the configured layout, relative to a slide part
    pub fn layout_target(&self) -> String {
        format!("../slideLayouts/slideLayout{}.xml", self.slide_layout)
    }
}
