//! Presentation and slide types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Staged content of a presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationContent {
    /// Slides in the order they were added
    pub slides: Vec<Slide>,
}

impl PresentationContent {
    /// Create an empty presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide and return it for editing.
    pub fn add_slide(&mut self, layout: SlideLayout) -> &mut Slide {
        self.slides.push(Slide::new(layout));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Get a slide by 0-based index.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Get a mutable slide by 0-based index.
    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        let count = self.slides.len();
        self.slides.get_mut(index).ok_or_else(|| {
            Error::invalid(format!(
                "slide index {} out of range (presentation has {} slides)",
                index, count
            ))
        })
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Layout the slide was created with
    pub layout: SlideLayout,

    /// Title text
    pub title: Option<String>,

    /// Body paragraphs (subtitle for title slides)
    pub body: Vec<String>,

    /// Free-standing text boxes
    pub text_boxes: Vec<TextBox>,
}

impl Slide {
    fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            title: None,
            body: Vec::new(),
            text_boxes: Vec::new(),
        }
    }

    /// Set the slide title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Append a body paragraph.
    pub fn add_body(&mut self, text: impl Into<String>) -> &mut Self {
        self.body.push(text.into());
        self
    }

    /// Add a text box.
    pub fn add_text_box(&mut self, text_box: TextBox) -> Result<&mut Self> {
        text_box.validate()?;
        self.text_boxes.push(text_box);
        Ok(self)
    }
}

/// Slide layouts, named after the default PowerPoint master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideLayout {
    Title,
    #[default]
    TitleAndContent,
    SectionHeader,
    TwoContent,
    Comparison,
    TitleOnly,
    Blank,
    ContentWithCaption,
    PictureWithCaption,
}

impl SlideLayout {
    /// Resolve a layout name; unknown names map to `TitleAndContent`.
    ///
    /// Matching ignores case and treats spaces as underscores.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace(' ', "_").as_str() {
            "title" => SlideLayout::Title,
            "title_and_content" => SlideLayout::TitleAndContent,
            "section_header" => SlideLayout::SectionHeader,
            "two_content" => SlideLayout::TwoContent,
            "comparison" => SlideLayout::Comparison,
            "title_only" => SlideLayout::TitleOnly,
            "blank" => SlideLayout::Blank,
            "content_with_caption" => SlideLayout::ContentWithCaption,
            "picture_with_caption" => SlideLayout::PictureWithCaption,
            _ => SlideLayout::TitleAndContent,
        }
    }

    /// Index in the default master's layout list.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Position and size of a shape, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(1.0, 1.0, 8.0, 1.0)
    }
}

/// A free-standing text box on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub text: String,
    pub position: Rect,
    /// Font size in points
    pub font_size: Option<u32>,
}

impl TextBox {
    /// Text box at the default position.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: Rect::default(),
            font_size: None,
        }
    }

    pub fn at(mut self, position: Rect) -> Self {
        self.position = position;
        self
    }

    pub fn with_font_size(mut self, points: u32) -> Self {
        self.font_size = Some(points);
        self
    }

    fn validate(&self) -> Result<()> {
        let Rect {
            left,
            top,
            width,
            height,
        } = self.position;
        if [left, top, width, height].iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("text box position must be finite"));
        }
        if left < 0.0 || top < 0.0 || width <= 0.0 || height <= 0.0 {
            return Err(Error::invalid(format!(
                "text box position {:?} has negative offset or empty size",
                self.position
            )));
        }
        if let Some(size) = self.font_size {
            if !(1..=4000).contains(&size) {
                return Err(Error::invalid(format!("font size {} outside 1..=4000", size)));
            }
        }
        Ok(())
    }
}
