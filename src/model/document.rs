//! Word document content.

use super::TableData;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Highest heading level accepted by Word's built-in heading styles.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// Staged content of a Word document, in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl DocumentContent {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading. Level must be within `1..=9`.
    pub fn push_heading(&mut self, text: impl Into<String>, level: u8) -> Result<()> {
        if !(1..=MAX_HEADING_LEVEL).contains(&level) {
            return Err(Error::invalid(format!(
                "heading level {} outside 1..={}",
                level, MAX_HEADING_LEVEL
            )));
        }
        self.blocks.push(Block::Heading {
            text: text.into(),
            level,
        });
        Ok(())
    }

    /// Append a paragraph.
    pub fn push_paragraph(&mut self, text: impl Into<String>, alignment: Alignment) {
        self.blocks.push(Block::Paragraph {
            text: text.into(),
            alignment,
        });
    }

    /// Append a table that has already been validated.
    pub fn push_table(&mut self, table: TableData) {
        self.blocks.push(Block::Table(table));
    }

    /// Append a page break.
    pub fn push_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Number of staged blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text of all blocks, one line per heading or paragraph.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading { text, .. } | Block::Paragraph { text, .. } => {
                    out.push_str(text);
                    out.push('\n');
                }
                Block::Table(table) => {
                    for row in table.all_rows() {
                        out.push_str(&row.join("\t"));
                        out.push('\n');
                    }
                }
                Block::PageBreak => {}
            }
        }
        out
    }
}

/// A block-level element of a Word document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Heading with level 1-9
    Heading { text: String, level: u8 },

    /// Body paragraph
    Paragraph { text: String, alignment: Alignment },

    /// Table
    Table(TableData),

    /// Hard page break
    PageBreak,
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl std::str::FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" | "justified" => Ok(Alignment::Justify),
            other => Err(Error::invalid(format!("unknown alignment: {}", other))),
        }
    }
}
