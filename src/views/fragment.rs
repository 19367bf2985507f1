//! Backend-agnostic page content.

use crate::charts::Figure;

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Image from the assets directory, sized in points.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub asset: String,
    pub width: f32,
    pub height: Option<f32>,
}

impl ImageRef {
    pub fn new(asset: impl Into<String>, width: f32, height: Option<f32>) -> Self {
        Self {
            asset: asset.into(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Shade the first data row.
    pub highlight_first_row: bool,
    /// Offer a CSV export button.
    pub exportable: bool,
}

/// Three buttons, each toggling its own panel; images flank the buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapseSection {
    pub buttons: [String; 3],
    pub panels: [String; 3],
    pub left_images: Vec<ImageRef>,
    pub right_images: Vec<ImageRef>,
}

#[derive(Debug, Clone)]
pub enum Block {
    Heading(String),
    Subheading(String),
    Paragraph(Vec<Span>),
    Images(Vec<ImageRef>),
    Table(TableData),
    Chart(Box<Figure>),
    Collapse(CollapseSection),
    Error(String),
}

/// Content of one tab, rendered top to bottom.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub blocks: Vec<Block>,
}

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart(fig) => Some(fig.as_ref()),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableData> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Error(msg) => Some(msg.as_str()),
            _ => None,
        })
    }
}
