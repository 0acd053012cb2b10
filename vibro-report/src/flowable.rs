//! The layout block model consumed by the two-phase document build.
//!
//! A report is an ordered queue of [`Flowable`] values. Phase 1
//! ([`crate::layout`]) dry-runs the queue to compute page numbers and TOC
//! entries; phase 2 ([`crate::report`]) converts it into `genpdf` elements.

use crate::style::Rgb;

/// Heading nesting level, mirrored into TOC entry levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
}

impl HeadingLevel {
    pub fn toc_level(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 0,
            HeadingLevel::H2 => 1,
        }
    }
}

/// Character emphasis for paragraph blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Regular,
    Bold,
    Small,
}

/// Which page template the pages after a switch use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    /// Large header: logo, report date, company name.
    FirstPage,
    /// Compact one-line header.
    LaterPage,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub bold: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
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

/// A tabular block: optional colored header row, banded body rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub header: Option<Vec<Cell>>,
    pub rows: Vec<Vec<Cell>>,
    /// Relative column weights.
    pub widths: Vec<usize>,
    pub header_fill: Option<Rgb>,
    /// Alternate-row shading fill for odd rows.
    pub band_fill: Option<Rgb>,
    pub grid: bool,
}

impl TableBlock {
    pub fn new(widths: Vec<usize>) -> Self {
        Self {
            header: None,
            rows: Vec::new(),
            widths,
            header_fill: None,
            band_fill: None,
            grid: false,
        }
    }

    pub fn with_header(mut self, header: Vec<Cell>, fill: Option<Rgb>) -> Self {
        self.header = Some(header);
        self.header_fill = fill;
        self
    }

    pub fn with_band_fill(mut self, fill: Rgb) -> Self {
        self.band_fill = Some(fill);
        self
    }

    pub fn with_grid(mut self) -> Self {
        self.grid = true;
        self
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Body row count plus header.
    pub fn line_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }
}

/// Raster, on-disk, or not-yet-rasterized image data.
///
/// Charts stay unrendered until the emission phase so the dry-run
/// pagination never touches a drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    Bytes(Vec<u8>),
    Path(String),
    Chart(crate::chart::TrendChart),
}

/// An embedded image with its rendered size in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub data: ImageData,
    pub width_mm: f64,
    pub height_mm: f64,
    pub caption: Option<String>,
}

impl ImageBlock {
    pub fn from_bytes(bytes: Vec<u8>, width_mm: f64, height_mm: f64) -> Self {
        Self {
            data: ImageData::Bytes(bytes),
            width_mm,
            height_mm,
            caption: None,
        }
    }

    pub fn from_path(path: impl Into<String>, width_mm: f64, height_mm: f64) -> Self {
        Self {
            data: ImageData::Path(path.into()),
            width_mm,
            height_mm,
            caption: None,
        }
    }

    pub fn from_chart(chart: crate::chart::TrendChart, width_mm: f64, height_mm: f64) -> Self {
        Self {
            data: ImageData::Chart(chart),
            width_mm,
            height_mm,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// An atomic layout block.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Heading { level: HeadingLevel, text: String },
    Paragraph { text: String, style: TextStyle },
    Table(TableBlock),
    Image(ImageBlock),
    PageBreak,
    SwitchTemplate(PageTemplate),
}

impl Flowable {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Flowable::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Flowable::Paragraph {
            text: text.into(),
            style: TextStyle::Regular,
        }
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Flowable::Paragraph {
            text: text.into(),
            style,
        }
    }
}

/// A table-of-contents entry recorded when a heading is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub page: u32,
}
