//! Phase 1 of the document build: dry-run pagination.
//!
//! Walks the flowable queue against the page geometry with a simple height
//! model and assigns a page number to every block. TOC entries fall out of
//! this pass as an explicit accumulator: one entry per heading at the page
//! the heading landed on. No rendering happens here, so the pass is pure
//! and cheap to re-run.

use crate::flowable::{Flowable, PageTemplate, TextStyle, TocEntry};
use crate::style::PageGeometry;

const HEADING_HEIGHT_MM: f64 = 8.0;
const LINE_HEIGHT_MM: f64 = 5.0;
const SMALL_LINE_HEIGHT_MM: f64 = 3.5;
const TABLE_ROW_HEIGHT_MM: f64 = 6.5;
const CAPTION_HEIGHT_MM: f64 = 5.0;
const CHARS_PER_LINE: usize = 90;
const SMALL_CHARS_PER_LINE: usize = 110;

/// Result of the dry-run: the page each flowable starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMap {
    pub page_of: Vec<u32>,
    pub page_count: u32,
}

fn paragraph_lines(text: &str, chars_per_line: usize) -> usize {
    text.lines()
        .map(|line| line.chars().count().div_ceil(chars_per_line).max(1))
        .sum::<usize>()
        .max(1)
}

fn block_height(flowable: &Flowable) -> f64 {
    match flowable {
        Flowable::Heading { .. } => HEADING_HEIGHT_MM,
        Flowable::Paragraph { text, style } => match style {
            TextStyle::Small => {
                paragraph_lines(text, SMALL_CHARS_PER_LINE) as f64 * SMALL_LINE_HEIGHT_MM
            }
            _ => paragraph_lines(text, CHARS_PER_LINE) as f64 * LINE_HEIGHT_MM,
        },
        Flowable::Table(table) => table.line_count() as f64 * TABLE_ROW_HEIGHT_MM,
        Flowable::Image(image) => {
            image.height_mm
                + if image.caption.is_some() {
                    CAPTION_HEIGHT_MM
                } else {
                    0.0
                }
        }
        Flowable::PageBreak | Flowable::SwitchTemplate(_) => 0.0,
    }
}

/// Assigns every flowable a page number.
///
/// The first page uses the [`PageTemplate::FirstPage`] frame; a
/// [`Flowable::SwitchTemplate`] changes the frame height of pages started
/// afterwards. A block taller than a whole frame consumes exactly one page.
pub fn paginate(flowables: &[Flowable], geometry: &PageGeometry) -> PageMap {
    let mut template = PageTemplate::FirstPage;
    let mut page: u32 = 1;
    let mut remaining = geometry.frame_height(true);
    let mut page_of = Vec::with_capacity(flowables.len());

    for flowable in flowables {
        match flowable {
            Flowable::SwitchTemplate(next) => {
                template = *next;
                page_of.push(page);
            }
            Flowable::PageBreak => {
                page_of.push(page);
                page += 1;
                remaining = geometry.frame_height(template == PageTemplate::FirstPage);
            }
            _ => {
                let height = block_height(flowable);
                if height > remaining {
                    page += 1;
                    remaining = geometry.frame_height(template == PageTemplate::FirstPage);
                }
                page_of.push(page);
                remaining = (remaining - height).max(0.0);
            }
        }
    }

    PageMap {
        page_of,
        page_count: page,
    }
}

/// Collects TOC entries from the headings in the queue using the page map
/// produced by [`paginate`].
pub fn collect_toc(flowables: &[Flowable], map: &PageMap) -> Vec<TocEntry> {
    flowables
        .iter()
        .zip(&map.page_of)
        .filter_map(|(flowable, page)| match flowable {
            Flowable::Heading { level, text } => Some(TocEntry {
                level: level.toc_level(),
                text: text.clone(),
                page: *page,
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowable::{HeadingLevel, TableBlock};

    fn geometry() -> PageGeometry {
        PageGeometry::default()
    }

    #[test]
    fn empty_queue_still_has_one_page() {
        let map = paginate(&[], &geometry());
        assert_eq!(map.page_count, 1);
        assert!(map.page_of.is_empty());
    }

    #[test]
    fn page_break_advances_the_page() {
        let flowables = vec![
            Flowable::paragraph("intro"),
            Flowable::PageBreak,
            Flowable::paragraph("next"),
        ];
        let map = paginate(&flowables, &geometry());
        assert_eq!(map.page_of, vec![1, 1, 2]);
        assert_eq!(map.page_count, 2);
    }

    #[test]
    fn overflow_spills_to_the_next_page() {
        // Fill more than one first-page frame with tall tables.
        let mut table = TableBlock::new(vec![1]);
        for _ in 0..20 {
            table.push_row(vec![crate::flowable::Cell::new("row")]);
        }
        let flowables: Vec<Flowable> =
            (0..4).map(|_| Flowable::Table(table.clone())).collect();
        let map = paginate(&flowables, &geometry());
        assert_eq!(map.page_of[0], 1);
        assert!(map.page_count >= 2);
        // Pages are monotonically non-decreasing.
        assert!(map.page_of.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn toc_records_headings_with_their_pages() {
        let flowables = vec![
            Flowable::heading(HeadingLevel::H1, "MOTOR A"),
            Flowable::paragraph("analysis"),
            Flowable::PageBreak,
            Flowable::heading(HeadingLevel::H2, "Punto 1V"),
        ];
        let map = paginate(&flowables, &geometry());
        let toc = collect_toc(&flowables, &map);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].level, 0);
        assert_eq!(toc[0].text, "MOTOR A");
        assert_eq!(toc[0].page, 1);
        assert_eq!(toc[1].level, 1);
        assert_eq!(toc[1].page, 2);
    }

    #[test]
    fn template_switch_changes_frame_of_later_pages() {
        let first_frame = geometry().frame_height(true);
        let later_frame = geometry().frame_height(false);
        assert!(later_frame > first_frame);

        let flowables = vec![
            Flowable::SwitchTemplate(crate::flowable::PageTemplate::LaterPage),
            Flowable::PageBreak,
            Flowable::paragraph("on a compact-header page"),
        ];
        let map = paginate(&flowables, &geometry());
        assert_eq!(map.page_of, vec![1, 1, 2]);
    }
}
