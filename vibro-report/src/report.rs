//! Phase 2 of the document build: report assembly and PDF emission.
//!
//! [`ReportBuilder`] turns already-fetched measurement records into the
//! flowable queue, runs the dry-run pagination from [`crate::layout`] to
//! obtain page numbers and TOC entries, and finally converts the queue into
//! `genpdf` elements. Headers and footers are drawn by a page decorator so
//! they repeat on every page; the first page uses the large header template
//! and later pages the compact one.

use std::path::Path;

use genpdf::elements::{FrameCellDecorator, LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, Position, Scale};
use log::debug;

use crate::chart::{summary_rows, SummaryRow, TrendChart, TrendSample};
use crate::error::ReportError;
use crate::flowable::{
    Cell, Flowable, HeadingLevel, ImageBlock, ImageData, PageTemplate, TableBlock, TextStyle,
    TocEntry,
};
use crate::layout::{collect_toc, paginate, PageMap};
use crate::style::{ReportStyle, Rgb};

const CHART_PNG_WIDTH: u32 = 1700;
const CHART_PNG_HEIGHT: u32 = 600;
const CHART_HEIGHT_MM: f64 = 70.0;
const PICTURE_HEIGHT_MM: f64 = 60.0;
const IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Everything the renderer needs for one measurement section.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSection {
    pub machine_name: String,
    pub title: String,
    pub severity: String,
    pub analysis: String,
    pub recommendation: String,
    /// Tendency records feeding the trend chart and summary table.
    pub samples: Vec<TrendSample>,
    pub previous_date: Option<String>,
    pub current_date: Option<String>,
    pub diagram_image: Option<String>,
    pub machine_image: Option<String>,
    /// Machine specification key/value rows.
    pub spec_rows: Vec<(String, String)>,
}

/// Input records for one report, fetched by the caller.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub company_name: String,
    pub report_date: String,
    pub sections: Vec<MeasurementSection>,
}

/// The phase-1 output: flowables with their page assignments and TOC.
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub flowables: Vec<Flowable>,
    pub page_map: PageMap,
    pub toc: Vec<TocEntry>,
}

/// Builds reports from records and an immutable style configuration.
pub struct ReportBuilder {
    style: ReportStyle,
    data: ReportData,
}

impl ReportBuilder {
    pub fn new(style: ReportStyle, data: ReportData) -> Self {
        Self { style, data }
    }

    /// Runs phase 1: content assembly, dry-run pagination, TOC collection.
    ///
    /// The TOC table is inserted up front as a placeholder with one row per
    /// heading, so pagination already accounts for its height; afterwards
    /// the placeholder rows are rewritten with the collected entries, which
    /// keeps the page map valid.
    pub fn assemble(&self) -> Result<AssembledReport, ReportError> {
        let content = self.content_flowables()?;
        let headings = content
            .iter()
            .filter(|f| matches!(f, Flowable::Heading { .. }))
            .count();

        let mut queue = Vec::with_capacity(content.len() + 3);
        queue.push(Flowable::styled("CONTENIDO", TextStyle::Bold));
        if headings > 0 {
            let mut toc_table = TableBlock::new(vec![5, 1]);
            for _ in 0..headings {
                toc_table.push_row(vec![Cell::new(""), Cell::new("")]);
            }
            queue.push(Flowable::Table(toc_table));
        }
        queue.push(Flowable::SwitchTemplate(PageTemplate::LaterPage));
        queue.extend(content);

        let page_map = paginate(&queue, &self.style.geometry);
        let toc = collect_toc(&queue, &page_map);

        if headings > 0 {
            if let Some(Flowable::Table(table)) = queue.get_mut(1) {
                table.rows = toc
                    .iter()
                    .map(|entry| {
                        let indent = "    ".repeat(entry.level as usize);
                        vec![
                            Cell::new(format!("{indent}{}", entry.text)),
                            Cell::new(entry.page.to_string()),
                        ]
                    })
                    .collect();
            }
        }

        Ok(AssembledReport {
            flowables: queue,
            page_map,
            toc,
        })
    }

    /// Runs both phases and emits the final PDF bytes.
    ///
    /// `fonts_dir` must contain `{family}-Regular.ttf`, `-Bold.ttf`,
    /// `-Italic.ttf` and `-BoldItalic.ttf`.
    pub fn render_pdf(&self, fonts_dir: &Path, family: &str) -> Result<Vec<u8>, ReportError> {
        let assembled = self.assemble()?;
        debug!(
            "rendering report for {:?}: {} flowables over {} pages",
            self.data.company_name,
            assembled.flowables.len(),
            assembled.page_map.page_count
        );

        let font_family =
            genpdf::fonts::from_files(fonts_dir, family, None).map_err(|e| ReportError::Fonts {
                dir: fonts_dir.display().to_string(),
                source: e,
            })?;

        let mut document = genpdf::Document::new(font_family);
        document.set_title(format!("Informe {}", self.data.company_name));
        document.set_paper_size(genpdf::Size::new(
            self.style.geometry.page_width,
            self.style.geometry.page_height,
        ));
        document.set_page_decorator(ReportPageDecorator::new(
            self.style.clone(),
            self.data.company_name.clone(),
            self.data.report_date.clone(),
        ));

        for flowable in &assembled.flowables {
            self.push_flowable(&mut document, flowable)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }

    /// Content flowables for all measurement sections, in order.
    fn content_flowables(&self) -> Result<Vec<Flowable>, ReportError> {
        let mut flowables = Vec::new();
        for section in &self.data.sections {
            flowables.push(Flowable::PageBreak);
            flowables.push(Flowable::heading(HeadingLevel::H1, section.title.clone()));
            if !section.severity.is_empty() {
                flowables.push(Flowable::styled(
                    format!("Severidad: {}", section.severity),
                    TextStyle::Bold,
                ));
            }
            flowables.push(Flowable::styled("ANÁLISIS", TextStyle::Bold));
            flowables.push(Flowable::paragraph(section.analysis.clone()));
            flowables.push(Flowable::styled("RECOMENDACIÓN", TextStyle::Bold));
            flowables.push(Flowable::paragraph(section.recommendation.clone()));

            if !section.samples.is_empty() {
                flowables.push(Flowable::heading(
                    HeadingLevel::H2,
                    format!("Tendencia {}", section.machine_name),
                ));
                flowables.push(self.chart_flowable(section)?);
                flowables.push(Flowable::Table(self.summary_table(section)));
            }

            if let Some(diagram) = &section.diagram_image {
                flowables.push(Flowable::Image(
                    ImageBlock::from_path(
                        diagram.clone(),
                        self.style.geometry.frame_width() / 2.0,
                        PICTURE_HEIGHT_MM,
                    )
                    .with_caption("DIAGRAMA ESQUEMATICO"),
                ));
            }
            if let Some(machine) = &section.machine_image {
                flowables.push(Flowable::Image(
                    ImageBlock::from_path(
                        machine.clone(),
                        self.style.geometry.frame_width() / 2.0,
                        PICTURE_HEIGHT_MM,
                    )
                    .with_caption("IMAGEN MAQUINA"),
                ));
            }

            if !section.spec_rows.is_empty() {
                let mut table = TableBlock::new(vec![1, 2]).with_grid();
                for (key, value) in &section.spec_rows {
                    table.push_row(vec![Cell::bold(key.clone()), Cell::new(value.clone())]);
                }
                flowables.push(Flowable::Table(table));
            }
        }
        Ok(flowables)
    }

    /// Builds the chart flowable. The samples are grouped and validated
    /// here (palette size, date format); rasterization waits until
    /// emission.
    fn chart_flowable(&self, section: &MeasurementSection) -> Result<Flowable, ReportError> {
        let last_label = section
            .samples
            .last()
            .map(|s| s.name.as_str())
            .unwrap_or_default();
        let title = format!(
            "Tendencia {}\\{}, Canal X",
            section.machine_name, last_label
        );
        let chart = TrendChart::new(&self.style, title, &section.samples)?;
        Ok(Flowable::Image(ImageBlock::from_chart(
            chart,
            self.style.geometry.frame_width(),
            CHART_HEIGHT_MM,
        )))
    }

    /// Summary table: point name, units, previous/current value, % change.
    fn summary_table(&self, section: &MeasurementSection) -> TableBlock {
        let previous = section.previous_date.as_deref().unwrap_or("-");
        let current = section.current_date.as_deref().unwrap_or("-");
        let series = crate::chart::group_series(&section.samples).unwrap_or_default();
        let mut table = TableBlock::new(vec![30, 20, 25, 20, 20])
            .with_header(
                vec![
                    Cell::bold("Nombre de PUNTO"),
                    Cell::bold("Unidades"),
                    Cell::bold(format!("Valor anterior {previous}")),
                    Cell::bold(format!("Últ. valor {current}")),
                    Cell::bold("% cambio"),
                ],
                Some(self.style.table_blue),
            )
            .with_band_fill(self.style.band_fill)
            .with_grid();
        for row in summary_rows(&series) {
            table.push_row(summary_cells(&row));
        }
        table
    }

    fn push_flowable(
        &self,
        document: &mut genpdf::Document,
        flowable: &Flowable,
    ) -> Result<(), ReportError> {
        match flowable {
            Flowable::Heading { level, text } => {
                let size = match level {
                    HeadingLevel::H1 => self.style.base_font_size + 2,
                    HeadingLevel::H2 => self.style.base_font_size + 1,
                };
                document.push(
                    Paragraph::new(text.clone())
                        .styled(Style::new().bold().with_font_size(size)),
                );
            }
            Flowable::Paragraph { text, style } => {
                let style = match style {
                    TextStyle::Regular => Style::new().with_font_size(self.style.base_font_size),
                    TextStyle::Bold => Style::new()
                        .bold()
                        .with_font_size(self.style.base_font_size),
                    TextStyle::Small => Style::new().with_font_size(self.style.small_font_size),
                };
                document.push(Paragraph::new(text.clone()).styled(style));
            }
            Flowable::Table(table) => document.push(self.table_element(table)?),
            Flowable::Image(image) => document.push(self.image_element(image)?),
            Flowable::PageBreak => document.push(PageBreak::new()),
            // Template switching is a layout-phase concept; the page
            // decorator keys off the rendered page number instead.
            Flowable::SwitchTemplate(_) => {}
        }
        Ok(())
    }

    fn table_element(&self, block: &TableBlock) -> Result<TableLayout, ReportError> {
        let mut table = TableLayout::new(block.widths.clone());
        if block.grid {
            table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        }
        let font_size = self.style.base_font_size;
        let mut push_row = |cells: &[Cell], fill: Option<Rgb>| -> Result<(), ReportError> {
            let mut row = table.row();
            for cell in cells {
                let mut style = Style::new().with_font_size(font_size);
                if cell.bold {
                    style = style.bold();
                }
                if let Some(Rgb(r, g, b)) = fill {
                    // genpdf has no cell background fill; the band color
                    // tints the text instead so banding stays visible.
                    style = style.with_color(Color::Rgb(r / 2, g / 2, b / 2));
                }
                row.push_element(
                    Paragraph::new(cell.text.clone())
                        .styled(style)
                        .padded(Margins::all(1.0)),
                );
            }
            row.push()?;
            Ok(())
        };

        if let Some(header) = &block.header {
            push_row(header, block.header_fill)?;
        }
        for (index, cells) in block.rows.iter().enumerate() {
            let fill = if index % 2 == 1 { block.band_fill } else { None };
            push_row(cells, fill)?;
        }
        Ok(table)
    }

    fn image_element(&self, block: &ImageBlock) -> Result<LinearLayout, ReportError> {
        let dynamic = match &block.data {
            ImageData::Bytes(bytes) => image::load_from_memory(bytes)
                .map_err(|e| ReportError::Image(e.to_string()))?,
            ImageData::Path(path) => image::open(path)
                .map_err(|e| ReportError::Image(format!("{path}: {e}")))?,
            ImageData::Chart(chart) => {
                let png = chart.render_png(CHART_PNG_WIDTH, CHART_PNG_HEIGHT)?;
                image::load_from_memory(&png).map_err(|e| ReportError::Image(e.to_string()))?
            }
        };
        let natural_width_mm = {
            use image::GenericImageView;
            let (px, _) = dynamic.dimensions();
            MM_PER_INCH * f64::from(px) / IMAGE_DPI
        };

        let mut element = genpdf::elements::Image::from_dynamic_image(dynamic)?;
        element.set_alignment(Alignment::Center);
        if natural_width_mm > f64::EPSILON {
            let scale = block.width_mm / natural_width_mm;
            element.set_scale(Scale::new(scale, scale));
        }

        let mut layout = LinearLayout::vertical();
        layout.push(element);
        if let Some(caption) = &block.caption {
            layout.push(
                Paragraph::new(caption.clone())
                    .aligned(Alignment::Center)
                    .styled(Style::new().bold().with_font_size(self.style.base_font_size)),
            );
        }
        Ok(layout)
    }
}

/// Draws the repeating header and footer and reserves their space.
///
/// Page 1 gets the large header (report date and company name, logo when
/// configured); later pages a compact company line. The footer repeats the
/// contact lines on every page.
struct ReportPageDecorator {
    page: usize,
    style: ReportStyle,
    company: String,
    date: String,
}

impl ReportPageDecorator {
    fn new(style: ReportStyle, company: String, date: String) -> Self {
        Self {
            page: 0,
            style,
            company,
            date,
        }
    }

    fn header_element(&self) -> Box<dyn Element> {
        let Rgb(r, g, b) = self.style.company_header_blue;
        let blue = Style::new()
            .bold()
            .with_font_size(self.style.base_font_size)
            .with_color(Color::Rgb(r, g, b));
        if self.page == 1 {
            let mut layout = LinearLayout::vertical();
            if let Some(logo) = &self.style.logo_path {
                if let Ok(dynamic) = image::open(logo) {
                    if let Ok(element) = genpdf::elements::Image::from_dynamic_image(dynamic) {
                        layout.push(element);
                    }
                }
            }
            layout.push(
                Paragraph::new(self.date.to_uppercase())
                    .styled(Style::new().with_font_size(self.style.base_font_size)),
            );
            layout.push(Paragraph::new(self.company.to_uppercase()).styled(blue));
            Box::new(layout)
        } else {
            Box::new(
                Paragraph::new(self.company.to_uppercase())
                    .aligned(Alignment::Right)
                    .styled(blue),
            )
        }
    }

    fn footer_element(&self) -> Box<dyn Element> {
        let Rgb(r, g, b) = self.style.header_footer_green;
        let green = Style::new()
            .with_font_size(self.style.small_font_size)
            .with_color(Color::Rgb(r, g, b));
        let Rgb(br, bg, bb) = self.style.company_header_blue;
        let blue = Style::new()
            .bold()
            .with_font_size(self.style.base_font_size)
            .with_color(Color::Rgb(br, bg, bb));

        let mut layout = LinearLayout::vertical();
        layout.push(
            Paragraph::new("_".repeat(91))
                .aligned(Alignment::Center)
                .styled(blue),
        );
        for line in &self.style.footer_lines {
            layout.push(
                Paragraph::new(line.clone())
                    .aligned(Alignment::Center)
                    .styled(green),
            );
        }
        Box::new(layout)
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, genpdf::error::Error> {
        self.page += 1;
        let geometry = &self.style.geometry;
        area.add_margins(Margins::all(geometry.margin));

        let header_height = if self.page == 1 {
            geometry.first_header_height
        } else {
            geometry.later_header_height
        };

        let mut header = self.header_element();
        header.render(context, area.clone(), style)?;
        area.add_offset(Position::new(0.0, header_height));

        let available: f64 = area.size().height.into();
        let footer_height = geometry.footer_height;
        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0.0, available - footer_height));
        let mut footer = self.footer_element();
        footer.render(context, footer_area, style)?;
        area.set_height(Mm::from(available - footer_height));

        Ok(area)
    }
}

fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

fn summary_cells(row: &SummaryRow) -> Vec<Cell> {
    vec![
        Cell::bold(row.name.clone()),
        Cell::new(row.unit.as_str()),
        Cell::new(
            row.previous
                .map(format_value)
                .unwrap_or_else(|| "-".to_string()),
        ),
        Cell::new(format_value(row.current)),
        Cell::new(
            row.percent_change
                .map(|p| format!("{p:+.1} %"))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_section() -> MeasurementSection {
        MeasurementSection {
            machine_name: "MOTOR VENTILADOR".to_string(),
            title: "MOTOR VENTILADOR".to_string(),
            severity: "Alerta".to_string(),
            analysis: "Vibración elevada en el punto 1V.".to_string(),
            recommendation: "Revisar alineación del acople.".to_string(),
            samples: vec![
                TrendSample::new("1HV", "20240101", 2.0),
                TrendSample::new("1HV", "20240201", 3.0),
            ],
            previous_date: Some("01/01/2024".to_string()),
            current_date: Some("01/02/2024".to_string()),
            ..Default::default()
        }
    }

    fn builder(sections: Vec<MeasurementSection>) -> ReportBuilder {
        ReportBuilder::new(
            ReportStyle::default(),
            ReportData {
                company_name: "Acme Ltda".to_string(),
                report_date: "Febrero 2024".to_string(),
                sections,
            },
        )
    }

    #[test]
    fn empty_report_still_paginates() {
        let assembled = builder(Vec::new()).assemble().unwrap();
        assert!(assembled.page_map.page_count >= 1);
        assert!(assembled.toc.is_empty());
        // The queue still opens with the contents title.
        assert!(matches!(
            assembled.flowables.first(),
            Some(Flowable::Paragraph { text, .. }) if text == "CONTENIDO"
        ));
    }

    #[test]
    fn toc_rows_match_headings() {
        let assembled = builder(vec![sample_section()]).assemble().unwrap();
        // One H1 for the measurement, one H2 for its tendency chart.
        assert_eq!(assembled.toc.len(), 2);
        assert_eq!(assembled.toc[0].text, "MOTOR VENTILADOR");
        assert_eq!(assembled.toc[0].level, 0);
        assert_eq!(assembled.toc[1].level, 1);

        let Some(Flowable::Table(toc_table)) = assembled.flowables.get(1) else {
            panic!("expected the TOC table after the contents title");
        };
        assert_eq!(toc_table.rows.len(), 2);
        assert_eq!(toc_table.rows[0][1].text, assembled.toc[0].page.to_string());
    }

    #[test]
    fn summary_table_has_header_and_band_fill() {
        let b = builder(vec![sample_section()]);
        let table = b.summary_table(&b.data.sections[0]);
        assert_eq!(table.header.as_ref().unwrap().len(), 5);
        assert!(table.band_fill.is_some());
        assert!(table.grid);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0].text, "1HV");
        assert!(table.rows[0][0].bold);
        assert_eq!(table.rows[0][1].text, "mm/s - Pico");
        assert_eq!(table.rows[0][4].text, "+50.0 %");
    }

    #[test]
    fn sections_start_on_a_fresh_page() {
        let assembled = builder(vec![sample_section(), sample_section()]).assemble().unwrap();
        let pages: Vec<u32> = assembled.toc.iter().filter(|e| e.level == 0).map(|e| e.page).collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0] < pages[1]);
    }
}
