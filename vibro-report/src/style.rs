//! Immutable styling configuration for reports.
//!
//! The original system kept paragraph styles, colors and footer text in
//! module-level globals; here they live in a [`ReportStyle`] value handed to
//! the renderer at construction time.

/// A plain RGB triple, independent of any rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Page geometry in millimetres. Letter paper with the frame the original
/// report used (2.5 cm side margins, 25 cm tall content frame).
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Height reserved for the large first-page header.
    pub first_header_height: f64,
    /// Height reserved for the compact header on later pages.
    pub later_header_height: f64,
    pub footer_height: f64,
}

impl PageGeometry {
    /// Content height available on a page using the given template header.
    pub fn frame_height(&self, first_page: bool) -> f64 {
        let header = if first_page {
            self.first_header_height
        } else {
            self.later_header_height
        };
        self.page_height - 2.0 * self.margin - header - self.footer_height
    }

    pub fn frame_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // US letter, 215.9 x 279.4 mm.
        Self {
            page_width: 215.9,
            page_height: 279.4,
            margin: 25.0,
            first_header_height: 26.0,
            later_header_height: 10.0,
            footer_height: 14.0,
        }
    }
}

/// Styling inputs for the report renderer and chart generator.
#[derive(Debug, Clone)]
pub struct ReportStyle {
    /// Series colors, assigned by first-appearance order of the label.
    pub palette: Vec<Rgb>,
    pub header_footer_green: Rgb,
    pub company_header_blue: Rgb,
    pub table_blue: Rgb,
    /// Fill for odd rows of banded tables.
    pub band_fill: Rgb,
    pub base_font_size: u8,
    pub small_font_size: u8,
    pub footer_lines: Vec<String>,
    pub geometry: PageGeometry,
    /// Optional logo for the first-page header.
    pub logo_path: Option<String>,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                Rgb(0x00, 0x00, 0xFF),
                Rgb(0xFF, 0x00, 0x00),
                Rgb(0x00, 0x66, 0x00),
                Rgb(0xFF, 0x66, 0xCC),
                Rgb(0x00, 0xFF, 0x00),
                Rgb(0xFF, 0xFF, 0x00),
                Rgb(0x66, 0x00, 0x66),
                Rgb(0x00, 0xFF, 0xFF),
                Rgb(0xF3, 0x9C, 0x12),
                Rgb(0x14, 0x8F, 0x77),
                Rgb(0xC0, 0x39, 0x2B),
                Rgb(0x0E, 0x62, 0x51),
            ],
            header_footer_green: Rgb(0, 102, 0),
            company_header_blue: Rgb(82, 139, 166),
            table_blue: Rgb(141, 179, 226),
            band_fill: Rgb(220, 230, 241),
            base_font_size: 10,
            small_font_size: 7,
            footer_lines: vec![
                "Calle 9A No. 54 - 129 Guayabal PBX: (4) 362 00 62 Cel. 312 296 84 50 \
                 WhatsApp 301 249 92 84"
                    .to_string(),
                "www.vibromontajes.com E-mail: servicios@vibromontajes.com Medellín, Colombia"
                    .to_string(),
            ],
            geometry: PageGeometry::default(),
            logo_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_footer_keeps_all_contact_channels() {
        let style = ReportStyle::default();
        assert_eq!(style.footer_lines.len(), 2);
        assert!(style.footer_lines[0].contains("Cel. 312 296 84 50"));
        assert!(style.footer_lines[0].contains("WhatsApp 301 249 92 84"));
        assert!(style.footer_lines[1].contains("servicios@vibromontajes.com"));
    }
}
