//! Trend chart generation.
//!
//! Consumes tendency records (label, date, global value) and produces a PNG
//! line chart with a dated x-axis, one colored series per label, plus the
//! row data for the accompanying summary table.

use std::io::Cursor;

use chrono::NaiveDate;
use plotters::prelude::*;

use crate::error::ChartError;
use crate::style::{ReportStyle, Rgb};

/// One tendency record as fetched from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSample {
    /// Point label, e.g. `"1VEL"` or `"12ACH"`.
    pub name: String,
    /// Measurement date encoded as `YYYYMMDD`.
    pub date: String,
    pub value: f64,
}

impl TrendSample {
    pub fn new(name: impl Into<String>, date: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            value,
        }
    }
}

/// Measurement unit derived from the point label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Velocity,
    Acceleration,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Velocity => "mm/s - Pico",
            Unit::Acceleration => "g - RMS",
        }
    }
}

/// Derives the unit from a point label.
///
/// Business convention: labels start with a point number followed by a unit
/// code. If the second character is a digit the point number may span
/// several digits and the unit code is the first non-digit at or after
/// position 2; otherwise the unit code sits at position 2. Code `V` means
/// velocity, anything else acceleration.
pub fn unit_for_label(label: &str) -> Unit {
    let chars: Vec<char> = label.chars().collect();
    let second_is_digit = chars.get(1).map_or(false, |c| c.is_ascii_digit());
    let code = if second_is_digit {
        chars.iter().skip(2).find(|c| !c.is_ascii_digit()).copied()
    } else {
        chars.get(2).copied()
    };
    match code {
        Some('V') => Unit::Velocity,
        _ => Unit::Acceleration,
    }
}

/// A plotted series: one label and its dated values, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Groups samples by label, preserving first-appearance order of labels and
/// input order of points within each series.
pub fn group_series(samples: &[TrendSample]) -> Result<Vec<TrendSeries>, ChartError> {
    let mut series: Vec<TrendSeries> = Vec::new();
    for sample in samples {
        let date = parse_trend_date(&sample.name, &sample.date)?;
        match series.iter_mut().find(|s| s.label == sample.name) {
            Some(existing) => existing.points.push((date, sample.value)),
            None => series.push(TrendSeries {
                label: sample.name.clone(),
                points: vec![(date, sample.value)],
            }),
        }
    }
    Ok(series)
}

fn parse_trend_date(label: &str, value: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| ChartError::MalformedDate {
        label: label.to_string(),
        value: value.to_string(),
    })
}

/// Row of the tendency summary table: last two values and percent change.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub unit: Unit,
    pub previous: Option<f64>,
    pub current: f64,
    pub percent_change: Option<f64>,
}

/// Computes one summary row per series from its two most recent values.
pub fn summary_rows(series: &[TrendSeries]) -> Vec<SummaryRow> {
    series
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|s| {
            let current = s.points[s.points.len() - 1].1;
            let previous = (s.points.len() >= 2).then(|| s.points[s.points.len() - 2].1);
            let percent_change = previous
                .filter(|p| *p != 0.0)
                .map(|p| (current - p) / p * 100.0);
            SummaryRow {
                name: s.label.clone(),
                unit: unit_for_label(&s.label),
                previous,
                current,
                percent_change,
            }
        })
        .collect()
}

/// An assembled trend chart ready to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub title: String,
    pub unit: Unit,
    pub series: Vec<TrendSeries>,
    palette: Vec<Rgb>,
}

impl TrendChart {
    /// Groups the samples, derives the unit from the first label and checks
    /// the series count against the palette.
    pub fn new(
        style: &ReportStyle,
        title: impl Into<String>,
        samples: &[TrendSample],
    ) -> Result<Self, ChartError> {
        if samples.is_empty() {
            return Err(ChartError::NoSamples);
        }
        let series = group_series(samples)?;
        if series.len() > style.palette.len() {
            return Err(ChartError::PaletteExhausted {
                labels: series.len(),
                palette: style.palette.len(),
            });
        }
        let unit = unit_for_label(&samples[0].name);
        Ok(Self {
            title: title.into(),
            unit,
            series,
            palette: style.palette.clone(),
        })
    }

    /// Color assigned to the series at `index`, by first-appearance order.
    pub fn color_for(&self, index: usize) -> Rgb {
        self.palette[index]
    }

    /// Rasterizes the chart to PNG bytes.
    pub fn render_png(&self, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        let mut raw = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(to_backend_err)?;
            self.draw(&root)?;
            root.present().map_err(to_backend_err)?;
        }

        let image = image::RgbImage::from_raw(width, height, raw)
            .expect("buffer sized from dimensions");
        let mut png = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut png, image::ImageOutputFormat::Png)?;
        Ok(png.into_inner())
    }

    /// Rasterizes the chart and writes the PNG to `path`.
    pub fn write_png(
        &self,
        path: impl AsRef<std::path::Path>,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        let bytes = self.render_png(width, height)?;
        std::fs::write(path, bytes)
            .map_err(|e| ChartError::Backend(format!("failed to write chart file: {e}")))?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<(), ChartError> {
        let (mut min_date, mut max_date) = (NaiveDate::MAX, NaiveDate::MIN);
        let (mut min_val, mut max_val) = (f64::INFINITY, f64::NEG_INFINITY);
        for s in &self.series {
            for (d, v) in &s.points {
                min_date = min_date.min(*d);
                max_date = max_date.max(*d);
                min_val = min_val.min(*v);
                max_val = max_val.max(*v);
            }
        }
        // Degenerate ranges (single sample) still need a drawable axis.
        if min_date == max_date {
            max_date = max_date.succ_opt().unwrap_or(max_date);
        }
        if min_val == max_val {
            max_val = min_val + 1.0;
        }

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(54)
            .build_cartesian_2d(min_date..max_date, min_val..max_val)
            .map_err(to_backend_err)?;

        chart
            .configure_mesh()
            .x_desc("Fecha")
            .y_desc(self.unit.as_str())
            .x_label_formatter(&|d| d.format("%d/%m/%Y").to_string())
            .draw()
            .map_err(to_backend_err)?;

        for (index, series) in self.series.iter().enumerate() {
            let Rgb(r, g, b) = self.color_for(index);
            let color = RGBColor(r, g, b);
            chart
                .draw_series(LineSeries::new(series.points.iter().copied(), &color))
                .map_err(to_backend_err)?
                .label(series.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|(d, v)| Circle::new((*d, *v), 3, color.filled())),
                )
                .map_err(to_backend_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::MiddleRight)
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.85))
            .draw()
            .map_err(to_backend_err)?;
        Ok(())
    }
}

fn to_backend_err<E: std::error::Error>(e: E) -> ChartError {
    ChartError::Backend(e.to_string())
}
