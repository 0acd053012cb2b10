//! Condition-monitoring report generation.
//!
//! This crate turns vibration tendency records into trend charts
//! (`plotters` rasterization) and paginated PDF reports (`genpdf` layout).
//! It knows nothing about HTTP or storage; callers hand it already-fetched
//! records plus an immutable [`style::ReportStyle`] and get bytes back.
//!
//! The document build is an explicit two-phase pipeline:
//!
//! 1. [`report::ReportBuilder::assemble`] produces the ordered
//!    [`flowable::Flowable`] queue, a page map from a dry-run layout
//!    ([`layout::paginate`]) and the table-of-contents accumulator.
//! 2. [`report::ReportBuilder::render_pdf`] converts the queue into
//!    `genpdf` elements and emits the final pages, with headers and
//!    footers repeated by a page decorator.

pub mod chart;
pub mod error;
pub mod flowable;
pub mod layout;
pub mod report;
pub mod style;

pub use chart::{unit_for_label, TrendChart, TrendSample, Unit};
pub use error::{ChartError, ReportError};
pub use report::{MeasurementSection, ReportBuilder, ReportData};
pub use style::ReportStyle;
