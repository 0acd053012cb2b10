use thiserror::Error;

/// Failures while turning tendency records into a rendered chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// More distinct series labels than palette entries. The chart (and the
    /// report embedding it) fails outright instead of silently recycling
    /// colors.
    #[error("chart has {labels} series but the palette holds only {palette} colors")]
    PaletteExhausted { labels: usize, palette: usize },

    /// A tendency record carried a date that is not `YYYYMMDD`.
    #[error("malformed tendency date {value:?} in series {label:?}")]
    MalformedDate { label: String, value: String },

    /// No samples were provided, so there is nothing to derive units or
    /// axis ranges from.
    #[error("cannot build a chart from an empty sample set")]
    NoSamples,

    /// The plotting backend refused to draw.
    #[error("chart backend error: {0}")]
    Backend(String),

    #[error("failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures while assembling or emitting a report document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("failed to load report fonts from {dir}: {source}")]
    Fonts {
        dir: String,
        source: genpdf::error::Error,
    },

    #[error("document layout error: {0}")]
    Layout(#[from] genpdf::error::Error),

    #[error("failed to decode embedded image: {0}")]
    Image(String),
}
