//! Chart rendering seam.
//!
//! The report pipeline only commits to the *data* fed into each chart:
//! category names, counts, and percentage labels. How those become pixels is
//! behind [`ChartRenderer`]; the production implementation emits inline SVG.

pub mod svg;

pub use svg::SvgRenderer;

/// The data contract for one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Named categories with absolute counts.
    Bar {
        title: String,
        categories: Vec<(String, u64)>,
    },
    /// Named slices; each is labeled with its share of the total as `"{:.1}%"`.
    Pie {
        title: String,
        slices: Vec<(String, u64)>,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar { title, .. } | ChartSpec::Pie { title, .. } => title,
        }
    }
}

/// Turns a [`ChartSpec`] into markup suitable for inline embedding in a page.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> String;
}
