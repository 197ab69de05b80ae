//! Inline SVG renderer.
//!
//! Deliberately minimal: fixed canvas, fixed palette. The contract tests care
//! about the categories, counts, and percentage labels present in the markup,
//! not the geometry.

use std::f64::consts::PI;
use std::fmt::Write;

use super::{ChartRenderer, ChartSpec};

const WIDTH: f64 = 460.0;
const HEIGHT: f64 = 300.0;
const MARGIN: f64 = 40.0;

const PALETTE: &[&str] = &["#4472c4", "#70ad47", "#e15759", "#f5a623", "#8661c5", "#3aa7a3"];

#[derive(Debug, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_bar(&self, title: &str, categories: &[(String, u64)]) -> String {
        let mut out = svg_open(title);
        if categories.is_empty() {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">No data</text>"#,
                WIDTH / 2.0,
                HEIGHT / 2.0
            );
            return svg_close(out);
        }

        let max = categories.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
        let plot_w = WIDTH - 2.0 * MARGIN;
        let plot_h = HEIGHT - 2.0 * MARGIN;
        let slot = plot_w / categories.len() as f64;
        let bar_w = slot * 0.6;

        for (i, (name, count)) in categories.iter().enumerate() {
            let h = *count as f64 / max as f64 * plot_h;
            let x = MARGIN + i as f64 * slot + (slot - bar_w) / 2.0;
            let y = HEIGHT - MARGIN - h;
            let color = PALETTE[i % PALETTE.len()];
            let _ = write!(
                out,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{color}"/>"#
            );
            // Count above the bar, category name below the axis.
            let cx = x + bar_w / 2.0;
            let _ = write!(
                out,
                r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="12">{count}</text>"#,
                y - 5.0
            );
            let _ = write!(
                out,
                r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                HEIGHT - MARGIN + 16.0,
                escape_text(name)
            );
        }
        let _ = write!(
            out,
            r##"<line x1="{m}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="#333"/>"##,
            m = MARGIN,
            b = HEIGHT - MARGIN,
            r = WIDTH - MARGIN
        );
        svg_close(out)
    }

    fn render_pie(&self, title: &str, slices: &[(String, u64)]) -> String {
        let mut out = svg_open(title);
        let total: u64 = slices.iter().map(|(_, c)| *c).sum();
        let cx = WIDTH / 2.0;
        let cy = (HEIGHT + 20.0) / 2.0;
        let r = (HEIGHT - 2.0 * MARGIN) / 2.0;

        if total == 0 {
            let _ = write!(
                out,
                r#"<text x="{cx}" y="{cy}" text-anchor="middle" font-size="14">No data</text>"#
            );
            return svg_close(out);
        }

        let mut angle = -PI / 2.0;
        for (i, (name, count)) in slices.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let fraction = *count as f64 / total as f64;
            let color = PALETTE[i % PALETTE.len()];
            let sweep = fraction * 2.0 * PI;
            let label = format!("{:.1}%", fraction * 100.0);

            if *count == total {
                // A full circle cannot be expressed as a single arc path.
                let _ = write!(out, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#);
            } else {
                let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
                let end = angle + sweep;
                let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
                let large_arc = if fraction > 0.5 { 1 } else { 0 };
                let _ = write!(
                    out,
                    r#"<path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z" fill="{color}"/>"#
                );
            }

            let mid = angle + sweep / 2.0;
            let (lx, ly) = (cx + r * 0.6 * mid.cos(), cy + r * 0.6 * mid.sin());
            let _ = write!(
                out,
                r##"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="12" fill="#fff">{label}</text>"##
            );
            let (nx, ny) = (cx + (r + 14.0) * mid.cos(), cy + (r + 14.0) * mid.sin());
            let _ = write!(
                out,
                r#"<text x="{nx:.1}" y="{ny:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                escape_text(name)
            );
            angle += sweep;
        }
        svg_close(out)
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, spec: &ChartSpec) -> String {
        match spec {
            ChartSpec::Bar { title, categories } => self.render_bar(title, categories),
            ChartSpec::Pie { title, slices } => self.render_pie(title, slices),
        }
    }
}

fn svg_open(title: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" "#,
            r#"width="{w}" height="{h}" role="img">"#,
            r#"<text x="{tx}" y="22" text-anchor="middle" font-size="15" font-weight="bold">{title}</text>"#
        ),
        w = WIDTH,
        h = HEIGHT,
        tx = WIDTH / 2.0,
        title = escape_text(title)
    )
}

fn svg_close(mut out: String) -> String {
    out.push_str("</svg>");
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
