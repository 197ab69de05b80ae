//! Page composition: aggregates + chart markup into HTML documents.
//!
//! Chart *data* is fixed here (category names, counts); the markup for each
//! chart comes from the injected [`ChartRenderer`].

use std::fmt::Write;

use crate::chart::{ChartRenderer, ChartSpec};
use crate::stats::{EpicStats, ProjectReport, SprintSummary, StoryStats};
use crate::tracker::Project;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;}table{border-collapse:collapse;}\
td,th{border:1px solid #ccc;padding:4px 10px;}th{background:#f0f0f0;}\
.charts{display:flex;flex-wrap:wrap;gap:1em;}h2{margin-top:1.5em;}";

// ── Chart data contracts ──────────────────────────────────────────────

pub fn story_charts(stats: &StoryStats) -> (ChartSpec, ChartSpec) {
    let bar = ChartSpec::Bar {
        title: "Story Statistics".to_string(),
        categories: vec![
            ("All Stories".to_string(), stats.total as u64),
            ("Completed Stories".to_string(), stats.done as u64),
            ("Incomplete Stories".to_string(), stats.not_done as u64),
        ],
    };
    let pie = ChartSpec::Pie {
        title: "Story Completion Percentage".to_string(),
        slices: vec![
            ("Completed".to_string(), stats.done as u64),
            ("Incomplete".to_string(), stats.not_done as u64),
        ],
    };
    (bar, pie)
}

pub fn epic_charts(stats: &EpicStats) -> (ChartSpec, ChartSpec) {
    let bar = ChartSpec::Bar {
        title: "Epic Statistics".to_string(),
        categories: vec![
            ("All Epics".to_string(), stats.total as u64),
            ("Completed Epics".to_string(), stats.completed as u64),
            ("Incomplete Epics".to_string(), stats.incomplete as u64),
        ],
    };
    let pie = ChartSpec::Pie {
        title: "Epic Completion Percentage".to_string(),
        slices: vec![
            ("Completed".to_string(), stats.completed as u64),
            ("Incomplete".to_string(), stats.incomplete as u64),
        ],
    };
    (bar, pie)
}

pub fn sprint_chart(sprints: &[SprintSummary]) -> Option<ChartSpec> {
    if sprints.is_empty() {
        return None;
    }
    Some(ChartSpec::Bar {
        title: "Stories Completed per Sprint".to_string(),
        categories: sprints
            .iter()
            .map(|s| (s.name.clone(), s.completed_stories as u64))
            .collect(),
    })
}

// ── Pages ─────────────────────────────────────────────────────────────

/// Landing page: the project list fetched at startup.
pub fn landing(projects: &[Project]) -> String {
    let mut body = String::new();
    if projects.is_empty() {
        body.push_str("<p>No projects available.</p>");
    } else {
        body.push_str("<ul>");
        for project in projects {
            let _ = write!(
                body,
                r#"<li><a href="/project_stats?project_name={}">{}</a> ({})</li>"#,
                urlencode(&project.name),
                escape_html(&project.name),
                escape_html(&project.key),
            );
        }
        body.push_str("</ul>");
    }
    document("Projects", &format!("<h1>Projects</h1>{body}"))
}

/// The full report page for one project.
pub fn project_stats_page(report: &ProjectReport, renderer: &dyn ChartRenderer) -> String {
    let name = escape_html(&report.project_name);
    let mut body = format!(r#"<h1>Project statistics: {name}</h1><p><a href="/">&larr; all projects</a></p>"#);

    let (story_bar, story_pie) = story_charts(&report.stories);
    let (epic_bar, epic_pie) = epic_charts(&report.epics);
    let _ = write!(
        body,
        r#"<h2>Stories</h2><div class="charts">{}{}</div>"#,
        renderer.render(&story_bar),
        renderer.render(&story_pie)
    );
    let _ = write!(
        body,
        r#"<h2>Epics</h2><div class="charts">{}{}</div>"#,
        renderer.render(&epic_bar),
        renderer.render(&epic_pie)
    );
    body.push_str(&epic_table(&report.epics));

    body.push_str("<h2>Sprints</h2>");
    match sprint_chart(&report.sprints) {
        Some(chart) => {
            let _ = write!(body, r#"<div class="charts">{}</div>"#, renderer.render(&chart));
            body.push_str(&sprint_table(&report.sprints));
        }
        None => body.push_str("<p>No sprint data available.</p>"),
    }

    body.push_str("<h2>Delivery by label</h2>");
    if report.labels.is_empty() {
        body.push_str("<p>No labeled epics.</p>");
    } else {
        body.push_str(&label_table(report));
    }

    document(&format!("Project statistics: {name}"), &body)
}

fn epic_table(stats: &EpicStats) -> String {
    let mut out = String::from(
        "<table><tr><th>Issue Key</th><th>Summary</th><th>Status</th>\
         <th>Target Version</th><th>Story Count</th><th>Completion Percentage</th></tr>",
    );
    for epic in &stats.epics {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&epic.key),
            escape_html(&epic.summary),
            escape_html(&epic.status),
            escape_html(epic.target_version.as_deref().unwrap_or("N/A")),
            epic.story_count,
            epic.completion_label(),
        );
    }
    out.push_str("</table>");
    out
}

fn sprint_table(sprints: &[SprintSummary]) -> String {
    let mut out = String::from(
        "<table><tr><th>Sprint</th><th>Total Stories</th><th>Completed Stories</th></tr>",
    );
    for sprint in sprints {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&sprint.name),
            sprint.total_stories,
            sprint.completed_stories,
        );
    }
    out.push_str("</table>");
    out
}

fn label_table(report: &ProjectReport) -> String {
    let mut out = String::from(
        "<table><tr><th>Label</th><th>Total Epics</th><th>Completed Epics</th></tr>",
    );
    for label in &report.labels {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&label.label),
            label.total_epics,
            label.completed_epics,
        );
    }
    out.push_str("</table>");
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>{}</title><style>{STYLE}</style></head><body>{}</body></html>",
        escape_html(title),
        body
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a query-string value.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
