//! Delivery-by-label breakdown over a project's epics.

use std::collections::BTreeMap;

use crate::tracker::Issue;

/// Epic totals for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSummary {
    pub label: String,
    pub total_epics: usize,
    pub completed_epics: usize,
}

/// Group epics by each label they carry. An epic with several labels
/// contributes to every one of them; the multi-counting is intentional.
/// "Completed" here always means the epic's own status, regardless of the
/// epic-completion policy used for the epic statistics.
///
/// Output is sorted by label so pages render deterministically.
pub fn delivery_by_label(epics: &[Issue], done_status: &str) -> Vec<LabelSummary> {
    let mut by_label: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for epic in epics {
        let done = epic.status == done_status;
        for label in &epic.labels {
            let counts = by_label.entry(label.as_str()).or_insert((0, 0));
            counts.0 += 1;
            if done {
                counts.1 += 1;
            }
        }
    }
    by_label
        .into_iter()
        .map(|(label, (total, completed))| LabelSummary {
            label: label.to_string(),
            total_epics: total,
            completed_epics: completed,
        })
        .collect()
}
