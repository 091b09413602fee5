use std::collections::HashMap;

use crate::models::Snapshot;

use super::join::PatientIndex;
use super::types::LabelCount;

/// History rows per condition label, counting only rows whose patient
/// exists. Most frequent first; ties ordered by label.
pub fn condition_frequency(snapshot: &Snapshot) -> Vec<LabelCount> {
    let index = PatientIndex::new(&snapshot.patients);
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for (entry, _) in index.join_history(&snapshot.history).rows {
        *counts.entry(entry.condition.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked
}
