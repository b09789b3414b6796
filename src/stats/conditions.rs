use std::collections::HashMap;

use crate::models::{DiseaseStats, ScanRecord, SeverityBreakdown};

use super::round_average;

struct Group<'a> {
    name: &'a str,
    count: u32,
    total_confidence: u64,
    severity_breakdown: SeverityBreakdown,
    latest: &'a ScanRecord,
}

/// Groups records by exact label and orders the groups by count, most
/// frequent first. Groups with equal counts keep first-encounter order.
pub fn condition_stats(records: &[ScanRecord]) -> Vec<DiseaseStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.label.as_str()).or_insert_with(|| {
            groups.push(Group {
                name: record.label.as_str(),
                count: 0,
                total_confidence: 0,
                severity_breakdown: SeverityBreakdown::default(),
                latest: record,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.total_confidence += u64::from(record.confidence);
        group.severity_breakdown.record(record.severity);
        // >= so that a later-inserted record wins a timestamp tie
        if record.captured_at >= group.latest.captured_at {
            group.latest = record;
        }
    }

    let mut stats: Vec<DiseaseStats> = groups
        .into_iter()
        .map(|group| DiseaseStats {
            name: group.name.to_string(),
            count: group.count,
            total_confidence: group.total_confidence,
            average_confidence: round_average(group.total_confidence, group.count),
            severity_breakdown: group.severity_breakdown,
            last_detected: group.latest.date.clone(),
        })
        .collect();

    // sort_by is stable
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
