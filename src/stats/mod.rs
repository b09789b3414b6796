//! Scan history statistics.
//!
//! Pure functions over the full record list. The history store calls
//! [`calculate_stats`] after every mutation and keeps the returned snapshot;
//! nothing here is incremental and nothing here is persisted.

pub mod conditions;
pub mod grading;

pub use conditions::condition_stats;
pub use grading::{health_score, improvement_trend, risk_level};

use crate::models::{ScanRecord, ScanStats, Severity, SeverityBreakdown, NO_CONDITION};

/// Integer mean rounded half up, the way the history screen has always shown it.
pub(crate) fn round_average(sum: u64, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let count = u64::from(count);
    let rounded = (sum * 2 + count) / (count * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Computes the full statistics snapshot for `records`.
pub fn calculate_stats(records: &[ScanRecord]) -> ScanStats {
    if records.is_empty() {
        return ScanStats::default();
    }

    let total_scans = u32::try_from(records.len()).unwrap_or(u32::MAX);
    let confidence_sum: u64 = records.iter().map(|r| u64::from(r.confidence)).sum();
    let average_confidence = round_average(confidence_sum, total_scans);

    let mut severity_distribution = SeverityBreakdown::default();
    for record in records {
        severity_distribution.record(record.severity);
    }
    let healthy_count = severity_distribution.get(Severity::None);

    let disease_stats = condition_stats(records);
    let most_common_condition = disease_stats
        .first()
        .map(|top| top.name.clone())
        .unwrap_or_else(|| NO_CONDITION.to_string());

    ScanStats {
        total_scans,
        average_confidence,
        health_score: health_score(healthy_count, total_scans, average_confidence),
        healthy_count,
        disease_stats,
        severity_distribution,
        most_common_condition,
        risk_level: risk_level(total_scans, &severity_distribution),
        improvement_trend: improvement_trend(records),
    }
}
