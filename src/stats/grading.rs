//! Letter grade, risk level and trend rules.
//!
//! Percent thresholds are compared as `part * 100 >= threshold * total` so a
//! history sitting exactly on a band edge lands in the band it should.

use crate::models::{
    by_recency, HealthScore, ImprovementTrend, RiskLevel, ScanRecord, SeverityBreakdown,
};

/// Grade bands, best first. `None` means no confidence requirement.
const HEALTH_BANDS: &[(u64, Option<u32>, HealthScore)] = &[
    (90, Some(95), HealthScore::APlus),
    (80, Some(90), HealthScore::A),
    (70, Some(85), HealthScore::BPlus),
    (60, Some(80), HealthScore::B),
    (50, Some(75), HealthScore::CPlus),
    (40, Some(70), HealthScore::C),
    (30, None, HealthScore::D),
];

/// Number of most recent scans compared by the trend heuristic.
pub const TREND_WINDOW: usize = 3;

fn percent_at_least(part: u32, total: u32, threshold: u64) -> bool {
    u64::from(part) * 100 >= threshold * u64::from(total)
}

fn percent_above(part: u32, total: u32, threshold: u64) -> bool {
    u64::from(part) * 100 > threshold * u64::from(total)
}

/// First matching band wins; below every band is an F.
pub fn health_score(healthy_count: u32, total: u32, average_confidence: u32) -> HealthScore {
    if total == 0 {
        return HealthScore::APlus;
    }

    HEALTH_BANDS
        .iter()
        .find(|(healthy_pct, min_confidence, _)| {
            percent_at_least(healthy_count, total, *healthy_pct)
                && min_confidence.map_or(true, |min| average_confidence >= min)
        })
        .map(|(_, _, grade)| *grade)
        .unwrap_or(HealthScore::F)
}

pub fn risk_level(total: u32, distribution: &SeverityBreakdown) -> RiskLevel {
    if total == 0 {
        return RiskLevel::Low;
    }

    let severe = distribution.severe;
    let moderate = distribution.moderate;

    if percent_above(severe, total, 20) || percent_above(moderate, total, 40) {
        RiskLevel::High
    } else if percent_above(severe, total, 10) || percent_above(moderate, total, 20) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Compares the newest scan against the third newest.
pub fn improvement_trend(records: &[ScanRecord]) -> ImprovementTrend {
    if records.len() < TREND_WINDOW {
        return ImprovementTrend::Stable;
    }

    let recent = by_recency(records);
    let newest = recent[0].severity.score();
    let oldest = recent[TREND_WINDOW - 1].severity.score();

    match newest.cmp(&oldest) {
        std::cmp::Ordering::Less => ImprovementTrend::Improving,
        std::cmp::Ordering::Greater => ImprovementTrend::Declining,
        std::cmp::Ordering::Equal => ImprovementTrend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn rec(severity: Severity, captured_at: i64) -> ScanRecord {
        ScanRecord {
            id: format!("r{captured_at}"),
            label: "Acne".into(),
            confidence: 90,
            severity,
            date: "2025-01-01".into(),
            time: "1:00 PM".into(),
            image_reference: String::new(),
            captured_at,
        }
    }

    fn dist(none: u32, mild: u32, moderate: u32, severe: u32) -> SeverityBreakdown {
        SeverityBreakdown { none, mild, moderate, severe }
    }

    // ───────────────────────────────────────
    // health score
    // ───────────────────────────────────────

    #[test]
    fn health_score_band_edges_are_inclusive() {
        assert_eq!(health_score(9, 10, 95), HealthScore::APlus);
        assert_eq!(health_score(8, 10, 90), HealthScore::A);
        assert_eq!(health_score(7, 10, 85), HealthScore::BPlus);
        assert_eq!(health_score(6, 10, 80), HealthScore::B);
        assert_eq!(health_score(5, 10, 75), HealthScore::CPlus);
        assert_eq!(health_score(4, 10, 70), HealthScore::C);
        assert_eq!(health_score(3, 10, 0), HealthScore::D);
        assert_eq!(health_score(2, 10, 100), HealthScore::F);
    }

    #[test]
    fn high_health_low_confidence_falls_through_to_d() {
        // 100% healthy but confidence under every gated band.
        assert_eq!(health_score(10, 10, 50), HealthScore::D);
    }

    #[test]
    fn confidence_just_short_drops_one_band() {
        assert_eq!(health_score(9, 10, 94), HealthScore::A);
        assert_eq!(health_score(8, 10, 89), HealthScore::BPlus);
    }

    #[test]
    fn thirty_percent_of_odd_total_is_exact() {
        // 3/10 is exactly 30%; 29/100 is not.
        assert_eq!(health_score(3, 10, 10), HealthScore::D);
        assert_eq!(health_score(29, 100, 10), HealthScore::F);
    }

    #[test]
    fn empty_history_scores_a_plus() {
        assert_eq!(health_score(0, 0, 0), HealthScore::APlus);
    }

    // ───────────────────────────────────────
    // risk level
    // ───────────────────────────────────────

    #[test]
    fn thirty_percent_severe_is_high() {
        assert_eq!(risk_level(10, &dist(7, 0, 0, 3)), RiskLevel::High);
        assert_eq!(risk_level(10, &dist(0, 0, 7, 3)), RiskLevel::High);
    }

    #[test]
    fn risk_thresholds_are_strict() {
        // exactly 20% severe is not > 20
        assert_eq!(risk_level(10, &dist(8, 0, 0, 2)), RiskLevel::Medium);
        // exactly 10% severe is not > 10
        assert_eq!(risk_level(10, &dist(9, 0, 0, 1)), RiskLevel::Low);
        // exactly 40% moderate is not > 40, but is > 20
        assert_eq!(risk_level(10, &dist(6, 0, 4, 0)), RiskLevel::Medium);
        assert_eq!(risk_level(10, &dist(5, 0, 5, 0)), RiskLevel::High);
        assert_eq!(risk_level(10, &dist(8, 0, 2, 0)), RiskLevel::Low);
        assert_eq!(risk_level(10, &dist(7, 0, 3, 0)), RiskLevel::Medium);
    }

    #[test]
    fn mild_never_raises_risk() {
        assert_eq!(risk_level(4, &dist(0, 4, 0, 0)), RiskLevel::Low);
    }

    #[test]
    fn empty_history_is_low_risk() {
        assert_eq!(risk_level(0, &SeverityBreakdown::default()), RiskLevel::Low);
    }

    // ───────────────────────────────────────
    // improvement trend
    // ───────────────────────────────────────

    #[test]
    fn fewer_than_three_is_stable() {
        let records = vec![rec(Severity::Severe, 1), rec(Severity::None, 2)];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Stable);
    }

    #[test]
    fn severe_to_none_is_improving() {
        let records = vec![
            rec(Severity::Severe, 1),
            rec(Severity::Moderate, 2),
            rec(Severity::None, 3),
        ];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Improving);
    }

    #[test]
    fn none_to_severe_is_declining() {
        let records = vec![
            rec(Severity::None, 1),
            rec(Severity::None, 2),
            rec(Severity::Severe, 3),
        ];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Declining);
    }

    #[test]
    fn middle_sample_is_ignored() {
        let records = vec![
            rec(Severity::Mild, 1),
            rec(Severity::Severe, 2),
            rec(Severity::Mild, 3),
        ];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Stable);
    }

    #[test]
    fn trend_uses_timestamps_not_insertion_order() {
        // Inserted newest first; recency must come from captured_at.
        let records = vec![
            rec(Severity::None, 30),
            rec(Severity::Moderate, 20),
            rec(Severity::Severe, 10),
        ];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Improving);
    }

    #[test]
    fn only_three_newest_are_considered() {
        let records = vec![
            rec(Severity::None, 1), // outside the window
            rec(Severity::Mild, 2),
            rec(Severity::Severe, 3),
            rec(Severity::Mild, 4),
        ];
        assert_eq!(improvement_trend(&records), ImprovementTrend::Stable);
    }
}
