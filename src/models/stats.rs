use serde::{Deserialize, Serialize};

use super::enums::{HealthScore, ImprovementTrend, RiskLevel, Severity};

/// Count of records per severity. All four keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    #[serde(rename = "None")]
    pub none: u32,
    #[serde(rename = "Mild")]
    pub mild: u32,
    #[serde(rename = "Moderate")]
    pub moderate: u32,
    #[serde(rename = "Severe")]
    pub severe: u32,
}

impl SeverityBreakdown {
    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::None => self.none,
            Severity::Mild => self.mild,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }

    pub fn record(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::None => &mut self.none,
            Severity::Mild => &mut self.mild,
            Severity::Moderate => &mut self.moderate,
            Severity::Severe => &mut self.severe,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.none + self.mild + self.moderate + self.severe
    }
}

/// Aggregates for every record sharing one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseStats {
    pub name: String,
    pub count: u32,
    pub total_confidence: u64,
    pub average_confidence: u32,
    pub severity_breakdown: SeverityBreakdown,
    /// Display date of the group's most recent record.
    pub last_detected: String,
}

/// Derived snapshot of the whole history. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_scans: u32,
    pub average_confidence: u32,
    pub health_score: HealthScore,
    pub healthy_count: u32,
    pub disease_stats: Vec<DiseaseStats>,
    pub severity_distribution: SeverityBreakdown,
    pub most_common_condition: String,
    pub risk_level: RiskLevel,
    pub improvement_trend: ImprovementTrend,
}

/// Label reported when there is nothing to rank.
pub const NO_CONDITION: &str = "None";

impl Default for ScanStats {
    fn default() -> Self {
        Self {
            total_scans: 0,
            average_confidence: 0,
            health_score: HealthScore::APlus,
            healthy_count: 0,
            disease_stats: Vec::new(),
            severity_distribution: SeverityBreakdown::default(),
            most_common_condition: NO_CONDITION.into(),
            risk_level: RiskLevel::Low,
            improvement_trend: ImprovementTrend::Stable,
        }
    }
}
