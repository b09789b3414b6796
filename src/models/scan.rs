use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// Input for recording a new scan: the mapped prediction plus the caller's
/// severity classification. Id and timestamp are assigned by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDraft {
    pub label: String,
    /// Whole-number percentage, nominally 0..=100.
    pub confidence: u32,
    pub severity: Severity,
    pub image_reference: String,
}

/// One completed analysis. Immutable once created.
///
/// Serialized field names follow the on-device format written by earlier
/// releases (`accuracy`, `imageUri`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub label: String,
    #[serde(rename = "accuracy")]
    pub confidence: u32,
    pub severity: Severity,
    pub date: String, // YYYY-MM-DD
    pub time: String, // H:MM AM/PM
    #[serde(rename = "imageUri")]
    pub image_reference: String,
    /// Milliseconds since the Unix epoch; the only recency key.
    #[serde(rename = "createdAt")]
    pub captured_at: i64,
}

impl ScanRecord {
    /// Build a record from a draft, stamping it with `id` and `now`.
    pub fn create<Tz: TimeZone>(draft: ScanDraft, id: String, now: &DateTime<Tz>) -> Self {
        let (date, time) = format_date_time(now);
        Self {
            id,
            label: draft.label,
            confidence: draft.confidence,
            severity: draft.severity,
            date,
            time,
            image_reference: draft.image_reference,
            captured_at: now.timestamp_millis(),
        }
    }
}

/// Display strings stored alongside each record: zero-padded `YYYY-MM-DD`
/// and a 12-hour clock where hour 0 reads as 12.
pub fn format_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> (String, String) {
    let date = format!("{:04}-{:02}-{:02}", at.year(), at.month(), at.day());
    let (is_pm, hour) = at.hour12();
    let time = format!(
        "{}:{:02} {}",
        hour,
        at.minute(),
        if is_pm { "PM" } else { "AM" }
    );
    (date, time)
}

/// Records ordered most recent first.
///
/// Equal `captured_at` values are broken by position: a record that appears
/// later in `records` was appended later and counts as more recent.
pub fn by_recency(records: &[ScanRecord]) -> Vec<&ScanRecord> {
    let mut indexed: Vec<(usize, &ScanRecord)> = records.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.captured_at
            .cmp(&a.captured_at)
            .then_with(|| ib.cmp(ia))
    });
    indexed.into_iter().map(|(_, record)| record).collect()
}

/// The `limit` most recent records.
pub fn most_recent(records: &[ScanRecord], limit: usize) -> Vec<ScanRecord> {
    by_recency(records)
        .into_iter()
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn draft(label: &str) -> ScanDraft {
        ScanDraft {
            label: label.into(),
            confidence: 87,
            severity: Severity::Mild,
            image_reference: "file:///scans/1.jpg".into(),
        }
    }

    fn record(id: &str, captured_at: i64) -> ScanRecord {
        ScanRecord {
            id: id.into(),
            label: "Acne".into(),
            confidence: 90,
            severity: Severity::None,
            date: "2025-01-15".into(),
            time: "9:00 AM".into(),
            image_reference: String::new(),
            captured_at,
        }
    }

    #[test]
    fn create_stamps_id_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
        let rec = ScanRecord::create(draft("Eczema"), "abc".into(), &now);

        assert_eq!(rec.id, "abc");
        assert_eq!(rec.label, "Eczema");
        assert_eq!(rec.confidence, 87);
        assert_eq!(rec.severity, Severity::Mild);
        assert_eq!(rec.captured_at, now.timestamp_millis());
        assert_eq!(rec.date, "2025-03-07");
        assert_eq!(rec.time, "2:05 PM");
    }

    #[test]
    fn midnight_reads_as_twelve_am() {
        let at = Utc.with_ymd_and_hms(2024, 12, 1, 0, 9, 0).unwrap();
        let (date, time) = format_date_time(&at);
        assert_eq!(date, "2024-12-01");
        assert_eq!(time, "12:09 AM");
    }

    #[test]
    fn noon_reads_as_twelve_pm() {
        let at = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        assert_eq!(format_date_time(&at).1, "12:00 PM");
    }

    #[test]
    fn display_uses_the_clock_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap();
        assert_eq!(format_date_time(&at), ("2025-01-01".into(), "8:30 AM".into()));
    }

    #[test]
    fn serializes_with_legacy_field_names() {
        let json = serde_json::to_value(record("x", 42)).unwrap();
        assert_eq!(json["accuracy"], 90);
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["severity"], "None");
        assert!(json.get("imageUri").is_some());
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn recency_orders_newest_first() {
        let records = vec![record("a", 10), record("b", 30), record("c", 20)];
        let ids: Vec<&str> = by_recency(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn recency_tie_prefers_later_insertion() {
        let records = vec![record("first", 5), record("second", 5), record("old", 1)];
        let ids: Vec<&str> = by_recency(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first", "old"]);
    }

    #[test]
    fn most_recent_respects_limit() {
        let records: Vec<ScanRecord> = (0..6).map(|i| record(&i.to_string(), i)).collect();
        let recent = most_recent(&records, 4);
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].id, "5");
        assert_eq!(recent[3].id, "2");
        assert!(most_recent(&[], 4).is_empty());
    }
}
