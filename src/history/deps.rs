use chrono::{DateTime, Local};
use uuid::Uuid;

/// Source of "now" for new scans.
///
/// Expected not to go backwards. If it does (a wall clock stepped back),
/// recency and the trend simply follow `captured_at`, so the rewound scan
/// sorts as older than it really is. Nothing else depends on the order.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Produces identifiers for new scans.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Wall clock in the device's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
