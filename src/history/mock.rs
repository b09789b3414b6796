//! Demo scans for populating an empty history during development.

use rand::Rng;

use crate::models::{ScanDraft, Severity};

pub const MOCK_CONDITIONS: &[&str] = &[
    "Melanoma",
    "Dry Skin",
    "Normal Skin",
    "Skin Rashes",
    "Acne",
    "Eczema",
];

/// A random draft: any condition, any severity, confidence 80..=99.
pub fn generate_mock_draft<R: Rng + ?Sized>(rng: &mut R) -> ScanDraft {
    let label = MOCK_CONDITIONS[rng.gen_range(0..MOCK_CONDITIONS.len())];
    let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];

    ScanDraft {
        label: label.to_string(),
        confidence: rng.gen_range(80..100),
        severity,
        image_reference: format!(
            "https://picsum.photos/300/300?random={}",
            rng.gen_range(0..1000)
        ),
    }
}
