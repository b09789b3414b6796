//! SkinOAI scan history core.
//!
//! Records completed skin scans, keeps them in the device's key-value store
//! and derives the statistics shown on the home and history screens.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use skinscan::history::ScanHistory;
//! use skinscan::models::{ScanDraft, Severity};
//!
//! skinscan::init_tracing();
//! let history = ScanHistory::open_default()?;
//! history.initialize().await;
//! history
//!     .add(ScanDraft {
//!         label: "Eczema".into(),
//!         confidence: 88,
//!         severity: Severity::Mild,
//!         image_reference: "file:///scans/eczema.jpg".into(),
//!     })
//!     .await?;
//! println!("health score: {}", history.snapshot().health_score);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod history;
pub mod models;
pub mod prediction;
pub mod stats;
pub mod storage;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
}
