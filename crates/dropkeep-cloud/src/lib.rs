//! Dropkeep cloud lifecycle
//!
//! This crate backs up, restores and destroys one named droplet at a time,
//! using provider snapshots as the backup medium. It is written against the
//! [`DropletProvider`] capability trait; concrete providers live in their own
//! crates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  dropkeep CLI                    │
//! │          (backup / restore / destroy)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                dropkeep-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │    DropletLifecycle (orchestrator)        │   │
//! │  └──────┬──────────────────────┬────────────┘   │
//! │  ┌──────▼───────┐       ┌──────▼───────┐        │
//! │  │   locator    │       │     wait     │        │
//! │  └──────┬───────┘       └──────┬───────┘        │
//! │  ┌──────▼──────────────────────▼────────────┐   │
//! │  │  trait DropletProvider { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │ digitalocean  │
//!           │   provider    │
//!           └───────────────┘
//! ```

pub mod error;
pub mod lifecycle;
pub mod locator;
pub mod model;
pub mod provider;
pub mod report;
pub mod wait;

// Re-exports
pub use error::{CloudError, Result};
pub use lifecycle::{
    BackupReport, DEFAULT_REGION, DEFAULT_SIZE, DropletLifecycle, LifecycleConfig, RestoreReport,
    snapshot_name_for,
};
pub use locator::ImageScope;
pub use model::{
    AddressKind, CreateDropletRequest, CreatedDroplet, Droplet, Image, NetworkAddress,
    OperationStatus, PendingOperation, PowerStatus, SshKey,
};
pub use provider::DropletProvider;
pub use report::{LifecycleEvent, LifecycleReporter, RecordingReporter, Severity, TracingReporter};
pub use wait::{WaitConfig, wait_for_operation, wait_for_power_off};
