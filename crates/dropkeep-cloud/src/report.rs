//! Lifecycle event reporting
//!
//! The orchestrator never logs through global state of its own. It is handed
//! a [`LifecycleReporter`] when it is built and sends every transition there.

use serde::Serialize;
use std::sync::Mutex;

/// Severity of a lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// A transition observed while running a lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A same-named private snapshot was deleted ahead of a backup
    SnapshotReplaced { snapshot: String, image_id: u64 },
    ShutdownRequested { droplet: String },
    /// The shutdown request was rejected because the droplet is off
    AlreadyPoweredOff { droplet: String },
    PoweredOff { droplet: String },
    SnapshotRequested { droplet: String, snapshot: String },
    SnapshotCreated { droplet: String, snapshot: String },
    /// The requested snapshot was missing and another one was used
    SnapshotFallback { requested: String, chosen: String },
    DropletRequested { droplet: String, image: String },
    DropletCreated { droplet: String, droplet_id: u64 },
    AddressAssigned { droplet: String, ipv4: String },
    DestroyRequested { droplet: String },
    DropletDestroyed { droplet: String },
    DropletMissing { droplet: String },
    NoSnapshots,
}

impl LifecycleEvent {
    pub fn severity(&self) -> Severity {
        match self {
            LifecycleEvent::ShutdownRequested { .. }
            | LifecycleEvent::AlreadyPoweredOff { .. }
            | LifecycleEvent::PoweredOff { .. }
            | LifecycleEvent::SnapshotRequested { .. }
            | LifecycleEvent::DropletRequested { .. }
            | LifecycleEvent::DestroyRequested { .. } => Severity::Debug,
            LifecycleEvent::SnapshotReplaced { .. }
            | LifecycleEvent::SnapshotCreated { .. }
            | LifecycleEvent::DropletCreated { .. }
            | LifecycleEvent::AddressAssigned { .. }
            | LifecycleEvent::DropletDestroyed { .. } => Severity::Info,
            LifecycleEvent::SnapshotFallback { .. } => Severity::Warning,
            LifecycleEvent::DropletMissing { .. } | LifecycleEvent::NoSnapshots => Severity::Error,
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleEvent::SnapshotReplaced { snapshot, image_id } => {
                write!(f, "previous snapshot {} ({}) destroyed", snapshot, image_id)
            }
            LifecycleEvent::ShutdownRequested { droplet } => {
                write!(f, "shutting down droplet {}", droplet)
            }
            LifecycleEvent::AlreadyPoweredOff { droplet } => {
                write!(f, "droplet {} is already powered off", droplet)
            }
            LifecycleEvent::PoweredOff { droplet } => write!(f, "droplet {} powered off", droplet),
            LifecycleEvent::SnapshotRequested { droplet, snapshot } => {
                write!(f, "creating snapshot {} of {}", snapshot, droplet)
            }
            LifecycleEvent::SnapshotCreated { droplet, snapshot } => {
                write!(f, "snapshot {} of {} created", snapshot, droplet)
            }
            LifecycleEvent::SnapshotFallback { requested, chosen } => write!(
                f,
                "no snapshot named {}, restoring from {} instead",
                requested, chosen
            ),
            LifecycleEvent::DropletRequested { droplet, image } => {
                write!(f, "creating droplet {} from {}", droplet, image)
            }
            LifecycleEvent::DropletCreated { droplet, droplet_id } => {
                write!(f, "droplet {} created ({})", droplet, droplet_id)
            }
            LifecycleEvent::AddressAssigned { droplet, ipv4 } => {
                write!(f, "new droplet {} ip: {}", droplet, ipv4)
            }
            LifecycleEvent::DestroyRequested { droplet } => {
                write!(f, "destroying droplet {}", droplet)
            }
            LifecycleEvent::DropletDestroyed { droplet } => {
                write!(f, "droplet {} destroyed", droplet)
            }
            LifecycleEvent::DropletMissing { droplet } => {
                write!(f, "there is no droplet named {}", droplet)
            }
            LifecycleEvent::NoSnapshots => write!(f, "no private snapshots exist"),
        }
    }
}

/// Sink for lifecycle events
pub trait LifecycleReporter: Send + Sync {
    fn report(&self, event: &LifecycleEvent);
}

/// Forwards events to `tracing` at their severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl LifecycleReporter for TracingReporter {
    fn report(&self, event: &LifecycleEvent) {
        match event.severity() {
            Severity::Debug => tracing::debug!("{}", event),
            Severity::Info => tracing::info!("{}", event),
            Severity::Warning => tracing::warn!("{}", event),
            Severity::Error => tracing::error!("{}", event),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events at or above `severity`
    pub fn at_least(&self, severity: Severity) -> Vec<LifecycleEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity() >= severity)
            .collect()
    }
}

impl LifecycleReporter for RecordingReporter {
    fn report(&self, event: &LifecycleEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
