//! Resource descriptors shared by providers and the orchestrator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Power state of a droplet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerStatus {
    /// Being provisioned
    New,
    /// Powered on
    Running,
    /// Powered off
    Off,
    /// Archived by the provider
    Archived,
    /// Status string not recognised
    Unknown,
}

impl PowerStatus {
    /// Parse a provider status string
    pub fn from_provider(status: &str) -> Self {
        match status {
            "new" => Self::New,
            "active" => Self::Running,
            "off" => Self::Off,
            "archive" => Self::Archived,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerStatus::New => write!(f, "new"),
            PowerStatus::Running => write!(f, "running"),
            PowerStatus::Off => write!(f, "off"),
            PowerStatus::Archived => write!(f, "archived"),
            PowerStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Network scope of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Public,
    Private,
}

/// IPv4 address attached to a droplet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub ip_address: String,
    pub kind: AddressKind,
}

/// A compute instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    /// Provider-assigned id, stable for the droplet's lifetime
    pub id: u64,

    /// Human readable name. Not unique at the provider.
    pub name: String,

    pub status: PowerStatus,

    /// IPv4 addresses. Empty until creation completes.
    #[serde(default)]
    pub networks: Vec<NetworkAddress>,
}

impl Droplet {
    pub fn is_off(&self) -> bool {
        self.status == PowerStatus::Off
    }

    /// First IPv4 address, preferring public ones
    pub fn first_ipv4(&self) -> Option<&str> {
        self.networks
            .iter()
            .find(|n| n.kind == AddressKind::Public)
            .or_else(|| self.networks.first())
            .map(|n| n.ip_address.as_str())
    }
}

/// A disk image. Private images are account snapshots, public ones are
/// provider OS templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
    pub public: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Image {
    /// Whether this image is a user snapshot rather than a template
    pub fn is_snapshot(&self) -> bool {
        !self.public
    }
}

/// SSH key registered with the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
}

/// State of an asynchronous provider task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    InProgress,
    Completed,
    Errored { message: String },
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationStatus::InProgress)
    }
}

/// Handle to an asynchronous provider task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Provider action id. `None` when the call finished synchronously.
    pub id: Option<u64>,

    /// Operation kind (e.g. "shutdown", "snapshot", "create")
    pub kind: String,

    /// Status as of the moment the handle was produced
    pub status: OperationStatus,
}

impl PendingOperation {
    pub fn in_progress(id: u64, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            kind: kind.into(),
            status: OperationStatus::InProgress,
        }
    }

    /// Handle for a call the provider completed before answering
    pub fn completed(kind: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            status: OperationStatus::Completed,
        }
    }

    /// Human readable label used in logs and errors
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("{} #{}", self.kind, id),
            None => self.kind.clone(),
        }
    }
}

/// Parameters for creating a droplet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image_id: u64,
    pub ssh_key_ids: Vec<u64>,
}

/// Provisional droplet descriptor plus the handle tracking its creation
#[derive(Debug, Clone)]
pub struct CreatedDroplet {
    pub droplet: Droplet,
    pub operation: PendingOperation,
}
