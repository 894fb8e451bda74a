//! Provider client capability trait

use crate::error::Result;
use crate::model::{
    CreateDropletRequest, CreatedDroplet, Droplet, Image, OperationStatus, PendingOperation,
    SshKey,
};
use async_trait::async_trait;

/// Capability set the lifecycle orchestrator needs from a cloud provider
///
/// Implementations own authentication, transport, rate limiting and listing
/// pagination. Listings are returned in provider order; the orchestrator
/// treats that order as stable but unspecified.
///
/// A rejection that only means "the resource is already in the requested
/// state" must be reported as [`CloudError::AlreadyInState`] so that callers
/// can tell it apart from real failures.
///
/// [`CloudError::AlreadyInState`]: crate::CloudError::AlreadyInState
#[async_trait]
pub trait DropletProvider: Send + Sync {
    /// Returns the provider name (e.g., "digitalocean")
    fn name(&self) -> &str;

    /// All droplets on the account
    async fn list_droplets(&self) -> Result<Vec<Droplet>>;

    /// All images visible to the account, public templates included
    async fn list_images(&self) -> Result<Vec<Image>>;

    /// SSH keys registered with the account
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>>;

    /// Request a new droplet
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<CreatedDroplet>;

    /// Request a shutdown of the droplet
    async fn power_off(&self, droplet_id: u64) -> Result<PendingOperation>;

    /// Request permanent removal of the droplet
    async fn destroy_droplet(&self, droplet_id: u64) -> Result<PendingOperation>;

    /// Request removal of an image
    async fn destroy_image(&self, image_id: u64) -> Result<PendingOperation>;

    /// Request a snapshot of the droplet's disk
    async fn snapshot(&self, droplet_id: u64, name: &str) -> Result<PendingOperation>;

    /// Current status of a pending operation
    async fn operation_status(&self, operation: &PendingOperation) -> Result<OperationStatus>;

    /// Fresh descriptor for a droplet (addresses, power state)
    async fn refresh_droplet(&self, droplet_id: u64) -> Result<Droplet>;
}
