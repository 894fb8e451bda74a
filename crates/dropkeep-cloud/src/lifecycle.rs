//! Backup, restore and destroy of a single named droplet
//!
//! Each operation is a fixed sequence of provider calls. Every asynchronous
//! provider call is waited on before the next step starts, and no call is
//! retried: the status polls in [`crate::wait`] are the only repetition.

use crate::error::{CloudError, Result};
use crate::locator::{self, ImageScope};
use crate::model::{CreateDropletRequest, Droplet, Image, SshKey};
use crate::provider::DropletProvider;
use crate::report::{LifecycleEvent, LifecycleReporter};
use crate::wait::{self, WaitConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_REGION: &str = "nyc3";
pub const DEFAULT_SIZE: &str = "512mb";
const SNAPSHOT_SUFFIX: &str = "_snapshot";

/// Placement and polling settings for lifecycle operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Region new droplets are created in
    pub region: String,
    /// Size slug new droplets are created with
    pub size: String,
    /// Polling discipline for pending operations
    pub wait: WaitConfig,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            size: DEFAULT_SIZE.to_string(),
            wait: WaitConfig::default(),
        }
    }
}

/// Snapshot name used when the caller does not pick one
pub fn snapshot_name_for(droplet_name: &str, snapshot_name: Option<&str>) -> String {
    match snapshot_name {
        Some(name) => name.to_string(),
        None => format!("{}{}", droplet_name, SNAPSHOT_SUFFIX),
    }
}

/// Outcome of a successful backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub droplet: String,
    pub snapshot: String,
    /// Whether a same-named private snapshot existed and was deleted first
    pub replaced_previous: bool,
}

/// Outcome of a successful restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Refreshed descriptor of the new droplet
    pub droplet: Droplet,
    /// Image the droplet was created from
    pub snapshot: Image,
    /// Whether `snapshot` is a substitute for a missing requested name
    pub fell_back: bool,
    /// Primary IPv4 address of the new droplet
    pub ipv4: String,
}

/// Lifecycle orchestrator for droplets identified by name
///
/// Calls are not coordinated with each other. Two operations running at the
/// same time against the same droplet or snapshot name race at the provider;
/// nothing here locks or versions those names. Abandoning a call (for
/// example after [`CloudError::OperationTimedOut`]) does not cancel work the
/// provider has already accepted, and a later call sees whatever that work
/// left behind.
pub struct DropletLifecycle<P> {
    provider: P,
    config: LifecycleConfig,
    reporter: Arc<dyn LifecycleReporter>,
}

impl<P: DropletProvider> DropletLifecycle<P> {
    pub fn new(provider: P, config: LifecycleConfig, reporter: Arc<dyn LifecycleReporter>) -> Self {
        Self {
            provider,
            config,
            reporter,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    fn emit(&self, event: LifecycleEvent) {
        self.reporter.report(&event);
    }

    /// Snapshot the droplet's disk under `snapshot_name` (default
    /// `<droplet_name>_snapshot`).
    ///
    /// A private snapshot already carrying that name is deleted before the
    /// new one is requested. If anything fails after that deletion there is
    /// no backup under the name until the next successful run; nothing is
    /// rolled back.
    pub async fn backup(
        &self,
        droplet_name: &str,
        snapshot_name: Option<&str>,
    ) -> Result<BackupReport> {
        let snapshot_name = snapshot_name_for(droplet_name, snapshot_name);

        let droplet = self.require_droplet(droplet_name).await?;

        let previous =
            locator::find_image(&self.provider, &snapshot_name, ImageScope::PrivateOnly).await?;
        if let Some(image) = &previous {
            let operation = self.provider.destroy_image(image.id).await?;
            wait::wait_for_operation(&self.provider, &operation, &self.config.wait).await?;
            self.emit(LifecycleEvent::SnapshotReplaced {
                snapshot: image.name.clone(),
                image_id: image.id,
            });
        }

        self.shut_down(&droplet).await?;

        self.emit(LifecycleEvent::SnapshotRequested {
            droplet: droplet.name.clone(),
            snapshot: snapshot_name.clone(),
        });
        let operation = self.provider.snapshot(droplet.id, &snapshot_name).await?;
        wait::wait_for_operation(&self.provider, &operation, &self.config.wait).await?;
        self.emit(LifecycleEvent::SnapshotCreated {
            droplet: droplet.name.clone(),
            snapshot: snapshot_name.clone(),
        });

        Ok(BackupReport {
            droplet: droplet.name,
            snapshot: snapshot_name,
            replaced_previous: previous.is_some(),
        })
    }

    /// Bring the droplet to a powered off state.
    ///
    /// A rejection saying the droplet is already off is not an error, but
    /// the power state is still confirmed before returning.
    async fn shut_down(&self, droplet: &Droplet) -> Result<()> {
        self.emit(LifecycleEvent::ShutdownRequested {
            droplet: droplet.name.clone(),
        });

        match self.provider.power_off(droplet.id).await {
            Ok(operation) => {
                wait::wait_for_operation(&self.provider, &operation, &self.config.wait).await?;
            }
            Err(CloudError::AlreadyInState(reason)) => {
                tracing::debug!("shutdown of {} rejected: {}", droplet.name, reason);
                self.emit(LifecycleEvent::AlreadyPoweredOff {
                    droplet: droplet.name.clone(),
                });
                wait::wait_for_power_off(&self.provider, droplet.id, &self.config.wait).await?;
            }
            Err(e) => return Err(e),
        }

        self.emit(LifecycleEvent::PoweredOff {
            droplet: droplet.name.clone(),
        });
        Ok(())
    }

    /// Create a droplet named `droplet_name` from the private snapshot
    /// `snapshot_name` (default `<droplet_name>_snapshot`).
    ///
    /// When no private snapshot has that name, the first private snapshot in
    /// listing order is used instead and a warning is reported. The new
    /// droplet always gets the first SSH key on the account.
    pub async fn restore(
        &self,
        droplet_name: &str,
        snapshot_name: Option<&str>,
    ) -> Result<RestoreReport> {
        let requested = snapshot_name_for(droplet_name, snapshot_name);

        let snapshots = locator::list_snapshots(&self.provider).await?;
        let (snapshot, fell_back) = match locator::first_match(snapshots.iter(), |i| {
            i.name == requested
        }) {
            Some(image) => (image.clone(), false),
            None => {
                let Some(substitute) = snapshots.first() else {
                    self.emit(LifecycleEvent::NoSnapshots);
                    return Err(CloudError::NoSnapshotAvailable);
                };
                self.emit(LifecycleEvent::SnapshotFallback {
                    requested: requested.clone(),
                    chosen: substitute.name.clone(),
                });
                (substitute.clone(), true)
            }
        };

        let key = locator::first_ssh_key(&self.provider)
            .await?
            .ok_or(CloudError::NoSshKey)?;

        let request = CreateDropletRequest {
            name: droplet_name.to_string(),
            region: self.config.region.clone(),
            size: self.config.size.clone(),
            image_id: snapshot.id,
            ssh_key_ids: vec![key.id],
        };

        self.emit(LifecycleEvent::DropletRequested {
            droplet: droplet_name.to_string(),
            image: snapshot.name.clone(),
        });
        let created = self.provider.create_droplet(&request).await?;
        wait::wait_for_operation(&self.provider, &created.operation, &self.config.wait).await?;
        self.emit(LifecycleEvent::DropletCreated {
            droplet: droplet_name.to_string(),
            droplet_id: created.droplet.id,
        });

        // the create response carries no addresses; only a refresh after
        // completion does
        let droplet = self.provider.refresh_droplet(created.droplet.id).await?;
        let ipv4 = droplet
            .first_ipv4()
            .map(str::to_string)
            .ok_or_else(|| CloudError::AddressNotAssigned(droplet_name.to_string()))?;
        self.emit(LifecycleEvent::AddressAssigned {
            droplet: droplet_name.to_string(),
            ipv4: ipv4.clone(),
        });

        Ok(RestoreReport {
            droplet,
            snapshot,
            fell_back,
            ipv4,
        })
    }

    /// Permanently remove the droplet named `droplet_name`. No snapshot is
    /// taken first.
    pub async fn destroy(&self, droplet_name: &str) -> Result<()> {
        let droplet = self.require_droplet(droplet_name).await?;

        self.emit(LifecycleEvent::DestroyRequested {
            droplet: droplet.name.clone(),
        });
        let operation = self.provider.destroy_droplet(droplet.id).await?;
        wait::wait_for_operation(&self.provider, &operation, &self.config.wait).await?;
        self.emit(LifecycleEvent::DropletDestroyed {
            droplet: droplet.name,
        });
        Ok(())
    }

    /// Current descriptor of the droplet named `droplet_name`
    pub async fn droplet(&self, droplet_name: &str) -> Result<Droplet> {
        self.require_droplet(droplet_name).await
    }

    /// Private snapshots in listing order
    pub async fn snapshots(&self) -> Result<Vec<Image>> {
        locator::list_snapshots(&self.provider).await
    }

    /// SSH keys in listing order
    pub async fn ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.provider.list_ssh_keys().await
    }

    async fn require_droplet(&self, droplet_name: &str) -> Result<Droplet> {
        match locator::find_droplet(&self.provider, droplet_name).await? {
            Some(droplet) => Ok(droplet),
            None => {
                self.emit(LifecycleEvent::DropletMissing {
                    droplet: droplet_name.to_string(),
                });
                Err(CloudError::DropletNotFound(droplet_name.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_name() {
        assert_eq!(snapshot_name_for("web-01", None), "web-01_snapshot");
        assert_eq!(snapshot_name_for("web-01", Some("nightly")), "nightly");
    }

    #[test]
    fn test_default_placement() {
        let config = LifecycleConfig::default();
        assert_eq!(config.region, "nyc3");
        assert_eq!(config.size, "512mb");
    }
}
