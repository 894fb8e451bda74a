//! DigitalOcean provider implementation

use crate::api::{
    ApiAction, ApiDroplet, ApiImage, ApiSshKey, CreateDropletBody, DigitalOceanApi,
    DropletActionBody,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dropkeep_cloud::{
    AddressKind, CreateDropletRequest, CreatedDroplet, Droplet, DropletProvider, Image,
    NetworkAddress, OperationStatus, PendingOperation, PowerStatus, SshKey,
};

/// DigitalOcean provider
pub struct DigitalOceanProvider {
    api: DigitalOceanApi,
}

impl DigitalOceanProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api: DigitalOceanApi::new(token),
        }
    }

    pub fn with_api(api: DigitalOceanApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &DigitalOceanApi {
        &self.api
    }
}

impl From<ApiDroplet> for Droplet {
    fn from(droplet: ApiDroplet) -> Self {
        let networks = droplet
            .networks
            .v4
            .into_iter()
            .map(|n| NetworkAddress {
                kind: if n.r#type == "public" {
                    AddressKind::Public
                } else {
                    AddressKind::Private
                },
                ip_address: n.ip_address,
            })
            .collect();

        Self {
            id: droplet.id,
            name: droplet.name,
            status: PowerStatus::from_provider(&droplet.status),
            networks,
        }
    }
}

impl From<ApiImage> for Image {
    fn from(image: ApiImage) -> Self {
        let created_at = image
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Self {
            id: image.id,
            name: image.name,
            public: image.public,
            created_at,
        }
    }
}

impl From<ApiSshKey> for SshKey {
    fn from(key: ApiSshKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            fingerprint: key.fingerprint,
        }
    }
}

/// Map an action's wire status
fn action_status(action: &ApiAction) -> OperationStatus {
    match action.status.as_str() {
        "completed" => OperationStatus::Completed,
        "errored" => OperationStatus::Errored {
            message: format!("{} action {} errored", action.r#type, action.id),
        },
        _ => OperationStatus::InProgress,
    }
}

fn pending(action: ApiAction) -> PendingOperation {
    PendingOperation {
        id: Some(action.id),
        status: action_status(&action),
        kind: action.r#type,
    }
}

#[async_trait]
impl DropletProvider for DigitalOceanProvider {
    fn name(&self) -> &str {
        "digitalocean"
    }

    async fn list_droplets(&self) -> dropkeep_cloud::Result<Vec<Droplet>> {
        let droplets = self.api.list_droplets().await?;
        Ok(droplets.into_iter().map(Droplet::from).collect())
    }

    async fn list_images(&self) -> dropkeep_cloud::Result<Vec<Image>> {
        let images = self.api.list_images().await?;
        Ok(images.into_iter().map(Image::from).collect())
    }

    async fn list_ssh_keys(&self) -> dropkeep_cloud::Result<Vec<SshKey>> {
        let keys = self.api.list_ssh_keys().await?;
        Ok(keys.into_iter().map(SshKey::from).collect())
    }

    async fn create_droplet(
        &self,
        request: &CreateDropletRequest,
    ) -> dropkeep_cloud::Result<CreatedDroplet> {
        let body = CreateDropletBody {
            name: request.name.clone(),
            region: request.region.clone(),
            size: request.size.clone(),
            image: request.image_id,
            ssh_keys: request.ssh_key_ids.clone(),
        };

        tracing::info!(
            "Creating droplet {} ({} / {}) from image {}",
            body.name,
            body.region,
            body.size,
            body.image
        );
        let (droplet, action_id) = self.api.create_droplet(&body).await?;

        Ok(CreatedDroplet {
            droplet: droplet.into(),
            operation: PendingOperation::in_progress(action_id, "create"),
        })
    }

    async fn power_off(&self, droplet_id: u64) -> dropkeep_cloud::Result<PendingOperation> {
        let action = self
            .api
            .droplet_action(droplet_id, &DropletActionBody::Shutdown)
            .await?;
        Ok(pending(action))
    }

    async fn destroy_droplet(&self, droplet_id: u64) -> dropkeep_cloud::Result<PendingOperation> {
        self.api.delete_droplet(droplet_id).await?;
        Ok(PendingOperation::completed("destroy"))
    }

    async fn destroy_image(&self, image_id: u64) -> dropkeep_cloud::Result<PendingOperation> {
        self.api.delete_image(image_id).await?;
        Ok(PendingOperation::completed("destroy_image"))
    }

    async fn snapshot(
        &self,
        droplet_id: u64,
        name: &str,
    ) -> dropkeep_cloud::Result<PendingOperation> {
        let action = self
            .api
            .droplet_action(
                droplet_id,
                &DropletActionBody::Snapshot {
                    name: name.to_string(),
                },
            )
            .await?;
        Ok(pending(action))
    }

    async fn operation_status(
        &self,
        operation: &PendingOperation,
    ) -> dropkeep_cloud::Result<OperationStatus> {
        match operation.id {
            Some(id) => {
                let action = self.api.get_action(id).await?;
                Ok(action_status(&action))
            }
            None => Ok(operation.status.clone()),
        }
    }

    async fn refresh_droplet(&self, droplet_id: u64) -> dropkeep_cloud::Result<Droplet> {
        let droplet = self.api.get_droplet(droplet_id).await?;
        Ok(droplet.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiNetworkV4, ApiNetworks};

    fn action(status: &str) -> ApiAction {
        ApiAction {
            id: 36804636,
            status: status.to_string(),
            r#type: "snapshot".to_string(),
        }
    }

    #[test]
    fn test_action_status_mapping() {
        assert_eq!(action_status(&action("in-progress")), OperationStatus::InProgress);
        assert_eq!(action_status(&action("completed")), OperationStatus::Completed);
        assert_eq!(
            action_status(&action("errored")),
            OperationStatus::Errored {
                message: "snapshot action 36804636 errored".to_string()
            }
        );
    }

    #[test]
    fn test_pending_from_action() {
        let op = pending(action("in-progress"));
        assert_eq!(op.id, Some(36804636));
        assert_eq!(op.kind, "snapshot");
        assert!(!op.status.is_terminal());
    }

    #[test]
    fn test_droplet_conversion() {
        let droplet: Droplet = ApiDroplet {
            id: 1,
            name: "web-01".to_string(),
            status: "off".to_string(),
            networks: ApiNetworks {
                v4: vec![
                    ApiNetworkV4 {
                        ip_address: "10.0.0.5".to_string(),
                        r#type: "private".to_string(),
                    },
                    ApiNetworkV4 {
                        ip_address: "198.51.100.4".to_string(),
                        r#type: "public".to_string(),
                    },
                ],
            },
        }
        .into();

        assert!(droplet.is_off());
        assert_eq!(droplet.first_ipv4(), Some("198.51.100.4"));
    }

    #[test]
    fn test_image_conversion() {
        let image: Image = ApiImage {
            id: 7555620,
            name: "web-01_snapshot".to_string(),
            public: false,
            created_at: Some("2014-11-04T22:23:02Z".to_string()),
        }
        .into();

        assert!(image.is_snapshot());
        assert_eq!(
            image.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2014-11-04T22:23:02+00:00")
        );
    }

    #[tokio::test]
    async fn test_synchronous_handles_are_not_polled() {
        // unroutable base url: any HTTP call would fail
        let provider =
            DigitalOceanProvider::with_api(DigitalOceanApi::with_base_url("t", "http://127.0.0.1:9"));
        let status = provider
            .operation_status(&PendingOperation::completed("destroy"))
            .await
            .unwrap();
        assert_eq!(status, OperationStatus::Completed);
    }
}
