use async_trait::async_trait;
use dropkeep_cloud::{
    AddressKind, CloudError, CreateDropletRequest, CreatedDroplet, Droplet, DropletProvider,
    Image, NetworkAddress, OperationStatus, PendingOperation, PowerStatus, Result, SshKey,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Provider calls observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    ListDroplets,
    ListImages,
    ListSshKeys,
    CreateDroplet(CreateDropletRequest),
    PowerOff(u64),
    DestroyDroplet(u64),
    DestroyImage(u64),
    Snapshot(u64, String),
    OperationStatus(u64),
    RefreshDroplet(u64),
}

#[allow(dead_code)]
impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateDroplet(_)
                | Call::PowerOff(_)
                | Call::DestroyDroplet(_)
                | Call::DestroyImage(_)
                | Call::Snapshot(_, _)
        )
    }
}

#[derive(Default)]
struct State {
    droplets: Vec<Droplet>,
    images: Vec<Image>,
    keys: Vec<SshKey>,
    next_id: u64,
    calls: Vec<Call>,
    /// Status sequences per operation kind, consumed one per poll
    scripts: HashMap<String, VecDeque<OperationStatus>>,
    /// Operation kinds that never leave in-progress
    stuck: Vec<String>,
    /// action id -> kind
    actions: HashMap<u64, String>,
    power_off_failure: Option<(u16, String)>,
}

/// In-memory provider. Mutations take effect when requested; pending
/// operations complete on their first poll unless scripted otherwise.
pub struct FakeCloud {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn with_droplet(self, id: u64, name: &str, status: PowerStatus) -> Self {
        self.state.lock().unwrap().droplets.push(Droplet {
            id,
            name: name.to_string(),
            status,
            networks: vec![public_ip(id)],
        });
        self
    }

    pub fn with_image(self, id: u64, name: &str, public: bool) -> Self {
        self.state.lock().unwrap().images.push(Image {
            id,
            name: name.to_string(),
            public,
            created_at: None,
        });
        self
    }

    pub fn with_key(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().keys.push(SshKey {
            id,
            name: name.to_string(),
            fingerprint: format!("aa:bb:{}", id),
        });
        self
    }

    /// Statuses returned by successive polls of operations of `kind`
    pub fn script(self, kind: &str, statuses: Vec<OperationStatus>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(kind.to_string(), statuses.into());
        self
    }

    /// Operations of `kind` stay in progress forever
    pub fn stuck(self, kind: &str) -> Self {
        self.state.lock().unwrap().stuck.push(kind.to_string());
        self
    }

    /// Every power_off request fails with this API error
    pub fn failing_power_off(self, status: u16, message: &str) -> Self {
        self.state.lock().unwrap().power_off_failure = Some((status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn status_polls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::OperationStatus(_)))
            .count()
    }

    pub fn droplets(&self) -> Vec<Droplet> {
        self.state.lock().unwrap().droplets.clone()
    }

    pub fn images(&self) -> Vec<Image> {
        self.state.lock().unwrap().images.clone()
    }

    pub fn images_named(&self, name: &str) -> Vec<Image> {
        self.images().into_iter().filter(|i| i.name == name).collect()
    }

    /// Pending operation handle registered with the fake, for driving the
    /// wait helpers directly
    pub fn start_operation(&self, kind: &str) -> PendingOperation {
        self.state.lock().unwrap().begin(kind)
    }
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn begin(&mut self, kind: &str) -> PendingOperation {
        let id = self.allocate_id();
        self.actions.insert(id, kind.to_string());
        PendingOperation::in_progress(id, kind)
    }
}

fn public_ip(id: u64) -> NetworkAddress {
    NetworkAddress {
        ip_address: format!("203.0.113.{}", id % 250),
        kind: AddressKind::Public,
    }
}

#[async_trait]
impl DropletProvider for FakeCloud {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_droplets(&self) -> Result<Vec<Droplet>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListDroplets);
        Ok(state.droplets.clone())
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListImages);
        Ok(state.images.clone())
    }

    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListSshKeys);
        Ok(state.keys.clone())
    }

    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<CreatedDroplet> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateDroplet(request.clone()));

        let id = state.allocate_id();
        let provisioned = Droplet {
            id,
            name: request.name.clone(),
            status: PowerStatus::Running,
            networks: vec![public_ip(id)],
        };
        state.droplets.push(provisioned.clone());

        let operation = state.begin("create");
        Ok(CreatedDroplet {
            droplet: Droplet {
                status: PowerStatus::New,
                networks: Vec::new(),
                ..provisioned
            },
            operation,
        })
    }

    async fn power_off(&self, droplet_id: u64) -> Result<PendingOperation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PowerOff(droplet_id));

        if let Some((status, message)) = state.power_off_failure.clone() {
            return Err(CloudError::ApiError { status, message });
        }

        let droplet = state
            .droplets
            .iter_mut()
            .find(|d| d.id == droplet_id)
            .ok_or_else(|| CloudError::ApiError {
                status: 404,
                message: "The resource you were accessing could not be found.".to_string(),
            })?;
        if droplet.is_off() {
            return Err(CloudError::AlreadyInState(
                "Droplet is already powered off.".to_string(),
            ));
        }
        droplet.status = PowerStatus::Off;

        Ok(state.begin("shutdown"))
    }

    async fn destroy_droplet(&self, droplet_id: u64) -> Result<PendingOperation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DestroyDroplet(droplet_id));
        state.droplets.retain(|d| d.id != droplet_id);
        Ok(state.begin("destroy"))
    }

    async fn destroy_image(&self, image_id: u64) -> Result<PendingOperation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DestroyImage(image_id));
        state.images.retain(|i| i.id != image_id);
        Ok(PendingOperation::completed("destroy_image"))
    }

    async fn snapshot(&self, droplet_id: u64, name: &str) -> Result<PendingOperation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Snapshot(droplet_id, name.to_string()));

        let id = state.allocate_id();
        state.images.push(Image {
            id,
            name: name.to_string(),
            public: false,
            created_at: None,
        });
        Ok(state.begin("snapshot"))
    }

    async fn operation_status(&self, operation: &PendingOperation) -> Result<OperationStatus> {
        let mut state = self.state.lock().unwrap();
        let id = operation.id.expect("only in-progress handles are polled");
        state.calls.push(Call::OperationStatus(id));

        let kind = state
            .actions
            .get(&id)
            .cloned()
            .unwrap_or_else(|| operation.kind.clone());
        if state.stuck.contains(&kind) {
            return Ok(OperationStatus::InProgress);
        }
        let next = state.scripts.get_mut(&kind).and_then(VecDeque::pop_front);
        Ok(next.unwrap_or(OperationStatus::Completed))
    }

    async fn refresh_droplet(&self, droplet_id: u64) -> Result<Droplet> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RefreshDroplet(droplet_id));
        state
            .droplets
            .iter()
            .find(|d| d.id == droplet_id)
            .cloned()
            .ok_or_else(|| CloudError::ApiError {
                status: 404,
                message: "The resource you were accessing could not be found.".to_string(),
            })
    }
}
