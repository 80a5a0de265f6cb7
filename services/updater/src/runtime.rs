//! Container runtime interface and mock implementation.
//!
//! The runtime interface abstracts the operations an update run needs:
//! - Listing containers and checking their images for staleness
//! - Stopping, starting and renaming containers
//! - Removing superseded images
//!
//! A mock implementation is provided for testing and development.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use refit_id::{ContainerId, ImageId};
use tracing::{debug, info};

use crate::container::Container;
use crate::filter::Filter;

/// Container runtime interface.
#[async_trait]
pub trait Client: Send + Sync {
    /// List running containers matching the filter.
    async fn list_containers(&self, filter: &Filter) -> Result<Vec<Container>>;

    /// Check whether a newer image is available for the container.
    async fn is_container_stale(&self, container: &Container) -> Result<bool>;

    /// Stop a container, waiting at most `timeout` before killing it.
    async fn stop_container(&self, container: &Container, timeout: Duration) -> Result<()>;

    /// Create and start a container from the snapshot's configuration.
    async fn start_container(&self, container: &Container) -> Result<ContainerId>;

    /// Rename a running container.
    async fn rename_container(&self, container: &Container, new_name: &str) -> Result<()>;

    /// Remove an image. Fails if the image is still in use.
    async fn remove_image_by_id(&self, image_id: &ImageId) -> Result<()>;
}

/// Operations a [`MockClient`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    IsStale,
    Stop,
    Start,
    Rename,
}

/// A call observed by the [`MockClient`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    IsStale(String),
    Stop(String),
    Start(String),
    Rename { from: String, to: String },
    RemoveImage(ImageId),
}

#[derive(Default)]
struct MockState {
    containers: Vec<Container>,
    stale: HashSet<String>,
    failures: HashSet<(Op, String)>,
    failing_images: HashSet<ImageId>,
    calls: Vec<Call>,
}

/// Mock runtime for testing and development.
pub struct MockClient {
    state: Mutex<MockState>,

    /// Counter for generating container IDs.
    id_counter: AtomicU64,

    /// Whether listing should "fail".
    fail_list: bool,
}

impl MockClient {
    /// Create an empty mock runtime.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            id_counter: AtomicU64::new(0),
            fail_list: false,
        }
    }

    /// Create a mock runtime whose listing always fails.
    pub fn failing() -> Self {
        Self {
            fail_list: true,
            ..Self::new()
        }
    }

    /// Add a running container.
    pub fn with_container(self, container: Container) -> Self {
        self.lock().containers.push(container);
        self
    }

    /// Report the named container as running an outdated image.
    pub fn with_stale(self, name: &str) -> Self {
        self.lock().stale.insert(name.to_string());
        self
    }

    /// Make `op` fail for the named container.
    pub fn with_failure(self, op: Op, name: &str) -> Self {
        self.lock().failures.insert((op, name.to_string()));
        self
    }

    /// Make removal of `image_id` fail.
    pub fn with_failing_image(self, image_id: ImageId) -> Self {
        self.lock().failing_images.insert(image_id);
        self
    }

    /// Calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Current container names, after any renames.
    pub fn container_names(&self) -> Vec<String> {
        self.lock()
            .containers
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_container_id(&self) -> Result<ContainerId> {
        let counter = self.id_counter.fetch_add(1, Ordering::SeqCst);
        Ok(ContainerId::parse(&format!("mock{:012x}", counter))?)
    }

    fn record(&self, call: Call, op: Option<Op>, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(call);
        match op {
            Some(op) if state.failures.contains(&(op, name.to_string())) => {
                Err(anyhow!("mock runtime configured to fail {op:?} for {name}"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn list_containers(&self, filter: &Filter) -> Result<Vec<Container>> {
        let mut state = self.lock();
        state.calls.push(Call::List);
        if self.fail_list {
            anyhow::bail!("mock runtime configured to fail listing");
        }

        let containers: Vec<Container> = state
            .containers
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        debug!(count = containers.len(), "[MOCK] Listed containers");
        Ok(containers)
    }

    async fn is_container_stale(&self, container: &Container) -> Result<bool> {
        self.record(
            Call::IsStale(container.name().to_string()),
            Some(Op::IsStale),
            container.name(),
        )?;
        Ok(self.lock().stale.contains(container.name()))
    }

    async fn stop_container(&self, container: &Container, timeout: Duration) -> Result<()> {
        info!(
            container = %container.name(),
            id = %container.id().short(),
            timeout_secs = timeout.as_secs(),
            "[MOCK] Stopping container"
        );
        self.record(
            Call::Stop(container.name().to_string()),
            Some(Op::Stop),
            container.name(),
        )
    }

    async fn start_container(&self, container: &Container) -> Result<ContainerId> {
        self.record(
            Call::Start(container.name().to_string()),
            Some(Op::Start),
            container.name(),
        )?;

        let id = self.next_container_id()?;
        info!(
            container = %container.name(),
            new_id = %id,
            "[MOCK] Started container"
        );
        Ok(id)
    }

    async fn rename_container(&self, container: &Container, new_name: &str) -> Result<()> {
        self.record(
            Call::Rename {
                from: container.name().to_string(),
                to: new_name.to_string(),
            },
            Some(Op::Rename),
            container.name(),
        )?;

        let mut state = self.lock();
        for existing in state
            .containers
            .iter_mut()
            .filter(|c| c.id() == container.id())
        {
            existing.set_name(new_name);
        }
        Ok(())
    }

    async fn remove_image_by_id(&self, image_id: &ImageId) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::RemoveImage(image_id.clone()));
        if state.failing_images.contains(image_id) {
            anyhow::bail!("image {} is in use", image_id.short());
        }
        debug!(image = %image_id.short(), "[MOCK] Removed image");
        Ok(())
    }
}
