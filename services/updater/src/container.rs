//! Snapshot of a single managed container.
//!
//! A `Container` is read from the runtime at the start of a run, annotated
//! in place as the run progresses, and dropped at the end. Nothing here is
//! persisted across runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use refit_id::{ContainerId, ImageId};
use refit_sort::Dependent;

/// Label that marks the updater's own container.
pub const SELF_LABEL: &str = "io.refit.updater";

/// Label that opts a container in or out of updates.
pub const ENABLE_LABEL: &str = "io.refit.enable";

/// Metadata about the image a container was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Image reference, e.g. `ghcr.io/org/app:latest`.
    pub name: String,
}

/// A managed container and its per-run flags.
#[derive(Debug, Clone)]
pub struct Container {
    id: ContainerId,
    name: String,
    image_id: ImageId,
    image_info: Option<ImageInfo>,
    links: Vec<String>,
    labels: BTreeMap<String, String>,
    created: DateTime<Utc>,
    is_self: bool,

    pub(crate) stale: bool,
    pub(crate) linked: bool,
}

impl Container {
    pub fn new(id: ContainerId, name: impl Into<String>, image_id: ImageId) -> Self {
        Self {
            id,
            name: name.into(),
            image_id,
            image_info: None,
            links: Vec::new(),
            labels: BTreeMap::new(),
            created: Utc::now(),
            is_self: false,
            stale: false,
            linked: false,
        }
    }

    pub fn with_image_info(mut self, info: ImageInfo) -> Self {
        self.image_info = Some(info);
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Set labels. Also resolves `is_self` from [`SELF_LABEL`].
    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.is_self = self.label(SELF_LABEL) == Some("true");
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Mark this container as the updater's own instance.
    pub fn with_self_marker(mut self, is_self: bool) -> Self {
        self.is_self = is_self;
        self
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Image the container is currently running.
    pub fn image_id(&self) -> &ImageId {
        &self.image_id
    }

    pub fn image_info(&self) -> Option<&ImageInfo> {
        self.image_info.as_ref()
    }

    /// Whether there is enough image metadata to recreate the container.
    pub fn has_image_info(&self) -> bool {
        self.image_info.is_some()
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// True iff this is the updater's own running container.
    pub fn is_self(&self) -> bool {
        self.is_self
    }

    /// Running an outdated image and eligible for update.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Not stale itself, but links to a container that is restarting.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// `Some(true)`/`Some(false)` if the enable label is set, `None` otherwise.
    pub fn enabled(&self) -> Option<bool> {
        self.label(ENABLE_LABEL)
            .and_then(|v| v.trim().to_ascii_lowercase().parse().ok())
    }
}

impl Dependent for Container {
    fn name(&self) -> &str {
        &self.name
    }

    fn links(&self) -> &[String] {
        &self.links
    }
}
