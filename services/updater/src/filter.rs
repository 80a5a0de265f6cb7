//! Container selection predicates.

use std::fmt;
use std::sync::Arc;

use crate::container::Container;

/// A predicate choosing which containers a run looks at.
#[derive(Clone)]
pub struct Filter(Arc<dyn Fn(&Container) -> bool + Send + Sync>);

impl Filter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Container) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Matches every container.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    /// Matches containers whose name is in `names`. An empty list matches all.
    pub fn by_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            return Self::all();
        }
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim_start_matches('/').to_string())
            .collect();
        Self::new(move |c| {
            let name = c.name().trim_start_matches('/');
            names.iter().any(|n| n == name)
        })
    }

    /// Matches only containers that explicitly opted in.
    pub fn by_enable_label() -> Self {
        Self::new(|c| c.enabled() == Some(true))
    }

    /// Drops containers that explicitly opted out.
    pub fn by_disable_label() -> Self {
        Self::new(|c| c.enabled() != Some(false))
    }

    /// Matches the updater's own containers.
    pub fn self_instances() -> Self {
        Self::new(Container::is_self)
    }

    pub fn and(self, other: Filter) -> Self {
        Self::new(move |c| self.matches(c) && other.matches(c))
    }

    pub fn matches(&self, container: &Container) -> bool {
        (self.0)(container)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Build the run filter from the configured names and label mode.
pub fn build_filter(names: &[String], enable_label: bool) -> Filter {
    let filter = Filter::by_disable_label().and(Filter::by_names(names.to_vec()));
    if enable_label {
        filter.and(Filter::by_enable_label())
    } else {
        filter
    }
}
