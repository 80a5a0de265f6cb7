//! Link propagation.

use std::collections::HashSet;

use tracing::debug;

use crate::config::UpdateParams;
use crate::container::Container;

/// Flag containers that link to a restarting container.
///
/// Only reads the already resolved staleness. Containers that restart
/// themselves are never flagged.
pub(crate) fn propagate_links(containers: &mut [Container], params: &UpdateParams) {
    let restarting: HashSet<String> = containers
        .iter()
        .filter(|c| params.will_restart(c))
        .map(|c| c.name().trim_start_matches('/').to_string())
        .collect();

    if restarting.is_empty() {
        return;
    }

    for container in containers.iter_mut() {
        if params.will_restart(container) {
            continue;
        }

        if let Some(link) = container
            .links()
            .iter()
            .find(|l| restarting.contains(l.trim_start_matches('/')))
        {
            debug!(container = %container.name(), link = %link, "Linked container is restarting");
            container.linked = true;
        }
    }
}
