//! Staleness resolution.

use tracing::{debug, error, info};

use crate::config::UpdateParams;
use crate::container::Container;
use crate::error::StalenessError;
use crate::runtime::Client;

/// Mark each container stale or not. Never fails the run: a container whose
/// state cannot be trusted is demoted to not stale.
///
/// Returns the names of demoted containers.
pub(crate) async fn resolve_staleness(
    client: &dyn Client,
    containers: &mut [Container],
    params: &UpdateParams,
) -> Vec<String> {
    let mut skipped = Vec::new();

    for container in containers.iter_mut() {
        match check_container(client, container, params).await {
            Ok(stale) => {
                debug!(container = %container.name(), stale, "Checked container image");
                container.stale = stale;
            }
            Err(e) => {
                match &e {
                    StalenessError::Query(_) => {
                        error!(container = %container.name(), error = %e, "Unable to check container image");
                    }
                    StalenessError::NoImageInfo => {
                        info!(container = %container.name(), error = %e, "Unable to update container");
                    }
                }
                info!(container = %container.name(), "Proceeding to next container");
                container.stale = false;
                skipped.push(container.name().to_string());
            }
        }
    }

    skipped
}

async fn check_container(
    client: &dyn Client,
    container: &Container,
    params: &UpdateParams,
) -> Result<bool, StalenessError> {
    let stale = client
        .is_container_stale(container)
        .await
        .map_err(|e| StalenessError::Query(e.to_string()))?;

    // Monitoring and stop-only runs never recreate the container, so they
    // do not need its image metadata.
    if stale && !params.no_restart && !params.monitor_only && !container.has_image_info() {
        return Err(StalenessError::NoImageInfo);
    }

    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ImageInfo;
    use crate::runtime::{MockClient, Op};
    use refit_id::{ContainerId, ImageId};

    fn container(name: &str) -> Container {
        Container::new(
            ContainerId::parse(&format!("id-{name}")).unwrap(),
            name,
            ImageId::parse("sha256:aaaa").unwrap(),
        )
        .with_image_info(ImageInfo {
            name: format!("example/{name}:latest"),
        })
    }

    fn bare(name: &str) -> Container {
        Container::new(
            ContainerId::parse(&format!("id-{name}")).unwrap(),
            name,
            ImageId::parse("sha256:aaaa").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_stale_and_fresh() {
        let client = MockClient::new().with_stale("web");
        let mut containers = vec![container("web"), container("db")];

        let skipped =
            resolve_staleness(&client, &mut containers, &UpdateParams::default()).await;

        assert!(skipped.is_empty());
        assert!(containers[0].is_stale());
        assert!(!containers[1].is_stale());
    }

    #[tokio::test]
    async fn test_query_error_demotes_and_continues() {
        let client = MockClient::new()
            .with_stale("web")
            .with_stale("db")
            .with_failure(Op::IsStale, "web");
        let mut containers = vec![container("web"), container("db")];

        let skipped =
            resolve_staleness(&client, &mut containers, &UpdateParams::default()).await;

        assert_eq!(skipped, vec!["web".to_string()]);
        assert!(!containers[0].is_stale());
        assert!(containers[1].is_stale());
    }

    #[tokio::test]
    async fn test_missing_image_info_demotes() {
        let client = MockClient::new().with_stale("web");
        let mut containers = vec![bare("web")];

        let skipped =
            resolve_staleness(&client, &mut containers, &UpdateParams::default()).await;

        assert_eq!(skipped, vec!["web".to_string()]);
        assert!(!containers[0].is_stale());
    }

    #[tokio::test]
    async fn test_missing_image_info_tolerated_when_monitoring() {
        let client = MockClient::new().with_stale("web");
        let mut containers = vec![bare("web")];
        let params = UpdateParams {
            monitor_only: true,
            ..UpdateParams::default()
        };

        let skipped = resolve_staleness(&client, &mut containers, &params).await;

        assert!(skipped.is_empty());
        assert!(containers[0].is_stale());
    }

    #[tokio::test]
    async fn test_missing_image_info_tolerated_without_restart() {
        let client = MockClient::new().with_stale("web");
        let mut containers = vec![bare("web")];
        let params = UpdateParams {
            no_restart: true,
            ..UpdateParams::default()
        };

        resolve_staleness(&client, &mut containers, &params).await;

        assert!(containers[0].is_stale());
    }

    #[tokio::test]
    async fn test_fresh_container_without_image_info_is_fine() {
        let client = MockClient::new();
        let mut containers = vec![bare("web")];

        let skipped =
            resolve_staleness(&client, &mut containers, &UpdateParams::default()).await;

        assert!(skipped.is_empty());
        assert!(!containers[0].is_stale());
    }
}
