//! Startup sanity check for leftover own containers.
//!
//! A self-update leaves the previous own container running under a random
//! name. The next process to start stops those leftovers.

use std::collections::BTreeSet;

use tracing::{debug, error, info};

use super::cleanup::remove_images;
use crate::config::UpdateParams;
use crate::error::UpdateError;
use crate::filter::Filter;
use crate::runtime::Client;

/// Stop every own container except the newest, and remove their images if
/// cleanup is enabled.
pub async fn check_for_multiple_instances(
    client: &dyn Client,
    params: &UpdateParams,
) -> Result<(), UpdateError> {
    let mut instances = client
        .list_containers(&Filter::self_instances())
        .await
        .map_err(|e| UpdateError::List(e.to_string()))?;

    if instances.len() <= 1 {
        debug!("There are no additional updater containers");
        return Ok(());
    }

    info!(
        count = instances.len(),
        "Found multiple running updater containers, stopping the older ones"
    );

    instances.sort_by_key(|c| c.created());
    let Some(newest) = instances.pop() else {
        return Ok(());
    };

    let mut image_ids = BTreeSet::new();
    for old in &instances {
        match client.stop_container(old, params.timeout).await {
            Ok(()) => {
                info!(container = %old.name(), "Stopped previous updater container");
                if old.image_id() != newest.image_id() {
                    image_ids.insert(old.image_id().clone());
                }
            }
            Err(e) => {
                error!(container = %old.name(), error = %e, "Could not stop a previous updater container");
            }
        }
    }

    if params.cleanup {
        remove_images(client, &image_ids).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::runtime::{Call, MockClient, Op};
    use chrono::{Duration as ChronoDuration, Utc};
    use refit_id::{ContainerId, ImageId};

    fn own(name: &str, digest: &str, age_minutes: i64) -> Container {
        Container::new(
            ContainerId::parse(&format!("id-{name}")).unwrap(),
            name,
            ImageId::parse(&format!("sha256:{digest}")).unwrap(),
        )
        .with_self_marker(true)
        .with_created(Utc::now() - ChronoDuration::minutes(age_minutes))
    }

    #[tokio::test]
    async fn test_single_instance_is_left_alone() {
        let client = MockClient::new().with_container(own("refit", "aaaa", 0));

        check_for_multiple_instances(&client, &UpdateParams::default())
            .await
            .unwrap();

        assert_eq!(client.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_older_instances_stopped_and_cleaned() {
        let client = MockClient::new()
            .with_container(own("refit", "cccc", 0))
            .with_container(own("xQ1oldest", "aaaa", 60))
            .with_container(own("zP2older", "bbbb", 30));
        let params = UpdateParams {
            cleanup: true,
            ..UpdateParams::default()
        };

        check_for_multiple_instances(&client, &params).await.unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::List,
                Call::Stop("xQ1oldest".to_string()),
                Call::Stop("zP2older".to_string()),
                Call::RemoveImage(ImageId::parse("sha256:aaaa").unwrap()),
                Call::RemoveImage(ImageId::parse("sha256:bbbb").unwrap()),
            ]
        );
    }

    #[tokio::test]
    async fn test_shared_image_and_failed_stop_not_removed() {
        let client = MockClient::new()
            .with_container(own("refit", "cccc", 0))
            .with_container(own("same", "cccc", 60))
            .with_container(own("stuck", "bbbb", 30))
            .with_failure(Op::Stop, "stuck");
        let params = UpdateParams {
            cleanup: true,
            ..UpdateParams::default()
        };

        check_for_multiple_instances(&client, &params).await.unwrap();

        assert!(!client
            .calls()
            .iter()
            .any(|c| matches!(c, Call::RemoveImage(_))));
    }

    #[tokio::test]
    async fn test_listing_failure_is_returned() {
        let client = MockClient::failing();
        let result = check_for_multiple_instances(&client, &UpdateParams::default()).await;
        assert!(matches!(result, Err(UpdateError::List(_))));
    }
}
