//! Removal of superseded images.

use std::collections::BTreeSet;

use refit_id::ImageId;
use tracing::{error, info};

use crate::runtime::Client;

/// Remove each image, best-effort. Images still in use or already gone are
/// refused by the runtime; that is logged and skipped.
///
/// Returns the images that were removed.
pub(crate) async fn remove_images(client: &dyn Client, image_ids: &BTreeSet<ImageId>) -> Vec<ImageId> {
    let mut removed = Vec::with_capacity(image_ids.len());

    for image_id in image_ids {
        match client.remove_image_by_id(image_id).await {
            Ok(()) => {
                info!(image = %image_id.short(), "Removed image");
                removed.push(image_id.clone());
            }
            Err(e) => {
                error!(image = %image_id.short(), error = %e, "Failed to remove image");
            }
        }
    }

    removed
}
