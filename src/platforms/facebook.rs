//! Facebook profile.

use async_trait::async_trait;

use crate::engine::{keys, DownloadOptions};
use crate::platforms::traits::PlatformProfile;
use crate::platforms::PlatformId;

pub struct Facebook;

#[async_trait]
impl PlatformProfile for Facebook {
    fn platform(&self) -> PlatformId {
        PlatformId::Facebook
    }

    fn overlay(&self) -> DownloadOptions {
        DownloadOptions::new().with(keys::EXTRACT_FLAT, false)
    }
}
