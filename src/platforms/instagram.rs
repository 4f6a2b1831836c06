//! Instagram profile.

use async_trait::async_trait;

use crate::engine::{keys, DownloadOptions};
use crate::platforms::traits::PlatformProfile;
use crate::platforms::PlatformId;

pub struct Instagram;

#[async_trait]
impl PlatformProfile for Instagram {
    fn platform(&self) -> PlatformId {
        PlatformId::Instagram
    }

    fn overlay(&self) -> DownloadOptions {
        DownloadOptions::new().with(keys::EXTRACT_FLAT, false)
    }
}
