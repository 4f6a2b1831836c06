//! YouTube profile.

use async_trait::async_trait;

use crate::platforms::traits::PlatformProfile;
use crate::platforms::PlatformId;

/// YouTube needs no overlay; playlists are handled by the playlist orchestrator.
pub struct YouTube;

#[async_trait]
impl PlatformProfile for YouTube {
    fn platform(&self) -> PlatformId {
        PlatformId::Youtube
    }
}
