//! Twitter/X profile.

use async_trait::async_trait;

use crate::platforms::traits::PlatformProfile;
use crate::platforms::PlatformId;

pub struct Twitter;

#[async_trait]
impl PlatformProfile for Twitter {
    fn platform(&self) -> PlatformId {
        PlatformId::Twitter
    }
}
