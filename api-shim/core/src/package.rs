use crate::Metadata;

pub const BITS_PACKAGE_TYPE: &str = "bits";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PackageState {
    AwaitingUpload,
    ProcessingUpload,
    Ready,
    Failed,
    Copying,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageRecord {
    pub guid: String,
    pub type_: String,
    pub app_guid: String,
    pub space_guid: String,
    pub state: PackageState,
    pub source_image_ref: String,
    pub registry_secret_name: String,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

// === impl PackageState ===

impl PackageState {
    /// A package's state is a function of its source image: it awaits an
    /// upload until an image has been recorded. Later transitions are made by
    /// the controllers and are not derived here.
    pub fn from_source_image(image: &str) -> Self {
        if image.is_empty() {
            Self::AwaitingUpload
        } else {
            Self::ProcessingUpload
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingUpload => "AWAITING_UPLOAD",
            Self::ProcessingUpload => "PROCESSING_UPLOAD",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
            Self::Copying => "COPYING",
            Self::Expired => "EXPIRED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_source_image() {
        assert_eq!(PackageState::from_source_image(""), PackageState::AwaitingUpload);
        assert_eq!(
            PackageState::from_source_image("registry.example.com/pkg@sha256:abc"),
            PackageState::ProcessingUpload
        );
        assert_eq!(PackageState::AwaitingUpload.as_str(), "AWAITING_UPLOAD");
        assert_eq!(PackageState::ProcessingUpload.as_str(), "PROCESSING_UPLOAD");
    }
}
