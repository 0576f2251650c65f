use super::{
    app::{LifecyclePayload, LIFECYCLE},
    Field, Kind, MetadataPayload, Payload, GUID, METADATA,
};
use cf_api_shim_core::{
    AppRecord, BuildRecord, BuildState, LifecycleConfig, PackageRecord,
};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildCreate {
    pub package: PackageRef,
    pub staging_memory_in_mb: Option<i64>,
    pub staging_disk_in_mb: Option<i64>,
    pub lifecycle: Option<LifecyclePayload>,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageRef {
    pub guid: String,
}

impl Payload for BuildCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("package", "Package", Kind::Object(&[GUID])),
        Field::optional("staging_memory_in_mb", "StagingMemoryMB", Kind::Integer),
        Field::optional("staging_disk_in_mb", "StagingDiskMB", Kind::Integer),
        LIFECYCLE,
        METADATA,
    ];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.staging_memory_in_mb.is_some_and(|mb| mb <= 0) {
            errors.push("StagingMemoryMB must be greater than 0".to_string());
        }
        if self.staging_disk_in_mb.is_some_and(|mb| mb <= 0) {
            errors.push("StagingDiskMB must be greater than 0".to_string());
        }
        errors.extend(self.lifecycle.iter().filter_map(LifecyclePayload::validate));
        errors
    }
}

impl BuildCreate {
    /// Builds a staging request for `package`. Staging limits default to the
    /// configured values and the lifecycle to the app's own.
    pub fn to_record(
        &self,
        guid: &str,
        package: &PackageRecord,
        app: &AppRecord,
        config: &LifecycleConfig,
    ) -> BuildRecord {
        BuildRecord {
            guid: guid.to_string(),
            space_guid: package.space_guid.clone(),
            state: BuildState::Staging,
            staging_memory_mb: self
                .staging_memory_in_mb
                .unwrap_or(config.staging_memory_mb),
            staging_disk_mb: self.staging_disk_in_mb.unwrap_or(config.staging_disk_mb),
            lifecycle: match &self.lifecycle {
                Some(lifecycle) => lifecycle.to_lifecycle(config),
                None => app.lifecycle.clone(),
            },
            package_guid: package.guid.clone(),
            app_guid: package.app_guid.clone(),
            metadata: self.metadata.to_metadata(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::decode;
    use cf_api_shim_core::{Lifecycle, LifecycleData, Metadata, PackageState};

    fn package() -> PackageRecord {
        PackageRecord {
            guid: "package-1".to_string(),
            type_: "bits".to_string(),
            app_guid: "app-1".to_string(),
            space_guid: "space-1".to_string(),
            state: PackageState::AwaitingUpload,
            source_image_ref: String::new(),
            registry_secret_name: String::new(),
            metadata: Metadata::default(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn app() -> AppRecord {
        AppRecord {
            guid: "app-1".to_string(),
            lifecycle: Lifecycle {
                type_: "buildpack".to_string(),
                data: LifecycleData {
                    buildpacks: vec!["ruby".to_string()],
                    stack: "cflinuxfs4".to_string(),
                },
            },
            ..Default::default()
        }
    }

    #[test]
    fn defaults_come_from_config_and_app() {
        let payload = decode::<BuildCreate>(br#"{"package":{"guid":"package-1"}}"#).unwrap();
        let record = payload.to_record("build-1", &package(), &app(), &LifecycleConfig::default());
        assert_eq!(record.staging_memory_mb, 1024);
        assert_eq!(record.staging_disk_mb, 1024);
        assert_eq!(record.lifecycle, app().lifecycle);
        assert_eq!(record.space_guid, "space-1");
        assert_eq!(record.app_guid, "app-1");
        assert_eq!(record.state, BuildState::Staging);
    }

    #[test]
    fn validation() {
        let err = decode::<BuildCreate>(br#"{"package":{}}"#).unwrap_err();
        assert_eq!(err.detail(), "GUID is a required field");

        let err = decode::<BuildCreate>(
            br#"{"package":{"guid":"p"},"staging_memory_in_mb":0,"staging_disk_in_mb":-1}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.detail(),
            "StagingMemoryMB must be greater than 0, StagingDiskMB must be greater than 0"
        );
    }
}
