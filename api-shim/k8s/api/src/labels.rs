//! Label keys stamped on the cluster objects the API manages.

pub const APP_GUID: &str = "workloads.cloudfoundry.org/app-guid";
pub const PACKAGE_GUID: &str = "workloads.cloudfoundry.org/package-guid";
pub const BUILD_GUID: &str = "workloads.cloudfoundry.org/build-guid";
pub const PROCESS_TYPE: &str = "workloads.cloudfoundry.org/process-type";

pub const ROUTE_GUID: &str = "networking.cloudfoundry.org/route-guid";

/// Carries the human-readable name of an organization anchor.
pub const ORG_NAME: &str = "cloudfoundry.org/org-name";

/// Annotates an organization anchor with `"true"` while the organization is
/// suspended.
pub const ORG_SUSPENDED: &str = "cloudfoundry.org/org-suspended";

/// Carries the human-readable name of a space anchor.
pub const SPACE_NAME: &str = "cloudfoundry.org/space-name";

pub const ROLE_GUID: &str = "cloudfoundry.org/role-guid";
pub const ROLE_TYPE: &str = "cloudfoundry.org/role-type";
