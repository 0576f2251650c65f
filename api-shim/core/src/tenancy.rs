use crate::Metadata;
use std::{fmt, str::FromStr};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrgRecord {
    pub guid: String,
    pub name: String,
    pub suspended: bool,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpaceRecord {
    pub guid: String,
    pub name: String,
    pub organization_guid: String,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoleType {
    SpaceManager,
    SpaceAuditor,
    SpaceDeveloper,
    SpaceSupporter,
    OrganizationUser,
    OrganizationAuditor,
    OrganizationManager,
    OrganizationBillingManager,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleRecord {
    pub guid: String,
    pub type_: RoleType,
    /// Set for space roles.
    pub space_guid: Option<String>,
    /// Set for organization roles.
    pub org_guid: Option<String>,
    pub user: String,
    pub created_at: String,
    pub updated_at: String,
}

// === impl RoleType ===

impl RoleType {
    pub const ALL: [RoleType; 8] = [
        Self::SpaceManager,
        Self::SpaceAuditor,
        Self::SpaceDeveloper,
        Self::SpaceSupporter,
        Self::OrganizationUser,
        Self::OrganizationAuditor,
        Self::OrganizationManager,
        Self::OrganizationBillingManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpaceManager => "space_manager",
            Self::SpaceAuditor => "space_auditor",
            Self::SpaceDeveloper => "space_developer",
            Self::SpaceSupporter => "space_supporter",
            Self::OrganizationUser => "organization_user",
            Self::OrganizationAuditor => "organization_auditor",
            Self::OrganizationManager => "organization_manager",
            Self::OrganizationBillingManager => "organization_billing_manager",
        }
    }

    pub fn is_space_role(&self) -> bool {
        matches!(
            self,
            Self::SpaceManager | Self::SpaceAuditor | Self::SpaceDeveloper | Self::SpaceSupporter
        )
    }
}

impl FromStr for RoleType {
    type Err = InvalidRoleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InvalidRoleType(s.to_string()))
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid role type: {0}")]
pub struct InvalidRoleType(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_types() {
        for t in RoleType::ALL {
            assert_eq!(t.as_str().parse::<RoleType>().unwrap(), t);
        }
        assert!("space_janitor".parse::<RoleType>().is_err());
        assert!("space_developer".parse::<RoleType>().unwrap().is_space_role());
        assert!(!"organization_user".parse::<RoleType>().unwrap().is_space_role());
    }
}
