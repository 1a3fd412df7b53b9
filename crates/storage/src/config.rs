use rust_decimal::Decimal;

use crate::models::UserRole;

/// Business policy shared by the workflow services.
///
/// Built once at start-up and handed to every service by reference, so the
/// same ceiling and role sets apply to every code path.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Upper bound for the sum of active criteria weights in one cycle
    pub weight_ceiling: Decimal,
    /// Roles allowed to submit nominations
    pub submitter_roles: Vec<UserRole>,
    /// Roles allowed to approve or reject nominations
    pub approver_roles: Vec<UserRole>,
    /// Roles exempt from the self-approval rule; also the only roles allowed to revert
    pub override_roles: Vec<UserRole>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            weight_ceiling: Decimal::TEN,
            submitter_roles: vec![UserRole::TeamLead, UserRole::Manager, UserRole::Hr],
            approver_roles: vec![UserRole::Manager, UserRole::Hr],
            override_roles: vec![UserRole::Hr],
        }
    }
}

impl WorkflowConfig {
    pub fn with_weight_ceiling(mut self, ceiling: Decimal) -> Self {
        self.weight_ceiling = ceiling;
        self
    }

    pub fn can_submit(&self, role: UserRole) -> bool {
        self.submitter_roles.contains(&role)
    }

    pub fn can_approve(&self, role: UserRole) -> bool {
        self.approver_roles.contains(&role)
    }

    pub fn is_override(&self, role: UserRole) -> bool {
        self.override_roles.contains(&role)
    }
}

/// Parse a comma separated role list such as `"MANAGER, HR"`.
pub fn parse_role_list(value: &str) -> Result<Vec<UserRole>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = WorkflowConfig::default();
        assert_eq!(config.weight_ceiling, Decimal::TEN);
        assert!(!config.can_submit(UserRole::Employee));
        assert!(config.can_submit(UserRole::TeamLead));
        assert!(!config.can_approve(UserRole::TeamLead));
        assert!(config.can_approve(UserRole::Manager));
        assert!(config.is_override(UserRole::Hr));
        assert!(!config.is_override(UserRole::Manager));
    }

    #[test]
    fn test_parse_role_list() {
        let roles = parse_role_list("MANAGER, hr,").unwrap();
        assert_eq!(roles, vec![UserRole::Manager, UserRole::Hr]);
    }

    #[test]
    fn test_parse_role_list_rejects_unknown() {
        assert!(parse_role_list("MANAGER,CEO").is_err());
    }
}
