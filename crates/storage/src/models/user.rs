use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    /// Legacy role: may still submit, never approves
    TeamLead,
    Manager,
    Hr,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::TeamLead => "TEAM_LEAD",
            Self::Manager => "MANAGER",
            Self::Hr => "HR",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMPLOYEE" => Ok(Self::Employee),
            "TEAM_LEAD" => Ok(Self::TeamLead),
            "MANAGER" => Ok(Self::Manager),
            "HR" => Ok(Self::Hr),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Deactivated users stay in the directory for history but can no longer act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn audit_action(&self) -> &'static str {
        match self {
            Self::Active => "user.activate",
            Self::Inactive => "user.deactivate",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<Uuid>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub team_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Employee,
            UserRole::TeamLead,
            UserRole::Manager,
            UserRole::Hr,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_status_serializes_screaming() {
        assert_eq!(
            serde_json::to_value(UserStatus::Inactive).unwrap(),
            serde_json::json!("INACTIVE")
        );
        assert_eq!(UserStatus::Inactive.audit_action(), "user.deactivate");
        assert_eq!(UserStatus::Active.audit_action(), "user.activate");
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("team_lead".parse::<UserRole>().unwrap(), UserRole::TeamLead);
        assert!("boss".parse::<UserRole>().is_err());
    }
}
