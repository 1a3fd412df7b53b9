use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user::{CreateTeamRequest, CreateUserRequest, UpdateUserRequest, UserFilter};
use crate::error::{Result, StorageError};
use crate::models::{Team, User, UserStatus};
use crate::repository::audit::AuditRepository;
use crate::repository::user::UserRepository;

/// Minimal user directory: the identities workflows resolve actors against.
pub struct Directory<'a> {
    pool: &'a PgPool,
}

impl<'a> Directory<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_team(&self, req: &CreateTeamRequest, actor_user_id: Option<Uuid>) -> Result<Team> {
        let mut tx = self.pool.begin().await?;

        let team = UserRepository::new(&mut tx).create_team(req).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "team.create",
                "team",
                Some(team.team_id),
                Some(json!({ "name": team.name })),
            )
            .await?;

        tx.commit().await?;
        Ok(team)
    }

    pub async fn create_user(&self, req: &CreateUserRequest, actor_user_id: Option<Uuid>) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::new(&mut tx).create_user(req).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "user.create",
                "user",
                Some(user.user_id),
                Some(json!({ "role": user.role, "team_id": user.team_id })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Created user {} with role {}", user.user_id, user.role);
        Ok(user)
    }

    /// Apply a partial update. The email must stay unique and a new team must exist.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        req: &UpdateUserRequest,
        actor_user_id: Option<Uuid>,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let mut repo = UserRepository::new(&mut tx);

        let mut user = repo.find_for_update(user_id).await?;
        if req.is_empty() {
            return Ok(user);
        }

        if let Some(email) = &req.email {
            if *email != user.email && repo.email_taken(email, user_id).await? {
                return Err(StorageError::DuplicateEmail);
            }
            user.email = email.clone();
        }
        if let Some(Some(team_id)) = req.team_id {
            if !repo.team_exists(team_id).await? {
                return Err(StorageError::TeamNotFound);
            }
        }

        let previous_role = user.role;
        if let Some(name) = &req.name {
            user.name = name.clone();
        }
        if let Some(role) = req.role {
            user.role = role;
        }
        if let Some(team_id) = req.team_id {
            user.team_id = team_id;
        }

        let updated = repo.update(&user).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "user.update",
                "user",
                Some(user_id),
                Some(json!({
                    "name": req.name.is_some(),
                    "email": req.email.is_some(),
                    "role": updated.role,
                    "previous_role": previous_role,
                    "team_id": updated.team_id,
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Updated user {}", user_id);
        Ok(updated)
    }

    /// Activate or deactivate a user. Inactive users can neither submit nor approve.
    pub async fn set_user_status(
        &self,
        user_id: Uuid,
        status: UserStatus,
        actor_user_id: Option<Uuid>,
    ) -> Result<User> {
        if status == UserStatus::Inactive && actor_user_id == Some(user_id) {
            return Err(StorageError::SelfDeactivation);
        }

        let mut tx = self.pool.begin().await?;
        let mut repo = UserRepository::new(&mut tx);

        let current = repo.find_for_update(user_id).await?;
        if current.status == status {
            return Ok(current);
        }

        let user = repo.set_status(user_id, status).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                status.audit_action(),
                "user",
                Some(user_id),
                Some(json!({ "from": current.status, "to": status })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("User {} is now {}", user_id, status);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        UserRepository::new(&mut conn).find_by_id(user_id).await
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        UserRepository::new(&mut conn).list(filter).await
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let mut conn = self.pool.acquire().await?;
        UserRepository::new(&mut conn).list_teams().await
    }
}
