use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use crate::dto::user::{CreateTeamRequest, CreateUserRequest, UserFilter};
use crate::error::{Result, StorageError};
use crate::models::{Team, User, UserStatus};

const USER_COLUMNS: &str = "user_id, name, email, role, team_id, status, created_at, updated_at";

/// Repository for the user directory (users and teams)
pub struct UserRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create_team(&mut self, req: &CreateTeamRequest) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name)
            VALUES ($1)
            RETURNING team_id, name, created_at
            "#,
        )
        .bind(&req.name)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| StorageError::from(e).map_unique_violation())
    }

    pub async fn create_user(&mut self, req: &CreateUserRequest) -> Result<User> {
        let query = format!(
            "INSERT INTO users (name, email, role, team_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&req.name)
            .bind(&req.email)
            .bind(req.role)
            .bind(req.team_id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(map_user_write_error)
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::UserNotFound)
    }

    /// Load a user and lock its row until the surrounding transaction ends
    pub async fn find_for_update(&mut self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::UserNotFound)
    }

    /// Whether another user already holds this email
    pub async fn email_taken(&mut self, email: &str, except: Uuid) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND user_id <> $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(taken)
    }

    pub async fn team_exists(&mut self, team_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE team_id = $1)")
                .bind(team_id)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(exists)
    }

    /// Write back the editable fields of an already patched user
    pub async fn update(&mut self, user: &User) -> Result<User> {
        let query = format!(
            "UPDATE users
             SET name = $2, email = $3, role = $4, team_id = $5, updated_at = now()
             WHERE user_id = $1
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role)
            .bind(user.team_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_user_write_error)?
            .ok_or(StorageError::UserNotFound)
    }

    pub async fn set_status(&mut self, id: Uuid, status: UserStatus) -> Result<User> {
        let query = format!(
            "UPDATE users SET status = $2, updated_at = now() WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::UserNotFound)
    }

    pub async fn list_teams(&mut self) -> Result<Vec<Team>> {
        let teams =
            sqlx::query_as::<_, Team>("SELECT team_id, name, created_at FROM teams ORDER BY name")
                .fetch_all(&mut *self.conn)
                .await?;

        Ok(teams)
    }

    pub async fn list(&mut self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut query = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));

        if let Some(role) = filter.role {
            query.push(" AND role = ");
            query.push_bind(role);
        }

        if let Some(team_id) = filter.team_id {
            query.push(" AND team_id = ");
            query.push_bind(team_id);
        }

        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status);
        }

        query.push(" ORDER BY name, user_id");

        let users = query
            .build_query_as::<User>()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(users)
    }
}

fn map_user_write_error(e: sqlx::Error) -> StorageError {
    let err = StorageError::from(e);
    if err.is_foreign_key_violation() {
        StorageError::TeamNotFound
    } else {
        err.map_unique_violation()
    }
}
