use anyhow::Result;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::auth::NewUser;
use crate::models::{UpdateProfileRequest, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, age, gender, weight, height, goal, \
                            settings, last_login, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, new_user: &NewUser, password_hash: &str) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name, age, gender, weight, height, goal)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(password_hash)
            .bind(&new_user.name)
            .bind(new_user.age)
            .bind(new_user.gender)
            .bind(new_user.weight)
            .bind(new_user.height)
            .bind(new_user.goal.unwrap_or_default())
            .fetch_one(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                weight = COALESCE($5, weight),
                height = COALESCE($6, height),
                goal = COALESCE($7, goal),
                settings = COALESCE($8, settings),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(request.name)
            .bind(request.age)
            .bind(request.gender)
            .bind(request.weight)
            .bind(request.height)
            .bind(request.goal)
            .bind(request.settings.map(Json))
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// Stamp `last_login` and return the refreshed row
    pub async fn record_login(&self, user_id: Uuid) -> Result<User> {
        let sql = format!(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        Ok(user)
    }
}
