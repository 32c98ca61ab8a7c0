use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::{NewProgram, Program, UpdateProgramRequest};

const PROGRAM_COLUMNS: &str = "id, user_id, name, description, goal, level, duration, schedule, \
                               is_active, start_date, end_date, progress, created_at, updated_at";

#[derive(Clone)]
pub struct ProgramService {
    db: PgPool,
}

impl ProgramService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_programs(&self, user_id: Uuid) -> Result<Vec<Program>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let programs = sqlx::query_as::<_, Program>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(programs)
    }

    pub async fn get_program(&self, user_id: Uuid, program_id: Uuid) -> Result<Option<Program>> {
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1 AND user_id = $2");

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(program_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(program)
    }

    pub async fn get_active_program(&self, user_id: Uuid) -> Result<Option<Program>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE user_id = $1 AND is_active LIMIT 1"
        );

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(program)
    }

    pub async fn create_program(&self, user_id: Uuid, program: NewProgram) -> Result<Program> {
        let sql = format!(
            "INSERT INTO programs (id, user_id, name, description, goal, level, duration, schedule, progress)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {PROGRAM_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Program>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&program.name)
            .bind(&program.description)
            .bind(program.goal)
            .bind(program.level)
            .bind(program.duration)
            .bind(Json(&program.schedule))
            .bind(Json(&program.progress))
            .fetch_one(&self.db)
            .await?;

        Ok(created)
    }

    pub async fn update_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        request: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        let sql = format!(
            "UPDATE programs SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                goal = COALESCE($5, goal),
                level = COALESCE($6, level),
                duration = COALESCE($7, duration),
                schedule = COALESCE($8, schedule),
                progress = COALESCE($9, progress),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {PROGRAM_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Program>(&sql)
            .bind(program_id)
            .bind(user_id)
            .bind(request.name)
            .bind(request.description)
            .bind(request.goal)
            .bind(request.level)
            .bind(request.duration)
            .bind(request.schedule.map(Json))
            .bind(request.progress.map(Json))
            .fetch_optional(&self.db)
            .await?;

        Ok(updated)
    }

    /// Make `program_id` the caller's only active program, starting today.
    /// Nothing changes when the program does not exist or belongs to someone else.
    pub async fn activate_program(&self, user_id: Uuid, program_id: Uuid) -> Result<Option<Program>> {
        self.activate_program_on(user_id, program_id, Utc::now().date_naive())
            .await
    }

    pub async fn activate_program_on(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        start: NaiveDate,
    ) -> Result<Option<Program>> {
        let mut tx = self.db.begin().await?;

        // Lock every program of the user so concurrent activations serialize
        let owned = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM programs WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if !owned.contains(&program_id) {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "UPDATE programs SET is_active = FALSE, updated_at = NOW()
             WHERE user_id = $1 AND is_active AND id <> $2",
        )
        .bind(user_id)
        .bind(program_id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "UPDATE programs SET
                is_active = TRUE,
                start_date = $3,
                end_date = $3::date + duration * 7,
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {PROGRAM_COLUMNS}"
        );

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(program_id)
            .bind(user_id)
            .bind(start)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%user_id, %program_id, "program activated");
        Ok(Some(program))
    }

    pub async fn delete_program(&self, user_id: Uuid, program_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1 AND user_id = $2")
            .bind(program_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
