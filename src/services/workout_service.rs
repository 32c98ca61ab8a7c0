use anyhow::Result;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::{DateRangeQuery, NewWorkout, UpdateWorkoutRequest, Workout, WorkoutQuery};

const WORKOUT_COLUMNS: &str = "id, user_id, date, workout_type, name, duration, muscle_group, \
                               exercises, calories_burned, notes, rating, completed, \
                               created_at, updated_at";

#[derive(Clone)]
pub struct WorkoutService {
    db: PgPool,
}

impl WorkoutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Newest first. Each date bound is optional and inclusive.
    pub async fn list_workouts(&self, user_id: Uuid, query: &WorkoutQuery) -> Result<Vec<Workout>> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
               AND ($4::workout_type IS NULL OR workout_type = $4)
             ORDER BY date DESC, created_at DESC
             LIMIT $5"
        );

        let workouts = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(query.start_date)
            .bind(query.end_date)
            .bind(query.workout_type)
            .bind(query.limit.filter(|limit| *limit > 0))
            .fetch_all(&self.db)
            .await?;

        Ok(workouts)
    }

    pub async fn workouts_in_range(
        &self,
        user_id: Uuid,
        range: DateRangeQuery,
    ) -> Result<Vec<Workout>> {
        let query = WorkoutQuery {
            start_date: range.start_date,
            end_date: range.end_date,
            ..Default::default()
        };
        self.list_workouts(user_id, &query).await
    }

    pub async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<Option<Workout>> {
        let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(workout_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(workout)
    }

    pub async fn create_workout(&self, user_id: Uuid, workout: NewWorkout) -> Result<Workout> {
        let sql = format!(
            "INSERT INTO workouts (
                id, user_id, date, workout_type, name, duration, muscle_group,
                exercises, calories_burned, notes, rating, completed
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {WORKOUT_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Workout>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(workout.date)
            .bind(workout.workout_type)
            .bind(&workout.name)
            .bind(workout.duration)
            .bind(&workout.muscle_group)
            .bind(Json(&workout.exercises))
            .bind(workout.calories_burned)
            .bind(&workout.notes)
            .bind(workout.rating)
            .bind(workout.completed)
            .fetch_one(&self.db)
            .await?;

        Ok(created)
    }

    pub async fn update_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: UpdateWorkoutRequest,
    ) -> Result<Option<Workout>> {
        let sql = format!(
            "UPDATE workouts SET
                date = COALESCE($3, date),
                workout_type = COALESCE($4, workout_type),
                name = COALESCE($5, name),
                duration = COALESCE($6, duration),
                muscle_group = COALESCE($7, muscle_group),
                exercises = COALESCE($8, exercises),
                calories_burned = COALESCE($9, calories_burned),
                notes = COALESCE($10, notes),
                rating = COALESCE($11, rating),
                completed = COALESCE($12, completed),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {WORKOUT_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Workout>(&sql)
            .bind(workout_id)
            .bind(user_id)
            .bind(request.date)
            .bind(request.workout_type)
            .bind(request.name)
            .bind(request.duration)
            .bind(request.muscle_group)
            .bind(request.exercises.map(Json))
            .bind(request.calories_burned)
            .bind(request.notes)
            .bind(request.rating)
            .bind(request.completed)
            .fetch_optional(&self.db)
            .await?;

        Ok(updated)
    }

    /// Returns false when no row owned by `user_id` matched
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
