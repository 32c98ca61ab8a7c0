use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{DateRangeQuery, Meal, NutritionDay, NutritionLog, WeightLogEntry};
use crate::stats::meal_totals;

const LOG_COLUMNS: &str = "id, user_id, date, meals, total_calories, total_protein, total_carbs, \
                           total_fats, water_intake, weight, notes, created_at, updated_at";

#[derive(Clone)]
pub struct NutritionService {
    db: PgPool,
}

impl NutritionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_logs(&self, user_id: Uuid, range: DateRangeQuery) -> Result<Vec<NutritionLog>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM nutrition_logs
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date DESC"
        );

        let logs = sqlx::query_as::<_, NutritionLog>(&sql)
            .bind(user_id)
            .bind(range.start_date)
            .bind(range.end_date)
            .fetch_all(&self.db)
            .await?;

        Ok(logs)
    }

    pub async fn get_log_by_date(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<NutritionLog>> {
        let sql = format!("SELECT {LOG_COLUMNS} FROM nutrition_logs WHERE user_id = $1 AND date = $2");

        let log = sqlx::query_as::<_, NutritionLog>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.db)
            .await?;

        Ok(log)
    }

    /// Create or replace the day's log. The flag is true when a row was created.
    /// A weight already on the row survives an upsert that omits one.
    pub async fn upsert_log(&self, user_id: Uuid, day: NutritionDay) -> Result<(NutritionLog, bool)> {
        let mut tx = self.db.begin().await?;

        let created = ensure_day_row(&mut tx, user_id, day.date).await?;

        let sql = format!(
            "UPDATE nutrition_logs SET
                meals = $3,
                total_calories = $4,
                total_protein = $5,
                total_carbs = $6,
                total_fats = $7,
                water_intake = $8,
                weight = COALESCE($9, weight),
                notes = $10,
                updated_at = NOW()
             WHERE user_id = $1 AND date = $2
             RETURNING {LOG_COLUMNS}"
        );

        let log = sqlx::query_as::<_, NutritionLog>(&sql)
            .bind(user_id)
            .bind(day.date)
            .bind(Json(&day.meals))
            .bind(day.total_calories)
            .bind(day.totals.protein)
            .bind(day.totals.carbs)
            .bind(day.totals.fats)
            .bind(day.water_intake)
            .bind(day.weight)
            .bind(&day.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((log, created))
    }

    /// Append one meal to the day's log, creating the log if needed, and
    /// recompute the totals from the full meal list. Fails with a validation
    /// error, leaving the log untouched, when the day would pass the calorie ceiling.
    pub async fn add_meal(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal: Meal,
    ) -> Result<NutritionLog, ApiError> {
        let mut tx = self.db.begin().await?;

        ensure_day_row(&mut tx, user_id, date).await?;

        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM nutrition_logs WHERE user_id = $1 AND date = $2 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, NutritionLog>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

        let mut meals = current.meals.0;
        meals.push(meal);
        let totals = meal_totals(&meals);
        let total_calories = totals.stored_calories()?;

        let sql = format!(
            "UPDATE nutrition_logs SET
                meals = $3,
                total_calories = $4,
                total_protein = $5,
                total_carbs = $6,
                total_fats = $7,
                updated_at = NOW()
             WHERE user_id = $1 AND date = $2
             RETURNING {LOG_COLUMNS}"
        );

        let log = sqlx::query_as::<_, NutritionLog>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(Json(&meals))
            .bind(total_calories)
            .bind(totals.protein)
            .bind(totals.carbs)
            .bind(totals.fats)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(log)
    }

    pub async fn delete_log(&self, user_id: Uuid, date: NaiveDate) -> Result<bool> {
        let result = sqlx::query("DELETE FROM nutrition_logs WHERE user_id = $1 AND date = $2")
            .bind(user_id)
            .bind(date)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Oldest first, only days with a recorded weight
    pub async fn weight_logs(&self, user_id: Uuid) -> Result<Vec<WeightLogEntry>> {
        let entries = sqlx::query_as::<_, WeightLogEntry>(
            "SELECT id, date, weight, total_calories AS calories
             FROM nutrition_logs
             WHERE user_id = $1 AND weight IS NOT NULL
             ORDER BY date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    pub async fn latest_weight(&self, user_id: Uuid) -> Result<Option<f64>> {
        let weight = sqlx::query_scalar::<_, f64>(
            "SELECT weight FROM nutrition_logs
             WHERE user_id = $1 AND weight IS NOT NULL
             ORDER BY date DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(weight)
    }
}

/// Insert an empty row for (user, date) unless one exists. True when inserted.
async fn ensure_day_row(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<bool> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO nutrition_logs (id, user_id, date) VALUES ($1, $2, $3)
         ON CONFLICT (user_id, date) DO NOTHING
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(inserted.is_some())
}
