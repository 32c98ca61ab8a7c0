use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NutritionGoal, NutritionProfile, UpsertNutritionProfileRequest, DEFAULT_ACTIVITY_LEVEL};

const PROFILE_COLUMNS: &str =
    "id, user_id, height, target_weight, goal, activity_level, created_at, updated_at";

/// Fields needed to create a profile
#[derive(Debug, Clone, Copy)]
pub struct NewNutritionProfile {
    pub height: f64,
    pub target_weight: f64,
    pub goal: NutritionGoal,
    pub activity_level: f64,
}

impl NewNutritionProfile {
    /// `None` unless both height and target weight were supplied
    pub fn from_request(request: &UpsertNutritionProfileRequest) -> Option<Self> {
        Some(Self {
            height: request.height?,
            target_weight: request.target_weight?,
            goal: request.goal.unwrap_or_default(),
            activity_level: request.activity_level.unwrap_or(DEFAULT_ACTIVITY_LEVEL),
        })
    }
}

#[derive(Clone)]
pub struct NutritionProfileService {
    db: PgPool,
}

impl NutritionProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<NutritionProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM nutrition_profiles WHERE user_id = $1");

        let profile = sqlx::query_as::<_, NutritionProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(profile)
    }

    pub async fn create_profile(
        &self,
        user_id: Uuid,
        profile: NewNutritionProfile,
    ) -> Result<NutritionProfile> {
        // A concurrent create for the same user turns into an update
        let sql = format!(
            "INSERT INTO nutrition_profiles (id, user_id, height, target_weight, goal, activity_level)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                height = EXCLUDED.height,
                target_weight = EXCLUDED.target_weight,
                goal = EXCLUDED.goal,
                activity_level = EXCLUDED.activity_level,
                updated_at = NOW()
             RETURNING {PROFILE_COLUMNS}"
        );

        let created = sqlx::query_as::<_, NutritionProfile>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(profile.height)
            .bind(profile.target_weight)
            .bind(profile.goal)
            .bind(profile.activity_level)
            .fetch_one(&self.db)
            .await?;

        Ok(created)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpsertNutritionProfileRequest,
    ) -> Result<Option<NutritionProfile>> {
        let sql = format!(
            "UPDATE nutrition_profiles SET
                height = COALESCE($2, height),
                target_weight = COALESCE($3, target_weight),
                goal = COALESCE($4, goal),
                activity_level = COALESCE($5, activity_level),
                updated_at = NOW()
             WHERE user_id = $1
             RETURNING {PROFILE_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, NutritionProfile>(&sql)
            .bind(user_id)
            .bind(request.height)
            .bind(request.target_weight)
            .bind(request.goal)
            .bind(request.activity_level)
            .fetch_optional(&self.db)
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_requires_height_and_target() {
        let partial = UpsertNutritionProfileRequest {
            height: Some(180.0),
            ..Default::default()
        };
        assert!(NewNutritionProfile::from_request(&partial).is_none());

        let full = UpsertNutritionProfileRequest {
            height: Some(180.0),
            target_weight: Some(78.0),
            ..Default::default()
        };
        let profile = NewNutritionProfile::from_request(&full).unwrap();
        assert_eq!(profile.goal, NutritionGoal::Maintain);
        assert_eq!(profile.activity_level, 1.55);
    }
}
