// Data access, one service per table

pub mod nutrition_profile_service;
pub mod nutrition_service;
pub mod program_service;
pub mod user_service;
pub mod workout_service;

pub use nutrition_profile_service::NutritionProfileService;
pub use nutrition_service::NutritionService;
pub use program_service::ProgramService;
pub use user_service::UserService;
pub use workout_service::WorkoutService;
