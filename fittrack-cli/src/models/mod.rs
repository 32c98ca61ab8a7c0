pub mod nutrition;
pub mod program;
pub mod user;
pub mod workout;

pub use nutrition::{
    Meal, NutritionLog, NutritionLogInput, NutritionProfile, NutritionProfileInput,
    NutritionStats, NutritionTargets, WeightLogEntry,
};
pub use program::{Program, ProgramProgress};
pub use user::User;
pub use workout::{DateRange, Exercise, NewWorkout, Workout, WorkoutFilter, WorkoutStats};
