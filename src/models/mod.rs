// Domain models, request bodies and the response envelope

pub mod envelope;
pub mod nutrition;
pub mod program;
pub mod user;
pub mod validation;
pub mod workout;

pub use envelope::*;
pub use nutrition::*;
pub use program::*;
pub use user::*;
pub use workout::*;
