// Pure computations: body metrics and log aggregation

pub mod aggregate;
pub mod body;

pub use aggregate::*;
pub use body::*;
