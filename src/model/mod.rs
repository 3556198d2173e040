mod file_model;
mod user_model;

pub use file_model::*;
pub use user_model::*;
