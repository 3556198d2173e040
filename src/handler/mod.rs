mod file_handler;
mod user_handler;

pub use file_handler::FileHandler;
pub use user_handler::UserHandler;
