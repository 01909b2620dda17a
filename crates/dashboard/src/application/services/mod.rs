//! Application services - use cases over the API and platform ports

pub mod auth_service;
pub mod question_service;
pub mod session_service;
pub mod stats_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use question_service::QuestionService;
pub use session_service::SessionStore;
pub use stats_service::StatsService;
pub use user_service::UserService;
