pub mod auth;
pub mod authorization;
pub mod feedback_service;
pub mod reply_service;
pub mod user_service;
