pub mod auth;
pub mod crud;
pub mod feedback;
pub mod replies;
pub mod users;
