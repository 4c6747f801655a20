pub mod crud;
pub use crud::{CrudEntity, CrudRepository, FeedbackFields, UserFields};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod feedback_repo;
pub use feedback_repo::FeedbackRepository;
pub mod reply_repo;
pub use reply_repo::ReplyRepository;
