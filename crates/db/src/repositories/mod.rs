//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod category_repo;
pub mod challenge_repo;
pub mod submission_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use category_repo::CategoryRepo;
pub use challenge_repo::ChallengeRepo;
pub use submission_repo::SubmissionRepo;
pub use user_repo::UserRepo;
