//! Persistence seam. Handlers only see [`Store`]; `main` plugs in the MySQL
//! backend and tests plug in the in-memory one.

pub mod memory;
pub mod mysql;

use crate::model::leave_request::{LeaveRequest, NewLeave};
use crate::model::user::{NewUser, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: u64) -> StoreResult<Option<User>>;
    /// Invalidates every token issued so far for this user.
    async fn bump_token_version(&self, id: u64) -> StoreResult<()>;

    async fn create_leave(&self, leave: NewLeave) -> StoreResult<LeaveRequest>;
    /// All requests owned by `teacher_id`, oldest first.
    async fn leaves_for_teacher(&self, teacher_id: u64) -> StoreResult<Vec<LeaveRequest>>;
}

/// Emails are compared case-insensitively and without surrounding blanks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
