use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeave};
use crate::model::user::{NewUser, User};
use crate::store::{Store, StoreError, StoreResult, normalize_email};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    leaves: Vec<LeaveRequest>,
    next_user_id: u64,
    next_leave_id: u64,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let email = normalize_email(&user.email);
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            token_version: 0,
        };
        tables.users.push(user.clone());
        debug!(user_id = user.id, "User saved to memory storage");
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: u64) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn bump_token_version(&self, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.token_version += 1;
        }
        Ok(())
    }

    #[instrument(skip(self, leave), fields(teacher_id = leave.teacher_id))]
    async fn create_leave(&self, leave: NewLeave) -> StoreResult<LeaveRequest> {
        let mut tables = self.tables.write().await;
        tables.next_leave_id += 1;
        let leave = LeaveRequest {
            id: tables.next_leave_id,
            teacher_id: leave.teacher_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        };
        tables.leaves.push(leave.clone());
        debug!(leave_id = leave.id, "Leave request saved to memory storage");
        Ok(leave)
    }

    async fn leaves_for_teacher(&self, teacher_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .leaves
            .iter()
            .filter(|l| l.teacher_id == teacher_id)
            .cloned()
            .collect())
    }
}
