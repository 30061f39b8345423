use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeave};
use crate::model::role::Role;
use crate::model::user::{NewUser, User};
use crate::store::{Store, StoreError, StoreResult, normalize_email};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use std::str::FromStr;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: u64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    token_version: u32,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|_| StoreError::Corrupt(format!("user {} has role {:?}", row.id, row.role)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            token_version: row.token_version,
        })
    }
}

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    teacher_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status).map_err(|_| {
            StoreError::Corrupt(format!("leave {} has status {:?}", row.id, row.status))
        })?;

        Ok(LeaveRequest {
            id: row.id,
            teacher_id: row.teacher_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, token_version";

#[async_trait]
impl Store for MySqlStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let email = normalize_email(&user.email);

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, token_version)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(&user.name)
        .bind(&email)
        .bind(&user.password_hash)
        .bind(user.role.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::Database(e)
        })?;

        let id = result.last_insert_id();
        debug!(user_id = id, "User inserted");

        Ok(User {
            id,
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            token_version: 0,
        })
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_id(&self, id: u64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn bump_token_version(&self, id: u64) -> StoreResult<()> {
        sqlx::query("UPDATE users SET token_version = token_version + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, leave), fields(teacher_id = leave.teacher_id))]
    async fn create_leave(&self, leave: NewLeave) -> StoreResult<LeaveRequest> {
        let status = LeaveStatus::Pending;
        // second precision, so the returned record matches what a re-read yields
        let created_at = DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0)
            .unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (teacher_id, start_date, end_date, reason, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(leave.teacher_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(status.as_ref())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(LeaveRequest {
            id: result.last_insert_id(),
            teacher_id: leave.teacher_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status,
            created_at,
        })
    }

    async fn leaves_for_teacher(&self, teacher_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, teacher_id, start_date, end_date, reason, status, created_at
            FROM leave_requests
            WHERE teacher_id = ?
            ORDER BY id
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }
}

#[cfg(all(test, feature = "mysql-tests"))]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    async fn store(pool: MySqlPool) -> MySqlStore {
        ensure_schema(&pool).await.unwrap();
        MySqlStore::new(pool)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Jane".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Teacher,
        }
    }

    fn new_leave(teacher_id: u64, reason: &str) -> NewLeave {
        NewLeave {
            teacher_id,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            reason: reason.to_string(),
        }
    }

    #[sqlx::test(migrations = false)]
    async fn duplicate_email_maps_to_its_own_error(pool: MySqlPool) {
        let store = store(pool).await;
        store.create_user(new_user("Jane@School.edu")).await.unwrap();

        let err = store.create_user(new_user(" jane@school.edu")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[sqlx::test(migrations = false)]
    async fn users_are_found_by_normalised_email_and_id(pool: MySqlPool) {
        let store = store(pool).await;
        let created = store.create_user(new_user("Ada@School.edu")).await.unwrap();
        assert_eq!(created.email, "ada@school.edu");

        let by_email = store.find_user_by_email("ADA@school.edu ").await.unwrap().unwrap();
        assert_eq!(by_email, created);
        let by_id = store.find_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);
        assert!(store.find_user_by_id(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = false)]
    async fn bumping_the_token_version_persists(pool: MySqlPool) {
        let store = store(pool).await;
        let user = store.create_user(new_user("ver@school.edu")).await.unwrap();

        store.bump_token_version(user.id).await.unwrap();
        store.bump_token_version(user.id).await.unwrap();

        let reread = store.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reread.token_version, 2);
    }

    #[sqlx::test(migrations = false)]
    async fn leaves_decode_in_submission_order_per_teacher(pool: MySqlPool) {
        let store = store(pool).await;
        let first = store.create_leave(new_leave(1, "Medical")).await.unwrap();
        store.create_leave(new_leave(2, "Other teacher")).await.unwrap();
        let second = store.create_leave(new_leave(1, "Family")).await.unwrap();

        let leaves = store.leaves_for_teacher(1).await.unwrap();
        assert_eq!(leaves, vec![first, second]);
        assert!(leaves.iter().all(|l| l.status == LeaveStatus::Pending));
    }

    #[sqlx::test(migrations = false)]
    async fn unknown_status_is_reported_as_corrupt(pool: MySqlPool) {
        let store = store(pool).await;
        let leave = store.create_leave(new_leave(7, "Medical")).await.unwrap();
        sqlx::query("UPDATE leave_requests SET status = 'lost' WHERE id = ?")
            .bind(leave.id)
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.leaves_for_teacher(7).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
