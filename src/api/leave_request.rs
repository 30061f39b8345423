use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::leave_request::NewLeave,
    store::Store,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

/// Submission payload. The owner always comes from the token; a `teacherId`
/// in the body is ignored.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Medical")]
    pub reason: String,
}

fn validate_leave(payload: &CreateLeave) -> Result<(), ApiError> {
    if payload.start_date > payload.end_date {
        return Err(ApiError::Validation("startDate cannot be after endDate"));
    }
    if payload.reason.trim().is_empty() {
        return Err(ApiError::Validation("reason must not be empty"));
    }
    Ok(())
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    validate_leave(&payload)?;
    let payload = payload.into_inner();

    let leave = store
        .create_leave(NewLeave {
            teacher_id: auth.user_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
        })
        .await
        .map_err(|e| {
            error!(error = %e, teacher_id = auth.user_id, "Failed to create leave request");
            ApiError::Internal("Error creating leave request")
        })?;

    info!(leave_id = leave.id, teacher_id = leave.teacher_id, "Leave request submitted");
    Ok(HttpResponse::Created().json(leave))
}

/* =========================
List own leave requests
========================= */
#[utoipa::path(
    get,
    path = "/leave",
    responses(
        (status = 200, description = "Every leave request of the caller", body = [crate::model::leave_request::LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Store failure")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let leaves = store.leaves_for_teacher(auth.user_id).await.map_err(|e| {
        error!(error = %e, teacher_id = auth.user_id, "Failed to fetch leave list");
        ApiError::Internal("Error fetching leaves")
    })?;

    Ok(HttpResponse::Ok().json(leaves))
}
