use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    report::{attachment_filename, render_leave_report},
    store::Store,
};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use tracing::{error, info};

/// Leave report as a PDF download
#[utoipa::path(
    get,
    path = "/leave-report/{teacher_id}",
    params(
        ("teacher_id" = u64, Path, description = "ID of the teacher the report is for")
    ),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is neither the teacher nor an admin"),
        (status = 404, description = "Teacher not found", body = Object, example = json!({
            "error": "Teacher not found", "code": "not_found"
        })),
        (status = 500, description = "Report could not be generated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_report(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let teacher_id = path.into_inner();
    auth.require_self_or_admin(teacher_id)?;

    let teacher = store
        .find_user_by_id(teacher_id)
        .await
        .map_err(|e| {
            error!(error = %e, teacher_id, "Failed to fetch teacher");
            ApiError::Internal("Error generating PDF")
        })?
        .ok_or(ApiError::TeacherNotFound)?;

    let leaves = store.leaves_for_teacher(teacher_id).await.map_err(|e| {
        error!(error = %e, teacher_id, "Failed to fetch leaves for report");
        ApiError::Internal("Error generating PDF")
    })?;

    let leave_count = leaves.len();
    let filename = attachment_filename(&teacher.name);

    // rendered fully before any header goes out, so a failure is always a clean 500
    let pdf = web::block(move || render_leave_report(&teacher, &leaves))
        .await
        .map_err(|e| {
            error!(error = %e, teacher_id, "Report rendering task failed");
            ApiError::Internal("Error generating PDF")
        })?
        .map_err(|e| {
            error!(error = %e, teacher_id, "Failed to render leave report");
            ApiError::Internal("Error generating PDF")
        })?;

    info!(teacher_id, leaves = leave_count, bytes = pdf.len(), "Leave report generated");

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(pdf))
}
