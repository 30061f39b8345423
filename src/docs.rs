use crate::api::leave_request::CreateLeave;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;
use crate::model::user::UserProfile;
use crate::models::{LoginReqDto, LoginResponse, RegisterReq, RegisterResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "1.0.0",
        description = r#"
## Teacher leave management

- **Accounts**: register, log in, log out (revokes every issued token)
- **Leave**: submit a leave request, list your own requests
- **Reports**: download a PDF summary of a teacher's leave

Protected endpoints expect `Authorization: Bearer <token>`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_report::leave_report
    ),
    components(
        schemas(
            RegisterReq,
            RegisterResponse,
            LoginReqDto,
            LoginResponse,
            UserProfile,
            Role,
            CreateLeave,
            LeaveRequest,
            LeaveStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and tokens"),
        (name = "Leave", description = "Leave requests and reports"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
