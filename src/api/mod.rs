pub mod leave_report;
pub mod leave_request;
