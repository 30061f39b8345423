use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Teacher,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_its_column_text() {
        assert_eq!(Role::Admin.as_ref(), "admin");
        assert_eq!(Role::from_str("teacher").unwrap(), Role::Teacher);
        assert!(Role::from_str("principal").is_err());
    }

    #[test]
    fn role_defaults_to_teacher() {
        assert_eq!(Role::default(), Role::Teacher);
    }
}
