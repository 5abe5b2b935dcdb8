use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Reached only through the superuser gate.
pub async fn is_superuser(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiSuccess<IsSuperuserResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        IsSuperuserResponseData {
            is_superuser: user.is_superuser,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsSuperuserResponseData {
    pub is_superuser: bool,
}
