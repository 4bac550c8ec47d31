use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use crate::shared::services::AppState;
use serde_json::json;

/// 인증된 사용자 정보
/// Authenticated user information
///
/// 인증(OAuth/JWT/API 키)은 앞단의 별도 서비스가 담당하고,
/// 검증이 끝난 신원이 x-user-id / x-user-email 헤더로 전달된다.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 사용법:
/// ```ignore
/// pub async fn get_balance(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,  // <- 이렇게 사용!
/// ) -> Result<...> {
///     let user_id = authenticated_user.user_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        // 1. x-user-id 헤더에서 사용자 ID 추출
        let user_id = headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({ "error": "Missing x-user-id header" })),
                )
            })?
            .parse::<u64>()
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({ "error": "Invalid x-user-id header" })),
                )
            })?;

        // 2. x-user-email 헤더에서 이메일 추출 (결제 게이트웨이의 payee 식별자)
        let email = headers
            .get("x-user-email")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({ "error": "Missing x-user-email header" })),
                )
            })?
            .to_string();

        Ok(AuthenticatedUser { user_id, email })
    }
}
