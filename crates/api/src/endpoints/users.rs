//! User endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use clipstream_common::{
    AppError, AppResult, IdGenerator, MediaKind, generate_storage_key,
};
use clipstream_core::UpdateProfileInput;
use clipstream_db::entities::user;
use serde::Serialize;

use crate::{
    extractors::{AuthClaims, AuthUser},
    middleware::AppState,
};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            uid: u.uid,
            name: u.name,
            email: u.email,
            avatar_url: u.avatar_url,
            bio: u.bio,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Sync the verified identity into the local user directory.
async fn sync(
    AuthClaims(claims): AuthClaims,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.sync(&claims).await?;

    Ok(Json(user.into()))
}

/// Caller's own record.
async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Update the caller's profile. Multipart so the avatar can ride along.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    let mut input = UpdateProfileInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "name" => {
                input.name = Some(read_text(field).await?);
            }
            "bio" => {
                input.bio = Some(read_text(field).await?);
            }
            "avatar" => {
                let file_name = field.file_name().map(ToString::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read avatar: {e}")))?;

                let key = generate_storage_key(
                    MediaKind::Avatar,
                    &IdGenerator::new().generate(),
                    file_name.as_deref(),
                );
                let stored = state.storage.upload(&key, &data, &content_type).await?;
                input.avatar_url = Some(stored.url);
            }
            _ => {}
        }
    }

    let user = state.user_service.update_profile(&user.id, input).await?;

    Ok(Json(user.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync))
        .route("/me", get(me).put(update_me))
}
