use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, CreateUserRequest, CreatedUserDto, DeletedUserDto, UserDto,
    UserListResponse,
};
use crate::services::NewUser;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    let listing = state.directory().list_users(query.page).await?;

    Ok(Json(ApiResponse::success(UserListResponse {
        users: listing.users.into_iter().map(UserDto::from).collect(),
        total_pages: listing.total_pages,
    })))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedUserDto>>), ApiError> {
    let created = state
        .directory()
        .create_user(NewUser {
            username: payload.username,
            password: payload.password,
            password_confirm: payload.password_confirm,
            groupname: payload.groupname,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedUserDto {
            username: created.username,
            groupname: created.groupname,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirmed: bool,
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<DeletedUserDto>>, ApiError> {
    let removed = state
        .directory()
        .delete_user(&username, query.confirmed)
        .await?;

    Ok(Json(ApiResponse::success(DeletedUserDto {
        username,
        removed_entries: removed,
    })))
}
