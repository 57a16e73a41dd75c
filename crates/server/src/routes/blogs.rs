use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use models::blog::{Blog, NewBlog};

use crate::errors::ApiError;
use crate::routes::AppState;

/// 列出所有博客（按创建顺序）
pub async fn list_blogs(State(state): State<AppState>) -> Json<Vec<Blog>> {
    Json(state.blogs.list_blogs().await)
}

/// 创建新博客
pub async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<NewBlog>, JsonRejection>,
) -> Result<Json<Blog>, ApiError> {
    let Json(input) = payload?;
    let blog = state.blogs.create_blog(input.content).await?;
    Ok(Json(blog))
}

/// 获取指定 ID 的博客
pub async fn get_blog(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Blog>, ApiError> {
    let Path(id) = id?;
    let blog = state.blogs.get_blog(id).await?;
    Ok(Json(blog))
}
