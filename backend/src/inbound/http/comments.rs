//! Comment handlers.
//!
//! ```text
//! GET    /api/v1/posts/{id}/comments?take=20&cursor=...
//! POST   /api/v1/posts/{id}/comments {"content":"..."}
//! PUT    /api/v1/comments/{id}
//! DELETE /api/v1/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;

use crate::domain::{COMMENT_PAGE_DEFAULT, Comment, CommentId, Error, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::PageParams;
use crate::inbound::http::schemas::{Ack, CommentPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::Field;

/// Comment text submitted on create or edit.
#[derive(Debug, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct CommentBodyRequest {
    /// 1-1000 characters once trimmed.
    #[schema(example = "Nice post!")]
    #[serde(default)]
    pub content: String,
}

/// Comments on a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post identifier"), PageParams),
    responses(
        (status = 200, description = "Page of comments", body = CommentPageSchema),
        (status = 400, description = "Malformed identifier or cursor", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Page<Comment>>> {
    let post_id: PostId = Field::ID.parse_id(&path)?;
    let request = query.to_request(COMMENT_PAGE_DEFAULT)?;
    let page = state.comments_query.list(&post_id, request).await?;
    Ok(web::Json(page))
}

/// Comment on a post as the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = CommentBodyRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/posts/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentBodyRequest>,
) -> ApiResult<HttpResponse> {
    let post_id: PostId = Field::ID.parse_id(&path)?;
    let comment = state
        .comments
        .create(session.user(), &post_id, payload.into_inner().content)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Edit a comment; author only.
#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = CommentBodyRequest,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentBodyRequest>,
) -> ApiResult<web::Json<Comment>> {
    let id: CommentId = Field::ID.parse_id(&path)?;
    let comment = state
        .comments
        .update(session.user(), &id, payload.into_inner().content)
        .await?;
    Ok(web::Json(comment))
}

/// Delete a comment; author only.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = Ack),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ack>> {
    let id: CommentId = Field::ID.parse_id(&path)?;
    state.comments.delete(session.user(), &id).await?;
    Ok(web::Json(Ack::OK))
}
