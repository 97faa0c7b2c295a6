//! Post handlers.
//!
//! ```text
//! GET    /api/v1/posts?take=10&cursor=...&q=rust
//! POST   /api/v1/posts {"title":"...","content":"..."}
//! GET    /api/v1/posts/mine
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;

use crate::domain::{Error, POST_PAGE_DEFAULT, Post, PostId, PostInput, PostSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::{PageParams, PostListParams};
use crate::inbound::http::schemas::{Ack, PostPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::Field;

/// Title and content submitted when creating or editing a post.
#[derive(Debug, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    /// 1-200 characters once trimmed.
    #[schema(example = "Hello, forum")]
    #[serde(default)]
    pub title: String,
    /// 1-20000 characters.
    #[schema(example = "First post body.")]
    #[serde(default)]
    pub content: String,
}

impl From<PostBody> for PostInput {
    fn from(body: PostBody) -> Self {
        Self {
            title: body.title,
            content: body.content,
        }
    }
}

/// List posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PostListParams),
    responses(
        (status = 200, description = "Page of posts", body = PostPageSchema),
        (status = 400, description = "Invalid cursor", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<PostListParams>,
) -> ApiResult<web::Json<Page<PostSummary>>> {
    let (paging, search) = query.into_inner().split();
    let request = paging.to_request(POST_PAGE_DEFAULT)?;
    let page = state.posts_query.list(search, request).await?;
    Ok(web::Json(page))
}

/// List the caller's own posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/mine",
    params(PageParams),
    responses(
        (status = 200, description = "Page of the caller's posts", body = PostPageSchema),
        (status = 400, description = "Invalid cursor", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listMyPosts"
)]
#[get("/posts/mine")]
pub async fn list_my_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Page<PostSummary>>> {
    let request = query.to_request(POST_PAGE_DEFAULT)?;
    let page = state.posts_query.list_mine(session.user(), request).await?;
    Ok(web::Json(page))
}

/// Fetch a single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Post>> {
    let id: PostId = Field::ID.parse_id(&path)?;
    Ok(web::Json(state.posts_query.get(&id).await?))
}

/// Publish a post as the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostBody,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostBody>,
) -> ApiResult<HttpResponse> {
    let post = state
        .posts
        .create(session.user(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// Replace a post's title and content; author only.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = PostBody,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PostBody>,
) -> ApiResult<web::Json<Post>> {
    let id: PostId = Field::ID.parse_id(&path)?;
    let post = state
        .posts
        .update(session.user(), &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(post))
}

/// Delete a post and its comments; author only.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post deleted", body = Ack),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ack>> {
    let id: PostId = Field::ID.parse_id(&path)?;
    state.posts.delete(session.user(), &id).await?;
    Ok(web::Json(Ack::OK))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
