//! In-memory adapter for the user, post and comment repositories.
//!
//! Backs the server when no database is configured and every test suite
//! that exercises services or handlers end to end. Rows are normalized the
//! way the SQL schema is: posts and comments store their author's id and the
//! current username is joined on read, and comment counts are derived.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::keyset_window;

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, PostPersistenceError, PostRepository, StoredUser,
    UniqueField, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Author, COMMENT_ORDER, Comment, CommentBody, CommentId, Email, ListingRequest, POST_ORDER,
    PasswordHash, Post, PostContent, PostDraft, PostFilter, PostId, PostSummary, PostTitle, User,
    UserId, Username,
};

/// Encoded hash that no password verifies against.
const UNUSABLE_HASH: &str = "!";

#[derive(Debug, Clone)]
struct PostRow {
    id: PostId,
    author_id: UserId,
    title: PostTitle,
    content: PostContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: CommentId,
    post_id: PostId,
    author_id: UserId,
    content: CommentBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, StoredUser>,
    posts: HashMap<PostId, PostRow>,
    comments: HashMap<CommentId, CommentRow>,
}

impl Tables {
    fn author(&self, id: &UserId) -> Option<Author> {
        self.users
            .get(id)
            .map(|stored| Author::from(&stored.user))
    }

    fn comment_count(&self, post_id: &PostId) -> u64 {
        let count = self
            .comments
            .values()
            .filter(|row| row.post_id == *post_id)
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Rows whose author vanished are skipped, matching an inner join.
    fn post(&self, row: &PostRow) -> Option<Post> {
        let author = self.author(&row.author_id)?;
        Some(Post::new(
            row.id,
            PostDraft::new(row.title.clone(), row.content.clone()),
            author,
            row.created_at,
            row.updated_at,
            self.comment_count(&row.id),
        ))
    }

    fn comment(&self, row: &CommentRow) -> Option<Comment> {
        let author = self.author(&row.author_id)?;
        Some(Comment::new(
            row.id,
            row.post_id,
            row.content.clone(),
            author,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn matches_filter(filter: &PostFilter, post: &Post) -> bool {
    if filter
        .author
        .is_some_and(|author| author != *post.author().id())
    {
        return false;
    }
    filter.search.as_ref().is_none_or(|term| {
        term.matches(post.title().as_ref())
            || term.matches(post.content().as_ref())
            || term.matches(post.author().username().as_ref())
    })
}

/// Thread-safe in-memory store implementing every repository port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use forum_backend::outbound::memory::MemoryStore;
///
/// let store = Arc::new(MemoryStore::default());
/// assert_eq!(store.post_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `user` with a password hash nothing verifies against.
    pub fn seed_user(&self, user: User) {
        let stored = StoredUser {
            user,
            password_hash: PasswordHash::from_stored(UNUSABLE_HASH),
        };
        self.lock().users.insert(*stored.user.id(), stored);
    }

    /// Delete a user; their sessions stop resolving.
    pub fn remove_user(&self, id: &UserId) {
        self.lock().users.remove(id);
    }

    /// Current record for `id`.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.lock().users.get(id).map(|stored| stored.user.clone())
    }

    /// Number of stored posts.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    /// Number of stored comments across all posts.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.user(id))
    }

    async fn find_for_login(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let tables = self.lock();
        Ok(tables
            .users
            .values()
            .find(|stored| {
                stored.user.email().as_ref() == identifier
                    || stored.user.username().as_ref() == identifier
            })
            .cloned())
    }

    async fn find_conflict(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<UniqueField>, UserPersistenceError> {
        let tables = self.lock();
        let users = || tables.users.values().map(|stored| &stored.user);
        if users().any(|user| user.email() == email) {
            return Ok(Some(UniqueField::Email));
        }
        if users().any(|user| user.username() == username) {
            return Ok(Some(UniqueField::Username));
        }
        Ok(None)
    }

    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock();
        for stored in tables.users.values() {
            if stored.user.email() == user.email() {
                return Err(UserPersistenceError::duplicate(UniqueField::Email));
            }
            if stored.user.username() == user.username() {
                return Err(UserPersistenceError::duplicate(UniqueField::Username));
            }
        }
        tables.users.insert(
            *user.id(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list(
        &self,
        filter: &PostFilter,
        request: &ListingRequest,
    ) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let tables = self.lock();
        let candidates = tables
            .posts
            .values()
            .filter_map(|row| tables.post(row))
            .filter(|post| matches_filter(filter, post))
            .map(PostSummary::from);
        Ok(keyset_window(
            candidates,
            POST_ORDER,
            request,
            PostSummary::listing_key,
        ))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let tables = self.lock();
        Ok(tables.posts.get(id).and_then(|row| tables.post(row)))
    }

    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let row = PostRow {
            id: *post.id(),
            author_id: *post.author().id(),
            title: post.title().clone(),
            content: post.content().clone(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        };
        self.lock().posts.insert(row.id, row);
        Ok(())
    }

    async fn update(
        &self,
        id: &PostId,
        draft: &PostDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut tables = self.lock();
        let Some(row) = tables.posts.get_mut(id) else {
            return Ok(None);
        };
        row.title = draft.title().clone();
        row.content = draft.content().clone();
        row.updated_at = updated_at;
        let row = row.clone();
        Ok(tables.post(&row))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut tables = self.lock();
        let removed = tables.posts.remove(id).is_some();
        if removed {
            tables.comments.retain(|_, row| row.post_id != *id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list(
        &self,
        post_id: &PostId,
        request: &ListingRequest,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let tables = self.lock();
        let candidates = tables
            .comments
            .values()
            .filter(|row| row.post_id == *post_id)
            .filter_map(|row| tables.comment(row));
        Ok(keyset_window(
            candidates,
            COMMENT_ORDER,
            request,
            Comment::listing_key,
        ))
    }

    async fn find_by_id(
        &self,
        id: &CommentId,
    ) -> Result<Option<Comment>, CommentPersistenceError> {
        let tables = self.lock();
        Ok(tables.comments.get(id).and_then(|row| tables.comment(row)))
    }

    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut tables = self.lock();
        if !tables.posts.contains_key(comment.post_id()) {
            return Err(CommentPersistenceError::missing_post(*comment.post_id()));
        }
        let row = CommentRow {
            id: *comment.id(),
            post_id: *comment.post_id(),
            author_id: *comment.author().id(),
            content: comment.content().clone(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        };
        tables.comments.insert(row.id, row);
        Ok(())
    }

    async fn update(
        &self,
        id: &CommentId,
        content: &CommentBody,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut tables = self.lock();
        let Some(row) = tables.comments.get_mut(id) else {
            return Ok(None);
        };
        row.content = content.clone();
        row.updated_at = updated_at;
        let row = row.clone();
        Ok(tables.comment(&row))
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError> {
        Ok(self.lock().comments.remove(id).is_some())
    }
}
