//! Diesel table definitions for the forum schema.
//!
//! Kept in step with the SQL under `backend/migrations/`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email, unique (`users_email_key`).
        email -> Varchar,
        /// Public handle, unique (`users_username_key`).
        username -> Varchar,
        /// Encoded bcrypt hash.
        password_hash -> Text,
        /// Signup time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Forum posts.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments, deleted with their post.
    comments (id) {
        id -> Uuid,
        /// Parent post (`comments_post_id_fkey`, cascades on delete).
        post_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, comments);
