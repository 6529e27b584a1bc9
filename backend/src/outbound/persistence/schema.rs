//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. `username` carries a unique constraint.
    users (id) {
        id -> Int8,
        username -> Varchar,
        password_hash -> Text,
    }
}

diesel::table! {
    /// Call records, each owned by exactly one user.
    calls (id) {
        id -> Int8,
        client_name -> Text,
        phone_number -> Varchar,
        description -> Text,
        /// `'открыта'` or `'закрыта'`, enforced by a check constraint.
        status -> Varchar,
        created_at -> Timestamptz,
        user_id -> Int8,
    }
}

diesel::joinable!(calls -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, calls);
