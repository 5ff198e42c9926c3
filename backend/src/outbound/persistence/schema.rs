//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here.

diesel::table! {
    /// Account owners.
    users (id) {
        /// Primary key: UUID v7 identifier.
        id -> Uuid,
        /// Display name, trimmed and non-empty.
        name -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Balance-holding accounts. Rows are soft deleted.
    accounts (id) {
        /// Primary key: UUID v7 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Display name.
        name -> Text,
        /// Current balance; a check constraint keeps it non-negative.
        balance -> Numeric,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last balance or name change.
        updated_at -> Timestamptz,
        /// Soft-delete marker; live rows hold NULL.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only journal of balance changes.
    transactions (id) {
        /// Primary key: UUID v7 identifier.
        id -> Uuid,
        /// Account whose balance changed.
        account_id -> Uuid,
        /// Owner of that account at the time of the change.
        user_id -> Uuid,
        /// Signed change.
        amount -> Numeric,
        /// Balance after the change.
        balance -> Numeric,
        /// Transaction type code: `deposit`, `withdrawal` or `transfer`.
        kind -> Text,
        /// Status code; always `completed`.
        status -> Text,
        /// Counterparty links as a JSON object.
        metadata -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Equal to `created_at`; entries are never updated.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> users (user_id));
diesel::joinable!(transactions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(users, accounts, transactions);
