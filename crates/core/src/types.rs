/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Subject of a session token issued by the auth provider.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
