/// Users are keyed by UUID v7 so ids are opaque but still sort by creation.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
