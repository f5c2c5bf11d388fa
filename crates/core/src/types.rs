/// Request identifiers are short human-referenceable tokens (`REQ-1A2B3C4D`).
pub type RequestId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
