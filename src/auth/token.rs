//! The auth token stored in the private session cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

/// The payload of the auth cookie: who is logged in and until when.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,

    /// When the session expires. Serialized as an RFC 3339 timestamp so the
    /// value survives the round trip through serde_json regardless of
    /// sub-second precision.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}
