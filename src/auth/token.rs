//! The payload kept in the session cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api::Session;

// The default serde format for `OffsetDateTime` writes midnight as "0:00:00.0",
// which it then refuses to parse, so the expiry uses fixed-width fields.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// The backend session and the time after which the cookie holding it is
/// no longer accepted.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub session: Session,

    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token should be ignored at time `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
