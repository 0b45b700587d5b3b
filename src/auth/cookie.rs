//! Stores the backend session in a private cookie.
//!
//! The browser only ever sees the encrypted cookie, the bearer token itself
//! never reaches client-side script.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, api::Session, auth::Token};

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(1);

/// Add a session cookie to the cookie jar, indicating that a user is logged in.
///
/// Sets the initial expiry of the cookie to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// # Errors
///
/// Returns an error if the expiry overflows or the session cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot extend expiry by {duration}")))?;

    set_session_cookie_expiry(jar, session.clone(), expires_at)
}

fn set_session_cookie_expiry(
    jar: PrivateCookieJar,
    session: Session,
    expires_at: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        session,
        expires_at,
    };
    let value = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, value))
            .expires(expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session cookie, ignoring cookies that are malformed or past their expiry.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Option<Token> {
    let cookie = jar.get(COOKIE_SESSION)?;

    let token: Token = match serde_json::from_str(cookie.value_trimmed()) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("Ignoring unreadable session cookie: {error}");
            return None;
        }
    };

    (!token.is_expired(OffsetDateTime::now_utc())).then_some(token)
}

/// The session stored in the cookie jar, if there is a valid one.
pub fn get_session_from_cookies(jar: &PrivateCookieJar) -> Option<Session> {
    get_token_from_cookies(jar).map(|token| token.session)
}

/// Set the expiry of the session cookie in `jar` to the latest of UTC now
/// plus `duration` and the cookie's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns [Error::CookieError] if there is no valid session cookie or the
/// new expiry overflows.
pub(crate) fn extend_session_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)
        .ok_or_else(|| Error::CookieError("session cookie missing".to_owned()))?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot extend expiry by {duration}")))?;

    let expires_at = max(token.expires_at, new_expiry);

    set_session_cookie_expiry(jar, token.session, expires_at)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::api::Session;

    use super::{
        COOKIE_SESSION, DEFAULT_COOKIE_DURATION, extend_session_cookie_duration_if_needed,
        get_session_from_cookies, get_token_from_cookies, invalidate_session_cookie,
        set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn session() -> Session {
        Session::new("abc123", "test@example.com")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn can_set_cookie() {
        let jar = set_session_cookie(get_jar(), &session(), DEFAULT_COOKIE_DURATION).unwrap();

        let cookie = jar.get(COOKIE_SESSION).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.session, session());
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
        assert_eq!(cookie.expires_datetime(), Some(token.expires_at));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn get_session_from_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), &session(), DEFAULT_COOKIE_DURATION).unwrap();

        assert_eq!(get_session_from_cookies(&jar), Some(session()));
    }

    #[test]
    fn missing_cookie_has_no_session() {
        assert_eq!(get_session_from_cookies(&get_jar()), None);
    }

    #[test]
    fn expired_token_has_no_session() {
        let jar = set_session_cookie(get_jar(), &session(), Duration::seconds(-5)).unwrap();

        assert_eq!(get_session_from_cookies(&jar), None);
    }

    #[test]
    fn garbage_cookie_has_no_session() {
        let jar = get_jar().add(Cookie::new(COOKIE_SESSION, "not json"));

        assert_eq!(get_session_from_cookies(&jar), None);
    }

    #[test]
    fn can_extend_cookie_duration() {
        let jar = set_session_cookie(get_jar(), &session(), Duration::minutes(5)).unwrap();

        let jar = extend_session_cookie_duration_if_needed(jar, Duration::minutes(10)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_SESSION).unwrap();
        let want = OffsetDateTime::now_utc() + Duration::minutes(10);
        assert_date_time_close(token.expires_at, want);
        assert_date_time_close(cookie.expires_datetime().unwrap(), want);
        assert_eq!(token.session, session());
    }

    #[test]
    fn cookie_duration_does_not_shrink() {
        let jar = set_session_cookie(get_jar(), &session(), DEFAULT_COOKIE_DURATION).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        // The cookie already lasts an hour, so asking for five seconds should not change it.
        let jar = extend_session_cookie_duration_if_needed(jar, Duration::seconds(5)).unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn extending_without_cookie_fails() {
        assert!(extend_session_cookie_duration_if_needed(get_jar(), Duration::minutes(5)).is_err());
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), &session(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(get_session_from_cookies(&jar), None);
    }
}
