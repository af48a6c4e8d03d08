//! Bearer token records and the token endpoint reply.

// self
use crate::{_prelude::*, auth::Secret, error::AuthenticationError, operation::wire};

/// Bearer token issued by the token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Token value; callers must avoid logging it.
	pub token: Secret,
	/// Instant the token endpoint answered.
	pub fetched_at: OffsetDateTime,
	/// Expiry derived from the provider's `expires_in`; `None` when the provider sent none.
	pub expires_at: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Creates a record without a known expiry.
	pub fn new(token: impl Into<Secret>, fetched_at: OffsetDateTime) -> Self {
		Self { token: token.into(), fetched_at, expires_at: None }
	}

	/// Sets the expiry relative to `fetched_at`.
	///
	/// Expiries past the representable range leave the token without one.
	pub fn with_expires_in(mut self, ttl: Duration) -> Self {
		self.expires_at = self.fetched_at.checked_add(ttl);

		self
	}

	/// Returns the `Authorization` header value for authenticated calls.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.token.expose())
	}

	/// Returns `true` once `instant` reaches the expiry. Tokens without expiry never expire.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` when the token outlives `instant` by more than `window`.
	///
	/// Negative windows count as zero. Tokens without a provider-supplied expiry are never
	/// reusable.
	pub fn is_reusable_at(&self, instant: OffsetDateTime, window: Duration) -> bool {
		let window = window.max(Duration::ZERO);

		self.expires_at.is_some_and(|expires_at| expires_at - instant > window)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("token", &"<redacted>")
			.field("fetched_at", &self.fetched_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Token endpoint reply, e.g. `{"access_token": "...", "expires_in": "3599"}`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TokenResponse {
	#[serde(default)]
	access_token: Option<Secret>,
	#[serde(default, deserialize_with = "wire::opt_string_or_number")]
	expires_in: Option<String>,
}
impl TokenResponse {
	pub(crate) fn into_token(
		self,
		fetched_at: OffsetDateTime,
	) -> Result<AccessToken, AuthenticationError> {
		let token = self
			.access_token
			.filter(|token| !token.is_empty())
			.ok_or(AuthenticationError::MissingToken)?;
		let mut record = AccessToken::new(token, fetched_at);
		let Some(raw) = self.expires_in else {
			return Ok(record);
		};
		let expires_at = raw
			.trim()
			.parse::<i64>()
			.ok()
			.filter(|seconds| *seconds > 0)
			.and_then(|seconds| fetched_at.checked_add(Duration::seconds(seconds)))
			.ok_or(AuthenticationError::InvalidExpiresIn { value: raw })?;

		record.expires_at = Some(expires_at);

		Ok(record)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn parse(body: &str) -> TokenResponse {
		serde_json::from_str(body).expect("Token response should deserialize.")
	}

	#[test]
	fn token_response_accepts_string_and_numeric_expiry() {
		let now = OffsetDateTime::now_utc();
		let from_string = parse(r#"{"access_token":"abc","expires_in":"3599"}"#)
			.into_token(now)
			.expect("String expires_in should be accepted.");
		let from_number = parse(r#"{"access_token":"abc","expires_in":3599}"#)
			.into_token(now)
			.expect("Numeric expires_in should be accepted.");

		assert_eq!(from_string.expires_at, Some(now + Duration::seconds(3599)));
		assert_eq!(from_number.expires_at, from_string.expires_at);
		assert_eq!(from_string.bearer(), "Bearer abc");
	}

	#[test]
	fn token_response_rejects_missing_token_and_bad_expiry() {
		let now = OffsetDateTime::now_utc();

		assert!(matches!(
			parse(r#"{"expires_in":"3599"}"#).into_token(now),
			Err(AuthenticationError::MissingToken)
		));
		assert!(matches!(
			parse(r#"{"access_token":"","expires_in":"3599"}"#).into_token(now),
			Err(AuthenticationError::MissingToken)
		));
		assert!(matches!(
			parse(r#"{"access_token":"abc","expires_in":"soon"}"#).into_token(now),
			Err(AuthenticationError::InvalidExpiresIn { .. })
		));
		assert!(matches!(
			parse(r#"{"access_token":"abc","expires_in":0}"#).into_token(now),
			Err(AuthenticationError::InvalidExpiresIn { .. })
		));
	}

	#[test]
	fn out_of_range_expiry_is_rejected() {
		let err = parse(r#"{"access_token":"abc","expires_in":"9999999999999"}"#)
			.into_token(OffsetDateTime::now_utc())
			.expect_err("Expiry beyond the representable range should be rejected.");

		match err {
			AuthenticationError::InvalidExpiresIn { value } => assert_eq!(value, "9999999999999"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn reuse_window_respects_expiry() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new("abc", now).with_expires_in(Duration::seconds(3599));
		let window = Duration::seconds(60);

		assert!(token.is_reusable_at(now, window));
		assert!(!token.is_reusable_at(now + Duration::seconds(3540), window));
		assert!(token.is_expired_at(now + Duration::seconds(3599)));
		assert!(!AccessToken::new("abc", now).is_reusable_at(now, Duration::ZERO));
		assert!(!AccessToken::new("abc", now).is_expired_at(now + Duration::days(365)));
	}

	#[test]
	fn negative_window_does_not_extend_expiry() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new("abc", now).with_expires_in(Duration::seconds(60));

		assert!(!token.is_reusable_at(now + Duration::seconds(90), Duration::minutes(-10)));
		assert!(token.is_reusable_at(now + Duration::seconds(30), Duration::minutes(-10)));
		assert!(AccessToken::new("abc", now).with_expires_in(Duration::MAX).expires_at.is_none());
	}

	#[test]
	fn debug_redacts_token() {
		let token = AccessToken::new("very-secret", OffsetDateTime::now_utc());

		assert!(!format!("{token:?}").contains("very-secret"));
	}
}
