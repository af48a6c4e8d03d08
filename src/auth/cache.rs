//! Bearer-token cache with single-flight fetches.
//!
//! [`CredentialCache::get_token`] returns the cached token while it stays outside the preemptive
//! window, and otherwise performs a basic-auth GET against the token endpoint. Concurrent callers
//! that find the cache empty queue on one async lock: the first fetches, the rest re-check the
//! cache once the lock frees and reuse the fresh token instead of stampeding the endpoint.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials, token::TokenResponse},
	error::AuthenticationError,
	http::ApiHttpClient,
	obs::{self, CallKind, CallSpan},
	provider::Endpoint,
	transport::{AUTHORIZATION, Headers, Transport, TransportErrorMapper},
};

/// When a fetched token may be reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
	/// Reuse until the provider's `expires_in` elapses, refreshing once the remaining lifetime drops
	/// to `preemptive_window` or below. Tokens without `expires_in` are not reused.
	ProviderExpiry {
		/// Remaining lifetime at which the token is treated as expired.
		preemptive_window: Duration,
	},
	/// Fetch a fresh token for every authenticated call.
	AlwaysFetch,
}
impl CachePolicy {
	/// Window used by [`CachePolicy::default`].
	pub const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Provider-expiry policy with a custom window; negative windows clamp to zero.
	pub fn provider_expiry(preemptive_window: Duration) -> Self {
		let preemptive_window =
			if preemptive_window.is_negative() { Duration::ZERO } else { preemptive_window };

		Self::ProviderExpiry { preemptive_window }
	}
}
impl Default for CachePolicy {
	fn default() -> Self {
		Self::ProviderExpiry { preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW }
	}
}

/// Owns the client credentials and the single cached bearer token.
pub struct CredentialCache {
	credentials: ClientCredentials,
	policy: CachePolicy,
	cached: Mutex<Option<AccessToken>>,
	flight: AsyncMutex<()>,
}
impl CredentialCache {
	/// Creates an empty cache.
	pub fn new(credentials: ClientCredentials, policy: CachePolicy) -> Self {
		Self { credentials, policy, cached: Mutex::new(None), flight: AsyncMutex::new(()) }
	}

	/// Credentials used for token fetches.
	pub fn credentials(&self) -> &ClientCredentials {
		&self.credentials
	}

	/// Active cache policy.
	pub fn policy(&self) -> CachePolicy {
		self.policy
	}

	/// Returns the cached token, if any, without contacting the provider.
	pub fn cached(&self) -> Option<AccessToken> {
		self.cached.lock().clone()
	}

	/// Drops the cached token so the next call fetches a new one.
	pub fn invalidate(&self) {
		self.cached.lock().take();
	}

	/// Returns a usable bearer token, fetching one when the cache cannot serve it.
	pub async fn get_token<C, M>(&self, transport: &Transport<C, M>) -> Result<AccessToken>
	where
		C: ?Sized + ApiHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let CachePolicy::ProviderExpiry { preemptive_window } = self.policy else {
			return self.fetch(transport).await;
		};

		if let Some(token) = self.reusable(preemptive_window) {
			return Ok(token);
		}

		let _singleflight = self.flight.lock().await;

		if let Some(token) = self.reusable(preemptive_window) {
			return Ok(token);
		}

		obs::record_token_cache(false);

		let token = self.fetch(transport).await?;

		if token.is_reusable_at(token.fetched_at, preemptive_window) {
			*self.cached.lock() = Some(token.clone());
		}

		Ok(token)
	}

	fn reusable(&self, window: Duration) -> Option<AccessToken> {
		let now = OffsetDateTime::now_utc();
		let token = self.cached.lock().clone().filter(|token| token.is_reusable_at(now, window))?;

		obs::record_token_cache(true);

		Some(token)
	}

	async fn fetch<C, M>(&self, transport: &Transport<C, M>) -> Result<AccessToken>
	where
		C: ?Sized + ApiHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		CallSpan::new(CallKind::Token, Endpoint::TOKEN.path)
			.observe(async move {
				let mut headers = Headers::new();

				headers.insert(AUTHORIZATION.into(), self.credentials.basic_authorization());

				let envelope = transport
					.get(Endpoint::TOKEN.path, &headers)
					.await
					.map_err(map_token_endpoint_error)?;
				let fetched_at = OffsetDateTime::now_utc();
				let response: TokenResponse = serde_path_to_error::deserialize(&envelope.data)
					.map_err(|source| AuthenticationError::MalformedResponse {
						status: envelope.status_code,
						source,
					})?;

				response.into_token(fetched_at).map_err(Error::from)
			})
			.await
	}
}
impl Debug for CredentialCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialCache")
			.field("credentials", &self.credentials)
			.field("policy", &self.policy)
			.field("cached", &self.cached.lock().is_some())
			.finish()
	}
}

/// Token endpoint rejections and unreadable bodies become authentication failures; transport
/// failures keep their own kind.
fn map_token_endpoint_error(err: Error) -> Error {
	match err {
		Error::Http(envelope) => AuthenticationError::Rejected {
			status: envelope.status_code,
			message: envelope.provider_message(),
		}
		.into(),
		Error::InvalidResponseBody { status, source, .. } =>
			AuthenticationError::MalformedResponse { status, source }.into(),
		other => other,
	}
}
