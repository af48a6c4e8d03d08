//! Transport primitives for Daraja API calls.
//!
//! The module exposes [`ApiHttpClient`], the client's only dependency on an HTTP stack. The
//! handles it hands out implement [`AsyncHttpClient`] from the `oauth2` crate, which keeps the
//! contract in terms of plain `http` request/response types so downstream crates can plug in any
//! client (or a fake one in tests) without touching the transport or credential logic.

pub use oauth2;

// crates.io
#[cfg(feature = "reqwest")] use oauth2::{HttpClientError, HttpRequest, HttpResponse};
use oauth2::AsyncHttpClient;
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing Daraja requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by the
/// credential cache and every operation. Each call obtains a fresh [`ApiHttpClient::Handle`]; the
/// handle must own whatever state it needs so its request futures stay `Send` for the lifetime of
/// the in-flight call.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = oauth2::HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle for the next request.
	fn handle(&self) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Daraja does not rely on redirects; configure any custom [`ReqwestClient`] with the timeout
/// you want applied to provider calls, since the client itself imposes none.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client that aborts any provider call exceeding `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`ApiHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn timeout_client_builds() {
		let client = ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(30));

		assert!(client.is_ok());
	}
}
