//! Typed M-Pesa Daraja client: checkout push and query, B2C payouts, transaction status,
//! reversals, C2B registration and simulation, and balance queries behind a single-flight
//! bearer-token cache.
//!
//! Start with [`client::Mpesa`]: it owns a [`transport::Transport`] bound to an
//! [`provider::Environment`] and a [`auth::CredentialCache`] built from
//! [`auth::ClientCredentials`]. Every operation in [`operation`] is validated locally, stamped with
//! an East Africa Time timestamp, signed where the API requires it, and decoded into a typed
//! response. Payloads Daraja later posts to caller-hosted URLs live in [`callback`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod callback;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod operation;
pub mod provider;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ClientCredentials,
		client::{Mpesa, ReqwestMpesa},
		http::ReqwestHttpClient,
		provider::Environment,
		transport::{ReqwestTransport, ReqwestTransportErrorMapper, Transport},
	};

	/// Consumer key used by test clients.
	pub const TEST_CONSUMER_KEY: &str = "test-consumer-key";
	/// Consumer secret used by test clients.
	pub const TEST_CONSUMER_SECRET: &str = "test-consumer-secret";
	/// Security credential used by test clients.
	pub const TEST_SECURITY_CREDENTIAL: &str = "test-security-credential==";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Test credentials carrying a security credential.
	pub fn test_credentials() -> ClientCredentials {
		ClientCredentials::new(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET)
			.with_security_credential(TEST_SECURITY_CREDENTIAL)
	}

	/// Environment pointing at a mock server's base URL.
	pub fn test_environment(base_url: &str) -> Environment {
		Environment::Custom(Url::parse(base_url).expect("Mock server URL should parse."))
	}

	/// Constructs a [`Transport`] against `base_url` using the test reqwest client.
	pub fn build_reqwest_test_transport(base_url: &str) -> ReqwestTransport {
		Transport::new(
			Url::parse(base_url).expect("Mock server URL should parse."),
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
	}

	/// Constructs an [`Mpesa`] client against `base_url` with [`test_credentials`].
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestMpesa {
		Mpesa::with_http_client(
			test_credentials(),
			test_environment(base_url),
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Test client should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use time;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
