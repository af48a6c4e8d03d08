//! Consumer key/secret pair plus the optional initiator security credential.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::Secret};

/// Credentials issued to a Daraja app.
#[derive(Clone)]
pub struct ClientCredentials {
	/// App consumer key.
	pub consumer_key: String,
	/// App consumer secret.
	pub consumer_secret: Secret,
	/// Initiator password encrypted with the provider's public certificate, required by B2C,
	/// transaction status, reversal, and account balance.
	pub security_credential: Option<Secret>,
}
impl ClientCredentials {
	/// Creates credentials without a security credential.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<Secret>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: consumer_secret.into(),
			security_credential: None,
		}
	}

	/// Sets or replaces the security credential used by initiator-based operations.
	pub fn with_security_credential(mut self, credential: impl Into<Secret>) -> Self {
		self.security_credential = Some(credential.into());

		self
	}

	/// Returns the `Authorization` header value for the token endpoint.
	pub fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.consumer_key, self.consumer_secret.expose());

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &self.consumer_secret)
			.field("security_credential_set", &self.security_credential.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn basic_authorization_encodes_key_and_secret() {
		let credentials = ClientCredentials::new("key", "secret");

		assert_eq!(credentials.basic_authorization(), "Basic a2V5OnNlY3JldA==");
	}

	#[test]
	fn debug_hides_secrets() {
		let credentials =
			ClientCredentials::new("key", "consumer-secret").with_security_credential("initiator");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("consumer-secret"));
		assert!(!rendered.contains("initiator\""));
		assert!(rendered.contains("security_credential_set: true"));
	}
}
