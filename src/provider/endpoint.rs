//! Immutable endpoint descriptors for every Daraja API the client calls.

// self
use crate::transport::HttpMethod;

/// Path, method, and credential requirement of a single Daraja API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
	/// Path appended verbatim to the environment's base URL.
	pub path: &'static str,
	/// HTTP method used by the API.
	pub method: HttpMethod,
	/// Whether calls must carry `Authorization: Bearer <token>`.
	pub requires_credential: bool,
}
impl Endpoint {
	/// OAuth token endpoint (basic auth, no bearer token).
	pub const TOKEN: Self = Self::get("/oauth/v1/generate?grant_type=client_credentials", false);
	/// Lipa Na M-Pesa Online checkout push.
	pub const STK_PUSH: Self = Self::post("/mpesa/stkpush/v1/processrequest");
	/// Lipa Na M-Pesa Online checkout query.
	pub const STK_QUERY: Self = Self::post("/mpesa/stkpushquery/v1/query");
	/// Business-to-customer payout.
	pub const B2C_PAYMENT: Self = Self::post("/mpesa/b2c/v1/paymentrequest");
	/// Transaction status query.
	pub const TRANSACTION_STATUS: Self = Self::post("/mpesa/transactionstatus/v1/query");
	/// Transaction reversal.
	pub const REVERSAL: Self = Self::post("/mpesa/reversal/v1/request");
	/// Customer-to-business callback URL registration.
	pub const C2B_REGISTER: Self = Self::post("/mpesa/c2b/v1/registerurl");
	/// Customer-to-business payment simulation (sandbox only).
	pub const C2B_SIMULATE: Self = Self::post("/mpesa/c2b/v1/simulate");
	/// Account balance query.
	pub const ACCOUNT_BALANCE: Self = Self::post("/mpesa/accountbalance/v1/query");

	const fn get(path: &'static str, requires_credential: bool) -> Self {
		Self { path, method: HttpMethod::Get, requires_credential }
	}

	const fn post(path: &'static str) -> Self {
		Self { path, method: HttpMethod::Post, requires_credential: true }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_endpoint_is_an_unauthenticated_get() {
		assert_eq!(Endpoint::TOKEN.method, HttpMethod::Get);
		assert!(!Endpoint::TOKEN.requires_credential);
		assert!(Endpoint::TOKEN.path.ends_with("grant_type=client_credentials"));
	}

	#[test]
	fn financial_endpoints_require_bearer_tokens() {
		for endpoint in [
			Endpoint::STK_PUSH,
			Endpoint::STK_QUERY,
			Endpoint::B2C_PAYMENT,
			Endpoint::TRANSACTION_STATUS,
			Endpoint::REVERSAL,
			Endpoint::C2B_REGISTER,
			Endpoint::C2B_SIMULATE,
			Endpoint::ACCOUNT_BALANCE,
		] {
			assert_eq!(endpoint.method, HttpMethod::Post);
			assert!(endpoint.requires_credential, "{} must carry a bearer token.", endpoint.path);
			assert!(endpoint.path.starts_with("/mpesa/"));
		}
	}
}
