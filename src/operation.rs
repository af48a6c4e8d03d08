//! Typed Daraja operations.
//!
//! Every financial API is modeled as a caller-facing input struct implementing [`Operation`]. The
//! client validates the input, asks it for its wire payload (stamping the request timestamp, the
//! Lipa Na M-Pesa password, and the initiator security credential where the API wants them), and
//! decodes the 2xx body into the operation's typed response.

pub mod account_balance;
pub mod b2c;
pub mod c2b;
pub mod reversal;
pub mod stk;
pub mod transaction_status;

pub(crate) mod validate;
pub(crate) mod wire;

pub use account_balance::*;
pub use b2c::*;
pub use c2b::*;
pub use reversal::*;
pub use stk::*;
pub use transaction_status::*;
pub use validate::ValidationError;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Serializer, de::DeserializeOwned};
use time::{
	UtcOffset,
	macros::{format_description, offset},
};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, provider::Endpoint};

/// Offset Daraja expects request timestamps in (East Africa Time).
pub const EAST_AFRICA_TIME: UtcOffset = offset!(+3);

/// A Daraja API call: input validation, wire payload, and typed response.
pub trait Operation
where
	Self: Send + Sync,
{
	/// Operation label and endpoint.
	const KIND: OperationKind;

	/// JSON body sent to the endpoint.
	type Payload: Serialize + Send + Sync;
	/// Typed 2xx response body.
	type Response: DeserializeOwned + Send;

	/// Checks caller-supplied fields against provider constraints.
	fn validate(&self) -> Result<(), ValidationError>;

	/// Builds the wire payload for a request issued under `context`.
	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload>;
}

/// Financial operations exposed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Lipa Na M-Pesa Online checkout push.
	StkPush,
	/// Lipa Na M-Pesa Online checkout query.
	StkQuery,
	/// Business-to-customer payout.
	B2cPayment,
	/// Transaction status query.
	TransactionStatus,
	/// Transaction reversal.
	Reversal,
	/// C2B callback URL registration.
	C2bRegister,
	/// C2B payment simulation.
	C2bSimulate,
	/// Account balance query.
	AccountBalance,
}
impl OperationKind {
	/// Every operation, in declaration order.
	pub const ALL: [Self; 8] = [
		Self::StkPush,
		Self::StkQuery,
		Self::B2cPayment,
		Self::TransactionStatus,
		Self::Reversal,
		Self::C2bRegister,
		Self::C2bSimulate,
		Self::AccountBalance,
	];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::StkPush => "stk_push",
			Self::StkQuery => "stk_query",
			Self::B2cPayment => "b2c_payment",
			Self::TransactionStatus => "transaction_status",
			Self::Reversal => "reversal",
			Self::C2bRegister => "c2b_register",
			Self::C2bSimulate => "c2b_simulate",
			Self::AccountBalance => "account_balance",
		}
	}

	/// Endpoint the operation is sent to.
	pub const fn endpoint(self) -> Endpoint {
		match self {
			Self::StkPush => Endpoint::STK_PUSH,
			Self::StkQuery => Endpoint::STK_QUERY,
			Self::B2cPayment => Endpoint::B2C_PAYMENT,
			Self::TransactionStatus => Endpoint::TRANSACTION_STATUS,
			Self::Reversal => Endpoint::REVERSAL,
			Self::C2bRegister => Endpoint::C2B_REGISTER,
			Self::C2bSimulate => Endpoint::C2B_SIMULATE,
			Self::AccountBalance => Endpoint::ACCOUNT_BALANCE,
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-request values an operation may fold into its payload.
#[derive(Clone, Copy, Debug)]
pub struct PayloadContext<'a> {
	/// Instant the request is issued.
	pub issued_at: OffsetDateTime,
	/// Initiator security credential configured on the client.
	pub security_credential: Option<&'a Secret>,
}
impl<'a> PayloadContext<'a> {
	/// Context without a security credential.
	pub fn new(issued_at: OffsetDateTime) -> Self {
		Self { issued_at, security_credential: None }
	}

	/// Attaches the initiator security credential.
	pub fn with_security_credential(mut self, credential: Option<&'a Secret>) -> Self {
		self.security_credential = credential;

		self
	}

	/// `YYYYMMDDHHmmss` rendering of [`PayloadContext::issued_at`] in East Africa Time.
	pub fn timestamp(&self) -> Result<String> {
		let timestamp = self
			.issued_at
			.to_offset(EAST_AFRICA_TIME)
			.format(format_description!("[year][month][day][hour][minute][second]"))
			.map_err(ConfigError::from)?;

		Ok(timestamp)
	}

	/// Returns the security credential, failing when `kind` needs one and none is configured.
	pub fn require_security_credential(&self, kind: OperationKind) -> Result<Secret> {
		self.security_credential
			.filter(|credential| !credential.is_empty())
			.cloned()
			.ok_or_else(|| ConfigError::MissingSecurityCredential { operation: kind.as_str() }.into())
	}
}

/// Lipa Na M-Pesa Online password: `base64(short_code + pass_key + timestamp)`.
pub fn lipa_na_mpesa_password(short_code: u32, pass_key: &Secret, timestamp: &str) -> Secret {
	Secret::new(STANDARD.encode(format!("{short_code}{}{timestamp}", pass_key.expose())))
}

/// Acknowledgement returned by asynchronous operations (B2C, status, reversal, balance).
///
/// The final outcome arrives later at the operation's `ResultURL`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedResponse {
	/// Provider-generated conversation identifier.
	#[serde(rename = "ConversationID", default)]
	pub conversation_id: String,
	/// Identifier of the originating request.
	#[serde(rename = "OriginatorConversationID", default)]
	pub originator_conversation_id: String,
	/// `"0"` when the request was accepted for processing.
	#[serde(rename = "ResponseCode", deserialize_with = "wire::string_or_number")]
	pub response_code: String,
	/// Human-readable acceptance status.
	#[serde(rename = "ResponseDescription", default)]
	pub response_description: String,
}
impl AcceptedResponse {
	/// Returns `true` when the provider accepted the request.
	pub fn is_accepted(&self) -> bool {
		self.response_code == "0"
	}
}

/// Type of organization identifier in `PartyA`/`ReceiverParty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierType {
	/// Customer phone number.
	Msisdn,
	/// Buy Goods till number.
	TillNumber,
	/// Paybill or B2C organization short code.
	ShortCode,
}
impl IdentifierType {
	/// Numeric code sent on the wire.
	pub const fn code(self) -> &'static str {
		match self {
			Self::Msisdn => "1",
			Self::TillNumber => "2",
			Self::ShortCode => "4",
		}
	}
}
impl Serialize for IdentifierType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.code())
	}
}

/// Customer payment channel used by checkout pushes and C2B simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerPaymentType {
	/// Paybill payment.
	#[default]
	CustomerPayBillOnline,
	/// Buy Goods (till) payment.
	CustomerBuyGoodsOnline,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn issued_at() -> OffsetDateTime {
		// 2024-01-31T21:05:09Z
		OffsetDateTime::from_unix_timestamp(1_706_735_109).expect("Timestamp should be in range.")
	}

	#[test]
	fn timestamps_render_in_east_africa_time() {
		let context = PayloadContext::new(issued_at());

		assert_eq!(context.timestamp().expect("Timestamp should format."), "20240201000509");
	}

	#[test]
	fn password_concatenates_short_code_pass_key_and_timestamp() {
		let password = lipa_na_mpesa_password(174379, &Secret::new("passkey"), "20240201000509");

		assert_eq!(password.expose(), STANDARD.encode("174379passkey20240201000509"));
	}

	#[test]
	fn missing_security_credential_is_a_config_error() {
		let empty = Secret::new("");
		let err = PayloadContext::new(issued_at())
			.with_security_credential(Some(&empty))
			.require_security_credential(OperationKind::Reversal)
			.expect_err("Empty credential should be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingSecurityCredential { operation: "reversal" })
		));

		let credential = Secret::new("encrypted");
		let resolved = PayloadContext::new(issued_at())
			.with_security_credential(Some(&credential))
			.require_security_credential(OperationKind::Reversal)
			.expect("Configured credential should resolve.");

		assert_eq!(resolved.expose(), "encrypted");
	}

	#[test]
	fn kinds_map_to_distinct_endpoints() {
		let mut paths = OperationKind::ALL.map(|kind| kind.endpoint().path).to_vec();

		paths.sort_unstable();
		paths.dedup();

		assert_eq!(paths.len(), OperationKind::ALL.len());
		assert_eq!(OperationKind::B2cPayment.to_string(), "b2c_payment");
		assert_eq!(serde_json::to_value(IdentifierType::ShortCode).ok(), Some("4".into()));
	}

	#[test]
	fn accepted_response_tolerates_numeric_codes() {
		let response: AcceptedResponse = serde_json::from_value(serde_json::json!({
			"ConversationID": "AG_20240201_0000",
			"OriginatorConversationID": "1234-5678-1",
			"ResponseCode": 0,
			"ResponseDescription": "Accept the service request successfully."
		}))
		.expect("Response should decode.");

		assert!(response.is_accepted());
		assert_eq!(response.response_code, "0");
	}
}
