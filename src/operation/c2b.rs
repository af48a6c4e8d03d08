//! Customer-to-business URL registration and payment simulation.

// self
use crate::{
	_prelude::*,
	operation::{
		CustomerPaymentType, Operation, OperationKind, PayloadContext, ValidationError, validate,
		wire,
	},
};

/// What the provider does with a payment when the validation URL is unreachable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
	/// Complete the payment.
	#[default]
	Completed,
	/// Cancel the payment.
	Cancelled,
}

/// Registers the confirmation and validation URLs of a short code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct C2bRegister {
	/// Organization short code.
	pub short_code: u32,
	/// Fallback when the validation URL cannot be reached.
	pub response_type: ResponseType,
	/// URL notified after a payment completes.
	pub confirmation_url: Url,
	/// URL asked to accept or reject each payment.
	pub validation_url: Url,
}
impl Operation for C2bRegister {
	type Payload = C2bRegisterPayload;
	type Response = C2bResponse;

	const KIND: OperationKind = OperationKind::C2bRegister;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::callback_url("ConfirmationURL", &self.confirmation_url)?;
		validate::callback_url("ValidationURL", &self.validation_url)
	}

	fn payload(&self, _: &PayloadContext<'_>) -> Result<Self::Payload> {
		Ok(C2bRegisterPayload {
			short_code: self.short_code,
			response_type: self.response_type,
			confirmation_url: self.confirmation_url.to_string(),
			validation_url: self.validation_url.to_string(),
		})
	}
}

/// Wire body of a C2B URL registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct C2bRegisterPayload {
	/// Organization short code.
	pub short_code: u32,
	/// Validation fallback.
	pub response_type: ResponseType,
	/// Confirmation URL.
	#[serde(rename = "ConfirmationURL")]
	pub confirmation_url: String,
	/// Validation URL.
	#[serde(rename = "ValidationURL")]
	pub validation_url: String,
}

/// Simulates a customer paying a short code; only honored by the sandbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct C2bSimulate {
	/// Organization short code receiving the payment.
	pub short_code: u32,
	/// Paybill or Buy Goods payment.
	pub command: CustomerPaymentType,
	/// Amount in whole shillings; at least 1.
	pub amount: u64,
	/// Paying phone number (`254XXXXXXXXX`).
	pub msisdn: String,
	/// Paybill account number; omitted for Buy Goods payments.
	pub bill_ref_number: Option<String>,
}
impl Operation for C2bSimulate {
	type Payload = C2bSimulatePayload;
	type Response = C2bResponse;

	const KIND: OperationKind = OperationKind::C2bSimulate;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::amount("Amount", self.amount)?;
		validate::msisdn("Msisdn", &self.msisdn)
	}

	fn payload(&self, _: &PayloadContext<'_>) -> Result<Self::Payload> {
		let msisdn = self.msisdn.parse().map_err(|_| ValidationError::InvalidPhoneNumber {
			field: "Msisdn",
			value: self.msisdn.clone(),
		})?;

		Ok(C2bSimulatePayload {
			short_code: self.short_code,
			command_id: self.command,
			amount: self.amount,
			msisdn,
			bill_ref_number: self.bill_ref_number.clone(),
		})
	}
}

/// Wire body of a C2B simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct C2bSimulatePayload {
	/// Receiving short code.
	pub short_code: u32,
	/// Payment channel.
	#[serde(rename = "CommandID")]
	pub command_id: CustomerPaymentType,
	/// Amount in whole shillings.
	pub amount: u64,
	/// Paying phone number as a JSON number.
	pub msisdn: u64,
	/// Account number, omitted when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bill_ref_number: Option<String>,
}

/// Acknowledgement of a C2B registration or simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct C2bResponse {
	/// Originating request identifier; the provider spells the field `OriginatorCoversationID`.
	#[serde(rename = "OriginatorCoversationID", alias = "OriginatorConversationID", default)]
	pub originator_conversation_id: String,
	/// `"0"` on success.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub response_code: String,
	/// Human-readable status.
	#[serde(default)]
	pub response_description: String,
}
