//! Transaction reversals.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	operation::{
		AcceptedResponse, IdentifierType, Operation, OperationKind, PayloadContext,
		ValidationError, validate,
	},
};

const COMMAND_ID: &str = "TransactionReversal";
const REMARKS_MAX: usize = 100;

/// Reverses a completed M-Pesa transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reversal {
	/// API operator user name.
	pub initiator: String,
	/// M-Pesa receipt number of the transaction to reverse.
	pub transaction_id: String,
	/// Amount to reverse in whole shillings; at least 1.
	pub amount: u64,
	/// Organization that received the original payment.
	pub receiver_party: String,
	/// Kind of identifier in `receiver_party`.
	pub receiver_identifier_type: IdentifierType,
	/// URL that receives the reversal result.
	pub result_url: Url,
	/// URL notified when the request times out in the provider queue.
	pub queue_timeout_url: Url,
	/// Free-text remarks; at most 100 characters.
	pub remarks: String,
	/// Optional occasion; at most 100 characters.
	pub occasion: Option<String>,
}
impl Operation for Reversal {
	type Payload = ReversalPayload;
	type Response = AcceptedResponse;

	const KIND: OperationKind = OperationKind::Reversal;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("Initiator", &self.initiator, usize::MAX)?;
		validate::text("TransactionID", &self.transaction_id, usize::MAX)?;
		validate::amount("Amount", self.amount)?;
		validate::text("ReceiverParty", &self.receiver_party, usize::MAX)?;
		validate::callback_url("ResultURL", &self.result_url)?;
		validate::callback_url("QueueTimeOutURL", &self.queue_timeout_url)?;
		validate::text("Remarks", &self.remarks, REMARKS_MAX)?;
		validate::optional_text("Occasion", self.occasion.as_deref(), REMARKS_MAX)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		Ok(ReversalPayload {
			initiator: self.initiator.clone(),
			security_credential: context.require_security_credential(Self::KIND)?,
			command_id: COMMAND_ID,
			transaction_id: self.transaction_id.clone(),
			amount: self.amount,
			receiver_party: self.receiver_party.clone(),
			receiver_identifier_type: self.receiver_identifier_type,
			result_url: self.result_url.to_string(),
			queue_timeout_url: self.queue_timeout_url.to_string(),
			remarks: self.remarks.clone(),
			occasion: self.occasion.clone(),
		})
	}
}

/// Wire body of a reversal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReversalPayload {
	/// Operator user name.
	pub initiator: String,
	/// Encrypted initiator password.
	pub security_credential: Secret,
	/// Always `TransactionReversal`.
	#[serde(rename = "CommandID")]
	pub command_id: &'static str,
	/// Receipt number.
	#[serde(rename = "TransactionID")]
	pub transaction_id: String,
	/// Amount to reverse.
	pub amount: u64,
	/// Organization that received the payment.
	pub receiver_party: String,
	/// Kind of `receiver_party`; the provider spells the field `RecieverIdentifierType`.
	#[serde(rename = "RecieverIdentifierType")]
	pub receiver_identifier_type: IdentifierType,
	/// Result URL.
	#[serde(rename = "ResultURL")]
	pub result_url: String,
	/// Queue timeout URL.
	#[serde(rename = "QueueTimeOutURL")]
	pub queue_timeout_url: String,
	/// Remarks.
	pub remarks: String,
	/// Occasion, omitted when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub occasion: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn payload_keeps_provider_field_spelling() {
		let reversal = Reversal {
			initiator: "testapi".into(),
			transaction_id: "OEI2AK4Q16".into(),
			amount: 100,
			receiver_party: "600992".into(),
			receiver_identifier_type: IdentifierType::ShortCode,
			result_url: Url::parse("https://example.com/reversal/result")
				.expect("URL should parse."),
			queue_timeout_url: Url::parse("https://example.com/reversal/timeout")
				.expect("URL should parse."),
			remarks: "Wrong recipient".into(),
			occasion: None,
		};
		let credential = Secret::new("encrypted==");
		let context = PayloadContext::new(OffsetDateTime::UNIX_EPOCH)
			.with_security_credential(Some(&credential));
		let body = serde_json::to_value(reversal.payload(&context).expect("Payload should build."))
			.expect("Payload should serialize.");

		assert!(reversal.validate().is_ok());
		assert_eq!(body["CommandID"], "TransactionReversal");
		assert_eq!(body["RecieverIdentifierType"], "4");
		assert_eq!(body["ReceiverParty"], "600992");
		assert!(body.get("ReceiverIdentifierType").is_none());
		assert!(body.get("Occasion").is_none());
	}
}
