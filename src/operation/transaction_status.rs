//! Transaction status queries.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	operation::{
		AcceptedResponse, IdentifierType, Operation, OperationKind, PayloadContext,
		ValidationError, validate,
	},
};

const COMMAND_ID: &str = "TransactionStatusQuery";
const REMARKS_MAX: usize = 100;

/// Asks the provider to report the state of a completed M-Pesa transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionStatusQuery {
	/// API operator user name.
	pub initiator: String,
	/// M-Pesa receipt number of the transaction, e.g. `OEI2AK4Q16`.
	pub transaction_id: String,
	/// Organization or phone number that took part in the transaction.
	pub party_a: String,
	/// Kind of identifier in `party_a`.
	pub identifier_type: IdentifierType,
	/// URL that receives the status report.
	pub result_url: Url,
	/// URL notified when the request times out in the provider queue.
	pub queue_timeout_url: Url,
	/// Free-text remarks; at most 100 characters.
	pub remarks: String,
	/// Optional occasion; at most 100 characters.
	pub occasion: Option<String>,
}
impl Operation for TransactionStatusQuery {
	type Payload = TransactionStatusPayload;
	type Response = AcceptedResponse;

	const KIND: OperationKind = OperationKind::TransactionStatus;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("Initiator", &self.initiator, usize::MAX)?;
		validate::text("TransactionID", &self.transaction_id, usize::MAX)?;
		validate::text("PartyA", &self.party_a, usize::MAX)?;
		validate::callback_url("ResultURL", &self.result_url)?;
		validate::callback_url("QueueTimeOutURL", &self.queue_timeout_url)?;
		validate::text("Remarks", &self.remarks, REMARKS_MAX)?;
		validate::optional_text("Occasion", self.occasion.as_deref(), REMARKS_MAX)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		Ok(TransactionStatusPayload {
			initiator: self.initiator.clone(),
			security_credential: context.require_security_credential(Self::KIND)?,
			command_id: COMMAND_ID,
			transaction_id: self.transaction_id.clone(),
			party_a: self.party_a.clone(),
			identifier_type: self.identifier_type,
			result_url: self.result_url.to_string(),
			queue_timeout_url: self.queue_timeout_url.to_string(),
			remarks: self.remarks.clone(),
			occasion: self.occasion.clone(),
		})
	}
}

/// Wire body of a transaction status query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionStatusPayload {
	/// Operator user name.
	pub initiator: String,
	/// Encrypted initiator password.
	pub security_credential: Secret,
	/// Always `TransactionStatusQuery`.
	#[serde(rename = "CommandID")]
	pub command_id: &'static str,
	/// Receipt number.
	#[serde(rename = "TransactionID")]
	pub transaction_id: String,
	/// Participating party.
	pub party_a: String,
	/// Kind of `party_a`.
	pub identifier_type: IdentifierType,
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
	fn payload_fixes_command_and_identifier_code() {
		let query = TransactionStatusQuery {
			initiator: "testapi".into(),
			transaction_id: "OEI2AK4Q16".into(),
			party_a: "600426".into(),
			identifier_type: IdentifierType::ShortCode,
			result_url: Url::parse("https://example.com/status/result").expect("URL should parse."),
			queue_timeout_url: Url::parse("https://example.com/status/timeout")
				.expect("URL should parse."),
			remarks: "Status check".into(),
			occasion: Some("Audit".into()),
		};
		let credential = Secret::new("encrypted==");
		let context = PayloadContext::new(OffsetDateTime::UNIX_EPOCH)
			.with_security_credential(Some(&credential));
		let body = serde_json::to_value(query.payload(&context).expect("Payload should build."))
			.expect("Payload should serialize.");

		assert!(query.validate().is_ok());
		assert_eq!(body["CommandID"], "TransactionStatusQuery");
		assert_eq!(body["TransactionID"], "OEI2AK4Q16");
		assert_eq!(body["IdentifierType"], "4");
		assert_eq!(body["SecurityCredential"], "encrypted==");
		assert_eq!(body["Occasion"], "Audit");
	}
}
