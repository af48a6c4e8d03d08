//! Account balance queries.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	operation::{
		AcceptedResponse, IdentifierType, Operation, OperationKind, PayloadContext,
		ValidationError, validate,
	},
};

const COMMAND_ID: &str = "AccountBalance";
const REMARKS_MAX: usize = 100;

/// Requests the balances of an organization's M-Pesa accounts.
///
/// The balances arrive asynchronously at `result_url` as a
/// [`TransactionResult`](crate::callback::TransactionResult).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountBalanceQuery {
	/// API operator user name.
	pub initiator: String,
	/// Organization whose balance is queried.
	pub party_a: String,
	/// Kind of identifier in `party_a`.
	pub identifier_type: IdentifierType,
	/// Free-text remarks; at most 100 characters.
	pub remarks: String,
	/// URL notified when the request times out in the provider queue.
	pub queue_timeout_url: Url,
	/// URL that receives the balances.
	pub result_url: Url,
}
impl Operation for AccountBalanceQuery {
	type Payload = AccountBalancePayload;
	type Response = AcceptedResponse;

	const KIND: OperationKind = OperationKind::AccountBalance;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("Initiator", &self.initiator, usize::MAX)?;
		validate::text("PartyA", &self.party_a, usize::MAX)?;
		validate::text("Remarks", &self.remarks, REMARKS_MAX)?;
		validate::callback_url("QueueTimeOutURL", &self.queue_timeout_url)?;
		validate::callback_url("ResultURL", &self.result_url)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		Ok(AccountBalancePayload {
			initiator: self.initiator.clone(),
			security_credential: context.require_security_credential(Self::KIND)?,
			command_id: COMMAND_ID,
			party_a: self.party_a.clone(),
			identifier_type: self.identifier_type,
			remarks: self.remarks.clone(),
			queue_timeout_url: self.queue_timeout_url.to_string(),
			result_url: self.result_url.to_string(),
		})
	}
}

/// Wire body of an account balance query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountBalancePayload {
	/// Operator user name.
	pub initiator: String,
	/// Encrypted initiator password.
	pub security_credential: Secret,
	/// Always `AccountBalance`.
	#[serde(rename = "CommandID")]
	pub command_id: &'static str,
	/// Queried organization.
	pub party_a: String,
	/// Kind of `party_a`.
	pub identifier_type: IdentifierType,
	/// Remarks.
	pub remarks: String,
	/// Queue timeout URL.
	#[serde(rename = "QueueTimeOutURL")]
	pub queue_timeout_url: String,
	/// Result URL.
	#[serde(rename = "ResultURL")]
	pub result_url: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn payload_matches_provider_shape() {
		let query = AccountBalanceQuery {
			initiator: "testapi".into(),
			party_a: "600000".into(),
			identifier_type: IdentifierType::ShortCode,
			remarks: "Balance".into(),
			queue_timeout_url: Url::parse("https://example.com/balance/timeout")
				.expect("URL should parse."),
			result_url: Url::parse("https://example.com/balance/result").expect("URL should parse."),
		};
		let credential = Secret::new("encrypted==");
		let context = PayloadContext::new(OffsetDateTime::UNIX_EPOCH)
			.with_security_credential(Some(&credential));
		let body = serde_json::to_value(query.payload(&context).expect("Payload should build."))
			.expect("Payload should serialize.");

		assert_eq!(
			body,
			serde_json::json!({
				"Initiator": "testapi",
				"SecurityCredential": "encrypted==",
				"CommandID": "AccountBalance",
				"PartyA": "600000",
				"IdentifierType": "4",
				"Remarks": "Balance",
				"QueueTimeOutURL": "https://example.com/balance/timeout",
				"ResultURL": "https://example.com/balance/result"
			})
		);
	}
}
