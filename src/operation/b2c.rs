//! Business-to-customer payouts.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	operation::{
		AcceptedResponse, Operation, OperationKind, PayloadContext, ValidationError, validate,
	},
};

const REMARKS_MAX: usize = 100;

/// Kind of business-to-customer payout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum B2cCommand {
	/// Salary disbursement.
	SalaryPayment,
	/// Ordinary business payment.
	#[default]
	BusinessPayment,
	/// Promotional payment.
	PromotionPayment,
}

/// Sends money from a B2C short code to a customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct B2cPayment {
	/// API operator user name.
	pub initiator_name: String,
	/// Payout kind.
	pub command: B2cCommand,
	/// Amount in whole shillings; at least 1.
	pub amount: u64,
	/// Paying B2C short code.
	pub party_a: String,
	/// Receiving phone number (`254XXXXXXXXX`).
	pub party_b: String,
	/// Free-text remarks; at most 100 characters.
	pub remarks: String,
	/// URL notified when the request times out in the provider queue.
	pub queue_timeout_url: Url,
	/// URL that receives the final result.
	pub result_url: Url,
	/// Optional occasion; at most 100 characters.
	pub occasion: Option<String>,
}
impl Operation for B2cPayment {
	type Payload = B2cPaymentPayload;
	type Response = AcceptedResponse;

	const KIND: OperationKind = OperationKind::B2cPayment;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("InitiatorName", &self.initiator_name, usize::MAX)?;
		validate::amount("Amount", self.amount)?;
		validate::text("PartyA", &self.party_a, usize::MAX)?;
		validate::msisdn("PartyB", &self.party_b)?;
		validate::text("Remarks", &self.remarks, REMARKS_MAX)?;
		validate::callback_url("QueueTimeOutURL", &self.queue_timeout_url)?;
		validate::callback_url("ResultURL", &self.result_url)?;
		validate::optional_text("Occasion", self.occasion.as_deref(), REMARKS_MAX)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		Ok(B2cPaymentPayload {
			initiator_name: self.initiator_name.clone(),
			security_credential: context.require_security_credential(Self::KIND)?,
			command_id: self.command,
			amount: self.amount,
			party_a: self.party_a.clone(),
			party_b: self.party_b.clone(),
			remarks: self.remarks.clone(),
			queue_timeout_url: self.queue_timeout_url.to_string(),
			result_url: self.result_url.to_string(),
			occasion: self.occasion.clone(),
		})
	}
}

/// Wire body of a B2C payout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct B2cPaymentPayload {
	/// Operator user name.
	pub initiator_name: String,
	/// Encrypted initiator password.
	pub security_credential: Secret,
	/// Payout kind.
	#[serde(rename = "CommandID")]
	pub command_id: B2cCommand,
	/// Amount in whole shillings.
	pub amount: u64,
	/// Paying short code.
	pub party_a: String,
	/// Receiving phone number.
	pub party_b: String,
	/// Remarks.
	pub remarks: String,
	/// Queue timeout URL.
	#[serde(rename = "QueueTimeOutURL")]
	pub queue_timeout_url: String,
	/// Result URL.
	#[serde(rename = "ResultURL")]
	pub result_url: String,
	/// Occasion, omitted when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub occasion: Option<String>,
}
