//! Lipa Na M-Pesa Online: checkout push and checkout query.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	operation::{
		CustomerPaymentType, Operation, OperationKind, PayloadContext, ValidationError,
		lipa_na_mpesa_password, validate, wire,
	},
};

const ACCOUNT_REFERENCE_MAX: usize = 12;
const TRANSACTION_DESC_MAX: usize = 13;

/// Prompts a customer's handset to authorize a payment to a Paybill or till.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StkPush {
	/// Organization short code receiving the payment.
	pub business_short_code: u32,
	/// Lipa Na M-Pesa Online pass key issued for the short code.
	pub pass_key: Secret,
	/// Paybill or Buy Goods payment.
	pub transaction_type: CustomerPaymentType,
	/// Amount in whole shillings; at least 1.
	pub amount: u64,
	/// Phone number sending the money (`254XXXXXXXXX`).
	pub party_a: String,
	/// Short code or till number receiving the money.
	pub party_b: String,
	/// Phone number the prompt is sent to (`254XXXXXXXXX`).
	pub phone_number: String,
	/// URL that receives the asynchronous checkout result.
	pub callback_url: Url,
	/// Account reference shown to the customer; at most 12 characters.
	pub account_reference: String,
	/// Short description; at most 13 characters.
	pub transaction_desc: String,
}
impl StkPush {
	/// Paybill push where the paying and prompted phone numbers coincide and the short code
	/// receives the money.
	pub fn paybill(
		business_short_code: u32,
		pass_key: impl Into<Secret>,
		amount: u64,
		phone_number: impl Into<String>,
		callback_url: Url,
		account_reference: impl Into<String>,
		transaction_desc: impl Into<String>,
	) -> Self {
		let phone_number = phone_number.into();

		Self {
			business_short_code,
			pass_key: pass_key.into(),
			transaction_type: CustomerPaymentType::CustomerPayBillOnline,
			amount,
			party_a: phone_number.clone(),
			party_b: business_short_code.to_string(),
			phone_number,
			callback_url,
			account_reference: account_reference.into(),
			transaction_desc: transaction_desc.into(),
		}
	}
}
impl Operation for StkPush {
	type Payload = StkPushPayload;
	type Response = StkPushResponse;

	const KIND: OperationKind = OperationKind::StkPush;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("PassKey", self.pass_key.expose(), usize::MAX)?;
		validate::amount("Amount", self.amount)?;
		validate::msisdn("PartyA", &self.party_a)?;
		validate::text("PartyB", &self.party_b, usize::MAX)?;
		validate::msisdn("PhoneNumber", &self.phone_number)?;
		validate::callback_url("CallBackURL", &self.callback_url)?;
		validate::text("AccountReference", &self.account_reference, ACCOUNT_REFERENCE_MAX)?;
		validate::text("TransactionDesc", &self.transaction_desc, TRANSACTION_DESC_MAX)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		let timestamp = context.timestamp()?;

		Ok(StkPushPayload {
			business_short_code: self.business_short_code,
			password: lipa_na_mpesa_password(self.business_short_code, &self.pass_key, &timestamp),
			timestamp,
			transaction_type: self.transaction_type,
			amount: self.amount,
			party_a: self.party_a.clone(),
			party_b: self.party_b.clone(),
			phone_number: self.phone_number.clone(),
			callback_url: self.callback_url.to_string(),
			account_reference: self.account_reference.clone(),
			transaction_desc: self.transaction_desc.clone(),
		})
	}
}

/// Wire body of a checkout push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushPayload {
	/// Receiving short code.
	pub business_short_code: u32,
	/// Lipa Na M-Pesa Online password.
	pub password: Secret,
	/// `YYYYMMDDHHmmss` in East Africa Time.
	pub timestamp: String,
	/// Paybill or Buy Goods payment.
	pub transaction_type: CustomerPaymentType,
	/// Amount in whole shillings.
	pub amount: u64,
	/// Paying phone number.
	pub party_a: String,
	/// Receiving short code or till.
	pub party_b: String,
	/// Prompted phone number.
	pub phone_number: String,
	/// Result callback URL.
	#[serde(rename = "CallBackURL")]
	pub callback_url: String,
	/// Account reference.
	pub account_reference: String,
	/// Description.
	pub transaction_desc: String,
}

/// Synchronous acknowledgement of a checkout push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushResponse {
	/// Merchant-side request identifier.
	#[serde(rename = "MerchantRequestID")]
	pub merchant_request_id: String,
	/// Checkout identifier used by [`StkQuery`] and the result callback.
	#[serde(rename = "CheckoutRequestID")]
	pub checkout_request_id: String,
	/// `"0"` when the prompt was sent.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub response_code: String,
	/// Human-readable acknowledgement.
	#[serde(default)]
	pub response_description: String,
	/// Message suitable for display to the customer.
	#[serde(default)]
	pub customer_message: String,
}
impl StkPushResponse {
	/// Returns `true` when the provider sent the prompt.
	pub fn is_accepted(&self) -> bool {
		self.response_code == "0"
	}
}

/// Polls the state of an earlier checkout push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StkQuery {
	/// Short code the push was issued for.
	pub business_short_code: u32,
	/// Lipa Na M-Pesa Online pass key.
	pub pass_key: Secret,
	/// `CheckoutRequestID` returned by the push.
	pub checkout_request_id: String,
}
impl StkQuery {
	/// Builds the query matching a push and its acknowledgement.
	pub fn for_push(push: &StkPush, response: &StkPushResponse) -> Self {
		Self {
			business_short_code: push.business_short_code,
			pass_key: push.pass_key.clone(),
			checkout_request_id: response.checkout_request_id.clone(),
		}
	}
}
impl Operation for StkQuery {
	type Payload = StkQueryPayload;
	type Response = StkQueryResponse;

	const KIND: OperationKind = OperationKind::StkQuery;

	fn validate(&self) -> Result<(), ValidationError> {
		validate::text("PassKey", self.pass_key.expose(), usize::MAX)?;
		validate::text("CheckoutRequestID", &self.checkout_request_id, usize::MAX)
	}

	fn payload(&self, context: &PayloadContext<'_>) -> Result<Self::Payload> {
		let timestamp = context.timestamp()?;

		Ok(StkQueryPayload {
			business_short_code: self.business_short_code,
			password: lipa_na_mpesa_password(self.business_short_code, &self.pass_key, &timestamp),
			timestamp,
			checkout_request_id: self.checkout_request_id.clone(),
		})
	}
}

/// Wire body of a checkout query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkQueryPayload {
	/// Short code the push was issued for.
	pub business_short_code: u32,
	/// Lipa Na M-Pesa Online password.
	pub password: Secret,
	/// `YYYYMMDDHHmmss` in East Africa Time.
	pub timestamp: String,
	/// Checkout identifier.
	#[serde(rename = "CheckoutRequestID")]
	pub checkout_request_id: String,
}

/// Current state of a checkout push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkQueryResponse {
	/// `"0"` when the query itself succeeded.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub response_code: String,
	/// Human-readable query status.
	#[serde(default)]
	pub response_description: String,
	/// Merchant-side request identifier.
	#[serde(rename = "MerchantRequestID", default)]
	pub merchant_request_id: String,
	/// Checkout identifier.
	#[serde(rename = "CheckoutRequestID", default)]
	pub checkout_request_id: String,
	/// Transaction outcome; `"0"` once the customer paid, `"1032"` when they cancelled.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub result_code: String,
	/// Human-readable transaction outcome.
	#[serde(default)]
	pub result_desc: String,
}
impl StkQueryResponse {
	/// Returns `true` when the customer completed the payment.
	pub fn is_paid(&self) -> bool {
		self.result_code == "0"
	}
}
