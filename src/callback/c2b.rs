//! C2B payment notifications and the validation reply.

// self
use crate::{_prelude::*, operation::wire};

/// Payment notification posted to the registered validation and confirmation URLs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct C2bTransaction {
	/// `Pay Bill` or `Buy Goods`.
	#[serde(default)]
	pub transaction_type: String,
	/// M-Pesa receipt number.
	#[serde(rename = "TransID")]
	pub trans_id: String,
	/// `YYYYMMDDHHmmss` in East Africa Time.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub trans_time: String,
	/// Amount as rendered by the provider, e.g. `"10.00"`.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub trans_amount: String,
	/// Receiving short code.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub business_short_code: String,
	/// Paybill account number entered by the customer.
	#[serde(default)]
	pub bill_ref_number: String,
	/// Invoice number, when any.
	#[serde(default)]
	pub invoice_number: String,
	/// Organization balance after the payment; empty on validation requests.
	#[serde(default, deserialize_with = "wire::opt_string_or_number")]
	pub org_account_balance: Option<String>,
	/// Caller's own transaction identifier, echoed from validation.
	#[serde(rename = "ThirdPartyTransID", default)]
	pub third_party_trans_id: String,
	/// Paying phone number (masked or hashed on newer API versions).
	#[serde(rename = "MSISDN", deserialize_with = "wire::string_or_number")]
	pub msisdn: String,
	/// Customer first name.
	#[serde(default)]
	pub first_name: String,
	/// Customer middle name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub middle_name: Option<String>,
	/// Customer last name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
}

/// Reasons a validation URL may reject a payment, with the provider's result codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum C2bRejection {
	/// `C2B00011`.
	InvalidMsisdn,
	/// `C2B00012`.
	InvalidAccountNumber,
	/// `C2B00013`.
	InvalidAmount,
	/// `C2B00014`.
	InvalidKycDetails,
	/// `C2B00015`.
	InvalidShortCode,
	/// `C2B00016`.
	Other,
}
impl C2bRejection {
	/// Result code sent to the provider.
	pub const fn code(self) -> &'static str {
		match self {
			Self::InvalidMsisdn => "C2B00011",
			Self::InvalidAccountNumber => "C2B00012",
			Self::InvalidAmount => "C2B00013",
			Self::InvalidKycDetails => "C2B00014",
			Self::InvalidShortCode => "C2B00015",
			Self::Other => "C2B00016",
		}
	}
}

/// Body the validation URL returns to accept or reject a payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct C2bValidationReply {
	/// `"0"` to accept, a `C2B000xx` code to reject.
	pub result_code: String,
	/// `Accepted` or `Rejected`.
	pub result_desc: String,
}
impl C2bValidationReply {
	/// Lets the payment through.
	pub fn accept() -> Self {
		Self { result_code: "0".into(), result_desc: "Accepted".into() }
	}

	/// Refuses the payment for `reason`.
	pub fn reject(reason: C2bRejection) -> Self {
		Self { result_code: reason.code().into(), result_desc: "Rejected".into() }
	}

	/// Returns `true` for an accepting reply.
	pub fn is_accepted(&self) -> bool {
		self.result_code == "0"
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::callback::decode;

	#[test]
	fn confirmation_decodes_mixed_number_fields() {
		let body = br#"{
			"TransactionType": "Pay Bill",
			"TransID": "RKTQDM7W6S",
			"TransTime": "20191122063845",
			"TransAmount": "10",
			"BusinessShortCode": 600638,
			"BillRefNumber": "invoice008",
			"InvoiceNumber": "",
			"OrgAccountBalance": "49197.00",
			"ThirdPartyTransID": "",
			"MSISDN": "25470****149",
			"FirstName": "John",
			"MiddleName": "",
			"LastName": "Doe"
		}"#;
		let transaction = decode::<C2bTransaction>(body).expect("Confirmation should decode.");

		assert_eq!(transaction.trans_id, "RKTQDM7W6S");
		assert_eq!(transaction.business_short_code, "600638");
		assert_eq!(transaction.org_account_balance.as_deref(), Some("49197.00"));
		assert_eq!(transaction.last_name.as_deref(), Some("Doe"));
	}

	#[test]
	fn validation_replies_use_provider_codes() {
		let accept = serde_json::to_value(C2bValidationReply::accept()).expect("Reply should serialize.");
		let reject = C2bValidationReply::reject(C2bRejection::InvalidAccountNumber);

		assert_eq!(accept, serde_json::json!({ "ResultCode": "0", "ResultDesc": "Accepted" }));
		assert_eq!(reject.result_code, "C2B00012");
		assert!(!reject.is_accepted());
	}
}
