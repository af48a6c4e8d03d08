//! Checkout push result delivered to `CallBackURL`.

// self
use crate::{
	_prelude::*,
	callback::{NamedValue, find},
	operation::wire,
};

/// Outer wrapper: `{"Body": {"stkCallback": {...}}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StkCallbackEnvelope {
	/// Callback body.
	#[serde(rename = "Body")]
	pub body: StkCallbackBody,
}
impl StkCallbackEnvelope {
	/// Unwraps the callback.
	pub fn into_callback(self) -> StkCallback {
		self.body.stk_callback
	}
}

/// Middle wrapper of a checkout callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StkCallbackBody {
	/// Callback content.
	#[serde(rename = "stkCallback")]
	pub stk_callback: StkCallback,
}

/// Final state of a checkout push.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
	/// Merchant-side request identifier.
	#[serde(rename = "MerchantRequestID")]
	pub merchant_request_id: String,
	/// Checkout identifier returned by the push.
	#[serde(rename = "CheckoutRequestID")]
	pub checkout_request_id: String,
	/// `"0"` once the customer paid.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub result_code: String,
	/// Human-readable outcome.
	#[serde(default)]
	pub result_desc: String,
	/// Payment details, present only on success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub callback_metadata: Option<CallbackMetadata>,
}
impl StkCallback {
	/// Returns `true` when the customer completed the payment.
	pub fn is_success(&self) -> bool {
		self.result_code == "0"
	}

	/// Looks up a metadata item by name, e.g. `MpesaReceiptNumber`.
	pub fn item(&self, name: &str) -> Option<&serde_json::Value> {
		self.callback_metadata.as_ref().and_then(|metadata| find(&metadata.item, name))
	}

	/// M-Pesa receipt number of the completed payment.
	pub fn receipt_number(&self) -> Option<&str> {
		self.item("MpesaReceiptNumber").and_then(|value| value.as_str())
	}

	/// Amount paid.
	pub fn amount(&self) -> Option<f64> {
		self.item("Amount").and_then(|value| value.as_f64())
	}
}

/// Item list attached to successful checkouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackMetadata {
	/// Metadata items.
	#[serde(rename = "Item", default)]
	pub item: Vec<NamedValue>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::callback::decode;

	#[test]
	fn successful_callback_exposes_metadata() {
		let body = br#"{
			"Body": {
				"stkCallback": {
					"MerchantRequestID": "29115-34620561-1",
					"CheckoutRequestID": "ws_CO_191220191020363925",
					"ResultCode": 0,
					"ResultDesc": "The service request is processed successfully.",
					"CallbackMetadata": {
						"Item": [
							{ "Name": "Amount", "Value": 1.00 },
							{ "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
							{ "Name": "Balance" },
							{ "Name": "TransactionDate", "Value": 20191219102115 },
							{ "Name": "PhoneNumber", "Value": 254708374149 }
						]
					}
				}
			}
		}"#;
		let callback =
			decode::<StkCallbackEnvelope>(body).expect("Callback should decode.").into_callback();

		assert!(callback.is_success());
		assert_eq!(callback.receipt_number(), Some("NLJ7RT61SV"));
		assert_eq!(callback.amount(), Some(1.0));
		assert_eq!(callback.item("PhoneNumber").and_then(|v| v.as_u64()), Some(254708374149));
		assert_eq!(callback.item("Balance"), None);
		assert_eq!(callback.item("Unknown"), None);
	}

	#[test]
	fn cancelled_callback_has_no_metadata() {
		let body = br#"{
			"Body": {
				"stkCallback": {
					"MerchantRequestID": "29115-34620561-1",
					"CheckoutRequestID": "ws_CO_191220191020363925",
					"ResultCode": 1032,
					"ResultDesc": "Request cancelled by user."
				}
			}
		}"#;
		let callback =
			decode::<StkCallbackEnvelope>(body).expect("Callback should decode.").into_callback();

		assert!(!callback.is_success());
		assert_eq!(callback.result_code, "1032");
		assert!(callback.receipt_number().is_none());
	}
}
