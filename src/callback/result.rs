//! Asynchronous results delivered to `ResultURL` and `QueueTimeOutURL`.
//!
//! B2C payouts, status queries, reversals, and balance queries all report through the same shape.

// self
use crate::{
	_prelude::*,
	callback::{NamedValue, find},
	operation::wire,
};

/// Outer wrapper: `{"Result": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionResultEnvelope {
	/// Result content.
	#[serde(rename = "Result")]
	pub result: TransactionResult,
}

/// Outcome of an asynchronous operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
	/// Provider result type, usually `0`.
	#[serde(default)]
	pub result_type: i64,
	/// `"0"` on success.
	#[serde(deserialize_with = "wire::string_or_number")]
	pub result_code: String,
	/// Human-readable outcome.
	#[serde(default)]
	pub result_desc: String,
	/// Identifier of the originating request.
	#[serde(rename = "OriginatorConversationID", default)]
	pub originator_conversation_id: String,
	/// Conversation identifier from the acknowledgement.
	#[serde(rename = "ConversationID", default)]
	pub conversation_id: String,
	/// M-Pesa receipt number.
	#[serde(rename = "TransactionID", default)]
	pub transaction_id: String,
	/// Operation-specific result values.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result_parameters: Option<ResultParameters>,
	/// Echoed reference data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reference_data: Option<ReferenceData>,
}
impl TransactionResult {
	/// Returns `true` when the operation succeeded.
	pub fn is_success(&self) -> bool {
		self.result_code == "0"
	}

	/// Looks up a result parameter by key, e.g. `AccountBalance` or `TransactionAmount`.
	pub fn parameter(&self, key: &str) -> Option<&serde_json::Value> {
		self.result_parameters.as_ref().and_then(|params| find(&params.result_parameter, key))
	}

	/// Looks up a reference item by key, e.g. `QueueTimeoutURL`.
	pub fn reference(&self, key: &str) -> Option<&serde_json::Value> {
		self.reference_data.as_ref().and_then(|data| find(&data.reference_item, key))
	}
}

/// Result parameter list; a single parameter may arrive as an object instead of an array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultParameters {
	/// Parameters.
	#[serde(rename = "ResultParameter", deserialize_with = "wire::one_or_many")]
	pub result_parameter: Vec<NamedValue>,
}

/// Reference data list; a single item may arrive as an object instead of an array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
	/// Reference items.
	#[serde(rename = "ReferenceItem", deserialize_with = "wire::one_or_many")]
	pub reference_item: Vec<NamedValue>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::callback::decode;

	#[test]
	fn b2c_result_exposes_parameters() {
		let body = br#"{
			"Result": {
				"ResultType": 0,
				"ResultCode": 0,
				"ResultDesc": "The service request is processed successfully.",
				"OriginatorConversationID": "10571-7910404-1",
				"ConversationID": "AG_20191219_00004e48cf7e3533f581",
				"TransactionID": "NLJ41HAY6Q",
				"ResultParameters": {
					"ResultParameter": [
						{ "Key": "TransactionAmount", "Value": 10 },
						{ "Key": "TransactionReceipt", "Value": "NLJ41HAY6Q" }
					]
				},
				"ReferenceData": {
					"ReferenceItem": { "Key": "QueueTimeoutURL", "Value": "https://internalsandbox.safaricom.co.ke/mpesa/b2cresults/v1/submit" }
				}
			}
		}"#;
		let result = decode::<TransactionResultEnvelope>(body).expect("Result should decode.").result;

		assert!(result.is_success());
		assert_eq!(result.parameter("TransactionAmount").and_then(|v| v.as_u64()), Some(10));
		assert_eq!(result.parameter("TransactionReceipt").and_then(|v| v.as_str()), Some("NLJ41HAY6Q"));
		assert!(result.reference("QueueTimeoutURL").is_some());
	}

	#[test]
	fn failed_result_without_parameters_decodes() {
		let body = br#"{
			"Result": {
				"ResultType": 0,
				"ResultCode": 2001,
				"ResultDesc": "The initiator information is invalid.",
				"OriginatorConversationID": "29112-34801843-1",
				"ConversationID": "AG_20191219_00006c6fddb15123addf",
				"TransactionID": "NLJ0000000",
				"ReferenceData": { "ReferenceItem": { "Key": "QueueTimeoutURL" } }
			}
		}"#;
		let result = decode::<TransactionResultEnvelope>(body).expect("Result should decode.").result;

		assert!(!result.is_success());
		assert_eq!(result.result_code, "2001");
		assert_eq!(result.parameter("AccountBalance"), None);
		assert_eq!(result.reference("QueueTimeoutURL"), None);
	}
}
