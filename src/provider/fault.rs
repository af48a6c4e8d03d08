//! Error body attached by Daraja to rejected requests.

// self
use crate::_prelude::*;

/// Provider error body, e.g. `{"requestId": "...", "errorCode": "400.002.02", "errorMessage": "..."}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFault {
	/// Provider-side request identifier.
	#[serde(default)]
	pub request_id: Option<String>,
	/// Dotted provider error code.
	#[serde(default)]
	pub error_code: Option<String>,
	/// Human-readable provider message.
	#[serde(default)]
	pub error_message: Option<String>,
}
impl ProviderFault {
	/// Extracts a fault from a parsed response body, if it carries any fault field.
	pub fn from_body(body: &serde_json::Value) -> Option<Self> {
		let fault = Self::deserialize(body).ok()?;

		if fault.request_id.is_none() && fault.error_code.is_none() && fault.error_message.is_none()
		{
			return None;
		}

		Some(fault)
	}
}
