//! Payloads Daraja posts back to caller-hosted URLs.
//!
//! The crate does not run a webhook server; these types let the caller's own HTTP handler decode
//! what arrives at `CallBackURL`, `ResultURL`, `QueueTimeOutURL`, and the C2B confirmation and
//! validation URLs, and build the reply the validation URL must return.

pub mod c2b;
pub mod result;
pub mod stk;

pub use c2b::*;
pub use result::*;
pub use stk::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Decoding failure with the path of the offending field.
pub type CallbackDecodeError = serde_path_to_error::Error<serde_json::Error>;

/// Decodes a raw callback body into one of the callback types.
pub fn decode<T>(body: &[u8]) -> Result<T, CallbackDecodeError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

/// Name/value pair shared by checkout metadata, result parameters, and reference data.
///
/// Checkout metadata names the key `Name`, result callbacks name it `Key`; both decode here and the
/// pair serializes back as `Name`/`Value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
	/// Item name.
	#[serde(rename = "Name", alias = "Key")]
	pub name: String,
	/// Item value; the provider omits it for some items (e.g. `Balance`).
	#[serde(rename = "Value", default)]
	pub value: Option<serde_json::Value>,
}

pub(crate) fn find<'a>(items: &'a [NamedValue], name: &str) -> Option<&'a serde_json::Value> {
	items.iter().find(|item| item.name == name).and_then(|item| item.value.as_ref())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decode_reports_the_failing_field() {
		let err = decode::<StkCallbackEnvelope>(br#"{"Body":{"stkCallback":{"ResultCode":0}}}"#)
			.expect_err("Missing identifiers should fail.");

		assert_eq!(err.path().to_string(), "Body.stkCallback");
	}
}
