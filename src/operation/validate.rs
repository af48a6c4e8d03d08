//! Caller-field checks applied before any network call.

// self
use crate::_prelude::*;

/// Caller-supplied field that breaks a provider constraint.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required text field is empty or whitespace.
	#[error("Field `{field}` must not be empty.")]
	Empty {
		/// Provider field name.
		field: &'static str,
	},
	/// A text field exceeds the provider's length limit.
	#[error("Field `{field}` exceeds {max} characters.")]
	TooLong {
		/// Provider field name.
		field: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// A phone number is not a 12-digit `254`-prefixed MSISDN.
	#[error("Field `{field}` must be a 254XXXXXXXXX phone number, got `{value}`.")]
	InvalidPhoneNumber {
		/// Provider field name.
		field: &'static str,
		/// Offending value.
		value: String,
	},
	/// An amount is below the provider's minimum of 1.
	#[error("Field `{field}` must be at least 1.")]
	NonPositiveAmount {
		/// Provider field name.
		field: &'static str,
	},
	/// A callback URL does not use `http` or `https`.
	#[error("Field `{field}` must be an http(s) URL, got `{value}`.")]
	InvalidCallbackUrl {
		/// Provider field name.
		field: &'static str,
		/// Offending value.
		value: String,
	},
}

const MSISDN_LEN: usize = 12;
const MSISDN_PREFIX: &str = "254";

pub(crate) fn text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::Empty { field });
	}
	if value.chars().count() > max {
		return Err(ValidationError::TooLong { field, max });
	}

	Ok(())
}

pub(crate) fn optional_text(
	field: &'static str,
	value: Option<&str>,
	max: usize,
) -> Result<(), ValidationError> {
	match value {
		Some(value) if value.chars().count() > max => Err(ValidationError::TooLong { field, max }),
		_ => Ok(()),
	}
}

pub(crate) fn msisdn(field: &'static str, value: &str) -> Result<(), ValidationError> {
	let valid = value.len() == MSISDN_LEN
		&& value.starts_with(MSISDN_PREFIX)
		&& value.bytes().all(|byte| byte.is_ascii_digit());

	if valid {
		Ok(())
	} else {
		Err(ValidationError::InvalidPhoneNumber { field, value: value.to_owned() })
	}
}

pub(crate) fn amount(field: &'static str, value: u64) -> Result<(), ValidationError> {
	if value == 0 { Err(ValidationError::NonPositiveAmount { field }) } else { Ok(()) }
}

pub(crate) fn callback_url(field: &'static str, url: &Url) -> Result<(), ValidationError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ValidationError::InvalidCallbackUrl { field, value: url.to_string() }),
	}
}
