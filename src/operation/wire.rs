//! Serde helpers for provider fields that arrive as either JSON strings or numbers.

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
	Text(String),
	Number(serde_json::Number),
}
impl From<StringOrNumber> for String {
	fn from(value: StringOrNumber) -> Self {
		match value {
			StringOrNumber::Text(text) => text,
			StringOrNumber::Number(number) => number.to_string(),
		}
	}
}

/// Deserializes `"0"` and `0` alike into `"0"`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	StringOrNumber::deserialize(deserializer).map(Into::into)
}

/// Optional variant of [`string_or_number`]; `null` maps to `None`.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(Into::into))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
	Many(Vec<T>),
	One(T),
}

/// Accepts a single object or an array of them; the provider collapses one-element arrays.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(match OneOrMany::deserialize(deserializer)? {
		OneOrMany::Many(items) => items,
		OneOrMany::One(item) => vec![item],
	})
}
