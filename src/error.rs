//! Client-level error types shared across the transport, credential cache, and operations.

// self
use crate::{_prelude::*, operation::ValidationError, transport::ResponseEnvelope};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller-supplied fields violate provider constraints.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// No response reached the caller (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	NoResponse(#[from] TransportError),
	/// Token endpoint refused the client credentials or replied with an unusable body.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	/// Provider answered with a non-2xx status; the full response is preserved.
	#[error("Provider rejected `{}` with HTTP {}: {}.", .0.path, .0.status_code, .0.provider_message())]
	Http(Box<ResponseEnvelope>),
	/// Response body is not JSON or does not match the documented shape.
	#[error("Response body from `{path}` (HTTP {status}) could not be decoded.")]
	InvalidResponseBody {
		/// Request path that produced the body.
		path: String,
		/// HTTP status code of the response.
		status: u16,
		/// Structured decoding failure.
		#[source]
		source: JsonPathError,
	},
}
impl Error {
	/// Returns the rejected response envelope for [`Error::Http`].
	pub fn envelope(&self) -> Option<&ResponseEnvelope> {
		match self {
			Self::Http(envelope) => Some(envelope),
			_ => None,
		}
	}

	/// Returns the HTTP status code attached to the error, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Http(envelope) => Some(envelope.status_code),
			Self::InvalidResponseBody { status, .. } => Some(*status),
			Self::Authentication(err) => err.status(),
			_ => None,
		}
	}
}
impl From<ResponseEnvelope> for Error {
	fn from(envelope: ResponseEnvelope) -> Self {
		Self::Http(Box::new(envelope))
	}
}

/// Configuration and request-construction failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed (invalid header name or value, bad URI).
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL joined with the request path is not a valid URL.
	#[error("Request path `{path}` does not form a valid URL.")]
	InvalidPath {
		/// Offending request path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A GET request was given a body.
	#[error("GET request to `{path}` cannot carry a body.")]
	BodyOnGet {
		/// Offending request path.
		path: String,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	PayloadEncode(#[from] serde_json::Error),
	/// Operation needs a security credential but none was configured.
	#[error("Operation `{operation}` requires a security credential.")]
	MissingSecurityCredential {
		/// Operation label.
		operation: &'static str,
	},
	/// Request timestamp could not be formatted.
	#[error("Request timestamp could not be formatted.")]
	TimestampFormat(#[from] time::error::Format),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint replied with a non-2xx status.
	#[error("Token endpoint rejected the client credentials with HTTP {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Provider-supplied message, or the status text when none was sent.
		message: String,
	},
	/// Token endpoint replied with a body that is not a token response.
	#[error("Token endpoint returned a malformed body (HTTP {status}).")]
	MalformedResponse {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Token endpoint replied without an access token.
	#[error("Token endpoint response is missing access_token.")]
	MissingToken,
	/// Token endpoint returned an `expires_in` that is not a positive number of seconds.
	#[error("Token endpoint returned an invalid expires_in value `{value}`.")]
	InvalidExpiresIn {
		/// Raw value as received.
		value: String,
	},
}
impl AuthenticationError {
	/// Returns the HTTP status code, when the token endpoint responded.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures where no response reached the caller.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{path}`.")]
	Network {
		/// Request path.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the provider.
	#[error("Request to `{path}` timed out.")]
	Timeout {
		/// Request path.
		path: String,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling `{path}`: {message}.")]
	Other {
		/// Request path.
		path: String,
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		path: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { path: path.into(), source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(
		path: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Timeout { path: path.into(), source: Box::new(src) }
	}
}
