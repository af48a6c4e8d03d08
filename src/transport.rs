//! Generic request/response wrapper every Daraja call goes through.
//!
//! [`Transport`] appends a path to the configured base URL, layers headers (built-in POST headers,
//! then transport defaults, then call-site headers), dispatches through an [`ApiHttpClient`], and
//! parses whatever body comes back as JSON. [`Transport::request`] returns the envelope for any
//! status code; [`Transport::get`] and [`Transport::post`] resolve on 2xx and reject with
//! [`Error::Http`] carrying the same envelope otherwise.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::ApiHttpClient,
	provider::ProviderFault,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Header map with lowercase names; later layers override earlier ones.
pub type Headers = BTreeMap<String, String>;

#[cfg(feature = "reqwest")]
/// Transport specialized for the crate's default reqwest stack.
pub type ReqwestTransport = Transport<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// HTTP methods used by Daraja APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`, used by the token endpoint.
	Get,
	/// `POST`, used by every financial operation.
	Post,
}
impl HttpMethod {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}

	fn as_http(self) -> http::Method {
		match self {
			Self::Get => http::Method::GET,
			Self::Post => http::Method::POST,
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved outbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
	/// URL scheme of the base URL (`https` outside tests).
	pub protocol: String,
	/// Host of the base URL.
	pub hostname: String,
	/// Path as supplied by the caller.
	pub path: String,
	/// HTTP method.
	pub method: HttpMethod,
	/// Merged headers with lowercase names.
	pub headers: Headers,
	/// Pre-serialized JSON body, present only for POST.
	pub body: Option<String>,
	/// Base URL joined with `path`.
	pub url: Url,
}
impl RequestEnvelope {
	/// Converts the envelope into the `http` request handed to the transport.
	pub fn to_http(&self) -> Result<HttpRequest, ConfigError> {
		let mut builder = http::Request::builder().method(self.method.as_http()).uri(self.url.as_str());

		for (name, value) in &self.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		Ok(builder.body(self.body.clone().map(String::into_bytes).unwrap_or_default())?)
	}
}
impl Debug for RequestEnvelope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				let shown = if name == AUTHORIZATION { "<redacted>" } else { value.as_str() };

				(name.as_str(), shown)
			})
			.collect::<BTreeMap<_, _>>();

		f.debug_struct("RequestEnvelope")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(String::len))
			.finish()
	}
}

/// Response as received from the provider, whatever its status code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
	/// URL scheme of the request.
	pub protocol: String,
	/// Host of the request.
	pub hostname: String,
	/// Request path.
	pub path: String,
	/// Request method.
	pub method: HttpMethod,
	/// HTTP status code.
	pub status_code: u16,
	/// Canonical reason phrase for `status_code`.
	pub status_message: String,
	/// Response headers with lowercase names; repeated headers are joined with `, `.
	pub headers: Headers,
	/// Parsed JSON body.
	pub data: serde_json::Value,
}
impl ResponseEnvelope {
	/// Returns `true` for statuses in `[200, 300)`.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status_code)
	}

	/// Resolves with the envelope on 2xx, rejects with [`Error::Http`] otherwise.
	pub fn into_result(self) -> Result<Self> {
		if self.is_success() { Ok(self) } else { Err(self.into()) }
	}

	/// Returns the provider error body, if the response carries one.
	pub fn fault(&self) -> Option<ProviderFault> {
		ProviderFault::from_body(&self.data)
	}

	/// Best human-readable explanation of the response.
	///
	/// Prefers the provider's `errorMessage`, then `ResponseDescription`, then the status text.
	pub fn provider_message(&self) -> String {
		let message = self
			.fault()
			.and_then(|fault| fault.error_message)
			.or_else(|| {
				self.data.get("ResponseDescription").and_then(|value| value.as_str()).map(Into::into)
			})
			.unwrap_or_else(|| self.status_message.clone());

		message.trim_end_matches('.').to_owned()
	}

	/// Decodes the parsed body into a typed response.
	pub fn decode<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(&self.data).map_err(|source| Error::InvalidResponseBody {
			path: self.path.clone(),
			status: self.status_code,
			source,
		})
	}

	fn from_http(request: &RequestEnvelope, response: HttpResponse) -> Result<Self> {
		let status = response.status();
		let mut headers = Headers::new();

		for (name, value) in response.headers() {
			let value = String::from_utf8_lossy(value.as_bytes());

			headers
				.entry(name.as_str().to_owned())
				.and_modify(|joined: &mut String| {
					joined.push_str(", ");
					joined.push_str(&value);
				})
				.or_insert_with(|| value.into_owned());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let data = serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			Error::InvalidResponseBody {
				path: request.path.clone(),
				status: status.as_u16(),
				source,
			}
		})?;

		Ok(Self {
			protocol: request.protocol.clone(),
			hostname: request.hostname.clone(),
			path: request.path.clone(),
			method: request.method,
			status_code: status.as_u16(),
			status_message: status.canonical_reason().unwrap_or_default().to_owned(),
			headers,
			data,
		})
	}
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while sending `request` into a client error.
	fn map_transport_error(&self, request: &RequestEnvelope, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		request: &RequestEnvelope,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(&request.path, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Other { path: request.path.clone(), message }.into(),
			_ => TransportError::Other {
				path: request.path.clone(),
				message: "unrecognized transport failure".into(),
			}
			.into(),
		}
	}
}

/// Minimal HTTP client bound to one base URL and a set of default headers.
pub struct Transport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	base_url: Url,
	default_headers: Headers,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
}
impl<C, M> Transport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a transport that sends every request through `http_client`.
	pub fn new(base_url: Url, http_client: impl Into<Arc<C>>, mapper: impl Into<Arc<M>>) -> Self {
		Self {
			base_url,
			default_headers: Headers::new(),
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	/// Adds a header sent with every request unless the call site overrides it.
	pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.default_headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Base URL paths are appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Headers applied to every request.
	pub fn default_headers(&self) -> &Headers {
		&self.default_headers
	}

	/// Resolves a request without sending it.
	pub fn envelope(
		&self,
		path: &str,
		method: HttpMethod,
		headers: &Headers,
		body: Option<String>,
	) -> Result<RequestEnvelope, ConfigError> {
		if method == HttpMethod::Get && body.is_some() {
			return Err(ConfigError::BodyOnGet { path: path.to_owned() });
		}

		let url = join_path(&self.base_url, path)?;
		let mut merged = Headers::new();

		if let Some(body) = &body {
			merged.insert(CONTENT_TYPE.into(), "application/json".into());
			merged.insert(CONTENT_LENGTH.into(), body.len().to_string());
		}

		merge_headers(&mut merged, &self.default_headers);
		merge_headers(&mut merged, headers);

		Ok(RequestEnvelope {
			protocol: url.scheme().to_owned(),
			hostname: url.host_str().unwrap_or_default().to_owned(),
			path: path.to_owned(),
			method,
			headers: merged,
			body,
			url,
		})
	}

	/// Sends one request and returns the envelope regardless of status code.
	pub async fn request(
		&self,
		path: &str,
		method: HttpMethod,
		headers: &Headers,
		body: Option<String>,
	) -> Result<ResponseEnvelope> {
		let request = self.envelope(path, method, headers, body)?;

		self.execute(&request).await
	}

	/// Sends a resolved request and returns the envelope regardless of status code.
	pub async fn execute(&self, request: &RequestEnvelope) -> Result<ResponseEnvelope> {
		let http_request = request.to_http()?;
		let handle = self.http_client.handle();
		let response = handle
			.call(http_request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(request, err))?;

		ResponseEnvelope::from_http(request, response)
	}

	/// Issues a GET; resolves on 2xx and rejects with [`Error::Http`] otherwise.
	pub async fn get(&self, path: &str, headers: &Headers) -> Result<ResponseEnvelope> {
		self.request(path, HttpMethod::Get, headers, None).await?.into_result()
	}

	/// Serializes `payload` and issues a POST; resolves on 2xx and rejects with [`Error::Http`]
	/// otherwise.
	pub async fn post<P>(&self, path: &str, payload: &P, headers: &Headers) -> Result<ResponseEnvelope>
	where
		P: ?Sized + Serialize,
	{
		let body = serde_json::to_string(payload).map_err(ConfigError::from)?;

		self.request(path, HttpMethod::Post, headers, Some(body)).await?.into_result()
	}
}
impl<C, M> Clone for Transport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			base_url: self.base_url.clone(),
			default_headers: self.default_headers.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
		}
	}
}
impl<C, M> Debug for Transport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Transport")
			.field("base_url", &self.base_url.as_str())
			.field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
			.finish()
	}
}

pub(crate) const AUTHORIZATION: &str = "authorization";
const CONTENT_LENGTH: &str = "content-length";
const CONTENT_TYPE: &str = "content-type";

/// Overlays `layer` onto `merged`, comparing names case-insensitively.
pub(crate) fn merge_headers(merged: &mut Headers, layer: &Headers) {
	for (name, value) in layer {
		merged.insert(name.to_ascii_lowercase(), value.clone());
	}
}

fn join_path(base: &Url, path: &str) -> Result<Url, ConfigError> {
	let base_str = base.as_str().trim_end_matches('/');
	let raw = if path.is_empty() || path.starts_with('/') {
		format!("{base_str}{path}")
	} else {
		format!("{base_str}/{path}")
	};

	Url::parse(&raw).map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(path: &str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(path, err).into();
	}

	TransportError::network(path, err).into()
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	fn transport() -> ReqwestTransport {
		let base = Url::parse("https://sandbox.safaricom.co.ke/").expect("Base URL should parse.");

		Transport::new(base, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
			.with_default_header("X-Client", "mpesa-daraja")
			.with_default_header("Content-Type", "application/json; charset=utf-8")
	}

	#[test]
	fn call_site_headers_override_defaults() {
		let mut headers = Headers::new();

		headers.insert("X-CLIENT".into(), "override".into());

		let request = transport()
			.envelope("/mpesa/c2b/v1/simulate", HttpMethod::Post, &headers, Some("{}".into()))
			.expect("Envelope should resolve.");

		assert_eq!(request.headers.get("x-client").map(String::as_str), Some("override"));
		assert_eq!(
			request.headers.get("content-type").map(String::as_str),
			Some("application/json; charset=utf-8")
		);
		assert_eq!(request.headers.get("content-length").map(String::as_str), Some("2"));
		assert_eq!(request.url.as_str(), "https://sandbox.safaricom.co.ke/mpesa/c2b/v1/simulate");
		assert_eq!(request.protocol, "https");
		assert_eq!(request.hostname, "sandbox.safaricom.co.ke");
	}

	#[test]
	fn get_requests_carry_no_body_headers() {
		let request = transport()
			.envelope(
				"/oauth/v1/generate?grant_type=client_credentials",
				HttpMethod::Get,
				&Headers::new(),
				None,
			)
			.expect("Envelope should resolve.");

		assert!(!request.headers.contains_key("content-length"));
		assert_eq!(request.url.query(), Some("grant_type=client_credentials"));

		let err = transport()
			.envelope("/oauth/v1/generate", HttpMethod::Get, &Headers::new(), Some("{}".into()))
			.expect_err("GET with a body should be rejected.");

		assert!(matches!(err, ConfigError::BodyOnGet { .. }));
	}

	#[test]
	fn debug_redacts_authorization() {
		let mut headers = Headers::new();

		headers.insert("Authorization".into(), "Bearer secret-token".into());

		let request = transport()
			.envelope("/mpesa/stkpush/v1/processrequest", HttpMethod::Post, &headers, None)
			.expect("Envelope should resolve.");
		let rendered = format!("{request:?}");

		assert!(!rendered.contains("secret-token"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn envelope_classification_and_decoding() {
		let envelope = ResponseEnvelope {
			protocol: "https".into(),
			hostname: "sandbox.safaricom.co.ke".into(),
			path: "/mpesa/c2b/v1/registerurl".into(),
			method: HttpMethod::Post,
			status_code: 400,
			status_message: "Bad Request".into(),
			headers: Headers::new(),
			data: serde_json::json!({ "ResponseDescription": "Invalid ShortCode." }),
		};

		assert!(!envelope.is_success());
		assert_eq!(envelope.provider_message(), "Invalid ShortCode");

		let err = envelope.clone().into_result().expect_err("4xx should reject.");

		assert_eq!(err.envelope(), Some(&envelope));

		#[derive(Debug, Deserialize)]
		struct Shape {
			#[serde(rename = "ResponseCode")]
			_response_code: String,
		}

		let err = envelope.decode::<Shape>().expect_err("Missing fields should fail to decode.");

		assert!(matches!(err, Error::InvalidResponseBody { status: 400, .. }));
	}

	#[test]
	fn repeated_response_headers_are_joined() {
		let request = transport()
			.envelope("/mpesa/b2c/v1/paymentrequest", HttpMethod::Post, &Headers::new(), None)
			.expect("Envelope should build.");
		let response = http::Response::builder()
			.status(400)
			.header("Set-Cookie", "a=1")
			.header("set-cookie", "b=2")
			.header("Content-Type", "application/json")
			.body(br#"{"errorCode":"400.002.02"}"#.to_vec())
			.expect("Response should build.");
		let envelope =
			ResponseEnvelope::from_http(&request, response).expect("JSON body should parse.");

		assert_eq!(envelope.headers.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
		assert_eq!(
			envelope.headers.get("content-type").map(String::as_str),
			Some("application/json")
		);
		assert_eq!(envelope.status_code, 400);
		assert_eq!(envelope.status_message, "Bad Request");
	}
}
