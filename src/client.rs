//! `Mpesa` client facade tying the transport, credential cache, and operations together.
//!
//! Each typed operation runs the same pipeline: validate the caller's fields, build the wire payload
//! for the current instant, attach `Authorization: Bearer <token>` from the credential cache when the
//! endpoint requires it, send through the [`Transport`], and decode the 2xx body into the
//! operation's response type. Non-2xx replies surface as [`Error::Http`] with the full envelope.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, CachePolicy, ClientCredentials, CredentialCache},
	error::ConfigError,
	http::ApiHttpClient,
	obs::{CallKind, CallSpan},
	operation::{
		AcceptedResponse, AccountBalanceQuery, B2cPayment, C2bRegister, C2bResponse, C2bSimulate,
		Operation, PayloadContext, Reversal, StkPush, StkPushResponse, StkQuery, StkQueryResponse,
		TransactionStatusQuery,
	},
	provider::Environment,
	transport::{AUTHORIZATION, Headers, HttpMethod, Transport, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestMpesa = Mpesa<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Daraja API client bound to one app's credentials and one environment.
///
/// Cloning is cheap; clones share the HTTP client and the cached bearer token.
pub struct Mpesa<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	environment: Environment,
	transport: Transport<C, M>,
	credentials: Arc<CredentialCache>,
}
impl<C, M> Mpesa<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		credentials: ClientCredentials,
		environment: Environment,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let transport = Transport::new(environment.base_url()?, http_client, mapper);

		Ok(Self {
			environment,
			transport,
			credentials: Arc::new(CredentialCache::new(credentials, CachePolicy::default())),
		})
	}

	/// Replaces the token cache policy; any cached token is discarded.
	pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
		self.credentials =
			Arc::new(CredentialCache::new(self.credentials.credentials().clone(), policy));

		self
	}

	/// Adds a header sent with every request unless the call site overrides it.
	pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.transport = self.transport.with_default_header(name, value);

		self
	}

	/// Environment the client talks to.
	pub fn environment(&self) -> &Environment {
		&self.environment
	}

	/// Underlying transport, for calls the typed operations do not cover.
	pub fn transport(&self) -> &Transport<C, M> {
		&self.transport
	}

	/// Credential cache shared by every clone of this client.
	pub fn credential_cache(&self) -> &CredentialCache {
		&self.credentials
	}

	/// Returns a usable bearer token, fetching one when the cache cannot serve it.
	pub async fn get_token(&self) -> Result<AccessToken> {
		self.credentials.get_token(&self.transport).await
	}

	/// Runs `operation` stamped with the current time.
	pub async fn execute<O>(&self, operation: &O) -> Result<O::Response>
	where
		O: Operation,
	{
		self.execute_at(operation, OffsetDateTime::now_utc()).await
	}

	/// Runs `operation` with its request timestamp (and the password derived from it) taken from
	/// `issued_at`.
	pub async fn execute_at<O>(&self, operation: &O, issued_at: OffsetDateTime) -> Result<O::Response>
	where
		O: Operation,
	{
		let endpoint = O::KIND.endpoint();

		CallSpan::new(CallKind::Operation(O::KIND), endpoint.path)
			.observe(async move {
				operation.validate()?;

				let context = PayloadContext::new(issued_at).with_security_credential(
					self.credentials.credentials().security_credential.as_ref(),
				);
				let payload = operation.payload(&context)?;
				let body = match endpoint.method {
					HttpMethod::Get => None,
					HttpMethod::Post =>
						Some(serde_json::to_string(&payload).map_err(ConfigError::from)?),
				};
				let mut headers = Headers::new();

				if endpoint.requires_credential {
					let token = self.get_token().await?;

					headers.insert(AUTHORIZATION.into(), token.bearer());
				}

				self.transport
					.request(endpoint.path, endpoint.method, &headers, body)
					.await?
					.into_result()?
					.decode()
			})
			.await
	}

	/// Prompts the customer's handset to authorize a payment.
	pub async fn stk_push(&self, request: &StkPush) -> Result<StkPushResponse> {
		self.execute(request).await
	}

	/// Polls the state of an earlier checkout push.
	pub async fn stk_query(&self, request: &StkQuery) -> Result<StkQueryResponse> {
		self.execute(request).await
	}

	/// Sends a business-to-customer payout.
	pub async fn b2c_payment(&self, request: &B2cPayment) -> Result<AcceptedResponse> {
		self.execute(request).await
	}

	/// Queries the status of a completed transaction.
	pub async fn transaction_status(
		&self,
		request: &TransactionStatusQuery,
	) -> Result<AcceptedResponse> {
		self.execute(request).await
	}

	/// Reverses a completed transaction.
	pub async fn reversal(&self, request: &Reversal) -> Result<AcceptedResponse> {
		self.execute(request).await
	}

	/// Registers C2B confirmation and validation URLs.
	pub async fn c2b_register(&self, request: &C2bRegister) -> Result<C2bResponse> {
		self.execute(request).await
	}

	/// Simulates a customer payment (sandbox only).
	pub async fn c2b_simulate(&self, request: &C2bSimulate) -> Result<C2bResponse> {
		self.execute(request).await
	}

	/// Requests the organization's account balances.
	pub async fn account_balance(&self, request: &AccountBalanceQuery) -> Result<AcceptedResponse> {
		self.execute(request).await
	}
}
#[cfg(feature = "reqwest")]
impl Mpesa<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client that provisions its own reqwest transport.
	///
	/// The default reqwest client imposes no timeout; use [`Mpesa::with_http_client`] with
	/// [`ReqwestHttpClient::with_timeout`] to bound provider calls.
	pub fn new(credentials: ClientCredentials, environment: Environment) -> Result<Self> {
		Self::with_http_client(
			credentials,
			environment,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Clone for Mpesa<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			environment: self.environment.clone(),
			transport: self.transport.clone(),
			credentials: self.credentials.clone(),
		}
	}
}
impl<C, M> Debug for Mpesa<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Mpesa")
			.field("environment", &self.environment)
			.field("transport", &self.transport)
			.field("credentials", &self.credentials)
			.finish()
	}
}
