//! Demonstrates plugging a custom `ApiHttpClient` into the client: a reqwest wrapper that bounds
//! every provider call with a timeout and counts outbound requests.

// std
use std::{
	future::Future,
	pin::Pin,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use mpesa_daraja::{
	auth::ClientCredentials,
	client::Mpesa,
	http::{
		ApiHttpClient, ReqwestHttpClient,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	operation::{C2bRegister, ResponseType},
	provider::Environment,
	reqwest::Error as ReqwestError,
	transport::ReqwestTransportErrorMapper,
};

#[derive(Clone)]
struct CountingHttpClient {
	inner: ReqwestHttpClient,
	sent: Arc<AtomicUsize>,
}
impl ApiHttpClient for CountingHttpClient {
	type Handle = CountingHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		CountingHandle { inner: self.inner.clone(), sent: self.sent.clone() }
	}
}

struct CountingHandle {
	inner: ReqwestHttpClient,
	sent: Arc<AtomicUsize>,
}
impl<'c> AsyncHttpClient<'c> for CountingHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		self.sent.fetch_add(1, Ordering::Relaxed);

		let handle = self.inner.handle();

		Box::pin(async move { handle.call(request).await })
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/v1/generate");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "demo-token", "expires_in": 3599 }));
		})
		.await;
	let register_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/mpesa/c2b/v1/registerurl")
				.header("authorization", "Bearer demo-token")
				.header("x-request-source", "custom-transport-demo");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"OriginatorCoversationID": "6e86-45dd-91ac-fd5d4178ab523408729",
				"ResponseCode": "0",
				"ResponseDescription": "Success"
			}));
		})
		.await;
	let sent = Arc::new(AtomicUsize::new(0));
	let http_client = CountingHttpClient {
		inner: ReqwestHttpClient::with_timeout(Duration::from_secs(10))?,
		sent: sent.clone(),
	};
	let client = <Mpesa<CountingHttpClient, ReqwestTransportErrorMapper>>::with_http_client(
		ClientCredentials::new("demo-consumer-key", "demo-consumer-secret"),
		Environment::Custom(Url::parse(&server.base_url())?),
		http_client,
		ReqwestTransportErrorMapper,
	)?
	.with_default_header("X-Request-Source", "custom-transport-demo");
	let response = client
		.c2b_register(&C2bRegister {
			short_code: 600984,
			response_type: ResponseType::Completed,
			confirmation_url: Url::parse("https://example.com/c2b/confirm")?,
			validation_url: Url::parse("https://example.com/c2b/validate")?,
		})
		.await?;

	println!(
		"Registered URLs ({}); {} requests sent.",
		response.response_description,
		sent.load(Ordering::Relaxed)
	);

	token_mock.assert_async().await;
	register_mock.assert_async().await;

	Ok(())
}
