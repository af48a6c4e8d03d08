//! Demonstrates the push-then-poll checkout pattern against a mock Daraja server: the
//! `CheckoutRequestID` echoed by the push is handed verbatim to the query.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use mpesa_daraja::{
	auth::ClientCredentials,
	client::ReqwestMpesa,
	http::ReqwestHttpClient,
	operation::{StkPush, StkQuery},
	provider::Environment,
	reqwest::Client,
	transport::ReqwestTransportErrorMapper,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/v1/generate");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "demo-token", "expires_in": "3599" }));
		})
		.await;
	let push_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/mpesa/stkpush/v1/processrequest");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"MerchantRequestID": "29115-34620561-1",
				"CheckoutRequestID": "ws_CO_191220191020363925",
				"ResponseCode": "0",
				"ResponseDescription": "Success. Request accepted for processing",
				"CustomerMessage": "Success. Request accepted for processing"
			}));
		})
		.await;
	let query_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/mpesa/stkpushquery/v1/query");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"ResponseCode": "0",
				"ResponseDescription": "The service request has been accepted successsfully",
				"MerchantRequestID": "29115-34620561-1",
				"CheckoutRequestID": "ws_CO_191220191020363925",
				"ResultCode": "1032",
				"ResultDesc": "Request cancelled by user"
			}));
		})
		.await;
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let client = ReqwestMpesa::with_http_client(
		ClientCredentials::new("demo-consumer-key", "demo-consumer-secret"),
		Environment::Custom(Url::parse(&server.base_url())?),
		http_client,
		ReqwestTransportErrorMapper,
	)?;
	let push = StkPush::paybill(
		174379,
		"bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919",
		1,
		"254708374149",
		Url::parse("https://example.com/mpesa/callback")?,
		"Invoice-42",
		"Lunch",
	);
	let pushed = client.stk_push(&push).await?;

	println!("Checkout {} sent: {}.", pushed.checkout_request_id, pushed.customer_message);

	let status = client.stk_query(&StkQuery::for_push(&push, &pushed)).await?;

	println!("Checkout result {}: {}.", status.result_code, status.result_desc);

	token_mock.assert_async().await;
	push_mock.assert_async().await;
	query_mock.assert_async().await;

	Ok(())
}
