// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use mpesa_daraja::{
	_preludet::*,
	error::TransportError,
	transport::{Headers, HttpMethod, Transport},
};

#[tokio::test]
async fn post_layers_headers_and_resolves_on_success() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/mpesa/c2b/v1/simulate")
				.header("content-type", "application/json")
				.header("content-length", "13")
				.header("x-source", "call-site")
				.header("x-tenant", "default")
				.json_body(json!({ "Amount": 10 }));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "ResponseCode": "0", "ResponseDescription": "Accepted" }));
		})
		.await;
	let transport = build_reqwest_test_transport(&server.base_url())
		.with_default_header("X-Source", "default")
		.with_default_header("X-Tenant", "default");
	let mut headers = Headers::new();

	headers.insert("X-SOURCE".into(), "call-site".into());

	let envelope = transport
		.post("/mpesa/c2b/v1/simulate", &json!({ "Amount": 10 }), &headers)
		.await
		.expect("2xx response should resolve.");

	mock.assert_async().await;

	assert_eq!(envelope.status_code, 200);
	assert_eq!(envelope.status_message, "OK");
	assert_eq!(envelope.protocol, "http");
	assert_eq!(envelope.hostname, "127.0.0.1");
	assert_eq!(envelope.path, "/mpesa/c2b/v1/simulate");
	assert_eq!(envelope.method, HttpMethod::Post);
	assert_eq!(envelope.data["ResponseCode"], "0");
	assert_eq!(
		envelope.headers.get("content-type").map(String::as_str),
		Some("application/json")
	);
}

#[tokio::test]
async fn non_success_rejects_with_the_full_envelope() {
	let server = MockServer::start_async().await;
	let body = json!({
		"requestId": "11728-2929992-1",
		"errorCode": "404.001.03",
		"errorMessage": "Invalid Access Token"
	});
	let response_body = body.clone();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/mpesa/b2c/v1/paymentrequest");
			then.status(404).header("content-type", "application/json").json_body(response_body);
		})
		.await;
	let transport = build_reqwest_test_transport(&server.base_url());
	let err = transport
		.post("/mpesa/b2c/v1/paymentrequest", &json!({}), &Headers::new())
		.await
		.expect_err("404 should reject.");
	let envelope = err.envelope().expect("HTTP rejection should carry the envelope.");

	assert_eq!(err.status(), Some(404));
	assert_eq!(envelope.status_message, "Not Found");
	assert_eq!(envelope.data, body);

	let fault = envelope.fault().expect("Provider error body should be recognized.");

	assert_eq!(fault.error_code.as_deref(), Some("404.001.03"));
	assert_eq!(fault.request_id.as_deref(), Some("11728-2929992-1"));

	let raw = transport
		.request("/mpesa/b2c/v1/paymentrequest", HttpMethod::Post, &Headers::new(), Some("{}".into()))
		.await
		.expect("Raw request should resolve regardless of status.");

	assert_eq!(raw.status_code, envelope.status_code);
	assert_eq!(raw.data, envelope.data);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn non_json_body_is_an_invalid_response_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/v1/generate");
			then.status(200).body("<html>maintenance</html>");
		})
		.await;
	let transport = build_reqwest_test_transport(&server.base_url());
	let err = transport
		.get("/oauth/v1/generate", &Headers::new())
		.await
		.expect_err("HTML body should fail to parse.");

	mock.assert_async().await;

	match err {
		Error::InvalidResponseBody { path, status, .. } => {
			assert_eq!(path, "/oauth/v1/generate");
			assert_eq!(status, 200);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn unreachable_host_is_no_response() {
	let port = std::net::TcpListener::bind("127.0.0.1:0")
		.and_then(|listener| listener.local_addr())
		.expect("Ephemeral port should be available.")
		.port();
	// The listener is dropped above, so the connection is refused before any response.
	let transport = Transport::new(
		Url::parse(&format!("http://127.0.0.1:{port}")).expect("URL should parse."),
		test_reqwest_http_client(),
		mpesa_daraja::transport::ReqwestTransportErrorMapper,
	);
	let err = transport
		.get("/oauth/v1/generate", &Headers::new())
		.await
		.expect_err("Refused connection should fail.");

	assert!(matches!(err, Error::NoResponse(TransportError::Network { .. })));
	assert_eq!(err.status(), None);
}
