//! Queries an account balance against the live Daraja sandbox.
//!
//! Reads `MPESA_CONSUMER_KEY`, `MPESA_CONSUMER_SECRET`, `MPESA_SECURITY_CREDENTIAL`,
//! `MPESA_INITIATOR`, `MPESA_SHORT_CODE`, and `MPESA_RESULT_URL`; `MPESA_ENVIRONMENT` selects
//! `sandbox` (default), `production`, or a custom base URL. The balances themselves arrive later
//! at the result URL.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use url::Url;
// self
use mpesa_daraja::{
	auth::ClientCredentials,
	client::ReqwestMpesa,
	operation::{AccountBalanceQuery, IdentifierType},
	provider::Environment,
};

fn var(name: &str) -> Result<String> {
	env::var(name).wrap_err_with(|| format!("{name} must be set"))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let environment = env::var("MPESA_ENVIRONMENT")
		.ok()
		.map(|raw| raw.parse::<Environment>())
		.transpose()?
		.unwrap_or_default();
	let credentials = ClientCredentials::new(var("MPESA_CONSUMER_KEY")?, var("MPESA_CONSUMER_SECRET")?)
		.with_security_credential(var("MPESA_SECURITY_CREDENTIAL")?);
	let client = ReqwestMpesa::new(credentials, environment)?;
	let result_url = Url::parse(&var("MPESA_RESULT_URL")?)?;
	let query = AccountBalanceQuery {
		initiator: var("MPESA_INITIATOR")?,
		party_a: var("MPESA_SHORT_CODE")?,
		identifier_type: IdentifierType::ShortCode,
		remarks: "Balance check".into(),
		queue_timeout_url: result_url.clone(),
		result_url,
	};

	match client.account_balance(&query).await {
		Ok(accepted) => println!(
			"Balance query {} accepted: {}.",
			accepted.conversation_id, accepted.response_description
		),
		Err(err) => match err.envelope().and_then(|envelope| envelope.fault()) {
			Some(fault) => println!(
				"Provider refused the query ({}): {}.",
				fault.error_code.unwrap_or_default(),
				fault.error_message.unwrap_or_default()
			),
			None => return Err(err.into()),
		},
	}

	Ok(())
}
