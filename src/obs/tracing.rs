//! Span bookkeeping for one Daraja round trip.
//!
//! A [`CallSpan`] names the call and the endpoint path up front. Once the wrapped future settles it
//! stamps `outcome` on the span, adds the provider `status` when an HTTP rejection came back, and
//! bumps the matching call counter.

// self
use crate::{
	_prelude::*,
	obs::{self, CallKind, CallOutcome},
};

/// Span covering a token fetch or an operation against a single Daraja path.
#[derive(Clone, Debug)]
pub struct CallSpan {
	kind: CallKind,
	path: &'static str,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `kind` hitting `path`; `outcome` and `status` start empty.
	pub fn new(kind: CallKind, path: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		let span = tracing::info_span!(
			"mpesa_daraja.call",
			call = kind.as_str(),
			path,
			outcome = tracing::field::Empty,
			status = tracing::field::Empty,
		);

		Self {
			kind,
			path,
			#[cfg(feature = "tracing")]
			span,
		}
	}

	/// Call label carried by the span.
	pub fn kind(&self) -> CallKind {
		self.kind
	}

	/// Endpoint path carried by the span.
	pub fn path(&self) -> &'static str {
		self.path
	}

	/// Drives `call` inside the span and records how it settled.
	///
	/// No span guard is held across `.await` points.
	pub async fn observe<T, Fut>(self, call: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		obs::record_call_outcome(self.kind, CallOutcome::Attempt);

		#[cfg(feature = "tracing")]
		let result = {
			use tracing::Instrument;

			call.instrument(self.span.clone()).await
		};
		#[cfg(not(feature = "tracing"))]
		let result = call.await;
		let outcome = if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure };

		self.settle(outcome, rejected_status(&result));
		obs::record_call_outcome(self.kind, outcome);

		result
	}

	fn settle(&self, outcome: CallOutcome, status: Option<u16>) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Some(status) = status {
				self.span.record("status", status);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (outcome, status);
		}
	}
}

/// Status code of the response envelope behind an HTTP rejection.
fn rejected_status<T>(result: &Result<T>) -> Option<u16> {
	result.as_ref().err().and_then(Error::envelope).map(|envelope| envelope.status_code)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::ConfigError,
		operation::OperationKind,
		transport::{Headers, HttpMethod, ResponseEnvelope},
	};

	fn rejection(status_code: u16) -> Error {
		ResponseEnvelope {
			protocol: "https".into(),
			hostname: "sandbox.safaricom.co.ke".into(),
			path: "/mpesa/stkpush/v1/processrequest".into(),
			method: HttpMethod::Post,
			status_code,
			status_message: "Internal Server Error".into(),
			headers: Headers::new(),
			data: serde_json::json!({ "errorCode": "500.001.1001" }),
		}
		.into()
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let span = CallSpan::new(
			CallKind::Operation(OperationKind::StkPush),
			"/mpesa/stkpush/v1/processrequest",
		);

		assert_eq!(span.kind().as_str(), OperationKind::StkPush.as_str());
		assert_eq!(span.path(), "/mpesa/stkpush/v1/processrequest");
		assert_eq!(span.clone().observe(async { Ok(42) }).await.expect("Ok should pass through."), 42);

		let err = span
			.observe(async { Err::<(), _>(rejection(500)) })
			.await
			.expect_err("Errors should pass through.");

		assert_eq!(err.envelope().map(|envelope| envelope.status_code), Some(500));
	}

	#[test]
	fn only_http_rejections_carry_a_status() {
		assert_eq!(rejected_status(&Err::<(), _>(rejection(503))), Some(503));
		assert_eq!(rejected_status(&Ok(())), None);
		assert_eq!(
			rejected_status::<()>(&Err(Error::from(ConfigError::BodyOnGet {
				path: "/oauth/v1/generate".into(),
			}))),
			None
		);
	}
}
