// self
use crate::obs::{CallKind, CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"mpesa_daraja_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records whether the credential cache served a token without a fetch.
pub fn record_token_cache(hit: bool) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"mpesa_daraja_token_cache_total",
			"result" => if hit { "hit" } else { "miss" }
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = hit;
	}
}
