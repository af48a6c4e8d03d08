//! Deployment selection (sandbox, production, or a caller-supplied base URL).

// self
use crate::{_prelude::*, error::ConfigError};

/// Daraja deployment a client talks to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
	/// Safaricom's public sandbox.
	#[default]
	Sandbox,
	/// Live production API.
	Production,
	/// Any other base URL (mock servers, egress proxies).
	Custom(Url),
}
impl Environment {
	const PRODUCTION_URL: &str = "https://api.safaricom.co.ke";
	const SANDBOX_URL: &str = "https://sandbox.safaricom.co.ke";

	/// Returns the base URL that endpoint paths are appended to.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let raw = match self {
			Self::Sandbox => Self::SANDBOX_URL,
			Self::Production => Self::PRODUCTION_URL,
			Self::Custom(url) => return Ok(url.clone()),
		};

		Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl { source })
	}

	/// Returns a stable label for logs and metrics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sandbox => "sandbox",
			Self::Production => "production",
			Self::Custom(_) => "custom",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Custom(url) => write!(f, "custom({url})"),
			_ => f.write_str(self.as_str()),
		}
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();

		match trimmed.to_ascii_lowercase().as_str() {
			"sandbox" => Ok(Self::Sandbox),
			"production" | "live" => Ok(Self::Production),
			_ => Url::parse(trimmed)
				.map(Self::Custom)
				.map_err(|source| ConfigError::InvalidBaseUrl { source }),
		}
	}
}
