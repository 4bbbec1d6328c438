//! Bridge-level error types shared across configuration, transport, and checkout.

// self
use crate::_prelude::*;

/// Bridge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Settings storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::settings::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Cart contents could not be summarized.
	#[error(transparent)]
	Cart(#[from] crate::cart::CartError),

	/// Admin API answered with a non-2xx status.
	#[error("{message}")]
	Api {
		/// HTTP status code returned by the Admin API.
		status: u16,
		/// Message extracted from the `errors` payload, or a status fallback.
		message: String,
		/// Raw response body, kept for diagnostics.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Admin API answered with a 2xx status but the payload was unusable.
	#[error("Invalid response from Shopify: {reason}.")]
	InvalidResponse {
		/// What was wrong with the payload.
		reason: String,
		/// Structured parsing failure, when the body was not valid for the expected shape.
		#[source]
		source: Option<serde_path_to_error::Error<serde_json::Error>>,
	},
	/// No variant in the catalog carries the requested SKU.
	#[error("Product with SKU \"{sku}\" not found in Shopify.")]
	ProductNotFound {
		/// SKU that was looked up.
		sku: String,
	},
	/// A cart line cannot be mapped because its product has no SKU.
	#[error("Product \"{product}\" does not have a SKU.")]
	MissingSku {
		/// Display name of the offending product.
		product: String,
	},
	/// Checkout was requested for a cart without lines.
	#[error("Cart is empty.")]
	EmptyCart,
	/// Draft order endpoint succeeded but returned no `draft_order` object.
	#[error("Failed to create draft order in Shopify.")]
	DraftOrderFailed,
}
impl Error {
	/// Builds an [`Error::InvalidResponse`] without a parsing source.
	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse { reason: reason.into(), source: None }
	}

	/// Returns the upstream HTTP status when the error carries one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the bridge.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Store URL or access token is absent.
	#[error("Shopify configuration is missing.")]
	MissingCredentials,
	/// Store URL does not look like `https://<shop>.myshopify.com`.
	#[error("Please enter a valid Shopify store URL (e.g., https://your-store.myshopify.com): {url}.")]
	InvalidStoreUrl {
		/// Rejected URL, trimmed.
		url: String,
	},
	/// Store URL and endpoint could not be combined into a request URL.
	#[error("Admin API endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request payload could not be encoded as JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
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

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Admin API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the Admin API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Admin API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_displays_upstream_message() {
		let err = Error::Api {
			status: 401,
			message: "Invalid API key or access token".into(),
			body: "{}".into(),
			retry_after: None,
		};

		assert_eq!(err.to_string(), "Invalid API key or access token");
		assert_eq!(err.status(), Some(401));
	}

	#[test]
	fn lookup_errors_name_the_offender() {
		assert_eq!(
			Error::ProductNotFound { sku: "TEE-RED-M".into() }.to_string(),
			"Product with SKU \"TEE-RED-M\" not found in Shopify."
		);
		assert_eq!(
			Error::MissingSku { product: "Mug".into() }.to_string(),
			"Product \"Mug\" does not have a SKU."
		);
		assert_eq!(Error::EmptyCart.status(), None);
	}

	#[test]
	fn config_error_is_transparent() {
		let err: Error = ConfigError::MissingCredentials.into();

		assert_eq!(err.to_string(), "Shopify configuration is missing.");
	}
}
