//! Transport primitives for Admin API calls.
//!
//! [`AdminHttpClient`] is the bridge's only dependency on an HTTP stack. The API client builds
//! a fully resolved [`AdminRequest`] (URL, headers, body, timeout) and expects an
//! [`AdminResponse`] carrying the status, the raw body, and any `Retry-After` hint back.
//! Non-2xx statuses are *not* transport errors; implementations return them as responses and
//! leave classification to the API layer.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method,
	header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
};
#[cfg(feature = "reqwest")] use time::{OffsetDateTime, format_description::well_known::Rfc2822};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

#[cfg(feature = "reqwest")] const MAX_RETRY_AFTER_SECS: f64 = 86_400.;

/// Boxed future returned by [`AdminHttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<AdminResponse>> + 'a + Send>>;

/// HTTP verbs used against the Admin API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}

	/// Whether requests with this verb carry a body.
	pub const fn carries_body(self) -> bool {
		matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to an [`AdminHttpClient`].
#[derive(Clone)]
pub struct AdminRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs, in send order.
	pub headers: Vec<(String, String)>,
	/// JSON body; only present for verbs that carry one.
	pub body: Option<Vec<u8>>,
	/// Per-request timeout.
	pub timeout: StdDuration,
}
impl AdminRequest {
	/// Returns the first header value matching `name`, case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for AdminRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Header values carry the access token.
		f.debug_struct("AdminRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &self.headers.iter().map(|(key, _)| key).collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Response captured from the Admin API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl AdminResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded lossily as UTF-8.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Abstraction over HTTP transports capable of executing Admin API requests.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across clients, and the
/// futures they return must be `Send` so checkout calls can hop executors.
pub trait AdminHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the raw response.
	fn execute(&self, request: AdminRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn send(&self, request: AdminRequest) -> Result<AdminResponse> {
		let method = Method::from_bytes(request.method.as_str().as_bytes())
			.map_err(ConfigError::http_client_build)?;
		let mut headers = HeaderMap::with_capacity(request.headers.len());

		for (name, value) in &request.headers {
			let name =
				HeaderName::from_bytes(name.as_bytes()).map_err(ConfigError::http_client_build)?;
			let value = HeaderValue::from_str(value).map_err(ConfigError::http_client_build)?;

			headers.append(name, value);
		}

		let mut builder =
			self.0.request(method, request.url).headers(headers).timeout(request.timeout);

		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder.send().await.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

		Ok(AdminResponse { status, retry_after, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AdminHttpClient for ReqwestHttpClient {
	fn execute(&self, request: AdminRequest) -> HttpFuture<'_> {
		Box::pin(self.send(request))
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(err).into();
	}

	TransportError::network(err).into()
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	parse_retry_after_value(raw, OffsetDateTime::now_utc())
}

/// Parses a `Retry-After` value given as delta seconds (fractions allowed) or an RFC 2822 date.
#[cfg(feature = "reqwest")]
fn parse_retry_after_value(raw: &str, now: OffsetDateTime) -> Option<Duration> {
	if let Ok(secs) = raw.parse::<f64>() {
		return (secs.is_finite() && (0. ..=MAX_RETRY_AFTER_SECS).contains(&secs))
			.then(|| Duration::seconds_f64(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let now = datetime!(2024-03-01 12:00:00 UTC);

		assert_eq!(parse_retry_after_value("2.0", now), Some(Duration::seconds(2)));
		assert_eq!(parse_retry_after_value("5", now), Some(Duration::seconds(5)));
		assert_eq!(
			parse_retry_after_value("Fri, 01 Mar 2024 12:00:30 +0000", now),
			Some(Duration::seconds(30))
		);
		assert_eq!(parse_retry_after_value("Fri, 01 Mar 2024 11:00:00 +0000", now), None);
		assert_eq!(parse_retry_after_value("-1", now), None);
		assert_eq!(parse_retry_after_value("soon", now), None);
	}

	#[test]
	fn only_write_verbs_carry_bodies() {
		assert!(HttpMethod::Post.carries_body());
		assert!(HttpMethod::Patch.carries_body());
		assert!(!HttpMethod::Get.carries_body());
		assert!(!HttpMethod::Delete.carries_body());
	}

	#[test]
	fn request_debug_hides_header_values() {
		let request = AdminRequest {
			method: HttpMethod::Get,
			url: Url::parse("https://demo.myshopify.com/admin/api/2023-10/shop.json")
				.expect("Fixture URL should parse."),
			headers: vec![("X-Shopify-Access-Token".into(), "shpat_secret".into())],
			body: None,
			timeout: StdDuration::from_secs(30),
		};

		assert_eq!(request.header("x-shopify-access-token"), Some("shpat_secret"));
		assert!(!format!("{request:?}").contains("shpat_secret"));
	}
}
