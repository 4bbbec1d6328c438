//! Admin REST API client.
//!
//! [`AdminClient`] wraps four endpoints (`shop.json`, `products.json`, `draft_orders.json` for
//! reads and writes). Every call resolves credentials from [`Settings`] first, so a client can
//! be built once and still follow configuration edits. Non-2xx answers become
//! [`Error::Api`] with the message pulled out of the `errors` payload.

pub mod types;

pub use types::*;

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	catalog::{CatalogSnapshot, ProductMatch},
	config::{ClientOptions, Settings},
	error::ConfigError,
	http::{AdminHttpClient, AdminRequest, AdminResponse, HttpMethod},
	id::Sku,
	obs::{self, OperationKind},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const PRODUCTS_ENDPOINT: &str = "products.json?fields=id,title,variants&limit=250";
const DRAFT_ORDERS_SAMPLE_ENDPOINT: &str = "draft_orders.json?limit=1";

/// Client for the Admin REST API of a single store.
pub struct AdminClient<C>
where
	C: ?Sized + AdminHttpClient,
{
	/// HTTP transport used for every request.
	pub http_client: Arc<C>,
	/// Credential source consulted on every request.
	pub settings: Arc<Settings>,
	/// Client tunables.
	pub options: ClientOptions,
}
impl<C> AdminClient<C>
where
	C: ?Sized + AdminHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		settings: Arc<Settings>,
		options: ClientOptions,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), settings, options }
	}

	/// Fetches `shop.json` and summarizes the shop.
	pub async fn test_connection(&self) -> Result<ShopSummary> {
		obs::observe(OperationKind::TestConnection, "test_connection", async {
			let envelope: ShopEnvelope = self.send("shop.json", HttpMethod::Get, None).await?;
			let shop = envelope
				.shop
				.ok_or_else(|| Error::invalid_response("missing `shop` object"))?;

			Ok(ShopSummary {
				success: true,
				shop_name: shop.name.unwrap_or_else(|| "Unknown".into()),
				shop_domain: shop.domain.unwrap_or_else(|| "Unknown".into()),
				currency: shop.currency.unwrap_or_else(|| "USD".into()),
				plan_name: shop.plan_name.unwrap_or_else(|| "Unknown".into()),
			})
		})
		.await
	}

	/// Fetches the first page (up to 250 products) of the catalog.
	pub async fn fetch_catalog(&self) -> Result<CatalogSnapshot> {
		obs::observe(OperationKind::FetchCatalog, "fetch_catalog", async {
			let envelope: ProductsEnvelope =
				self.send(PRODUCTS_ENDPOINT, HttpMethod::Get, None).await?;

			Ok(CatalogSnapshot::from_products(envelope.products.unwrap_or_default()))
		})
		.await
	}

	/// Finds the first variant whose SKU equals `sku`.
	pub async fn find_product_by_sku(&self, sku: &Sku) -> Result<ProductMatch> {
		obs::observe(OperationKind::FindProduct, "find_product_by_sku", async {
			self.fetch_catalog().await?.require(sku)
		})
		.await
	}

	/// Creates a draft order for `line_items`, tagging it with `customer_email` when non-empty.
	pub async fn create_draft_order(
		&self,
		line_items: &[LineItem],
		customer_email: Option<&str>,
	) -> Result<DraftOrderReceipt> {
		obs::observe(OperationKind::CreateDraftOrder, "create_draft_order", async {
			let request = DraftOrderRequest {
				draft_order: NewDraftOrder {
					line_items,
					use_customer_default_address: true,
					note: format!("Order created from {}", self.options.storefront_name),
					email: customer_email.map(str::trim).filter(|email| !email.is_empty()),
				},
			};
			let body = serde_json::to_vec(&request)
				.map_err(|source| ConfigError::RequestBody { source })?;
			let envelope: DraftOrderEnvelope =
				self.send("draft_orders.json", HttpMethod::Post, Some(body)).await?;
			let draft = envelope.draft_order.ok_or(Error::DraftOrderFailed)?;
			let (Some(draft_order_id), Some(invoice_url)) = (draft.id, draft.invoice_url) else {
				return Err(Error::DraftOrderFailed);
			};

			Ok(DraftOrderReceipt {
				success: true,
				draft_order_id,
				invoice_url,
				total_price: draft.total_price.unwrap_or_else(|| "0.00".into()),
				currency: draft.currency.unwrap_or_else(|| "USD".into()),
			})
		})
		.await
	}

	/// Checks read access to draft orders.
	pub async fn test_draft_orders_access(&self) -> Result<DraftOrdersAccess> {
		obs::observe(OperationKind::TestDraftOrders, "test_draft_orders_access", async {
			let envelope: DraftOrdersEnvelope =
				self.send(DRAFT_ORDERS_SAMPLE_ENDPOINT, HttpMethod::Get, None).await?;
			let drafts = envelope
				.draft_orders
				.ok_or_else(|| Error::invalid_response("missing `draft_orders` array"))?;

			Ok(DraftOrdersAccess {
				success: true,
				draft_orders_count: drafts.len(),
				permissions: "read_draft_orders".into(),
			})
		})
		.await
	}

	/// Issues a raw request against `endpoint` and returns the decoded JSON body.
	///
	/// `body` is only sent for `POST`, `PUT`, and `PATCH`.
	pub async fn make_request(
		&self,
		endpoint: &str,
		method: HttpMethod,
		body: Option<&Value>,
	) -> Result<Value> {
		let body = body
			.filter(|_| method.carries_body())
			.map(serde_json::to_vec)
			.transpose()
			.map_err(|source| ConfigError::RequestBody { source })?;

		self.send(endpoint, method, body).await
	}

	/// Builds the request for `endpoint`, failing when credentials are missing.
	pub fn build_request(
		&self,
		endpoint: &str,
		method: HttpMethod,
		body: Option<Vec<u8>>,
	) -> Result<AdminRequest> {
		let store_url = self.settings.store_url()?;
		let access_token = self.settings.access_token()?;
		let store_url = store_url.trim();

		if store_url.is_empty() || access_token.is_empty() {
			return Err(ConfigError::MissingCredentials.into());
		}

		let url = Url::parse(&format!(
			"{}/admin/api/{}/{}",
			store_url.trim_end_matches('/'),
			self.options.api_version,
			endpoint.trim_start_matches('/'),
		))
		.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let headers = vec![
			(ACCESS_TOKEN_HEADER.to_owned(), access_token.expose().to_owned()),
			("Content-Type".to_owned(), "application/json".to_owned()),
			("User-Agent".to_owned(), self.options.user_agent.clone()),
		];

		Ok(AdminRequest {
			method,
			url,
			headers,
			body: body.filter(|_| method.carries_body()),
			timeout: self.options.timeout,
		})
	}

	async fn send<T>(&self, endpoint: &str, method: HttpMethod, body: Option<Vec<u8>>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = self.build_request(endpoint, method, body)?;
		let response = self.http_client.execute(request).await?;

		decode_response(response)
	}
}
#[cfg(feature = "reqwest")]
impl AdminClient<ReqwestHttpClient> {
	/// Creates a client backed by a freshly built reqwest transport.
	pub fn new(settings: Arc<Settings>, options: ClientOptions) -> Result<Self> {
		let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

		Ok(Self::with_http_client(settings, options, ReqwestHttpClient::with_client(client)))
	}
}
impl<C> Clone for AdminClient<C>
where
	C: ?Sized + AdminHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			settings: self.settings.clone(),
			options: self.options.clone(),
		}
	}
}
impl<C> Debug for AdminClient<C>
where
	C: ?Sized + AdminHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminClient")
			.field("settings", &self.settings)
			.field("options", &self.options)
			.finish()
	}
}

fn decode_response<T>(response: AdminResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	if !response.is_success() {
		return Err(Error::Api {
			status: response.status,
			message: extract_error_message(response.status, &response.body),
			body: response.body_text(),
			retry_after: response.retry_after,
		});
	}

	let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
		b"null"
	} else {
		&response.body
	};
	let deserializer = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(deserializer).map_err(|e| Error::InvalidResponse {
		reason: format!("unexpected payload at `{}`", e.path()),
		source: Some(e),
	})
}

/// Pulls a human-readable message out of an error body.
///
/// `errors` may be a string, an array of strings, or an object mapping fields to messages.
/// Anything else falls back to `HTTP <status> error`.
fn extract_error_message(status: u16, body: &[u8]) -> String {
	let fallback = || format!("HTTP {status} error");
	let Ok(payload) = serde_json::from_slice::<Value>(body) else {
		return fallback();
	};
	let message = match payload.get("errors") {
		Some(Value::String(text)) => text.clone(),
		Some(Value::Array(items)) => join_messages(items),
		Some(Value::Object(fields)) => fields
			.iter()
			.map(|(field, value)| format!("{field}: {}", flatten_message(value)))
			.collect::<Vec<_>>()
			.join(", "),
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	};

	if message.trim().is_empty() { fallback() } else { message }
}

fn join_messages(items: &[Value]) -> String {
	items.iter().map(flatten_message).collect::<Vec<_>>().join(", ")
}

fn flatten_message(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Array(items) => join_messages(items),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration as StdDuration;
	// self
	use super::*;
	use crate::{
		http::HttpFuture,
		id::VariantId,
		settings::{MemorySettings, SettingKey, SettingsStore},
	};

	#[derive(Default)]
	struct ScriptedHttpClient {
		replies: RwLock<Vec<AdminResponse>>,
		seen: RwLock<Vec<AdminRequest>>,
	}
	impl ScriptedHttpClient {
		fn replying(status: u16, body: &str) -> Self {
			let client = Self::default();

			client.replies.write().push(AdminResponse {
				status,
				retry_after: None,
				body: body.as_bytes().to_vec(),
			});

			client
		}

		fn last_request(&self) -> AdminRequest {
			self.seen.read().last().cloned().expect("A request should have been recorded.")
		}
	}
	impl AdminHttpClient for ScriptedHttpClient {
		fn execute(&self, request: AdminRequest) -> HttpFuture<'_> {
			self.seen.write().push(request);

			let reply = self.replies.write().pop().unwrap_or_default();

			Box::pin(async move { Ok(reply) })
		}
	}

	fn scripted_client(
		store_url: &str,
		token: &str,
		http: ScriptedHttpClient,
	) -> (AdminClient<ScriptedHttpClient>, Arc<ScriptedHttpClient>) {
		let backend = Arc::new(MemorySettings::default());

		backend.set(SettingKey::ShopifyStoreUrl, store_url).expect("Write should succeed.");
		backend.set(SettingKey::ShopifyAccessToken, token).expect("Write should succeed.");

		let settings = Arc::new(Settings::with_env_lookup(backend, |_| None));
		let http = Arc::new(http);
		let client = AdminClient::with_http_client(
			settings,
			ClientOptions::default().with_timeout(StdDuration::from_secs(5)),
			http.clone(),
		);

		(client, http)
	}

	#[test]
	fn error_messages_follow_errors_payload() {
		assert_eq!(extract_error_message(401, br#"{"errors":"Not Found"}"#), "Not Found");
		assert_eq!(extract_error_message(422, br#"{"errors":["a","b"]}"#), "a, b");
		assert_eq!(
			extract_error_message(422, br#"{"errors":{"line_items":["is invalid","is empty"]}}"#),
			"line_items: is invalid, is empty"
		);
		assert_eq!(extract_error_message(500, b"<html>oops</html>"), "HTTP 500 error");
		assert_eq!(extract_error_message(404, br#"{"error":"x"}"#), "HTTP 404 error");
		assert_eq!(extract_error_message(400, br#"{"errors":""}"#), "HTTP 400 error");
	}

	#[test]
	fn request_url_joins_store_and_endpoint() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com//",
			"shpat_token",
			ScriptedHttpClient::default(),
		);
		let request = client
			.build_request("/shop.json", HttpMethod::Get, Some(b"{}".to_vec()))
			.expect("Request should build.");

		assert_eq!(request.url.as_str(), "https://demo.myshopify.com/admin/api/2023-10/shop.json");
		assert_eq!(request.header("x-shopify-access-token"), Some("shpat_token"));
		assert_eq!(request.header("content-type"), Some("application/json"));
		assert!(request.body.is_none(), "GET requests must not carry a body.");
		assert_eq!(request.timeout, StdDuration::from_secs(5));
	}

	#[test]
	fn missing_credentials_short_circuit() {
		let (client, _) =
			scripted_client("https://demo.myshopify.com", "  ", ScriptedHttpClient::default());
		let err = client
			.build_request("shop.json", HttpMethod::Get, None)
			.expect_err("Blank token should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCredentials)));
	}

	#[tokio::test]
	async fn test_connection_fills_defaults() {
		let (client, http) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, r#"{"shop":{"name":"Demo"}}"#),
		);
		let summary = client.test_connection().await.expect("Connection check should succeed.");

		assert_eq!(summary.shop_name, "Demo");
		assert_eq!(summary.shop_domain, "Unknown");
		assert_eq!(summary.currency, "USD");
		assert_eq!(summary.plan_name, "Unknown");
		assert_eq!(http.last_request().method, HttpMethod::Get);
	}

	#[tokio::test]
	async fn test_connection_requires_shop_object() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, r#"{"other":{}}"#),
		);
		let err = client.test_connection().await.expect_err("Missing shop should fail.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}

	#[tokio::test]
	async fn malformed_success_body_reports_path() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, r#"{"draft_order":{"id":"nope","invoice_url":"x"}}"#),
		);
		let items = [LineItem { variant_id: VariantId(1), quantity: 1 }];
		let err = client
			.create_draft_order(&items, None)
			.await
			.expect_err("String ids should fail to decode.");

		match err {
			Error::InvalidResponse { reason, source } => {
				assert!(reason.contains("draft_order.id"), "Unexpected reason: {reason}.");
				assert!(source.is_some());
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[tokio::test]
	async fn empty_success_body_decodes_as_null() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, ""),
		);
		let err = client.test_connection().await.expect_err("Empty body has no shop object.");

		assert!(matches!(err, Error::InvalidResponse { .. }));

		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(204, "  "),
		);
		let value = client
			.make_request("draft_orders/9.json", HttpMethod::Delete, None)
			.await
			.expect("Empty raw body should decode.");

		assert_eq!(value, Value::Null);
	}

	#[tokio::test]
	async fn draft_orders_listing_requires_array() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, r#"{"draft_order":{}}"#),
		);
		let err = client.test_draft_orders_access().await.expect_err("Missing array should fail.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}

	#[tokio::test]
	async fn incomplete_draft_order_is_a_failed_draft() {
		for body in [
			r#"{"draft_order":{"invoice_url":"https://demo.myshopify.com/invoices/1"}}"#,
			r#"{"draft_order":{"id":1}}"#,
			r#"{"draft_order":null}"#,
		] {
			let (client, _) = scripted_client(
				"https://demo.myshopify.com",
				"shpat_token",
				ScriptedHttpClient::replying(201, body),
			);
			let items = [LineItem { variant_id: VariantId(1), quantity: 1 }];
			let err = client
				.create_draft_order(&items, None)
				.await
				.expect_err("Incomplete draft order should fail.");

			assert!(
				matches!(err, Error::DraftOrderFailed),
				"Unexpected error for {body}: {err:?}."
			);
		}
	}

	#[tokio::test]
	async fn catalog_without_products_finds_nothing() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, "{}"),
		);
		let sku = Sku::new("TEE-S").expect("Fixture SKU should be valid.");
		let err = client.find_product_by_sku(&sku).await.expect_err("Empty catalog has no SKU.");

		assert!(matches!(err, Error::ProductNotFound { sku } if sku == "TEE-S"));
	}

	#[tokio::test]
	async fn make_request_drops_body_for_reads() {
		let (client, http) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(200, r#"{"ok":true}"#),
		);
		let value = client
			.make_request("shop.json", HttpMethod::Get, Some(&serde_json::json!({"a": 1})))
			.await
			.expect("Raw request should succeed.");

		assert_eq!(value, serde_json::json!({"ok": true}));
		assert!(http.last_request().body.is_none());
	}

	#[tokio::test]
	async fn non_success_maps_to_api_error() {
		let (client, _) = scripted_client(
			"https://demo.myshopify.com",
			"shpat_token",
			ScriptedHttpClient::replying(
				401,
				r#"{"errors":"[API] Invalid API key or access token (unrecognized login or wrong password)"}"#,
			),
		);
		let err = client.test_draft_orders_access().await.expect_err("401 should surface.");

		assert_eq!(err.status(), Some(401));
		assert!(err.to_string().starts_with("[API] Invalid API key"));
	}
}
