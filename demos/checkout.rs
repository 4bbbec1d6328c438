//! Walks a two-line cart through the checkout bridge against a mocked Admin API and prints the
//! hosted invoice URL the buyer would be redirected to.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use storefront_bridge::{
	api::AdminClient,
	cart::{Cart, CartItem},
	checkout::{CheckoutBridge, CheckoutEnvelope},
	config::{ClientOptions, Settings},
	settings::{MemorySettings, SettingKey, SettingsStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let products_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/api/2023-10/products.json");
			then.status(200).header("content-type", "application/json").body(
				"{\"products\":[{\"id\":1,\"title\":\"Classic Tee\",\"variants\":[\
				 {\"id\":11,\"sku\":\"TEE-M\",\"price\":\"20.00\"},\
				 {\"id\":12,\"sku\":\"MUG\",\"price\":\"8.50\"}]}]}",
			);
		})
		.await;
	let draft_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/api/2023-10/draft_orders.json");
			then.status(201).header("content-type", "application/json").body(
				"{\"draft_order\":{\"id\":42,\"invoice_url\":\"https://demo.myshopify.com/invoices/42\",\
				 \"total_price\":\"48.50\",\"currency\":\"USD\"}}",
			);
		})
		.await;
	let store = Arc::new(MemorySettings::default());

	store.seed_defaults()?;
	store.set(SettingKey::ShopifyStoreUrl, &server.base_url())?;
	store.set(SettingKey::ShopifyAccessToken, "shpat_demo")?;

	let settings = Arc::new(Settings::with_env_lookup(store, |_| None));
	let options = ClientOptions::default().with_storefront_name("Demo Storefront");
	let bridge = CheckoutBridge::new(AdminClient::new(settings, options)?);
	let mut cart = Cart::new("USD")
		.with_item(CartItem::new("Classic Tee - M", 2, "20.00").with_sku("TEE-M"))
		.with_item(CartItem::new("Mug", 1, "8.50").with_sku("MUG"));

	if let Some(summary) = bridge.cart_summary(&cart)? {
		println!(
			"Checking out {} items for {} {}.",
			summary.total_items, summary.total_price, summary.currency
		);
	}

	let result = bridge.create_draft_order(&mut cart, Some("buyer@example.com")).await;

	println!("{}", serde_json::to_string_pretty(&CheckoutEnvelope::from_result(&result))?);

	let receipt = result?;

	println!("Redirect the buyer to {}.", receipt.invoice_url);

	products_mock.assert_async().await;
	draft_mock.assert_async().await;

	Ok(())
}
