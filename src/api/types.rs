//! Wire payloads exchanged with the Admin REST API and the summaries built from them.

// self
use crate::{
	_prelude::*,
	id::{DraftOrderId, ProductId, VariantId},
};

/// Product entry returned by `products.json?fields=id,title,variants`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProduct {
	/// Product identifier.
	pub id: ProductId,
	/// Product title.
	#[serde(default)]
	pub title: Option<String>,
	/// Variants in storefront order.
	#[serde(default)]
	pub variants: Vec<RemoteVariant>,
}

/// Variant entry nested in [`RemoteProduct`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVariant {
	/// Variant identifier.
	pub id: VariantId,
	/// Variant SKU; absent or null when the merchant never set one.
	#[serde(default)]
	pub sku: Option<String>,
	/// Decimal price string, e.g. `"19.99"`.
	#[serde(default)]
	pub price: Option<String>,
	/// Units on hand.
	#[serde(default)]
	pub inventory_quantity: Option<i64>,
}

/// One draft order line: a variant and how many of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
	/// Remote variant the line refers to.
	pub variant_id: VariantId,
	/// Units ordered.
	pub quantity: u32,
}

/// Result of [`AdminClient::test_connection`](crate::api::AdminClient::test_connection).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSummary {
	/// Always `true`; mirrors the storefront payload shape.
	pub success: bool,
	/// Shop display name.
	pub shop_name: String,
	/// Primary shop domain.
	pub shop_domain: String,
	/// Shop currency code.
	pub currency: String,
	/// Shopify plan name.
	pub plan_name: String,
}

/// Result of [`AdminClient::create_draft_order`](crate::api::AdminClient::create_draft_order).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrderReceipt {
	/// Always `true`; mirrors the storefront payload shape.
	pub success: bool,
	/// Identifier of the created draft order.
	pub draft_order_id: DraftOrderId,
	/// Hosted invoice page the buyer is sent to.
	pub invoice_url: String,
	/// Order total as a decimal string.
	pub total_price: String,
	/// Order currency code.
	pub currency: String,
}

/// Result of the draft-order access check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrdersAccess {
	/// Always `true`; mirrors the storefront payload shape.
	pub success: bool,
	/// Number of draft orders in the sampled page (0 or 1).
	pub draft_orders_count: usize,
	/// Permission that the check confirmed.
	pub permissions: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShopEnvelope {
	#[serde(default)]
	pub(crate) shop: Option<ShopPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShopPayload {
	#[serde(default)]
	pub(crate) name: Option<String>,
	#[serde(default)]
	pub(crate) domain: Option<String>,
	#[serde(default)]
	pub(crate) currency: Option<String>,
	#[serde(default)]
	pub(crate) plan_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
	#[serde(default)]
	pub(crate) products: Option<Vec<RemoteProduct>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DraftOrderRequest<'a> {
	pub(crate) draft_order: NewDraftOrder<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewDraftOrder<'a> {
	pub(crate) line_items: &'a [LineItem],
	pub(crate) use_customer_default_address: bool,
	pub(crate) note: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftOrderEnvelope {
	#[serde(default)]
	pub(crate) draft_order: Option<DraftOrderPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftOrderPayload {
	#[serde(default)]
	pub(crate) id: Option<DraftOrderId>,
	#[serde(default)]
	pub(crate) invoice_url: Option<String>,
	#[serde(default)]
	pub(crate) total_price: Option<String>,
	#[serde(default)]
	pub(crate) currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftOrdersEnvelope {
	#[serde(default)]
	pub(crate) draft_orders: Option<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn variants_tolerate_missing_fields() {
		let product: RemoteProduct = serde_json::from_str(
			r#"{"id":1,"title":null,"variants":[{"id":2,"sku":null},{"id":3,"sku":"A","price":"1.50","inventory_quantity":-2}]}"#,
		)
		.expect("Product payload should deserialize.");

		assert_eq!(product.title, None);
		assert_eq!(product.variants[0].sku, None);
		assert_eq!(product.variants[1].inventory_quantity, Some(-2));
	}

	#[test]
	fn draft_order_request_omits_missing_email() {
		let items = [LineItem { variant_id: VariantId(9), quantity: 2 }];
		let request = DraftOrderRequest {
			draft_order: NewDraftOrder {
				line_items: &items,
				use_customer_default_address: true,
				note: "Order created from Demo".into(),
				email: None,
			},
		};
		let json = serde_json::to_value(&request).expect("Draft order request should serialize.");

		assert_eq!(
			json,
			serde_json::json!({
				"draft_order": {
					"line_items": [{"variant_id": 9, "quantity": 2}],
					"use_customer_default_address": true,
					"note": "Order created from Demo"
				}
			})
		);
	}
}
