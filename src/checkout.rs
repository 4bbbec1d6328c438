//! Checkout orchestration: cart lines → SKU lookup → draft order → invoice URL.
//!
//! [`CheckoutBridge::create_draft_order`] validates the cart and configuration, maps every line
//! to `{variant_id, quantity}` against a catalog fetched at most once per checkout, and opens a
//! draft order. The cart is only cleared after the draft order exists, so any failure leaves the
//! buyer's cart intact.

// self
use crate::{
	_prelude::*,
	api::{AdminClient, DraftOrderReceipt, LineItem},
	cart::{Cart, CartItem, CartSummary},
	catalog::CatalogSnapshot,
	error::ConfigError,
	http::AdminHttpClient,
	obs::{self, OperationKind},
};

/// Turns storefront carts into remote draft orders.
pub struct CheckoutBridge<C>
where
	C: ?Sized + AdminHttpClient,
{
	client: AdminClient<C>,
}
impl<C> CheckoutBridge<C>
where
	C: ?Sized + AdminHttpClient,
{
	/// Wraps an Admin API client.
	pub fn new(client: AdminClient<C>) -> Self {
		Self { client }
	}

	/// Underlying Admin API client.
	pub fn client(&self) -> &AdminClient<C> {
		&self.client
	}

	/// Creates a draft order for every line in `cart` and clears the cart on success.
	///
	/// `customer_email` is attached when present and non-blank (e.g. for signed-in buyers).
	pub async fn create_draft_order(
		&self,
		cart: &mut Cart,
		customer_email: Option<&str>,
	) -> Result<DraftOrderReceipt> {
		let lines: &Cart = cart;
		let receipt = obs::observe(OperationKind::Checkout, "create_draft_order", async {
			if lines.is_empty() {
				return Err(Error::EmptyCart);
			}
			if !self.client.settings.is_configured()? {
				return Err(ConfigError::MissingCredentials.into());
			}

			let mut catalog = None;
			let mut line_items = Vec::with_capacity(lines.items().len());

			for item in lines.items() {
				let sku = line_sku(item)?;
				let snapshot = match &mut catalog {
					Some(snapshot) => snapshot,
					slot @ None => slot.insert(self.client.fetch_catalog().await?),
				};
				let found = snapshot.require(sku)?;

				line_items.push(LineItem { variant_id: found.variant_id, quantity: item.quantity });
			}

			self.client.create_draft_order(&line_items, customer_email).await
		})
		.await?;

		cart.clear();

		Ok(receipt)
	}

	/// Returns `true` when every cart line has a SKU that exists remotely.
	///
	/// Empty carts, missing SKUs, and any lookup failure all yield `false`.
	pub async fn validate_cart_items(&self, cart: &Cart) -> bool {
		obs::observe(OperationKind::ValidateCart, "validate_cart_items", async {
			if cart.is_empty() {
				return Err(Error::EmptyCart);
			}

			cart.items().iter().try_for_each(|item| line_sku(item).map(drop))?;

			map_line_items(cart, &self.client.fetch_catalog().await?)
		})
		.await
		.is_ok()
	}

	/// Display summary of `cart`, or `None` when it is empty.
	pub fn cart_summary(&self, cart: &Cart) -> Result<Option<CartSummary>> {
		Ok(cart.summary()?)
	}
}
impl<C> Clone for CheckoutBridge<C>
where
	C: ?Sized + AdminHttpClient,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone() }
	}
}
impl<C> Debug for CheckoutBridge<C>
where
	C: ?Sized + AdminHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CheckoutBridge").field("client", &self.client).finish()
	}
}

/// Maps each cart line to a draft order line through `catalog`, in cart order.
pub fn map_line_items(cart: &Cart, catalog: &CatalogSnapshot) -> Result<Vec<LineItem>> {
	cart.items()
		.iter()
		.map(|item| {
			let found = catalog.require(line_sku(item)?)?;

			Ok(LineItem { variant_id: found.variant_id, quantity: item.quantity })
		})
		.collect()
}

fn line_sku(item: &CartItem) -> Result<&str> {
	item.sku().ok_or_else(|| Error::MissingSku { product: item.name.clone() })
}

/// JSON envelope returned to the storefront page: `{"success": bool, "data": ...}`.
///
/// Failures carry the error's display message as `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutEnvelope {
	/// Whether the operation succeeded.
	pub success: bool,
	/// Payload on success, message string on failure.
	pub data: serde_json::Value,
}
impl CheckoutEnvelope {
	/// Wraps a successful payload.
	pub fn success<T>(payload: &T) -> Result<Self>
	where
		T: Serialize,
	{
		let data = serde_json::to_value(payload)
			.map_err(|source| ConfigError::RequestBody { source })?;

		Ok(Self { success: true, data })
	}

	/// Wraps a failure message.
	pub fn failure(message: impl Display) -> Self {
		Self { success: false, data: serde_json::Value::String(message.to_string()) }
	}

	/// Builds an envelope from an operation result.
	pub fn from_result<T>(result: &Result<T>) -> Self
	where
		T: Serialize,
	{
		match result {
			Ok(payload) => Self::success(payload).unwrap_or_else(Self::failure),
			Err(e) => Self::failure(e),
		}
	}
}
