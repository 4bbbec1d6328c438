//! Local cart model handed over by the storefront at checkout.

// crates.io
use rust_decimal::Decimal;
// self
use crate::_prelude::*;

const MIN_TOTAL_SCALE: u32 = 2;

/// Errors raised while summarizing a cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CartError {
	/// A line carries a price that is not a plain decimal number.
	#[error("Product \"{product}\" has an invalid price: {price}.")]
	InvalidPrice {
		/// Display name of the offending product.
		product: String,
		/// Raw price string.
		price: String,
	},
	/// The cart total does not fit the supported range.
	#[error("Cart total overflowed.")]
	TotalOverflow,
}

/// One cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
	/// Product display name.
	pub name: String,
	/// Local SKU; lines without one cannot be checked out remotely.
	pub sku: Option<String>,
	/// Units in the cart.
	pub quantity: u32,
	/// Unit price as a decimal string.
	pub price: String,
}
impl CartItem {
	/// Creates a line for `quantity` units of `name` at `price`.
	pub fn new(name: impl Into<String>, quantity: u32, price: impl Into<String>) -> Self {
		Self { name: name.into(), sku: None, quantity, price: price.into() }
	}

	/// Attaches a SKU to the line.
	pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
		self.sku = Some(sku.into());

		self
	}

	/// Returns the SKU when it is present and non-blank.
	pub fn sku(&self) -> Option<&str> {
		self.sku.as_deref().map(str::trim).filter(|sku| !sku.is_empty())
	}
}

/// Shopping cart owned by the storefront session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
	items: Vec<CartItem>,
	currency: String,
}
impl Cart {
	/// Creates an empty cart priced in `currency`.
	pub fn new(currency: impl Into<String>) -> Self {
		Self { items: Vec::new(), currency: currency.into() }
	}

	/// Appends a line.
	pub fn push(&mut self, item: CartItem) {
		self.items.push(item);
	}

	/// Builder-style [`push`](Self::push).
	pub fn with_item(mut self, item: CartItem) -> Self {
		self.push(item);

		self
	}

	/// Lines in insertion order.
	pub fn items(&self) -> &[CartItem] {
		&self.items
	}

	/// Cart currency code.
	pub fn currency(&self) -> &str {
		&self.currency
	}

	/// Whether the cart has no lines.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Total number of units across all lines.
	pub fn contents_count(&self) -> u64 {
		self.items.iter().map(|item| u64::from(item.quantity)).sum()
	}

	/// Removes every line.
	pub fn clear(&mut self) {
		self.items.clear();
	}

	/// Summarizes the cart for display, or `None` when it is empty.
	pub fn summary(&self) -> Result<Option<CartSummary>, CartError> {
		if self.is_empty() {
			return Ok(None);
		}

		let mut total = Decimal::ZERO;

		for item in &self.items {
			let price = Decimal::from_str(item.price.trim()).map_err(|_| {
				CartError::InvalidPrice { product: item.name.clone(), price: item.price.clone() }
			})?;
			let line =
				price.checked_mul(Decimal::from(item.quantity)).ok_or(CartError::TotalOverflow)?;

			total = total.checked_add(line).ok_or(CartError::TotalOverflow)?;
		}

		if total.scale() < MIN_TOTAL_SCALE {
			total.rescale(MIN_TOTAL_SCALE);
		}

		Ok(Some(CartSummary {
			items: self
				.items
				.iter()
				.map(|item| CartSummaryItem {
					name: item.name.clone(),
					sku: item.sku.clone().unwrap_or_default(),
					quantity: item.quantity,
					price: item.price.clone(),
				})
				.collect(),
			total_items: self.contents_count(),
			total_price: total.to_string(),
			currency: self.currency.clone(),
		}))
	}
}

/// Display-ready cart overview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
	/// One entry per cart line.
	pub items: Vec<CartSummaryItem>,
	/// Total units across all lines.
	pub total_items: u64,
	/// Sum of `price × quantity`, as a decimal string with at least two fractional digits.
	pub total_price: String,
	/// Cart currency code.
	pub currency: String,
}

/// Single line inside a [`CartSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummaryItem {
	/// Product display name.
	pub name: String,
	/// SKU, empty when unset.
	pub sku: String,
	/// Units in the cart.
	pub quantity: u32,
	/// Unit price as a decimal string.
	pub price: String,
}
