//! SKU index over one fetched page of the remote catalog.

// std
use std::collections::btree_map::Entry;
// self
use crate::{
	_prelude::*,
	api::RemoteProduct,
	id::{ProductId, VariantId},
};

/// Variant located by SKU, together with its parent product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMatch {
	/// Parent product identifier.
	pub product_id: ProductId,
	/// Matching variant identifier.
	pub variant_id: VariantId,
	/// Parent product title.
	pub title: String,
	/// Variant SKU (equal to the lookup key).
	pub sku: String,
	/// Variant price as a decimal string.
	pub price: String,
	/// Units on hand, `0` when the platform omitted it.
	pub inventory_quantity: i64,
}

/// Immutable view of up to one page of products, indexed by SKU.
///
/// When several variants share a SKU the first one in product order, then variant order, wins.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
	products: usize,
	by_sku: BTreeMap<String, ProductMatch>,
}
impl CatalogSnapshot {
	/// Indexes `products`, skipping variants without a SKU.
	pub fn from_products(products: Vec<RemoteProduct>) -> Self {
		let mut by_sku = BTreeMap::new();
		let count = products.len();

		for product in products {
			let title = product.title.unwrap_or_default();

			for variant in product.variants {
				let Some(sku) = variant.sku.filter(|sku| !sku.is_empty()) else {
					continue;
				};

				if let Entry::Vacant(slot) = by_sku.entry(sku.clone()) {
					slot.insert(ProductMatch {
						product_id: product.id,
						variant_id: variant.id,
						title: title.clone(),
						sku,
						price: variant.price.unwrap_or_default(),
						inventory_quantity: variant.inventory_quantity.unwrap_or(0),
					});
				}
			}
		}

		Self { products: count, by_sku }
	}

	/// Looks up the variant carrying exactly `sku`.
	pub fn find(&self, sku: &str) -> Option<&ProductMatch> {
		self.by_sku.get(sku)
	}

	/// Like [`find`](Self::find), but reports a miss as [`Error::ProductNotFound`].
	pub fn require(&self, sku: &str) -> Result<ProductMatch> {
		self.find(sku).cloned().ok_or_else(|| Error::ProductNotFound { sku: sku.to_string() })
	}

	/// Number of products in the snapshot.
	pub fn len(&self) -> usize {
		self.products
	}

	/// Whether the snapshot holds no products.
	pub fn is_empty(&self) -> bool {
		self.products == 0
	}

	/// Number of distinct SKUs indexed.
	pub fn sku_count(&self) -> usize {
		self.by_sku.len()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{api::RemoteVariant, id::Sku};

	fn variant(id: u64, sku: Option<&str>) -> RemoteVariant {
		RemoteVariant {
			id: VariantId(id),
			sku: sku.map(Into::into),
			price: Some("10.00".into()),
			inventory_quantity: None,
		}
	}

	fn product(id: u64, title: &str, variants: Vec<RemoteVariant>) -> RemoteProduct {
		RemoteProduct { id: ProductId(id), title: Some(title.into()), variants }
	}

	#[test]
	fn first_match_wins_in_catalog_order() {
		let snapshot = CatalogSnapshot::from_products(vec![
			product(1, "Tee", vec![variant(11, Some("TEE-S")), variant(12, Some("DUP"))]),
			product(2, "Hoodie", vec![variant(21, Some("DUP")), variant(22, None)]),
		]);
		let hit = snapshot.find("DUP").expect("Duplicate SKU should resolve.");

		assert_eq!(hit.variant_id, VariantId(12));
		assert_eq!(hit.product_id, ProductId(1));
		assert_eq!(hit.title, "Tee");
		assert_eq!(hit.inventory_quantity, 0);
		assert_eq!(snapshot.len(), 2);
		assert_eq!(snapshot.sku_count(), 2);
	}

	#[test]
	fn lookup_is_exact() {
		let snapshot = CatalogSnapshot::from_products(vec![product(
			1,
			"Mug",
			vec![variant(11, Some("mug-01")), variant(12, Some(""))],
		)]);

		assert!(snapshot.find("MUG-01").is_none());
		assert!(snapshot.find("").is_none());

		let err = snapshot
			.require(&Sku::new("MUG-01").expect("Fixture SKU should be valid."))
			.expect_err("Case-different SKU should not match.");

		assert!(matches!(err, Error::ProductNotFound { sku } if sku == "MUG-01"));
	}

	#[test]
	fn empty_snapshot() {
		let snapshot = CatalogSnapshot::default();

		assert!(snapshot.is_empty());
		assert!(snapshot.find("anything").is_none());
	}
}
