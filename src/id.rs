//! Strongly typed identifiers shared by the catalog, API, and checkout layers.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_numeric_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub u64);
		impl $name {
			/// Returns the raw numeric identifier.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
	};
}

const SKU_MAX_LEN: usize = 255;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier starts or ends with whitespace.
	#[error("{kind} identifier has surrounding whitespace.")]
	SurroundingWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Stock-keeping unit used to match a local cart line to a remote variant.
///
/// Matching is exact and case-sensitive. Inner whitespace is allowed because merchants use it,
/// but leading or trailing whitespace is rejected so lookups never silently miss.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);
impl Sku {
	/// Creates a new SKU after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_sku(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for Sku {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Sku {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Sku {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<Sku> for String {
	fn from(value: Sku) -> Self {
		value.0
	}
}
impl TryFrom<String> for Sku {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_sku(&value)?;

		Ok(Self(value))
	}
}
impl Debug for Sku {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Sku({})", self.0)
	}
}
impl Display for Sku {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Sku {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

def_numeric_id! { ProductId, "Remote product identifier.", "Product" }
def_numeric_id! { VariantId, "Remote product variant identifier.", "Variant" }
def_numeric_id! { DraftOrderId, "Remote draft order identifier.", "DraftOrder" }

fn validate_sku(view: &str) -> Result<(), IdentifierError> {
	const KIND: &str = "Sku";

	if view.trim().is_empty() {
		return Err(IdentifierError::Empty { kind: KIND });
	}
	if view.trim() != view {
		return Err(IdentifierError::SurroundingWhitespace { kind: KIND });
	}
	if view.chars().count() > SKU_MAX_LEN {
		return Err(IdentifierError::TooLong { kind: KIND, max: SKU_MAX_LEN });
	}

	Ok(())
}
