//! Optional observability helpers for bridge operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `storefront_bridge.op` with the `op` and
//!   `stage` (call site) fields, plus a debug event per outcome.
//! - Enable `metrics` to increment the `storefront_bridge_operation_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// `GET shop.json` connectivity check.
	TestConnection,
	/// `GET products.json` catalog page.
	FetchCatalog,
	/// Catalog fetch and SKU lookup.
	FindProduct,
	/// `POST draft_orders.json`.
	CreateDraftOrder,
	/// `GET draft_orders.json?limit=1` permission check.
	TestDraftOrders,
	/// Pre-checkout cart validation.
	ValidateCart,
	/// Cart-to-draft-order checkout.
	Checkout,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TestConnection => "test_connection",
			OperationKind::FetchCatalog => "fetch_catalog",
			OperationKind::FindProduct => "find_product",
			OperationKind::CreateDraftOrder => "create_draft_order",
			OperationKind::TestDraftOrders => "test_draft_orders",
			OperationKind::ValidateCart => "validate_cart",
			OperationKind::Checkout => "checkout",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a bridge operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt + outcome.
pub async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(e) => {
			record_operation_failure(kind, e);
			record_operation_outcome(kind, OperationOutcome::Failure);
		},
	}

	result
}
