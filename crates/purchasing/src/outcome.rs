use serde::{Deserialize, Serialize};

use upsell_catalog::PurchaserInfo;
use upsell_core::EntitlementKey;

use crate::provider::{ProviderError, PurchaseCompletion};

/// Classified outcome of one purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum PurchaseResult {
    /// The target entitlement is active after the purchase.
    Success(PurchaserInfo),
    /// The provider reported an error. Not retried.
    Failure(ProviderError),
    /// The provider flagged the purchase as cancelled by the user.
    Cancelled,
    /// The call completed without error, but the entitlement was not granted.
    NotGranted,
}

impl PurchaseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PurchaseResult::Success(_))
    }

    /// Short label for logs; matches the serialized `outcome` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseResult::Success(_) => "success",
            PurchaseResult::Failure(_) => "failure",
            PurchaseResult::Cancelled => "cancelled",
            PurchaseResult::NotGranted => "not_granted",
        }
    }

    /// Purchaser info reported with the outcome, if any.
    pub fn purchaser_info(&self) -> Option<&PurchaserInfo> {
        match self {
            PurchaseResult::Success(info) => Some(info),
            _ => None,
        }
    }
}

/// Classify a provider purchase response against the target entitlement.
///
/// Priority: provider error, then entitlement granted, then the provider's
/// cancellation flag, otherwise not granted.
pub fn classify_purchase(
    target: &EntitlementKey,
    response: Result<PurchaseCompletion, ProviderError>,
) -> PurchaseResult {
    match response {
        Err(err) => PurchaseResult::Failure(err),
        Ok(completion) if completion.purchaser_info.is_entitled_to(target) => {
            PurchaseResult::Success(completion.purchaser_info)
        }
        Ok(completion) if completion.user_cancelled => PurchaseResult::Cancelled,
        Ok(_) => PurchaseResult::NotGranted,
    }
}
