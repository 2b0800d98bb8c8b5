//! JSON store fixtures for the in-memory provider.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use upsell_catalog::{CatalogSnapshot, PurchaserInfo};
use upsell_core::ProductId;
use upsell_infra::{InMemoryPurchaseProvider, PurchaseScript};
use upsell_purchasing::ProviderError;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A store as seen by the paywall: its catalog, how purchases behave, and
/// what the user already owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFixture {
    pub catalog: CatalogSnapshot,
    /// Purchase behavior per product; unlisted products are granted.
    #[serde(default)]
    pub scripts: BTreeMap<ProductId, PurchaseScript>,
    /// When set, every catalog fetch fails with this error.
    #[serde(default)]
    pub fetch_error: Option<ProviderError>,
    #[serde(default)]
    pub purchaser: PurchaserInfo,
}

impl StoreFixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_provider(self) -> InMemoryPurchaseProvider {
        let mut provider =
            InMemoryPurchaseProvider::new(self.catalog).with_purchaser(self.purchaser);
        if let Some(err) = self.fetch_error {
            provider = provider.with_fetch_error(err);
        }
        self.scripts
            .into_iter()
            .fold(provider, |provider, (product_id, script)| {
                provider.with_script(product_id, script)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_fixture_needs_only_a_catalog() {
        let fixture: StoreFixture = serde_json::from_str(r#"{"catalog": {}}"#).unwrap();
        assert!(fixture.catalog.is_empty());
        assert!(fixture.scripts.is_empty());
        assert!(fixture.fetch_error.is_none());
    }

    #[test]
    fn scripts_are_keyed_by_product_id() {
        let fixture: StoreFixture = serde_json::from_str(
            r#"{
                "catalog": {},
                "scripts": {"cats.annual": {"behavior": "cancel"}}
            }"#,
        )
        .unwrap();
        assert_eq!(
            fixture.scripts.get("cats.annual"),
            Some(&PurchaseScript::Cancel)
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = StoreFixture::load(Path::new("/nonexistent/upsell-fixture.json")).unwrap_err();
        assert!(matches!(err, FixtureError::Read { .. }));
    }
}
