// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store, checkout, and exporter mocks.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use emipro_core::traits::{CheckoutAdapter, ExportAdapter, PluginAdapter, SessionStore};
use emipro_core::types::{
    AdapterType, CheckoutRequest, CheckoutSession, ExportOutput, ExportRequest, HealthStatus,
};
use emipro_core::EmiproError;

macro_rules! mock_plugin {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), EmiproError> {
                Ok(())
            }
        }
    };
}

// --- Session store ---

/// A [`SessionStore`] backed by a `HashMap`.
///
/// [`MemoryStore::unavailable`] builds one whose writes always fail, like a
/// disabled or full store. [`MemoryStore::unreadable`] fails on reads instead.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes_fail: bool,
    reads_fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            writes_fail: true,
            ..Self::default()
        }
    }

    pub fn unreadable() -> Self {
        Self {
            reads_fail: true,
            ..Self::default()
        }
    }

    /// Reads a value without consuming it.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }
}

mock_plugin!(MemoryStore, "memory-store", AdapterType::Storage);

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), EmiproError> {
        if self.writes_fail {
            return Err(EmiproError::storage("store is unavailable"));
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, EmiproError> {
        if self.reads_fail {
            return Err(EmiproError::storage("store cannot be read"));
        }
        Ok(self.values.lock().await.remove(key))
    }

    async fn remove(&self, key: &str) -> Result<(), EmiproError> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

// --- Checkout ---

/// A [`CheckoutAdapter`] that records requests and returns a fixed redirect.
#[derive(Clone, Default)]
pub struct MockCheckout {
    requests: Arc<Mutex<Vec<CheckoutRequest>>>,
    failure: Option<fn() -> EmiproError>,
}

impl MockCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every checkout fails with the error `make` builds.
    pub fn failing(make: fn() -> EmiproError) -> Self {
        Self {
            failure: Some(make),
            ..Self::default()
        }
    }

    pub async fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().await.clone()
    }
}

mock_plugin!(MockCheckout, "mock-checkout", AdapterType::Checkout);

#[async_trait]
impl CheckoutAdapter for MockCheckout {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, EmiproError> {
        self.requests.lock().await.push(request);
        if let Some(make) = self.failure {
            return Err(make());
        }
        Ok(CheckoutSession {
            id: "cs_mock".to_string(),
            redirect_url: "https://checkout.example/pay/cs_mock".to_string(),
        })
    }
}

// --- Export ---

/// An [`ExportAdapter`] that records requests instead of writing files.
#[derive(Clone, Default)]
pub struct MockExporter {
    requests: Arc<Mutex<Vec<ExportRequest>>>,
    fail: bool,
}

impl MockExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn requests(&self) -> Vec<ExportRequest> {
        self.requests.lock().await.clone()
    }
}

mock_plugin!(MockExporter, "mock-exporter", AdapterType::Export);

#[async_trait]
impl ExportAdapter for MockExporter {
    async fn export(&self, request: ExportRequest) -> Result<ExportOutput, EmiproError> {
        let path = PathBuf::from(&request.file_name);
        self.requests.lock().await.push(request);
        if self.fail {
            return Err(EmiproError::export("mock export failure"));
        }
        Ok(ExportOutput { path, pages: 3 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_take_is_single_use() {
        let store = MemoryStore::new();
        store.put("k", "v").await.unwrap();
        assert_eq!(store.take("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_store_rejects_writes() {
        let store = MemoryStore::unavailable();
        assert!(matches!(
            store.put("k", "v").await,
            Err(EmiproError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn failing_checkout_still_records_request() {
        let checkout = MockCheckout::failing(|| EmiproError::checkout("card declined"));
        let request = CheckoutRequest {
            price_id: "p".into(),
            quantity: 1,
            success_url: "s".into(),
            cancel_url: "c".into(),
        };
        assert!(checkout.create_checkout(request).await.is_err());
        assert_eq!(checkout.requests().await.len(), 1);
    }
}
