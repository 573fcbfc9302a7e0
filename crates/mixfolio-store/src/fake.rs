// SPDX-License-Identifier: Apache-2.0

use crate::{AssetKey, AssetStore, StoreError, StoreErrorCode};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// In-memory store for tests. Keys can be scripted to fail a number of
/// times before succeeding, or to fail forever.
#[derive(Default)]
pub struct FakeAssetStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub transient_failures: Mutex<HashMap<String, u32>>,
    pub broken: Mutex<HashSet<String>>,
    pub exists_calls: AtomicU64,
    pub read_calls: AtomicU64,
    pub checked_keys: Mutex<Vec<String>>,
}

impl FakeAssetStore {
    pub async fn insert(&self, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), bytes.to_vec());
    }

    pub async fn fail_transiently(&self, key: &str, times: u32) {
        self.transient_failures
            .lock()
            .await
            .insert(key.to_string(), times);
    }

    pub async fn break_key(&self, key: &str) {
        self.broken.lock().await.insert(key.to_string());
    }

    async fn injected_failure(&self, key: &AssetKey) -> Option<StoreError> {
        if self.broken.lock().await.contains(key.as_str()) {
            return Some(StoreError::new(
                StoreErrorCode::Io,
                format!("injected persistent failure for {key}"),
            ));
        }
        let mut transient = self.transient_failures.lock().await;
        if let Some(remaining) = transient.get_mut(key.as_str()) {
            if *remaining > 0 {
                *remaining -= 1;
                return Some(StoreError::new(
                    StoreErrorCode::Network,
                    format!("injected transient failure for {key}"),
                ));
            }
        }
        None
    }
}

#[async_trait]
impl AssetStore for FakeAssetStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        self.checked_keys.lock().await.push(key.to_string());
        if let Some(err) = self.injected_failure(key).await {
            return Err(err);
        }
        Ok(self.objects.lock().await.contains_key(key.as_str()))
    }

    async fn read(&self, key: &AssetKey) -> Result<Vec<u8>, StoreError> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        self.objects
            .lock()
            .await
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorCode::NotFound, format!("{key} missing")))
    }
}
