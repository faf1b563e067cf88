//! Pairing Token Storage
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::TvTokenStore;
//! use bridge_traits::art::TvAddress;
//! use std::sync::Arc;
//! # use bridge_traits::storage::SecureStore;
//! # async fn example(secure_store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
//! let tokens = TvTokenStore::new(secure_store);
//! let tv = TvAddress::parse("192.168.1.20").unwrap();
//!
//! tokens.store_token(&tv, "12345678").await?;
//! assert_eq!(tokens.retrieve_token(&tv).await?.as_deref(), Some("12345678"));
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use async_trait::async_trait;
use bridge_traits::art::{PairingTokenStore, TvAddress};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "tv_";

/// Pairing tokens keyed by TV address.
///
/// Token values are never logged.
#[derive(Clone)]
pub struct TvTokenStore {
    secure_store: Arc<dyn SecureStore>,
}

impl TvTokenStore {
    pub fn new(secure_store: Arc<dyn SecureStore>) -> Self {
        debug!("Initializing TvTokenStore");
        Self { secure_store }
    }

    /// Store the token issued by `tv`, replacing any previous one.
    pub async fn store_token(&self, tv: &TvAddress, token: &str) -> Result<()> {
        self.secure_store
            .set_secret(&tv.storage_key(), token.as_bytes())
            .await
            .map_err(|e| {
                warn!(tv = %tv, error = %e, "Failed to store pairing token");
                AuthError::SecureStorageUnavailable(e.to_string())
            })?;

        info!(tv = %tv, "Pairing token stored");
        Ok(())
    }

    /// Token for `tv`, or `None` if the TV was never paired.
    ///
    /// # Errors
    ///
    /// A token that is not valid UTF-8 or is blank is deleted and reported as
    /// [`AuthError::TokenCorrupted`]; the next connection will pair again.
    pub async fn retrieve_token(&self, tv: &TvAddress) -> Result<Option<String>> {
        let key = tv.storage_key();

        let data = self.secure_store.get_secret(&key).await.map_err(|e| {
            warn!(tv = %tv, error = %e, "Failed to read pairing token");
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        let Some(data) = data else {
            debug!(tv = %tv, "No pairing token stored");
            return Ok(None);
        };

        let reason = match String::from_utf8(data) {
            Ok(token) if !token.trim().is_empty() => return Ok(Some(token.trim().to_string())),
            Ok(_) => "token is empty".to_string(),
            Err(e) => e.to_string(),
        };

        warn!(tv = %tv, reason = %reason, "Discarding corrupted pairing token");
        if let Err(delete_err) = self.secure_store.delete_secret(&key).await {
            warn!(tv = %tv, error = %delete_err, "Failed to delete corrupted pairing token");
        }

        Err(AuthError::TokenCorrupted {
            tv: tv.to_string(),
            reason,
        })
    }

    /// Forget the token for `tv`. Idempotent.
    pub async fn delete_token(&self, tv: &TvAddress) -> Result<()> {
        self.secure_store
            .delete_secret(&tv.storage_key())
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        info!(tv = %tv, "Pairing token deleted");
        Ok(())
    }

    /// Storage keys of every TV with a stored token.
    pub async fn list_paired(&self) -> Result<Vec<String>> {
        let keys = self.secure_store.list_keys().await.map_err(|e| {
            warn!(error = %e, "Failed to list pairing tokens");
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        Ok(keys
            .into_iter()
            .filter(|key| key.starts_with(KEY_PREFIX))
            .collect())
    }
}

#[async_trait]
impl PairingTokenStore for TvTokenStore {
    async fn load_token(&self, address: &TvAddress) -> BridgeResult<Option<String>> {
        match self.retrieve_token(address).await {
            Ok(token) => Ok(token),
            Err(AuthError::TokenCorrupted { .. }) => Ok(None),
            Err(e) => Err(BridgeError::OperationFailed(e.to_string())),
        }
    }

    async fn save_token(&self, address: &TvAddress, token: &str) -> BridgeResult<()> {
        self.store_token(address, token)
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        secrets: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl SecureStore for MemoryStore {
        async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
            self.secrets
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
            Ok(self.secrets.lock().unwrap().get(key).cloned())
        }

        async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
            self.secrets.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            let mut keys: Vec<_> = self.secrets.lock().unwrap().keys().cloned().collect();
            keys.sort();
            Ok(keys)
        }
    }

    mock! {
        FailingStore {}

        #[async_trait]
        impl SecureStore for FailingStore {
            async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()>;
            async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>>;
            async fn delete_secret(&self, key: &str) -> BridgeResult<()>;
            async fn list_keys(&self) -> BridgeResult<Vec<String>>;
        }
    }

    fn tv(addr: &str) -> TvAddress {
        TvAddress::parse(addr).unwrap()
    }

    #[core_async::test]
    async fn test_store_and_retrieve() {
        let store = TvTokenStore::new(Arc::new(MemoryStore::default()));
        let living_room = tv("192.168.1.20");

        assert_eq!(store.retrieve_token(&living_room).await.unwrap(), None);

        store.store_token(&living_room, "11111").await.unwrap();
        store.store_token(&living_room, "22222").await.unwrap();

        assert_eq!(
            store.retrieve_token(&living_room).await.unwrap().as_deref(),
            Some("22222")
        );
        assert_eq!(store.list_paired().await.unwrap(), vec!["tv_192_168_1_20"]);

        store.delete_token(&living_room).await.unwrap();
        assert_eq!(store.retrieve_token(&living_room).await.unwrap(), None);
    }

    #[core_async::test]
    async fn test_tokens_are_per_tv() {
        let store = TvTokenStore::new(Arc::new(MemoryStore::default()));
        store.store_token(&tv("10.0.0.2"), "aaa").await.unwrap();

        assert_eq!(store.retrieve_token(&tv("10.0.0.3")).await.unwrap(), None);
        assert_eq!(
            store.load_token(&tv("10.0.0.2")).await.unwrap().as_deref(),
            Some("aaa")
        );
    }

    #[core_async::test]
    async fn test_corrupted_token_is_discarded() {
        let backing = Arc::new(MemoryStore::default());
        backing
            .set_secret("tv_10_0_0_2", &[0xff, 0xfe])
            .await
            .unwrap();
        let store = TvTokenStore::new(backing.clone());

        let err = store.retrieve_token(&tv("10.0.0.2")).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenCorrupted { .. }));
        assert!(!backing.has_secret("tv_10_0_0_2").await.unwrap());

        // The gateway-facing view treats it as "not paired yet".
        backing.set_secret("tv_10_0_0_2", b"   ").await.unwrap();
        assert_eq!(store.load_token(&tv("10.0.0.2")).await.unwrap(), None);
    }

    #[core_async::test]
    async fn test_storage_failure_surfaces() {
        let mut failing = MockFailingStore::new();
        failing
            .expect_get_secret()
            .with(eq("tv_10_0_0_9"))
            .returning(|_| Err(BridgeError::NotAvailable("locked".to_string())));

        let store = TvTokenStore::new(Arc::new(failing));

        assert!(matches!(
            store.retrieve_token(&tv("10.0.0.9")).await,
            Err(AuthError::SecureStorageUnavailable(_))
        ));
        assert!(store.load_token(&tv("10.0.0.9")).await.is_err());
    }
}
