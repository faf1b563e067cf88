//! Shared fakes for the sync integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::art::{
    ArtConnector, ArtSession, ImageUpload, PairingTokenStore, RemoteArtwork, SlideshowKind,
    SlideshowSettings, TvAddress,
};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::matte::Matte;
use core_async::time::Duration;
use core_sync::{FileRecordStore, Reconciler, ReconcilerSettings};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

// ============================================================================
// Fake TV
// ============================================================================

/// Gateway call as observed by the fake TV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Upload { file: String, matte: Option<String> },
    Delete(String),
    Select(String),
    GetSlideshow,
    SetSlideshow(SlideshowSettings),
    SetBrightness(u8),
    Close,
}

#[derive(Debug)]
pub struct TvState {
    pub reachable: bool,
    pub gallery: BTreeMap<String, RemoteArtwork>,
    pub slideshow: SlideshowSettings,
    pub calls: Vec<Call>,
    next_id: u32,
    pub failing_uploads: HashSet<String>,
    pub failing_deletes: HashSet<String>,
    pub capture_fails: bool,
    pub listing_hangs: bool,
    pub listing_fails: bool,
    pub select_fails: bool,
    /// Connection drops right after the select-art request
    pub drop_on_select: bool,
    pub restore_fails: bool,
    pub brightness_fails: bool,
    /// The gateway panics while checking reachability of this TV
    pub reachability_panics: bool,
    /// Connection drops once this many uploads succeeded
    pub drop_after_uploads: Option<usize>,
    uploads_done: usize,
}

impl Default for TvState {
    fn default() -> Self {
        Self {
            reachable: true,
            gallery: BTreeMap::new(),
            slideshow: SlideshowSettings {
                enabled: true,
                interval_minutes: 3,
                kind: SlideshowKind::Sequential,
                category_id: "MY-C0002".to_string(),
            },
            calls: Vec::new(),
            next_id: 1,
            failing_uploads: HashSet::new(),
            failing_deletes: HashSet::new(),
            capture_fails: false,
            listing_hangs: false,
            listing_fails: false,
            select_fails: false,
            drop_on_select: false,
            restore_fails: false,
            brightness_fails: false,
            reachability_panics: false,
            drop_after_uploads: None,
            uploads_done: 0,
        }
    }
}

/// Handle to a fake TV shared between the connector and the test.
#[derive(Clone, Default)]
pub struct FakeTv {
    state: Arc<Mutex<TvState>>,
}

impl FakeTv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut TvState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|state| state.calls.clone())
    }

    pub fn clear_calls(&self) {
        self.with(|state| state.calls.clear());
    }

    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Upload { file, .. } => Some(file),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn gallery_ids(&self) -> Vec<String> {
        self.with(|state| state.gallery.keys().cloned().collect())
    }

    fn check_online(state: &TvState) -> BridgeResult<()> {
        if state.reachable {
            Ok(())
        } else {
            Err(BridgeError::Connectivity("connection reset".to_string()))
        }
    }
}

pub struct FakeSession {
    tv: FakeTv,
}

#[async_trait]
impl ArtSession for FakeSession {
    async fn list_remote_art(&self) -> BridgeResult<Vec<RemoteArtwork>> {
        let hangs = self.tv.with(|state| {
            state.calls.push(Call::List);
            state.listing_hangs
        });
        if hangs {
            std::future::pending::<()>().await;
        }
        self.tv.with(|state| {
            FakeTv::check_online(state)?;
            if state.listing_fails {
                return Err(BridgeError::OperationFailed("malformed listing".to_string()));
            }
            Ok(state.gallery.values().cloned().collect())
        })
    }

    async fn upload(&self, image: ImageUpload, matte: Matte) -> BridgeResult<String> {
        self.tv.with(|state| {
            state.calls.push(Call::Upload {
                file: image.file_name.clone(),
                matte: matte.wire_id(),
            });
            FakeTv::check_online(state)?;

            if state.failing_uploads.contains(&image.file_name) {
                return Err(BridgeError::OperationFailed("upload rejected".to_string()));
            }

            let id = format!("MY_F{:04}", state.next_id);
            state.next_id += 1;
            state.gallery.insert(
                id.clone(),
                RemoteArtwork {
                    content_id: id.clone(),
                    matte: matte.wire_id(),
                },
            );

            state.uploads_done += 1;
            if state.drop_after_uploads == Some(state.uploads_done) {
                state.reachable = false;
            }
            Ok(id)
        })
    }

    async fn delete(&self, content_id: &str) -> BridgeResult<()> {
        self.tv.with(|state| {
            state.calls.push(Call::Delete(content_id.to_string()));
            FakeTv::check_online(state)?;
            if state.failing_deletes.contains(content_id) {
                return Err(BridgeError::OperationFailed("delete rejected".to_string()));
            }
            state.gallery.remove(content_id);
            Ok(())
        })
    }

    async fn select_art(&self, content_id: &str) -> BridgeResult<()> {
        self.tv.with(|state| {
            state.calls.push(Call::Select(content_id.to_string()));
            if state.drop_on_select {
                state.reachable = false;
            }
            FakeTv::check_online(state)?;
            if state.select_fails {
                return Err(BridgeError::OperationFailed("unknown content id".to_string()));
            }
            Ok(())
        })
    }

    async fn get_slideshow_settings(&self) -> BridgeResult<SlideshowSettings> {
        self.tv.with(|state| {
            state.calls.push(Call::GetSlideshow);
            FakeTv::check_online(state)?;
            if state.capture_fails {
                return Err(BridgeError::OperationFailed("no slideshow status".to_string()));
            }
            Ok(state.slideshow.clone())
        })
    }

    async fn set_slideshow_settings(&self, settings: &SlideshowSettings) -> BridgeResult<()> {
        self.tv.with(|state| {
            state.calls.push(Call::SetSlideshow(settings.clone()));
            FakeTv::check_online(state)?;
            if state.restore_fails {
                return Err(BridgeError::OperationFailed("slideshow rejected".to_string()));
            }
            state.slideshow = settings.clone();
            Ok(())
        })
    }

    async fn set_brightness(&self, value: u8) -> BridgeResult<()> {
        self.tv.with(|state| {
            state.calls.push(Call::SetBrightness(value));
            FakeTv::check_online(state)?;
            if state.brightness_fails {
                return Err(BridgeError::OperationFailed("brightness rejected".to_string()));
            }
            Ok(())
        })
    }

    async fn close(&self) -> BridgeResult<()> {
        self.tv.with(|state| state.calls.push(Call::Close));
        Ok(())
    }
}

/// Connector over a fixed set of fake TVs.
#[derive(Clone, Default)]
pub struct FakeConnector {
    tvs: HashMap<TvAddress, FakeTv>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, address: &TvAddress, tv: FakeTv) {
        self.tvs.insert(address.clone(), tv);
    }
}

#[async_trait]
impl ArtConnector for FakeConnector {
    async fn is_reachable(&self, address: &TvAddress) -> bool {
        let Some(tv) = self.tvs.get(address) else {
            return false;
        };
        let (reachable, panics) =
            tv.with(|state| (state.reachable, state.reachability_panics));
        if panics {
            panic!("gateway bug while checking {}", address);
        }
        reachable
    }

    async fn connect(
        &self,
        address: &TvAddress,
        _tokens: Arc<dyn PairingTokenStore>,
    ) -> BridgeResult<Box<dyn ArtSession>> {
        let tv = self
            .tvs
            .get(address)
            .ok_or_else(|| BridgeError::Connectivity(format!("no route to {}", address)))?;
        tv.with(|state| FakeTv::check_online(state))?;
        Ok(Box::new(FakeSession { tv: tv.clone() }))
    }
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Default)]
pub struct MemoryTokens {
    tokens: Mutex<HashMap<TvAddress, String>>,
}

#[async_trait]
impl PairingTokenStore for MemoryTokens {
    async fn load_token(&self, address: &TvAddress) -> BridgeResult<Option<String>> {
        Ok(self.tokens.lock().unwrap().get(address).cloned())
    }

    async fn save_token(&self, address: &TvAddress, token: &str) -> BridgeResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(address.clone(), token.to_string());
        Ok(())
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn tv_address(value: &str) -> TvAddress {
    TvAddress::parse(value).unwrap()
}

/// Settings without pauses and with a short timeout.
pub fn fast_settings() -> ReconcilerSettings {
    ReconcilerSettings {
        call_timeout: Duration::from_millis(200),
        upload_delay: Duration::ZERO,
        delete_delay: Duration::ZERO,
        ..ReconcilerSettings::default()
    }
}

pub fn record_store(token_dir: &Path) -> Arc<FileRecordStore> {
    Arc::new(FileRecordStore::new(
        Arc::new(TokioFileSystem::new()),
        token_dir,
    ))
}

pub fn reconciler(
    connector: FakeConnector,
    token_dir: &Path,
    settings: ReconcilerSettings,
) -> Reconciler {
    Reconciler::new(
        Arc::new(connector),
        Arc::new(MemoryTokens::default()),
        record_store(token_dir),
        Arc::new(TokioFileSystem::new()),
        settings,
    )
}

pub fn write_picture(dir: &Path, name: &str, content: &[u8]) {
    std::fs::write(dir.join(name), content).unwrap();
}
