//! # Pairing Module
//!
//! Persistence of the pairing tokens a Frame TV issues the first time a
//! client connects. A TV prompts on screen only when it sees an unknown
//! client, so keeping the token across restarts is what makes unattended
//! sync possible.
//!
//! ## Features
//!
//! - One token per TV, keyed by the TV address (`tv_192_168_1_20`)
//! - Storage through the host's [`SecureStore`](bridge_traits::storage::SecureStore)
//! - Implements [`PairingTokenStore`](bridge_traits::art::PairingTokenStore)
//!   so gateways can load and save tokens directly

pub mod error;
pub mod token_store;

pub use error::{AuthError, Result};
pub use token_store::TvTokenStore;
