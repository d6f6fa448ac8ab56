//! A remote peer in the network that downloads and uploads data.
//!
//! [`PeerSession`] is the state kept for one connected peer. The wire layer
//! updates it as messages arrive and the choking policy reads it to decide
//! how the peer is treated.
pub mod extension;
pub mod fast;
mod session;
mod types;

// re-exports
pub use extension::ExtensionIds;
pub use fast::{allowed_fast_set, IndexSet};
pub use session::*;
pub use types::*;
