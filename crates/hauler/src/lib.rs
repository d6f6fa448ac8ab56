//! Connection and session plumbing for a download engine that talks HTTP and
//! BitTorrent V1.
//!
//! This crate contains two building blocks that the engine drives from its
//! own event loop. Neither of them spawns tasks or blocks, they are polled.
//!
//! * [`http::HttpConnection`] pipelines HTTP/1.1 requests over a non-blocking
//!   socket and matches each response header to the oldest request in flight,
//!   leaving the body on the socket for whoever downloads it.
//! * [`peer::PeerSession`] holds everything the engine knows about one
//!   connected BitTorrent peer: choking and interest flags, the pieces the
//!   peer has, fast extension sets, extension ids, latency and transfer
//!   counters.
//!
//! # Example
//!
//! ```
//! use hauler::peer::{PeerSession, PieceOp};
//! use tokio::time::Instant;
//!
//! // 4 pieces of 16 KiB
//! let mut session = PeerSession::new(16384, 65536, Instant::now());
//!
//! session.set_peer_interested(true);
//! session.set_am_choking(false, Instant::now());
//! session.update_bitfield(2, PieceOp::Set);
//!
//! assert!(session.has_piece(2));
//! assert!(!session.am_choking());
//! ```

pub mod bitfield;
pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod peer;
