use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::{DispatcherRef, ExtensionIds, IndexSet, PieceOp};
use crate::{
    bitfield::{PieceBitfield, Reserved},
    config::Config,
    counter::PeerStat,
    error::Error,
};

/// Contains the state of both sides of the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreState {
    /// If we're choking, we don't allow the peer to download from us.
    pub am_choking: bool,

    /// If we're interested, peer has pieces that we don't have.
    pub am_interested: bool,

    /// If peer is choking, they don't allow us to download pieces from them.
    pub peer_choking: bool,

    /// If peer is interested in us, they mean to download pieces that we have.
    pub peer_interested: bool,
}

impl Default for CoreState {
    /// By default, both sides of the connection start off as choked and not
    /// interested in the other.
    fn default() -> Self {
        Self {
            am_choking: true,
            am_interested: false,
            peer_choking: true,
            peer_interested: false,
        }
    }
}

/// Holds and provides facilities to modify the state of a peer session.
///
/// Created when the connection with the peer is established and dropped
/// when it closes. Nothing in here changes on its own: timestamps are
/// captured by the caller and passed in, counters only move when told to.
#[derive(Debug)]
pub struct PeerSession {
    state: CoreState,

    /// Recommendation of the choking policy.
    choking_required: bool,

    /// Overrides `choking_required` while the peer is optimistically
    /// unchoked.
    opt_unchoking: bool,

    /// The peer stopped sending us data.
    snubbing: bool,

    /// Pieces the peer has.
    bitfield: PieceBitfield,

    /// Pieces the peer allows us to request while we are choked.
    peer_allowed: IndexSet,

    /// Pieces we allow the peer to request while it is choked.
    am_allowed: IndexSet,

    extensions: ExtensionIds,

    fast_extension_enabled: bool,
    extended_messaging_enabled: bool,
    dht_enabled: bool,

    latency: Duration,

    /// Last time we started unchoking the peer.
    last_am_unchoking: Option<Instant>,

    /// Last time the peer sent us a piece of data.
    last_download_update: Option<Instant>,

    stat: PeerStat,

    dispatcher: Option<DispatcherRef>,
}

impl PeerSession {
    /// Latency of a peer before the first sample.
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(Config::DEFAULT_LATENCY_MS);

    /// `piece_length` and `total_length` of the torrent size the bitfield of
    /// the peer, `now` opens the first transfer rate window.
    pub fn new(piece_length: usize, total_length: u64, now: Instant) -> Self {
        Self {
            state: CoreState::default(),
            choking_required: true,
            opt_unchoking: false,
            snubbing: false,
            bitfield: PieceBitfield::new(piece_length, total_length),
            peer_allowed: IndexSet::new(),
            am_allowed: IndexSet::new(),
            extensions: ExtensionIds::new(),
            fast_extension_enabled: false,
            extended_messaging_enabled: false,
            dht_enabled: false,
            latency: Self::DEFAULT_LATENCY,
            last_am_unchoking: None,
            last_download_update: None,
            stat: PeerStat::new(now),
            dispatcher: None,
        }
    }

    pub fn with_config(
        piece_length: usize,
        total_length: u64,
        config: &Config,
        now: Instant,
    ) -> Self {
        let mut session = Self::new(piece_length, total_length, now);
        session.latency = Duration::from_millis(config.initial_latency_ms);
        session
    }

    pub fn state(&self) -> CoreState {
        self.state
    }

    // -- choking and interest --

    pub fn am_choking(&self) -> bool {
        self.state.am_choking
    }

    /// Unchoking the peer records `now` as the moment we started uploading
    /// to it.
    pub fn set_am_choking(&mut self, choking: bool, now: Instant) {
        self.state.am_choking = choking;
        if !choking {
            self.last_am_unchoking = Some(now);
        }
    }

    pub fn am_interested(&self) -> bool {
        self.state.am_interested
    }

    pub fn set_am_interested(&mut self, interested: bool) {
        self.state.am_interested = interested;
    }

    pub fn peer_choking(&self) -> bool {
        self.state.peer_choking
    }

    pub fn set_peer_choking(&mut self, choking: bool) {
        self.state.peer_choking = choking;
    }

    pub fn peer_interested(&self) -> bool {
        self.state.peer_interested
    }

    pub fn set_peer_interested(&mut self, interested: bool) {
        self.state.peer_interested = interested;
    }

    pub fn choking_required(&self) -> bool {
        self.choking_required
    }

    pub fn set_choking_required(&mut self, required: bool) {
        self.choking_required = required;
    }

    pub fn opt_unchoking(&self) -> bool {
        self.opt_unchoking
    }

    pub fn set_opt_unchoking(&mut self, opt: bool) {
        self.opt_unchoking = opt;
    }

    /// An optimistic unchoke always wins over the choking policy.
    pub fn should_choke(&self) -> bool {
        !self.opt_unchoking && self.choking_required
    }

    pub fn is_snubbed(&self) -> bool {
        self.snubbing
    }

    /// A snubbed peer is choked and never optimistically unchoked.
    pub fn set_snubbed(&mut self, snubbed: bool) {
        self.snubbing = snubbed;
        if snubbed {
            debug!("peer snubbed, choking required");
            self.choking_required = true;
            self.opt_unchoking = false;
        }
    }

    pub fn last_am_unchoking(&self) -> Option<Instant> {
        self.last_am_unchoking
    }

    // -- pieces --

    pub fn has_all_pieces(&self) -> bool {
        self.bitfield.all_set()
    }

    /// Indices out of range are ignored.
    pub fn update_bitfield(&mut self, index: usize, op: PieceOp) {
        match op {
            PieceOp::Set => self.bitfield.set(index),
            PieceOp::Unset => self.bitfield.unset(index),
        };
    }

    /// Replace the pieces of the peer with the payload of a `bitfield`
    /// message. Returns false, and keeps the previous pieces, if the payload
    /// does not have the expected length.
    pub fn set_raw_bitfield(&mut self, raw: &[u8]) -> bool {
        self.bitfield.set_raw(raw)
    }

    pub fn raw_bitfield(&self) -> &[u8] {
        self.bitfield.as_raw()
    }

    pub fn raw_bitfield_len(&self) -> usize {
        self.bitfield.raw_len()
    }

    pub fn has_piece(&self, index: usize) -> bool {
        self.bitfield.is_set(index)
    }

    /// The peer has every piece, used for `have all` and when a seeder
    /// skips the bitfield.
    pub fn mark_as_seeder(&mut self) {
        self.bitfield.set_all();
    }

    /// Bytes covered by the pieces the peer has.
    pub fn completed_length(&self) -> u64 {
        self.bitfield.completed_length()
    }

    // -- fast extension --

    pub fn fast_extension_enabled(&self) -> bool {
        self.fast_extension_enabled
    }

    pub fn set_fast_extension_enabled(&mut self, enabled: bool) {
        self.fast_extension_enabled = enabled;
    }

    pub fn add_peer_allowed_index(&mut self, index: usize) {
        self.peer_allowed.insert(index);
    }

    pub fn peer_allowed_contains(&self, index: usize) -> bool {
        self.peer_allowed.contains(index)
    }

    pub fn peer_allowed_index_set(&self) -> &IndexSet {
        &self.peer_allowed
    }

    pub fn add_own_allowed_index(&mut self, index: usize) {
        self.am_allowed.insert(index);
    }

    pub fn own_allowed_contains(&self, index: usize) -> bool {
        self.am_allowed.contains(index)
    }

    pub fn own_allowed_index_set(&self) -> &IndexSet {
        &self.am_allowed
    }

    // -- extension protocol --

    pub fn extended_messaging_enabled(&self) -> bool {
        self.extended_messaging_enabled
    }

    pub fn set_extended_messaging_enabled(&mut self, enabled: bool) {
        self.extended_messaging_enabled = enabled;
    }

    pub fn register_extension(&mut self, name: impl Into<String>, id: u8) {
        self.extensions.register(name, id);
    }

    /// Returns `0` if the peer did not negotiate `name`.
    pub fn extension_id(&self, name: &str) -> u8 {
        self.extensions.id(name)
    }

    pub fn extension_name(&self, id: u8) -> Option<&str> {
        self.extensions.name(id)
    }

    pub fn extensions(&self) -> &ExtensionIds {
        &self.extensions
    }

    pub fn dht_enabled(&self) -> bool {
        self.dht_enabled
    }

    pub fn set_dht_enabled(&mut self, enabled: bool) {
        self.dht_enabled = enabled;
    }

    /// Set the capability flags from the reserved bytes of the peer's
    /// handshake.
    pub fn apply_reserved(&mut self, reserved: Reserved) {
        self.extended_messaging_enabled = reserved.supports_extended();
        self.fast_extension_enabled = reserved.supports_fast();
        self.dht_enabled = reserved.supports_dht();
    }

    // -- latency and transfer accounting --

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn update_latency(&mut self, sample: Duration) {
        self.latency = self.latency.mul_f64(0.2) + sample.mul_f64(0.8);
    }

    pub fn upload_length(&self) -> u64 {
        self.stat.session_upload_length()
    }

    pub fn record_upload(&mut self, bytes: u64) {
        self.stat.update_upload_length(bytes);
    }

    pub fn download_length(&self) -> u64 {
        self.stat.session_download_length()
    }

    /// Count `bytes` received from the peer, `now` is remembered as the last
    /// time the peer made progress.
    pub fn record_download(&mut self, bytes: u64, now: Instant) {
        self.stat.update_download_length(bytes);
        self.last_download_update = Some(now);
    }

    pub fn last_download_update(&self) -> Option<Instant> {
        self.last_download_update
    }

    /// Close the current transfer window, the choking policy calls this on
    /// every round before comparing peers.
    pub fn update_rates(&mut self, now: Instant) {
        self.stat.update_rates(now);
    }

    /// Smoothed bytes/sec received from the peer.
    pub fn download_rate(&self) -> u64 {
        self.stat.download_rate()
    }

    /// Smoothed bytes/sec sent to the peer.
    pub fn upload_rate(&self) -> u64 {
        self.stat.upload_rate()
    }

    pub fn stat(&self) -> &PeerStat {
        &self.stat
    }

    pub fn stat_mut(&mut self) -> &mut PeerStat {
        &mut self.stat
    }

    // -- dispatcher --

    pub fn attach_dispatcher(&mut self, dispatcher: DispatcherRef) {
        self.dispatcher = Some(dispatcher);
    }

    /// Block requests of the peer we have not answered yet.
    ///
    /// # Errors
    ///
    /// [`Error::ContractViolation`] if no dispatcher was attached, or if it
    /// was already dropped.
    pub fn outstanding_upload_count(&self) -> Result<usize, Error> {
        let dispatcher = self
            .dispatcher
            .as_ref()
            .ok_or(Error::ContractViolation("message dispatcher not attached"))?
            .upgrade()
            .ok_or(Error::ContractViolation("message dispatcher dropped"))?;

        Ok(dispatcher.count_outstanding_upload())
    }
}
