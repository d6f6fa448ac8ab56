use tokio::time::Instant;

/// Exponential Moving Average (EMA) smoothing factor
/// Higher values = more responsive to changes, lower values = smoother
const EMA_ALPHA: f64 = 0.3;

/// Transfer statistics of one peer session.
///
/// Only mutated through explicit calls, the owner decides when a rate window
/// is closed by calling [`PeerStat::update_rates`].
#[derive(Debug, Clone)]
pub struct PeerStat {
    // -- cumulative counters --
    session_downloaded: u64,
    session_uploaded: u64,

    // -- rate calculation --
    download_rate: u64,
    upload_rate: u64,

    // -- internal state --
    window_downloaded: u64,
    window_uploaded: u64,
    last_update: Instant,
    ema_download: f64,
    ema_upload: f64,
}

impl PeerStat {
    pub fn new(now: Instant) -> Self {
        Self {
            session_downloaded: 0,
            session_uploaded: 0,
            download_rate: 0,
            upload_rate: 0,
            window_downloaded: 0,
            window_uploaded: 0,
            last_update: now,
            ema_download: 0.0,
            ema_upload: 0.0,
        }
    }

    pub fn update_download_length(&mut self, bytes: u64) {
        self.session_downloaded += bytes;
        self.window_downloaded += bytes;
    }

    pub fn update_upload_length(&mut self, bytes: u64) {
        self.session_uploaded += bytes;
        self.window_uploaded += bytes;
    }

    pub fn session_download_length(&self) -> u64 {
        self.session_downloaded
    }

    pub fn session_upload_length(&self) -> u64 {
        self.session_uploaded
    }

    /// Smoothed download rate in bytes/sec.
    pub fn download_rate(&self) -> u64 {
        self.download_rate
    }

    /// Smoothed upload rate in bytes/sec.
    pub fn upload_rate(&self) -> u64 {
        self.upload_rate
    }

    /// Close the current window and fold its rates into the EMA.
    pub fn update_rates(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        if elapsed < 0.001 {
            // Minimum 1ms elapsed
            return;
        }

        let downloaded = std::mem::take(&mut self.window_downloaded);
        let uploaded = std::mem::take(&mut self.window_uploaded);

        let dl_rate = downloaded as f64 / elapsed;
        let ul_rate = uploaded as f64 / elapsed;

        self.ema_download = if self.ema_download == 0.0 {
            dl_rate
        } else {
            EMA_ALPHA * dl_rate + (1.0 - EMA_ALPHA) * self.ema_download
        };

        self.ema_upload = if self.ema_upload == 0.0 {
            ul_rate
        } else {
            EMA_ALPHA * ul_rate + (1.0 - EMA_ALPHA) * self.ema_upload
        };

        self.download_rate = self.ema_download as u64;
        self.upload_rate = self.ema_upload as u64;

        self.last_update = now;
    }
}
