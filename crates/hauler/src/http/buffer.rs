use std::collections::VecDeque;

use bytes::{Buf, Bytes};
use tracing::debug;

use super::Socket;
use crate::error::Error;

/// Bytes waiting to be written to a non-blocking socket.
///
/// Whatever the socket does not accept stays queued, in order, until the
/// next [`SendBuffer::send`].
#[derive(Debug, Default)]
pub struct SendBuffer {
    queue: VecDeque<Bytes>,
}

impl SendBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `data` behind anything still pending.
    pub fn feed(&mut self, data: impl Into<Bytes>) {
        let data = data.into();
        if !data.is_empty() {
            self.queue.push_back(data);
        }
    }

    pub fn feed_and_send<S: Socket>(
        &mut self,
        data: impl Into<Bytes>,
        socket: &mut S,
    ) -> Result<(), Error> {
        self.feed(data);
        self.send(socket)
    }

    /// Write queued bytes until the queue is empty or the socket stops
    /// accepting them.
    pub fn send<S: Socket>(&mut self, socket: &mut S) -> Result<(), Error> {
        while let Some(front) = self.queue.front_mut() {
            let n = socket.write_data(front)?;
            if n == 0 {
                break;
            }
            front.advance(n);
            if front.is_empty() {
                self.queue.pop_front();
            }
        }
        if !self.is_empty() {
            debug!("{} bytes left in the send buffer", self.pending_len());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total of bytes not yet written.
    pub fn pending_len(&self) -> usize {
        self.queue.iter().map(Bytes::len).sum()
    }
}
