use std::{
    io::{self, Read, Write},
    net::TcpStream,
};

use crate::error::Error;

/// A connected, non-blocking byte stream.
///
/// None of the methods ever wait. When the stream has nothing to give or
/// cannot take more bytes they return `0` and raise [`Socket::want_read`] or
/// [`Socket::want_write`]. A `0` with neither flag raised means the remote
/// end closed the stream.
pub trait Socket {
    /// Copy readable bytes into `buf` without consuming them.
    fn peek_data(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Consume readable bytes into `buf`.
    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Write as much of `buf` as the stream accepts right now.
    fn write_data(&mut self, buf: &[u8]) -> Result<usize, Error>;

    /// The last peek or read stopped because there was nothing to read.
    fn want_read(&self) -> bool;

    /// The last write stopped because the stream could not take more bytes.
    fn want_write(&self) -> bool;
}

/// [`Socket`] over a plain TCP stream switched to non-blocking mode.
#[derive(Debug)]
pub struct NonBlockingTcp {
    stream: TcpStream,
    want_read: bool,
    want_write: bool,
}

impl NonBlockingTcp {
    pub fn new(stream: TcpStream) -> Result<Self, Error> {
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream,
            want_read: false,
            want_write: false,
        })
    }

    pub fn get_ref(&self) -> &TcpStream {
        &self.stream
    }

    pub fn into_inner(self) -> TcpStream {
        self.stream
    }

    fn readable(&mut self, r: io::Result<usize>) -> Result<usize, Error> {
        self.want_read = false;
        match r {
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                self.want_read = true;
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Socket for NonBlockingTcp {
    fn peek_data(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let r = self.stream.peek(buf);
        self.readable(r)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let r = self.stream.read(buf);
        self.readable(r)
    }

    fn write_data(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.want_write = false;
        match self.stream.write(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                self.want_write = true;
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn want_read(&self) -> bool {
        self.want_read
    }

    fn want_write(&self) -> bool {
        self.want_write
    }
}
