//! HTTP/1.1 connections that pipeline requests over one non-blocking
//! socket.
//!
//! Requests are written as soon as they are issued and responses are matched
//! to them strictly in send order, the remote end is trusted to answer in
//! that order. Nothing here blocks, [`HttpConnection::receive_response`] is
//! meant to be polled from an event loop until it yields a response.
mod buffer;
mod connection;
mod header;
mod request;
mod response;
mod socket;

// re-exports
pub use buffer::SendBuffer;
pub use connection::{erase_confidential_info, HttpConnection, Received};
pub use header::{HeaderProcessor, HttpHeader};
pub use request::{Credentials, HttpRequest, Segment};
pub use response::HttpResponse;
pub use socket::{NonBlockingTcp, Socket};
