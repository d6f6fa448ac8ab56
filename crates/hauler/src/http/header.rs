use bytes::BytesMut;

use crate::error::Error;

/// The blank line that ends the header section.
const DELIMITER: &[u8] = b"\r\n\r\n";

/// How many headers a response may carry.
const MAX_HEADERS: usize = 128;

/// Finds the end of a response header section in bytes that arrive in
/// arbitrary chunks.
///
/// Every byte must be fed exactly once. The delimiter may straddle two
/// chunks, so each scan restarts a few bytes before the previous end.
/// Whatever was fed past the delimiter belongs to the body and is reported
/// by [`HeaderProcessor::put_back_len`].
#[derive(Debug)]
pub struct HeaderProcessor {
    buf: BytesMut,
    limit: usize,
    /// Offset right after the delimiter, once it was found.
    header_end: Option<usize>,
}

impl HeaderProcessor {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit,
            header_end: None,
        }
    }

    /// Feed the next chunk, returns true when the header section is
    /// complete. Bytes fed after completion are ignored.
    pub fn update(&mut self, data: &[u8]) -> Result<bool, Error> {
        if self.header_end.is_some() {
            return Ok(true);
        }

        let scan_from = self.buf.len().saturating_sub(DELIMITER.len() - 1);
        self.buf.extend_from_slice(data);

        let found = self.buf[scan_from..]
            .windows(DELIMITER.len())
            .position(|w| w == DELIMITER);

        match found {
            Some(pos) => {
                let end = scan_from + pos + DELIMITER.len();
                if end > self.limit {
                    return Err(Error::HeaderTooLarge(self.limit));
                }
                self.header_end = Some(end);
                Ok(true)
            }
            None if self.buf.len() > self.limit => {
                Err(Error::HeaderTooLarge(self.limit))
            }
            None => Ok(false),
        }
    }

    /// End of header reached.
    pub fn eoh(&self) -> bool {
        self.header_end.is_some()
    }

    /// Bytes fed past the end of the header section.
    pub fn put_back_len(&self) -> usize {
        self.header_end.map_or(0, |end| self.buf.len() - end)
    }

    /// The header section as text, including the terminating blank line.
    /// Before completion this is everything fed so far.
    pub fn header_string(&self) -> String {
        let end = self.header_end.unwrap_or(self.buf.len());
        String::from_utf8_lossy(&self.buf[..end]).into_owned()
    }

    /// Parse the complete header section.
    pub fn response_header(&self) -> Result<HttpHeader, Error> {
        let end =
            self.header_end.ok_or(Error::ContractViolation("response header is not complete"))?;

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut res = httparse::Response::new(&mut headers);

        if res.parse(&self.buf[..end])?.is_partial() {
            return Err(Error::ContractViolation("response header is not complete"));
        }

        Ok(HttpHeader {
            version: res.version.unwrap_or(1),
            code: res.code.unwrap_or_default(),
            reason: res.reason.unwrap_or_default().to_owned(),
            fields: res
                .headers
                .iter()
                .map(|h| (h.name.to_owned(), String::from_utf8_lossy(h.value).trim().to_owned()))
                .collect(),
        })
    }
}

/// Status line and fields of a response, in the order they were received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpHeader {
    /// Minor version, `1` for HTTP/1.1.
    pub version: u8,
    pub code: u16,
    pub reason: String,
    pub fields: Vec<(String, String)>,
}

impl HttpHeader {
    /// First value of the field `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of the field `name`, in the order they were received.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.get("Content-Length").and_then(|v| v.parse().ok())
    }

    pub fn is_chunked(&self) -> bool {
        self.get_all("Transfer-Encoding")
            .any(|v| v.to_ascii_lowercase().contains("chunked"))
    }

    pub fn is_keep_alive(&self) -> bool {
        match self.get("Connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version >= 1,
        }
    }
}
