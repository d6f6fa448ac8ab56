use super::{HttpHeader, HttpRequest};

/// The header section of a response, paired with the request it answers.
///
/// Built once the header section is complete and never modified after that.
/// The body, if any, is still unread on the socket.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    cuid: u64,
    header: HttpHeader,
    request: HttpRequest,
}

impl HttpResponse {
    pub(crate) fn new(cuid: u64, header: HttpHeader, request: HttpRequest) -> Self {
        Self {
            cuid,
            header,
            request,
        }
    }

    /// Id of the connection that received this response.
    pub fn cuid(&self) -> u64 {
        self.cuid
    }

    pub fn header(&self) -> &HttpHeader {
        &self.header
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn status_code(&self) -> u16 {
        self.header.code
    }

    pub fn into_parts(self) -> (HttpHeader, HttpRequest) {
        (self.header, self.request)
    }
}
