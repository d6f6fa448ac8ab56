use base64::{engine::general_purpose::STANDARD, Engine as _};

/// A contiguous byte range of the download, assigned to one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    /// Index of the segment in the download.
    pub index: usize,
    /// Offset of the first byte.
    pub position: u64,
    /// Length in bytes, `0` means up to the end of the content.
    pub length: u64,
}

impl Segment {
    pub fn new(index: usize, position: u64, length: u64) -> Self {
        Self {
            index,
            position,
            length,
        }
    }

    /// Value of the `Range` header that asks for this segment.
    pub fn range(&self) -> String {
        if self.length == 0 {
            format!("bytes={}-", self.position)
        } else {
            format!("bytes={}-{}", self.position, self.position + self.length - 1)
        }
    }
}

/// User and password sent with `Basic` authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn basic(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.user, self.password))
    }
}

/// A request to be written on an HTTP connection.
///
/// Built with the setters in the same fashion as
/// `HttpRequest::get("example.com", "/file").port(8080)`.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub user_agent: String,
    /// Extra fields, written after the standard ones.
    pub headers: Vec<(String, String)>,
    pub auth: Option<Credentials>,
    pub proxy_auth: Option<Credentials>,
    pub segment: Option<Segment>,
}

impl HttpRequest {
    pub const DEFAULT_PORT: u16 = 80;
    pub const USER_AGENT: &'static str = concat!("hauler/", env!("CARGO_PKG_VERSION"));

    pub fn get(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_owned(),
            host: host.into(),
            port: Self::DEFAULT_PORT,
            path: path.into(),
            user_agent: Self::USER_AGENT.to_owned(),
            headers: Vec::new(),
            auth: None,
            proxy_auth: None,
            segment: None,
        }
    }
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
    pub fn auth(mut self, credentials: Credentials) -> Self {
        self.auth = Some(credentials);
        self
    }
    pub fn proxy_auth(mut self, credentials: Credentials) -> Self {
        self.proxy_auth = Some(credentials);
        self
    }
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segment = Some(segment);
        self
    }

    /// `host` or `host:port` when the port is not the default one.
    fn host_field(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Serialize into an HTTP/1.1 request to the origin server.
    pub fn create_request(&self) -> String {
        let mut req = String::with_capacity(256);
        req.push_str(&format!("{} {} HTTP/1.1\r\n", self.method, self.path));
        req.push_str(&format!("User-Agent: {}\r\n", self.user_agent));
        req.push_str("Accept: */*\r\n");
        req.push_str(&format!("Host: {}\r\n", self.host_field()));

        if let Some(segment) = &self.segment {
            req.push_str(&format!("Range: {}\r\n", segment.range()));
        }
        if let Some(auth) = &self.auth {
            req.push_str(&format!("Authorization: Basic {}\r\n", auth.basic()));
        }
        for (name, value) in &self.headers {
            req.push_str(&format!("{name}: {value}\r\n"));
        }

        req.push_str("\r\n");
        req
    }

    /// Serialize into a `CONNECT` request that asks a proxy to open a
    /// tunnel to the origin server.
    pub fn create_proxy_request(&self) -> String {
        let authority = format!("{}:{}", self.host, self.port);

        let mut req = String::with_capacity(128);
        req.push_str(&format!("CONNECT {authority} HTTP/1.1\r\n"));
        req.push_str(&format!("User-Agent: {}\r\n", self.user_agent));
        req.push_str(&format!("Host: {authority}\r\n"));
        req.push_str("Proxy-Connection: close\r\n");

        if let Some(auth) = &self.proxy_auth {
            req.push_str(&format!("Proxy-Authorization: Basic {}\r\n", auth.basic()));
        }

        req.push_str("\r\n");
        req
    }
}
