use std::io;

use thiserror::Error;

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigDeserializeError(value.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(value: toml::ser::Error) -> Self {
        Self::ConfigSerializeError(value.to_string())
    }
}

impl Error {
    /// If the exchange that produced this error may be attempted again on a
    /// fresh connection. Everything else is fatal for the connection or the
    /// session that raised it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RetryableTransport | Self::IO(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("The peer closed the connection before sending a response")]
    RetryableTransport,

    #[error("No HTTP request entry found, there is nothing to match a response to")]
    ProtocolViolation,

    #[error("Contract violation: {0}")]
    ContractViolation(&'static str),

    #[error("The HTTP header is larger than the limit of {0} bytes")]
    HeaderTooLarge(usize),

    #[error("Could not parse the HTTP response header: {0}")]
    MalformedHeader(#[from] httparse::Error),

    #[error("IO error")]
    IO(#[from] io::Error),

    #[error(
        "Could not open the folder `{0}`. Please make sure the program has \
         permission to open it and that the folder exist"
    )]
    FolderOpenError(String),

    #[error(
        "Tried to load $HOME but could not find it. Please make sure you have \
         a $HOME env and that this program has the permission to create dirs."
    )]
    HomeInvalid,

    #[error(
        "Error while trying to read the configuration file, please make sure \
         it has the correct format: {0}"
    )]
    ConfigDeserializeError(String),

    #[error("Could not write the configuration file: {0}")]
    ConfigSerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::RetryableTransport.is_retryable());
        assert!(Error::IO(io::ErrorKind::ConnectionReset.into()).is_retryable());
        assert!(!Error::ProtocolViolation.is_retryable());
        assert!(!Error::ContractViolation("dispatcher").is_retryable());
        assert!(!Error::HeaderTooLarge(8192).is_retryable());
    }
}
