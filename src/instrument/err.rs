use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    /// The device was not there or refused the connection.
    #[fail(display = "no polarimeter found: {}", _0)]
    DeviceNotFound(String),
    /// An already connected device failed to deliver a reading.
    #[fail(display = "polarimeter reading failed: {}", _0)]
    ReadFailure(String),
}

impl Error {
    pub fn device_not_found(detail: impl Into<String>) -> Self {
        Error::DeviceNotFound(detail.into())
    }

    pub fn read_failure(detail: impl Into<String>) -> Self {
        Error::ReadFailure(detail.into())
    }
}
