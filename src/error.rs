#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no token present in request")]
    NoCredential,
    #[error("token decode error: {0}")]
    Decode(String),
    #[error("session for {subject} is expired")]
    Expired { subject: String },
    #[error("token encode error: {0}")]
    Encode(String),
}
