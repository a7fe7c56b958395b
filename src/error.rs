use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration : {0}")]
    Config(#[from] ConfigError),
    #[error("precondition violated : {0}")]
    Precondition(&'static str),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("transport failed : {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    #[error("the request was cancelled before it completed")]
    Cancelled,
    #[error("the background task failed : {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown signature method : {0}")]
    UnknownSignatureMethod(String),
    #[error("unknown signature type : {0}")]
    UnknownSignatureType(String),
    #[error("required provider field {0} is missing")]
    MissingField(&'static str),
    #[error("authorization url template {0} has no {{token}} placeholder")]
    MissingTokenPlaceholder(String),
    #[error("invalid url {0} : {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("invalid HTTP method : {0}")]
    InvalidMethod(String),
    #[error("RSA private key could not be loaded : {0}")]
    RsaKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("unknown oauth parameter : {0}")]
    UnknownParameter(String),
    #[error("signing key was rejected : {0}")]
    InvalidKey(String),
    #[error("RSA signing failed : {0}")]
    Rsa(String),
    #[error("parameters could not be serialized : {0}")]
    Serialize(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenReaderError {
    #[error("response body is empty, can't extract a token from it")]
    EmptyResponse,
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(String, String),
    #[error("provider answered with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("response is not valid JSON ({0}): {1}")]
    MalformedJson(String, String),
}
