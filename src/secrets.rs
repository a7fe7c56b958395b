use std::fmt;

use url::form_urlencoded;

const REDACTED: &str = "<redacted>";

/// Consumer credentials issued by the provider.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new<TKey, TSecret>(api_key: TKey, api_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Credentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The consumer secret, or the PEM private key for RSA-SHA1.
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &REDACTED)
            .finish()
    }
}

/// A request token or an access token together with its secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    secret: String,
    raw_response: Option<String>,
}

impl Token {
    pub fn new<TValue, TSecret>(value: TValue, secret: TSecret) -> Self
    where
        TValue: Into<String>,
        TSecret: Into<String>,
    {
        Token {
            value: value.into(),
            secret: secret.into(),
            raw_response: None,
        }
    }

    /// The token used for two-legged requests, where no user is involved.
    pub fn empty() -> Self {
        Token::new("", "")
    }

    /// Attach the provider response this token was read from.
    pub fn with_raw_response<T: Into<String>>(self, raw_response: T) -> Self {
        Token {
            raw_response: Some(raw_response.into()),
            ..self
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.secret.is_empty()
    }

    /// Look up another parameter of a form-encoded provider response,
    /// such as `oauth_callback_confirmed`.
    pub fn parameter(&self, key: &str) -> Option<String> {
        let raw = self.raw_response.as_deref()?;
        form_urlencoded::parse(raw.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &self.value)
            .field("secret", &REDACTED)
            .finish()
    }
}

/// The code handed back to the user once they authorized the request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier {
    value: String,
}

impl Verifier {
    pub fn new<T: Into<String>>(value: T) -> Self {
        Verifier {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Verifier {
    fn from(value: &str) -> Self {
        Verifier::new(value)
    }
}
