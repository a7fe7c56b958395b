use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::encoding::percent_decode;
use crate::{
    Token, TokenReaderError, TokenReaderResult, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY,
};

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"oauth_token=([^&]+)").expect("static regex is valid"));
static SECRET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"oauth_token_secret=([^&]*)").expect("static regex is valid"));

/// Reads a token out of a provider response body.
///
/// Providers that answer in a non-standard shape plug their own
/// implementation into [`ProviderConfig`](crate::ProviderConfig).
pub trait TokenExtractor: fmt::Debug + Send + Sync {
    fn extract(&self, response: &str) -> TokenReaderResult<Token>;
}

/// The standard `application/x-www-form-urlencoded` answer:
/// `oauth_token=...&oauth_token_secret=...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormTokenExtractor;

impl TokenExtractor for FormTokenExtractor {
    fn extract(&self, response: &str) -> TokenReaderResult<Token> {
        if response.trim().is_empty() {
            return Err(TokenReaderError::EmptyResponse);
        }
        let token = capture(response, &TOKEN_REGEX, OAUTH_TOKEN_KEY)?;
        let secret = capture(response, &SECRET_REGEX, OAUTH_TOKEN_SECRET_KEY)?;
        Ok(Token::new(token, secret).with_raw_response(response))
    }
}

/// Captured values are form-urlencoded, so `+` stands for a space.
fn capture(response: &str, pattern: &Regex, key: &str) -> TokenReaderResult<String> {
    pattern
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| percent_decode(&m.as_str().replace('+', " ")).into_owned())
        .ok_or_else(|| TokenReaderError::TokenKeyNotFound(key.to_string(), response.to_string()))
}

/// Providers answering with a JSON object such as
/// `{"oauth_token": "...", "oauth_token_secret": "..."}`.
#[derive(Debug, Clone)]
pub struct JsonTokenExtractor {
    token_field: String,
    secret_field: String,
}

impl JsonTokenExtractor {
    pub fn new<TToken, TSecret>(token_field: TToken, secret_field: TSecret) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
    {
        JsonTokenExtractor {
            token_field: token_field.into(),
            secret_field: secret_field.into(),
        }
    }
}

impl Default for JsonTokenExtractor {
    fn default() -> Self {
        JsonTokenExtractor::new(OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY)
    }
}

impl TokenExtractor for JsonTokenExtractor {
    fn extract(&self, response: &str) -> TokenReaderResult<Token> {
        if response.trim().is_empty() {
            return Err(TokenReaderError::EmptyResponse);
        }
        let document: Value = serde_json::from_str(response)
            .map_err(|e| TokenReaderError::MalformedJson(e.to_string(), response.to_string()))?;
        let field = |name: &str| {
            document
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    TokenReaderError::TokenKeyNotFound(name.to_string(), response.to_string())
                })
        };
        let token = field(&self.token_field)?;
        let secret = field(&self.secret_field)?;
        Ok(Token::new(token, secret).with_raw_response(response))
    }
}
