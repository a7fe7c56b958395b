/*!
reqwest-oauth1-service: the OAuth 1.0a handshake and request signing on top of
[reqwest](https://crates.io/crates/reqwest).

# Overview

This library implements the three-legged OAuth 1.0a flow (RFC 5849): obtaining
a request token, building the user authorization URL, and exchanging the
authorized request token for an access token. Once a token is available, any
request to a protected resource can be signed with it. Signatures are computed
with HMAC-SHA1, RSA-SHA1 or PLAINTEXT and placed either in the `Authorization`
header or in the query string.

The HTTP layer sits behind the [`Transport`] and [`AsyncTransport`] traits,
which are implemented for `reqwest::blocking::Client` (with the default
`blocking` feature) and `reqwest::Client`.

# How to use

## Basic usecase 1 - Acquiring OAuth token & secret

```ignore
use std::io;
use reqwest_oauth1_service::{ProviderConfig, ServiceBuilder, Verifier};

// prepare provider and application info
let provider = ProviderConfig::new(
    "https://api.twitter.com/oauth/request_token",
    "https://api.twitter.com/oauth/access_token",
    "https://api.twitter.com/oauth/authorize?oauth_token={token}",
);
let service = ServiceBuilder::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .build(provider, reqwest::blocking::Client::new())?;

// step 1: acquire request token & token secret
let request_token = service.request_token()?;

// step 2. acquire user pin
println!("please access to: {}", service.authorization_url(&request_token)?);
println!("input pin: ");
let mut user_input = String::new();
io::stdin().read_line(&mut user_input)?;

// step 3. acquire access token
let access_token = service.access_token(&request_token, Verifier::new(user_input.trim()))?;
println!(
    "your token and secret is: \n token: {}\n secret: {}",
    access_token.value(), access_token.secret()
);
```

## Basic usecase 2 - sending the tweet

```ignore
use http::Method;
use reqwest_oauth1_service::{OAuthRequest, ProviderConfig, ServiceBuilder, Token};

let service = ServiceBuilder::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .build(provider, reqwest::Client::new())?;
let token = Token::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let request = OAuthRequest::new(Method::POST, "https://api.twitter.com/1.1/statuses/update.json")?
    .form(&[("status", "Hello, Twitter!")])?;
let signed = service.sign_request(&token, request)?;
let response = service.send_async(&signed).await?;
```

Pass [`Token::empty()`] to `sign_request` for two-legged requests that carry
no `oauth_token` at all.
*/
mod base_string;
mod client;
mod config;
mod encoding;
mod error;
mod header;
mod request;
mod secrets;
mod service;
mod signer;
mod timestamp;
mod token_reader;

// exposed to external program
pub use base_string::{base_string, base_url, normalize_parameters};
pub use client::{AsyncTransport, HttpRequest, HttpResponse, Transport};
pub use config::{OAuthConfig, ProviderConfig, OUT_OF_BAND_CALLBACK, TOKEN_PLACEHOLDER};
pub use encoding::{percent_decode, percent_encode};
pub use error::{
    ConfigError, Error, Result, SignError, SignResult, TokenReaderError, TokenReaderResult,
};
pub use header::{authorization_header, query_string, SignatureType};
pub use request::{OAuthRequest, SignedRequest};
pub use secrets::{Credentials, Token, Verifier};
pub use service::{AccessTokenHandle, OAuth10aService, ServiceBuilder};
pub use signer::{HmacSha1, Plaintext, RsaSha1, SignatureAlgorithm, SignatureMethod};
pub use timestamp::{FixedTimestampService, SystemTimestampService, TimestampService};
pub use token_reader::{FormTokenExtractor, JsonTokenExtractor, TokenExtractor};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `scope`.
pub const SCOPE_KEY: &str = "scope";
/// The only protocol version this crate speaks.
pub const OAUTH_VERSION: &str = "1.0";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
