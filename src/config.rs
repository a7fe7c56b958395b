use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::header::SignatureType;
use crate::signer::SignatureMethod;
use crate::token_reader::{FormTokenExtractor, TokenExtractor};
use crate::ConfigError;

/// Placeholder replaced by the request token in the authorization URL template.
pub const TOKEN_PLACEHOLDER: &str = "{token}";

/// Default `oauth_callback` for applications without a redirect target.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";

/// Everything the handshake needs to know about one provider.
///
/// Can be deserialized from a configuration file; the token extractor is not
/// part of the file and defaults to [`FormTokenExtractor`].
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub(crate) request_token_endpoint: String,
    pub(crate) access_token_endpoint: String,
    #[serde(default = "default_verb", deserialize_with = "deserialize_method")]
    pub(crate) request_token_verb: Method,
    #[serde(default = "default_verb", deserialize_with = "deserialize_method")]
    pub(crate) access_token_verb: Method,
    /// e.g. `https://api.example.com/oauth/authorize?oauth_token={token}`
    pub(crate) authorization_url: String,
    #[serde(default)]
    pub(crate) signature_method: SignatureMethod,
    #[serde(default)]
    pub(crate) signature_type: SignatureType,
    #[serde(skip, default = "default_token_extractor")]
    pub(crate) token_extractor: Arc<dyn TokenExtractor>,
}

fn default_verb() -> Method {
    Method::POST
}

fn default_token_extractor() -> Arc<dyn TokenExtractor> {
    Arc::new(FormTokenExtractor)
}

fn deserialize_method<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
    let name = String::deserialize(deserializer)?;
    Method::from_bytes(name.to_ascii_uppercase().as_bytes())
        .map_err(|_| serde::de::Error::custom(ConfigError::InvalidMethod(name)))
}

impl ProviderConfig {
    pub fn new<TRequest, TAccess, TAuthorize>(
        request_token_endpoint: TRequest,
        access_token_endpoint: TAccess,
        authorization_url: TAuthorize,
    ) -> Self
    where
        TRequest: Into<String>,
        TAccess: Into<String>,
        TAuthorize: Into<String>,
    {
        ProviderConfig {
            request_token_endpoint: request_token_endpoint.into(),
            access_token_endpoint: access_token_endpoint.into(),
            request_token_verb: default_verb(),
            access_token_verb: default_verb(),
            authorization_url: authorization_url.into(),
            signature_method: SignatureMethod::default(),
            signature_type: SignatureType::default(),
            token_extractor: default_token_extractor(),
        }
    }

    pub fn request_token_verb(self, verb: Method) -> Self {
        ProviderConfig {
            request_token_verb: verb,
            ..self
        }
    }

    pub fn access_token_verb(self, verb: Method) -> Self {
        ProviderConfig {
            access_token_verb: verb,
            ..self
        }
    }

    pub fn signature_method(self, signature_method: SignatureMethod) -> Self {
        ProviderConfig {
            signature_method,
            ..self
        }
    }

    pub fn signature_type(self, signature_type: SignatureType) -> Self {
        ProviderConfig {
            signature_type,
            ..self
        }
    }

    pub fn token_extractor<T: TokenExtractor + 'static>(self, extractor: T) -> Self {
        ProviderConfig {
            token_extractor: Arc::new(extractor),
            ..self
        }
    }

    pub fn request_token_endpoint(&self) -> &str {
        &self.request_token_endpoint
    }

    pub fn access_token_endpoint(&self) -> &str {
        &self.access_token_endpoint
    }

    pub fn authorization_url_template(&self) -> &str {
        &self.authorization_url
    }

    pub fn extractor(&self) -> &dyn TokenExtractor {
        self.token_extractor.as_ref()
    }

    /// Check required fields, endpoint URLs and the authorization template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, endpoint) in [
            ("request_token_endpoint", &self.request_token_endpoint),
            ("access_token_endpoint", &self.access_token_endpoint),
            ("authorization_url", &self.authorization_url),
        ] {
            if endpoint.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }
        for endpoint in [&self.request_token_endpoint, &self.access_token_endpoint] {
            Url::parse(endpoint).map_err(|e| ConfigError::InvalidUrl(endpoint.clone(), e))?;
        }
        if !self.authorization_url.contains(TOKEN_PLACEHOLDER) {
            return Err(ConfigError::MissingTokenPlaceholder(
                self.authorization_url.clone(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("request_token_endpoint", &self.request_token_endpoint)
            .field("access_token_endpoint", &self.access_token_endpoint)
            .field("request_token_verb", &self.request_token_verb)
            .field("access_token_verb", &self.access_token_verb)
            .field("authorization_url", &self.authorization_url)
            .field("signature_method", &self.signature_method)
            .field("signature_type", &self.signature_type)
            .field("token_extractor", &self.token_extractor)
            .finish()
    }
}

/// Per-application options of the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_callback")]
    pub callback: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Overrides the provider's signature type when set.
    #[serde(default)]
    pub signature_type: Option<SignatureType>,
}

fn default_callback() -> String {
    OUT_OF_BAND_CALLBACK.to_string()
}

impl Default for OAuthConfig {
    fn default() -> Self {
        OAuthConfig {
            callback: default_callback(),
            scope: None,
            signature_type: None,
        }
    }
}
