use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::client::HttpRequest;
use crate::header::{authorization_header, query_string, SignatureType};
use crate::{ConfigError, SignError, SignResult, OAUTH_KEY_PREFIX, SCOPE_KEY};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Empty,
    Form(Vec<(String, String)>),
    Raw(String),
}

/// A request that is still being built and has not been signed yet.
#[derive(Debug, Clone)]
pub struct OAuthRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Body,
    oauth_parameters: Vec<(String, String)>,
}

impl OAuthRequest {
    /// Start building a request to `url`. Any fragment is dropped.
    pub fn new<U: AsRef<str>>(method: Method, url: U) -> Result<Self, ConfigError> {
        let mut parsed = Url::parse(url.as_ref())
            .map_err(|e| ConfigError::InvalidUrl(url.as_ref().to_string(), e))?;
        parsed.set_fragment(None);
        Ok(OAuthRequest {
            method,
            url: parsed,
            headers: Vec::new(),
            query: Vec::new(),
            body: Body::Empty,
            oauth_parameters: Vec::new(),
        })
    }

    /// Append query parameters from anything serde can turn into pairs.
    ///
    /// Calling `.query(&[("foo", "a"), ("foo", "b")])` adds `foo` twice.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> SignResult<Self> {
        self.query.extend(serialize_pairs(query)?);
        Ok(self)
    }

    pub fn query_pair<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send a form body. Form pairs are part of the signature.
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> SignResult<Self> {
        let pairs = serialize_pairs(form)?;
        self.extend_form(pairs);
        Ok(self)
    }

    pub fn form_pair<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extend_form(vec![(key.into(), value.into())]);
        self
    }

    fn extend_form(&mut self, pairs: Vec<(String, String)>) {
        if let Body::Form(existing) = &mut self.body {
            existing.extend(pairs);
        } else {
            self.body = Body::Form(pairs);
        }
    }

    /// Set a raw body (JSON, XML, ...). It replaces any form body and is not signed.
    pub fn body<T: Into<String>>(mut self, body: T) -> Self {
        self.body = Body::Raw(body.into());
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a protocol parameter by hand, e.g. `oauth_callback` or `scope`.
    pub fn oauth_parameter<K: Into<String>, V: Into<String>>(
        mut self,
        key: K,
        value: V,
    ) -> SignResult<Self> {
        let key = key.into();
        if !key.starts_with(OAUTH_KEY_PREFIX) && key != SCOPE_KEY {
            return Err(SignError::UnknownParameter(key));
        }
        self.push_oauth_parameter(key, value);
        Ok(self)
    }

    pub(crate) fn push_oauth_parameter<K: Into<String>, V: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) {
        self.oauth_parameters.push((key.into(), value.into()));
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Query pairs added on the builder (the URL's own query is not repeated here).
    pub fn query_parameters(&self) -> impl Iterator<Item = &(String, String)> {
        self.query.iter()
    }

    pub fn form_parameters(&self) -> impl Iterator<Item = &(String, String)> {
        let form: &[(String, String)] = match &self.body {
            Body::Form(pairs) => pairs,
            _ => &[],
        };
        form.iter()
    }

    pub fn oauth_parameters(&self) -> impl Iterator<Item = &(String, String)> {
        self.oauth_parameters.iter()
    }

    /// Append the signature as the last OAuth parameter and freeze the request.
    pub(crate) fn finish(
        mut self,
        signature: String,
        signature_type: SignatureType,
    ) -> SignedRequest {
        self.push_oauth_parameter(crate::OAUTH_SIGNATURE_KEY, signature);
        match signature_type {
            SignatureType::Header => {
                let value = authorization_header(&self.oauth_parameters);
                self.headers.push((AUTHORIZATION.as_str().to_string(), value));
            }
            SignatureType::QueryString => {
                self.query.extend(self.oauth_parameters.iter().cloned());
            }
        }

        let mut url = self.url.to_string();
        if !self.query.is_empty() {
            match self.url.query() {
                None => url.push('?'),
                Some("") => {}
                Some(_) => url.push('&'),
            }
            url.push_str(&query_string(&self.query));
        }

        let body = match self.body {
            Body::Empty => None,
            Body::Raw(raw) => Some(raw),
            Body::Form(pairs) => {
                self.headers
                    .push((CONTENT_TYPE.as_str().to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(
                    form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(pairs)
                        .finish(),
                )
            }
        };

        SignedRequest {
            method: self.method,
            url,
            headers: self.headers,
            body,
            oauth_parameters: self.oauth_parameters,
            signature_type,
        }
    }
}

/// A request whose signature is computed. It can no longer be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
    oauth_parameters: Vec<(String, String)>,
    signature_type: SignatureType,
}

impl SignedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The complete URL, including any OAuth parameters in query-string mode.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn authorization_header(&self) -> Option<&str> {
        self.header(AUTHORIZATION.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// The protocol parameters in the order they were added; the signature is last.
    pub fn oauth_parameters(&self) -> &[(String, String)] {
        &self.oauth_parameters
    }

    pub fn oauth_parameter(&self, key: &str) -> Option<&str> {
        self.oauth_parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn signature(&self) -> Option<&str> {
        self.oauth_parameter(crate::OAUTH_SIGNATURE_KEY)
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }
}

impl From<SignedRequest> for HttpRequest {
    fn from(signed: SignedRequest) -> Self {
        HttpRequest {
            method: signed.method,
            url: signed.url,
            headers: signed.headers,
            body: signed.body,
        }
    }
}

fn serialize_pairs<T: Serialize + ?Sized>(value: &T) -> SignResult<Vec<(String, String)>> {
    let encoded =
        serde_urlencoded::to_string(value).map_err(|e| SignError::Serialize(e.to_string()))?;
    Ok(form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect())
}
