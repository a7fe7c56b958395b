use std::fmt;
use std::str::FromStr;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer as _};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Deserializer};
use sha1::Sha1;

use crate::encoding::percent_encode;
use crate::{ConfigError, SignError, SignResult};

type HmacSha1Mac = Hmac<Sha1>;

const HMAC_SHA1: &str = "HMAC-SHA1";
const RSA_SHA1: &str = "RSA-SHA1";
const PLAINTEXT: &str = "PLAINTEXT";

/// Value of `oauth_signature_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMethod {
    #[default]
    HmacSha1,
    RsaSha1,
    Plaintext,
}

impl SignatureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => HMAC_SHA1,
            SignatureMethod::RsaSha1 => RSA_SHA1,
            SignatureMethod::Plaintext => PLAINTEXT,
        }
    }

    /// Build the algorithm for this method.
    ///
    /// For RSA-SHA1 the consumer secret must be a PEM encoded private key;
    /// it is parsed here so a broken key never reaches the signing path.
    pub fn algorithm(
        self,
        consumer_secret: &str,
    ) -> Result<Box<dyn SignatureAlgorithm>, ConfigError> {
        Ok(match self {
            SignatureMethod::HmacSha1 => Box::new(HmacSha1),
            SignatureMethod::RsaSha1 => Box::new(RsaSha1::from_pem(consumer_secret)?),
            SignatureMethod::Plaintext => Box::new(Plaintext),
        })
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            HMAC_SHA1 => Ok(SignatureMethod::HmacSha1),
            RSA_SHA1 => Ok(SignatureMethod::RsaSha1),
            PLAINTEXT => Ok(SignatureMethod::Plaintext),
            _ => Err(ConfigError::UnknownSignatureMethod(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SignatureMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Turns a signature base string into the value of `oauth_signature`.
pub trait SignatureAlgorithm: Send + Sync {
    fn method(&self) -> SignatureMethod;

    fn sign(&self, base_string: &str, consumer_secret: &str, token_secret: &str)
        -> SignResult<String>;
}

/// `enc(consumer_secret)&enc(token_secret)`, shared by HMAC-SHA1 and PLAINTEXT.
fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1;

impl SignatureAlgorithm for HmacSha1 {
    fn method(&self) -> SignatureMethod {
        SignatureMethod::HmacSha1
    }

    fn sign(
        &self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
    ) -> SignResult<String> {
        let key = signing_key(consumer_secret, token_secret);
        let mut mac = HmacSha1Mac::new_from_slice(key.as_bytes())
            .map_err(|e| SignError::InvalidKey(e.to_string()))?;
        mac.update(base_string.as_bytes());
        Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Sends the signing key itself; only meaningful over TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl SignatureAlgorithm for Plaintext {
    fn method(&self) -> SignatureMethod {
        SignatureMethod::Plaintext
    }

    fn sign(
        &self,
        _base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
    ) -> SignResult<String> {
        Ok(signing_key(consumer_secret, token_secret))
    }
}

/// RSASSA-PKCS1-v1_5 over SHA-1 with the consumer's private key.
///
/// The consumer secret and token secret are not part of the signature.
#[derive(Clone)]
pub struct RsaSha1 {
    signing_key: SigningKey<Sha1>,
}

impl RsaSha1 {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        RsaSha1 {
            signing_key: SigningKey::<Sha1>::new(private_key),
        }
    }

    /// Load a PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`) key.
    pub fn from_pem(pem: &str) -> Result<Self, ConfigError> {
        let pem = pem.trim();
        if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem) {
            return Ok(RsaSha1::new(key));
        }
        RsaPrivateKey::from_pkcs1_pem(pem)
            .map(RsaSha1::new)
            .map_err(|e| ConfigError::RsaKey(e.to_string()))
    }
}

impl fmt::Debug for RsaSha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSha1").finish_non_exhaustive()
    }
}

impl SignatureAlgorithm for RsaSha1 {
    fn method(&self) -> SignatureMethod {
        SignatureMethod::RsaSha1
    }

    fn sign(
        &self,
        base_string: &str,
        _consumer_secret: &str,
        _token_secret: &str,
    ) -> SignResult<String> {
        let signature = self
            .signing_key
            .try_sign(base_string.as_bytes())
            .map_err(|e| SignError::Rsa(e.to_string()))?;
        Ok(BASE64_STANDARD.encode(signature.to_bytes()))
    }
}
