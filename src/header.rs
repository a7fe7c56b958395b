use std::str::FromStr;

use serde::Deserialize;

use crate::encoding::percent_encode;
use crate::ConfigError;

const OAUTH_HEADER_PREFIX: &str = "OAuth ";

/// Where the finished OAuth parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    /// `Authorization: OAuth ...` header.
    #[default]
    Header,
    /// Appended to the query string of the URL.
    QueryString,
}

impl FromStr for SignatureType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(SignatureType::Header),
            "query_string" | "querystring" => Ok(SignatureType::QueryString),
            _ => Err(ConfigError::UnknownSignatureType(s.to_string())),
        }
    }
}

/// Render `OAuth k1="v1", k2="v2"` keeping the order the parameters were added in.
pub fn authorization_header(oauth_parameters: &[(String, String)]) -> String {
    let parts = oauth_parameters
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v)))
        .collect::<Vec<String>>();
    format!("{}{}", OAUTH_HEADER_PREFIX, parts.join(", "))
}

/// Render parameters as `k1=v1&k2=v2`, each side percent-encoded.
pub fn query_string<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    params
        .into_iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}
