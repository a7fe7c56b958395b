//! Signature base string construction (RFC 5849 section 3.4.1).

use url::Url;

use crate::encoding::percent_encode;
use crate::request::OAuthRequest;
use crate::OAUTH_SIGNATURE_KEY;

/// Build `METHOD&enc(base_url)&enc(normalized_parameters)` for a request.
///
/// Every OAuth parameter added so far takes part, together with the query
/// of the URL, the query pairs added on the builder and form body pairs.
/// `oauth_signature` is never part of its own input.
pub fn base_string(request: &OAuthRequest) -> String {
    let url_query = request
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect::<Vec<(String, String)>>();
    let params = url_query
        .iter()
        .chain(request.query_parameters())
        .chain(request.form_parameters())
        .chain(request.oauth_parameters())
        .filter(|(k, _)| k != OAUTH_SIGNATURE_KEY)
        .map(|(k, v)| (k.as_str(), v.as_str()));

    format!(
        "{}&{}&{}",
        percent_encode(&request.method().as_str().to_ascii_uppercase()),
        percent_encode(&base_url(request.url())),
        percent_encode(&normalize_parameters(params))
    )
}

/// Scheme, authority and path; query and fragment are dropped.
///
/// `Url` already lowercases scheme and host and leaves out default ports.
pub fn base_url(url: &Url) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.to_string()
}

/// Encode every pair, sort by encoded key then encoded value and join them.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect::<Vec<(String, String)>>();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&")
}
