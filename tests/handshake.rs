//! Integration tests for the OAuth 1.0a handshake
//!
//! These tests run the service over reqwest against a wiremock provider.

use std::sync::{mpsc, Arc};

use http::Method;
use reqwest_oauth1_service::{
    Error, OAuth10aService, OAuthRequest, ProviderConfig, ServiceBuilder, SignatureType, Token,
    TokenReaderError, Verifier,
};
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const REQUEST_TOKEN_BODY: &str =
    "oauth_token=req-token&oauth_token_secret=req-secret&oauth_callback_confirmed=true";
const ACCESS_TOKEN_BODY: &str =
    "oauth_token=access-token&oauth_token_secret=access-secret&user_id=42";

/// Create a provider that points to the mock server
fn test_provider(mock_server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(
        format!("{}/oauth/request_token", mock_server.uri()),
        format!("{}/oauth/access_token", mock_server.uri()),
        format!("{}/oauth/authorize?oauth_token={{token}}", mock_server.uri()),
    )
}

fn test_service(mock_server: &MockServer) -> OAuth10aService<reqwest::Client> {
    ServiceBuilder::new("consumer-key", "consumer-secret")
        .callback("https://app.example.com/callback")
        .build(test_provider(mock_server), reqwest::Client::new())
        .expect("valid provider")
}

async fn mount_token_endpoints(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REQUEST_TOKEN_BODY))
        .mount(mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCESS_TOKEN_BODY))
        .mount(mock_server)
        .await;
}

fn authorization_of(request: &Request) -> String {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default()
}

#[tokio::test]
async fn test_three_legged_handshake() {
    let mock_server = MockServer::start().await;
    mount_token_endpoints(&mock_server).await;
    let service = test_service(&mock_server);

    let request_token = service
        .request_token_async()
        .await
        .expect("Failed to get request token");
    assert_eq!(request_token.value(), "req-token");
    assert_eq!(request_token.secret(), "req-secret");

    let authorize = service.authorization_url(&request_token).unwrap();
    assert_eq!(
        authorize,
        format!("{}/oauth/authorize?oauth_token=req-token", mock_server.uri())
    );

    let access_token = service
        .access_token_async(&request_token, Verifier::new("verifier-1"))
        .await
        .expect("Failed to get access token");
    assert_eq!(access_token.value(), "access-token");
    assert_eq!(access_token.secret(), "access-secret");
    assert_eq!(access_token.parameter("user_id").as_deref(), Some("42"));

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);

    let first = authorization_of(&received[0]);
    assert!(first.starts_with("OAuth oauth_consumer_key=\"consumer-key\""));
    assert!(first.contains("oauth_callback=\"https%3A%2F%2Fapp.example.com%2Fcallback\""));
    assert!(!first.contains("oauth_token="));

    let second = authorization_of(&received[1]);
    assert!(second.contains("oauth_token=\"req-token\""));
    assert!(second.contains("oauth_verifier=\"verifier-1\""));
    assert!(!second.contains("oauth_callback="));
}

#[tokio::test]
async fn test_spawned_access_token_exchange() {
    let mock_server = MockServer::start().await;
    mount_token_endpoints(&mock_server).await;
    let service = Arc::new(test_service(&mock_server));
    let (tx, rx) = mpsc::channel();

    let handle = service.spawn_access_token_with_callback(
        Token::new("req-token", "req-secret"),
        Verifier::new("verifier-1"),
        move |result| {
            tx.send(result.is_ok()).unwrap();
        },
    );
    let token = handle.await.expect("Failed to get access token");

    assert_eq!(token.value(), "access-token");
    assert!(rx.recv().unwrap());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_rejected_token_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("oauth_problem=signature_invalid"),
        )
        .mount(&mock_server)
        .await;
    let service = test_service(&mock_server);

    match service.request_token_async().await {
        Err(Error::TokenReader(TokenReaderError::UnexpectedStatus { status, body })) => {
            assert_eq!(status, 401);
            assert_eq!(body, "oauth_problem=signature_invalid");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_signed_resource_in_query_string() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .and(query_param("count", "5"))
        .and(query_param("oauth_consumer_key", "consumer-key"))
        .and(query_param("oauth_token", "access-token"))
        .and(query_param("oauth_signature_method", "HMAC-SHA1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ServiceBuilder::new("consumer-key", "consumer-secret")
        .signature_type(SignatureType::QueryString)
        .build(test_provider(&mock_server), reqwest::Client::new())
        .unwrap();
    let request = OAuthRequest::new(
        Method::GET,
        format!("{}/1.1/statuses/home_timeline.json", mock_server.uri()),
    )
    .unwrap()
    .query(&[("count", "5")])
    .unwrap();

    let signed = service
        .sign_request(&Token::new("access-token", "access-secret"), request)
        .unwrap();
    let response = service.send_async(&signed).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "[]");
    let received = mock_server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_two_legged_form_post() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/statuses"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("status=Hello+Ladies+%2B+Gentlemen"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    let service = test_service(&mock_server);

    let request = OAuthRequest::new(Method::POST, format!("{}/api/statuses", mock_server.uri()))
        .unwrap()
        .form(&[("status", "Hello Ladies + Gentlemen")])
        .unwrap();
    let signed = service.sign_request(&Token::empty(), request).unwrap();
    let response = service.send_async(&signed).await.unwrap();

    assert_eq!(response.status, 201);
    let received = mock_server.received_requests().await.unwrap();
    let authorization = authorization_of(&received[0]);
    assert!(authorization.contains("oauth_signature="));
    assert!(!authorization.contains("oauth_token="));
}

#[cfg(feature = "blocking")]
#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_handshake() {
    let mock_server = MockServer::start().await;
    mount_token_endpoints(&mock_server).await;
    let provider = test_provider(&mock_server);

    let (request_token, access_token) = tokio::task::spawn_blocking(move || {
        let service = ServiceBuilder::new("consumer-key", "consumer-secret")
            .build(provider, reqwest::blocking::Client::new())
            .unwrap();
        let request_token = service.request_token().unwrap();
        let access_token = service
            .access_token(&request_token, Verifier::new("verifier-1"))
            .unwrap();
        (request_token, access_token)
    })
    .await
    .unwrap();

    assert_eq!(request_token.value(), "req-token");
    assert_eq!(access_token.value(), "access-token");
    assert_eq!(access_token.raw_response(), Some(ACCESS_TOKEN_BODY));
}
