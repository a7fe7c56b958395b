use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::base_string::base_string;
use crate::client::{AsyncTransport, HttpRequest, HttpResponse, Transport};
use crate::config::{OAuthConfig, ProviderConfig, TOKEN_PLACEHOLDER};
use crate::encoding::percent_encode;
use crate::header::SignatureType;
use crate::request::{OAuthRequest, SignedRequest};
use crate::signer::SignatureAlgorithm;
use crate::timestamp::{SystemTimestampService, TimestampService};
use crate::{
    ConfigError, Credentials, Error, Result, Token, TokenReaderError, Verifier,
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY, OAUTH_VERSION, OAUTH_VERSION_KEY,
    SCOPE_KEY,
};

/// Collects the application settings and builds an [`OAuth10aService`].
pub struct ServiceBuilder {
    credentials: Credentials,
    config: OAuthConfig,
    timestamp_service: Arc<dyn TimestampService>,
}

impl ServiceBuilder {
    pub fn new<TKey, TSecret>(api_key: TKey, api_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        ServiceBuilder {
            credentials: Credentials::new(api_key, api_secret),
            config: OAuthConfig::default(),
            timestamp_service: Arc::new(SystemTimestampService),
        }
    }

    /// Replace all options at once, e.g. with values read from a file.
    pub fn config(self, config: OAuthConfig) -> Self {
        ServiceBuilder { config, ..self }
    }

    pub fn callback<T: Into<String>>(mut self, callback: T) -> Self {
        self.config.callback = callback.into();
        self
    }

    pub fn scope<T: Into<String>>(mut self, scope: T) -> Self {
        self.config.scope = Some(scope.into());
        self
    }

    pub fn signature_type(mut self, signature_type: SignatureType) -> Self {
        self.config.signature_type = Some(signature_type);
        self
    }

    pub fn timestamp_service<T: TimestampService + 'static>(self, service: T) -> Self {
        ServiceBuilder {
            timestamp_service: Arc::new(service),
            ..self
        }
    }

    /// Validate the provider and prepare its signature algorithm.
    pub fn build<T>(
        self,
        provider: ProviderConfig,
        transport: T,
    ) -> std::result::Result<OAuth10aService<T>, ConfigError> {
        provider.validate()?;
        let signature = provider
            .signature_method
            .algorithm(self.credentials.api_secret())?;
        debug!(
            provider = %provider.request_token_endpoint,
            signature_method = %provider.signature_method,
            "configured OAuth 1.0a service"
        );
        Ok(OAuth10aService {
            credentials: self.credentials,
            config: self.config,
            provider,
            signature,
            timestamp_service: self.timestamp_service,
            transport,
        })
    }
}

/// OAuth 1.0a handshake and request signing against one provider.
///
/// The service keeps no per-request state, so one instance can be shared
/// between threads and tasks.
pub struct OAuth10aService<T> {
    credentials: Credentials,
    config: OAuthConfig,
    provider: ProviderConfig,
    signature: Box<dyn SignatureAlgorithm>,
    timestamp_service: Arc<dyn TimestampService>,
    transport: T,
}

impl<T> OAuth10aService<T> {
    pub fn version(&self) -> &'static str {
        OAUTH_VERSION
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn signature_type(&self) -> SignatureType {
        self.config
            .signature_type
            .unwrap_or(self.provider.signature_type)
    }

    /// The page the user has to visit to authorize `request_token`.
    pub fn authorization_url(&self, request_token: &Token) -> Result<String> {
        if request_token.value().is_empty() {
            return Err(Error::Precondition(
                "an authorization url needs a non-empty request token",
            ));
        }
        Ok(self
            .provider
            .authorization_url
            .replace(TOKEN_PLACEHOLDER, &percent_encode(request_token.value())))
    }

    /// Sign a request for a protected resource.
    ///
    /// With [`Token::empty`] no `oauth_token` is sent (two-legged OAuth).
    pub fn sign_request(&self, token: &Token, request: OAuthRequest) -> Result<SignedRequest> {
        debug!(url = %request.url(), two_legged = token.is_empty(), "signing request");
        if token.is_empty() {
            self.sign(request, token, &[])
        } else {
            self.sign(request, token, &[(OAUTH_TOKEN_KEY, token.value())])
        }
    }

    fn request_token_request(&self) -> Result<SignedRequest> {
        debug!(
            endpoint = %self.provider.request_token_endpoint,
            callback = %self.config.callback,
            "obtaining request token"
        );
        let request = OAuthRequest::new(
            self.provider.request_token_verb.clone(),
            &self.provider.request_token_endpoint,
        )?;
        self.sign(
            request,
            &Token::empty(),
            &[(OAUTH_CALLBACK_KEY, self.config.callback.as_str())],
        )
    }

    fn access_token_request(
        &self,
        request_token: &Token,
        verifier: &Verifier,
    ) -> Result<SignedRequest> {
        if request_token.value().is_empty() {
            return Err(Error::Precondition(
                "an access token exchange needs a non-empty request token",
            ));
        }
        debug!(
            endpoint = %self.provider.access_token_endpoint,
            "obtaining access token"
        );
        let request = OAuthRequest::new(
            self.provider.access_token_verb.clone(),
            &self.provider.access_token_endpoint,
        )?;
        self.sign(
            request,
            request_token,
            &[
                (OAUTH_TOKEN_KEY, request_token.value()),
                (OAUTH_VERIFIER_KEY, verifier.value()),
            ],
        )
    }

    /// Append the standard parameters, then `extra`, then the signature.
    fn sign(
        &self,
        mut request: OAuthRequest,
        token: &Token,
        extra: &[(&str, &str)],
    ) -> Result<SignedRequest> {
        request.push_oauth_parameter(OAUTH_CONSUMER_KEY, self.credentials.api_key());
        request.push_oauth_parameter(
            OAUTH_TIMESTAMP_KEY,
            self.timestamp_service.timestamp_in_seconds(),
        );
        request.push_oauth_parameter(OAUTH_NONCE_KEY, self.timestamp_service.nonce());
        request.push_oauth_parameter(
            OAUTH_SIGNATURE_METHOD_KEY,
            self.signature.method().as_str(),
        );
        request.push_oauth_parameter(OAUTH_VERSION_KEY, OAUTH_VERSION);
        if let Some(scope) = &self.config.scope {
            request.push_oauth_parameter(SCOPE_KEY, scope.as_str());
        }
        for (key, value) in extra {
            request.push_oauth_parameter(*key, *value);
        }

        let base = base_string(&request);
        trace!(base_string = %base, "generated signature base string");
        let signature = self
            .signature
            .sign(&base, self.credentials.api_secret(), token.secret())?;

        let signature_type = self.signature_type();
        debug!(?signature_type, "appending signature");
        Ok(request.finish(signature, signature_type))
    }

    fn read_token(&self, response: HttpResponse) -> Result<Token> {
        debug!(status = response.status, "received token response");
        if !response.is_success() {
            return Err(TokenReaderError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(self.provider.extractor().extract(&response.body)?)
    }
}

impl<T: Transport> OAuth10aService<T> {
    /// Step 1: obtain a request token, signed without any user token.
    pub fn request_token(&self) -> Result<Token> {
        let request = self.request_token_request()?;
        let response = self.transport.execute(request.into())?;
        self.read_token(response)
    }

    /// Step 3: exchange the authorized request token and its verifier.
    pub fn access_token(&self, request_token: &Token, verifier: Verifier) -> Result<Token> {
        let request = self.access_token_request(request_token, &verifier)?;
        let response = self.transport.execute(request.into())?;
        self.read_token(response)
    }

    /// Send a request signed with [`sign_request`](Self::sign_request).
    pub fn send(&self, request: &SignedRequest) -> Result<HttpResponse> {
        self.transport.execute(HttpRequest::from(request.clone()))
    }
}

impl<T: AsyncTransport> OAuth10aService<T> {
    pub async fn request_token_async(&self) -> Result<Token> {
        let request = self.request_token_request()?;
        let response = self.transport.execute(request.into()).await?;
        self.read_token(response)
    }

    /// Same as [`access_token`](Self::access_token) on an async transport.
    ///
    /// Dropping the future cancels the exchange.
    pub async fn access_token_async(
        &self,
        request_token: &Token,
        verifier: Verifier,
    ) -> Result<Token> {
        let request = self.access_token_request(request_token, &verifier)?;
        let response = self.transport.execute(request.into()).await?;
        self.read_token(response)
    }

    pub async fn send_async(&self, request: &SignedRequest) -> Result<HttpResponse> {
        self.transport
            .execute(HttpRequest::from(request.clone()))
            .await
    }
}

impl<T: AsyncTransport + 'static> OAuth10aService<T> {
    /// Run the access token exchange as a tokio task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_access_token(
        self: &Arc<Self>,
        request_token: Token,
        verifier: Verifier,
    ) -> AccessTokenHandle {
        self.spawn_access_token_with_callback(request_token, verifier, |_| {})
    }

    /// Like [`spawn_access_token`](Self::spawn_access_token); `callback` sees the
    /// outcome once, unless the handle is cancelled first.
    pub fn spawn_access_token_with_callback<F>(
        self: &Arc<Self>,
        request_token: Token,
        verifier: Verifier,
        callback: F,
    ) -> AccessTokenHandle
    where
        F: FnOnce(&Result<Token>) + Send + 'static,
    {
        let service = Arc::clone(self);
        let inner = tokio::spawn(async move {
            let result = service.access_token_async(&request_token, verifier).await;
            callback(&result);
            result
        });
        AccessTokenHandle { inner }
    }
}

/// The eventual access token of a spawned exchange.
#[derive(Debug)]
pub struct AccessTokenHandle {
    inner: JoinHandle<Result<Token>>,
}

impl AccessTokenHandle {
    /// Abort the exchange. Awaiting the handle afterwards yields [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.inner.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for AccessTokenHandle {
    type Output = Result<Token>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => Err(Error::TaskFailed(e.to_string())),
        })
    }
}
