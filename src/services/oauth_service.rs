use log::{error, info};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use url::Url;

use crate::config::{AzureConfig, OUTLOOK_SCOPES};
use crate::models::user_session::{AccessToken, SessionUser};

pub const CALLBACK_PATH: &str = "/api/auth/callback/azure-ad";

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Invalid OAuth configuration: {0}")]
    Config(String),

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("Profile lookup failed: {0}")]
    Profile(String),
}

/// A pending authorization: where to send the browser, plus what to remember for the callback.
pub struct AuthorizationRequest {
    pub url: Url,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphProfile {
    id: String,
    display_name: Option<String>,
    mail: Option<String>,
    user_principal_name: Option<String>,
}

/// Azure AD authorization-code flow for a single organisational tenant.
#[derive(Clone)]
pub struct AzureOAuth {
    client: BasicClient,
    http: reqwest::Client,
    graph_base_url: String,
}

impl AzureOAuth {
    pub fn new(azure: &AzureConfig, public_url: &str, graph_base_url: &str) -> Result<Self, OAuthError> {
        let redirect = Url::parse(public_url)
            .and_then(|base| base.join(CALLBACK_PATH))
            .map_err(|e| OAuthError::Config(format!("Invalid public url: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(azure.client_id.clone()),
            Some(ClientSecret::new(azure.client_secret.clone())),
            AuthUrl::new(azure.authorize_url()).map_err(|e| OAuthError::Config(e.to_string()))?,
            Some(TokenUrl::new(azure.token_url()).map_err(|e| OAuthError::Config(e.to_string()))?),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(
            RedirectUrl::new(redirect.to_string()).map_err(|e| OAuthError::Config(e.to_string()))?,
        );

        Ok(AzureOAuth {
            client,
            http: reqwest::Client::new(),
            graph_base_url: graph_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn authorize(&self) -> AuthorizationRequest {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let mut request = self
            .client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(challenge);
        for scope in OUTLOOK_SCOPES.split_whitespace() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        let (url, csrf) = request.url();

        AuthorizationRequest {
            url,
            csrf_state: csrf.secret().clone(),
            pkce_verifier: verifier.secret().clone(),
        }
    }

    /// Trades the callback's code for an access token, then resolves who it belongs to.
    pub async fn complete(
        &self,
        code: String,
        pkce_verifier: String,
    ) -> Result<(SessionUser, AccessToken), OAuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                error!("Token exchange error: {:?}", e);
                OAuthError::Exchange(e.to_string())
            })?;
        let access_token = AccessToken::new(token.access_token().secret().clone());

        let user = self.fetch_profile(&access_token).await?;
        info!("Signed in user {}", user.id);
        Ok((user, access_token))
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<SessionUser, OAuthError> {
        let response = self
            .http
            .get(format!("{}/me", self.graph_base_url))
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| OAuthError::Profile(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuthError::Profile(format!("Graph returned {}", response.status())));
        }

        let profile: GraphProfile = response
            .json()
            .await
            .map_err(|e| OAuthError::Profile(e.to_string()))?;
        Ok(SessionUser {
            id: profile.id,
            name: profile.display_name,
            email: profile.mail.or(profile.user_principal_name),
        })
    }
}
