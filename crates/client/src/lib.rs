//! HTTP collaborators for the quiz core: the backend API client that
//! publishes and retrieves quizzes, the token store behind the login
//! flow, and the local fallback cache for published documents.

pub mod image;

mod error;

pub use error::{Error, Result};

use dashmap::DashMap;
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method, Request, StatusCode, Uri,
};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use log::{info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use model::QuizDocument;
use wizard::{Authenticate, PublishReceipt, SubmitError, SubmitQuiz};

pub const APPLICATION_JSON: &str = "application/json";

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Backend API client. Cloning is cheap and clones share the token.
#[derive(Clone)]
pub struct Api {
    base: Arc<str>,
    token: Arc<RwLock<Option<String>>>,
    client: HttpsClient,
}

#[derive(Deserialize)]
struct CreateFormResponse {
    form: CreatedForm,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedForm {
    form_id: String,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpResponse {
    access_token: String,
}

impl Api {
    pub fn new(base_url: &str) -> Self {
        let mut https = HttpsConnector::new();
        https.https_only(false);
        let client = Client::builder(TokioExecutor::new()).build(https);
        Self {
            base: base_url.trim_end_matches('/').into(),
            token: Arc::default(),
            client,
        }
    }

    /// The access token currently on hand, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    pub fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_owned());
        }
    }

    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let uri: Uri = [self.base.as_ref(), path].concat().parse()?;
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(token) = self.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                .body(Full::new(Bytes::from(serde_json::to_vec(body)?)))?,
            None => request.body(Full::new(Bytes::new()))?,
        };

        let response = self.client.request(request).await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized),
            StatusCode::NOT_FOUND => return Err(Error::NotFound),
            status if !status.is_success() => return Err(Error::Status(status.as_u16())),
            _ => {}
        }

        let body = response.into_body().collect().await?.to_bytes();
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Fetches a published quiz by its identifier.
    pub async fn fetch_quiz(&self, id: &str) -> Result<QuizDocument> {
        self.get(&format!("/form/{id}")).await
    }

    /// Asks the backend to mail a one-time code to the given address.
    pub async fn request_otp(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self.post("/auth/request-otp", &OtpRequest { email }).await?;
        Ok(())
    }

    /// Exchanges a one-time code for an access token, which is kept for
    /// all subsequent calls and also returned.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String> {
        let response: VerifyOtpResponse =
            self.post("/auth/verify-otp", &VerifyOtpRequest { email, code }).await?;
        self.set_token(&response.access_token);
        info!("logged in as {email}");
        Ok(response.access_token)
    }
}

impl SubmitQuiz for Api {
    /// Publishes the serialized draft in one authenticated call; the
    /// backend answers with the identifier the share link is built from.
    async fn submit(&self, quiz: &QuizDocument) -> core::result::Result<PublishReceipt, SubmitError> {
        let response: CreateFormResponse = self.post("/form", quiz).await.map_err(|err| {
            warn!("quiz submission failed: {err}");
            SubmitError::from(err)
        })?;
        Ok(PublishReceipt { id: response.form.form_id })
    }
}

/// Token-only authenticator: yields whatever token the API client holds
/// and cannot log in on its own. Interactive front-ends wrap the login
/// flow themselves via [`Api::request_otp`] and [`Api::verify_otp`].
impl Authenticate for Api {
    fn current_token(&self) -> Option<String> {
        self.token()
    }

    async fn request_login(&self) -> core::result::Result<String, SubmitError> {
        Err(SubmitError::AuthRequired)
    }
}

/// Loads published quizzes: remote first, falling back to a local cache
/// of documents seen or published earlier in this process.
pub struct QuizStore {
    api: Api,
    cache: DashMap<String, QuizDocument>,
}

impl QuizStore {
    pub fn new(api: Api) -> Self {
        Self { api, cache: DashMap::new() }
    }

    /// Seeds the local fallback cache, e.g. right after publishing.
    pub fn store_local(&self, id: &str, quiz: QuizDocument) {
        self.cache.insert(id.to_owned(), quiz);
    }

    /// Fetches the quiz with the given identifier. A remote failure falls
    /// back to the local cache; only when both miss does the error surface.
    pub async fn load(&self, id: &str) -> Result<QuizDocument> {
        match self.api.fetch_quiz(id).await {
            Ok(quiz) => {
                self.cache.insert(id.to_owned(), quiz.clone());
                Ok(quiz)
            }
            Err(err) => {
                warn!("remote fetch of quiz {id} failed ({err}); trying the local cache");
                match self.cache.get(id) {
                    Some(entry) => Ok(entry.value().clone()),
                    None => Err(err),
                }
            }
        }
    }
}
