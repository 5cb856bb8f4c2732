//! Twitter API client implementation
//!
//! Speaks the same private API the web client uses: a static bearer token,
//! the onboarding task flow for login, and GraphQL queries for timelines.
//! Session state is nothing but cookies, so the client keeps its own jar
//! and can export or restore it wholesale.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, SET_COOKIE, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use urlencoding::encode;

use super::parse;
use crate::domain::entities::{CookieBlob, LoginCredentials};
use crate::domain::ports::{ClientFactory, PlatformClient, PlatformTweet};
use crate::error::PlatformError;

/// Public bearer token of the web client
const BEARER_TOKEN: &str = concat!(
    "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D",
    "1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA"
);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Upper bound on onboarding round trips before giving up on a login
const MAX_LOGIN_STEPS: usize = 12;

/// GraphQL query ids of the operations we call
pub mod query_id {
    pub const USER_BY_SCREEN_NAME: &str = "NimuplG1OB7Fd2btCLdBOw";
    pub const USER_TWEETS: &str = "QWF3SzpHmykQHsQMixG0cg";
    pub const LIST_LATEST_TWEETS: &str = "HjsWc-nwwHKYwHenbHm-tw";
}

/// Feature flags the GraphQL endpoints insist on receiving
const FEATURES: &[(&str, bool)] = &[
    ("creator_subscriptions_tweet_preview_api_enabled", true),
    ("freedom_of_speech_not_reach_fetch_enabled", true),
    ("graphql_is_translatable_rweb_tweet_is_translatable_enabled", true),
    ("longform_notetweets_consumption_enabled", true),
    ("longform_notetweets_inline_media_enabled", true),
    ("longform_notetweets_rich_text_read_enabled", true),
    ("responsive_web_edit_tweet_api_enabled", true),
    ("responsive_web_enhance_cards_enabled", false),
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("responsive_web_graphql_timeline_navigation_enabled", true),
    ("rweb_lists_timeline_redesign_enabled", true),
    ("standardized_nudges_misinfo", true),
    ("tweet_awards_web_tipping_enabled", false),
    ("tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled", true),
    ("tweetypie_unmention_optimization_enabled", true),
    ("verified_phone_label_enabled", false),
    ("view_counts_everywhere_api_enabled", true),
    ("hidden_profile_likes_enabled", true),
    ("highlights_tweets_tab_ui_enabled", true),
    ("subscriptions_verification_info_verified_since_enabled", true),
];

fn features() -> Value {
    Value::Object(
        FEATURES
            .iter()
            .map(|(name, enabled)| (name.to_string(), Value::Bool(*enabled)))
            .collect(),
    )
}

/// One round trip of the onboarding flow
struct LoginStep {
    flow_token: String,
    subtasks: Vec<String>,
}

impl LoginStep {
    fn from_payload(payload: &Value) -> Result<Self, PlatformError> {
        let flow_token = payload["flow_token"]
            .as_str()
            .ok_or_else(|| PlatformError::Deserialization("missing flow_token".to_string()))?
            .to_string();
        let subtasks = payload["subtasks"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|s| s["subtask_id"].as_str().map(str::to_string))
            .collect();
        Ok(Self {
            flow_token,
            subtasks,
        })
    }
}

/// Implementation of the Twitter API client
pub struct TwitterClientImpl {
    http: Client,
    api_url: String,
    cookies: RwLock<BTreeMap<String, String>>,
    guest_token: RwLock<Option<String>>,
}

impl TwitterClientImpl {
    pub fn new(
        api_url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", BEARER_TOKEN))
                .map_err(|e| PlatformError::Deserialization(e.to_string()))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert("x-twitter-active-user", HeaderValue::from_static("yes"));
        headers.insert("x-twitter-client-language", HeaderValue::from_static("en"));

        let mut builder = Client::builder().default_headers(headers).timeout(timeout);
        if let Some(proxy) = proxy {
            tracing::info!(proxy, "Using proxy");
            let proxy =
                reqwest::Proxy::all(proxy).map_err(|e| PlatformError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            http: builder.build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            cookies: RwLock::new(BTreeMap::new()),
            guest_token: RwLock::new(None),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/1.1{}", self.api_url, path)
    }

    fn graphql_url(&self, query_id: &str, operation: &str) -> String {
        format!("{}/graphql/{}/{}", self.api_url, query_id, operation)
    }

    fn jar(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.cookies.read().unwrap_or_else(|e| e.into_inner())
    }

    fn jar_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.cookies.write().unwrap_or_else(|e| e.into_inner())
    }

    fn set_guest_token(&self, token: Option<String>) {
        *self.guest_token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    /// Attach session cookies, the CSRF token and the guest token
    fn with_session(&self, mut request: RequestBuilder) -> RequestBuilder {
        {
            let jar = self.jar();
            if !jar.is_empty() {
                let cookie = jar
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("; ");
                request = request.header(reqwest::header::COOKIE, cookie);
            }
            if let Some(csrf) = jar.get("ct0") {
                request = request.header("x-csrf-token", csrf.as_str());
            }
        }

        let guest = self
            .guest_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(guest) = guest {
            request = request.header("x-guest-token", guest);
        }

        request
    }

    fn capture_cookies(&self, response: &reqwest::Response) {
        let mut jar = self.jar_mut();
        for header in response.headers().get_all(SET_COOKIE) {
            let Ok(raw) = header.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim().trim_matches('"'));
            if value.is_empty() {
                jar.remove(name);
            } else {
                jar.insert(name.to_string(), value.to_string());
            }
        }
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, PlatformError> {
        self.capture_cookies(&response);
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| PlatformError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(PlatformError::Unauthorized)
        } else if status.as_u16() == 404 {
            Err(PlatformError::NotFound(response.url().path().to_string()))
        } else if status.as_u16() == 429 {
            Err(PlatformError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn activate_guest(&self) -> Result<(), PlatformError> {
        let response = self
            .with_session(self.http.post(self.api_url("/guest/activate.json")))
            .send()
            .await?;
        let payload = self.handle_response(response).await?;
        let token = payload["guest_token"]
            .as_str()
            .ok_or_else(|| PlatformError::Deserialization("missing guest_token".to_string()))?;
        self.set_guest_token(Some(token.to_string()));
        Ok(())
    }

    async fn onboarding_task(
        &self,
        flow_name: Option<&str>,
        body: Value,
    ) -> Result<LoginStep, PlatformError> {
        let mut request = self.http.post(self.api_url("/onboarding/task.json"));
        if let Some(flow_name) = flow_name {
            request = request.query(&[("flow_name", flow_name)]);
        }
        let response = self.with_session(request).json(&body).send().await?;

        // Rejections inside the flow come back as 400s with an error list
        let payload = match self.handle_response(response).await {
            Ok(payload) => payload,
            Err(PlatformError::Api { message, .. }) => {
                return Err(PlatformError::LoginRejected(message))
            }
            Err(e) => return Err(e),
        };
        LoginStep::from_payload(&payload)
    }

    async fn graphql_get(
        &self,
        query_id: &str,
        operation: &str,
        variables: Value,
    ) -> Result<Value, PlatformError> {
        let url = format!(
            "{}?variables={}&features={}",
            self.graphql_url(query_id, operation),
            encode(&variables.to_string()),
            encode(&features().to_string()),
        );
        let response = self.with_session(self.http.get(url)).send().await?;
        let payload = self.handle_response(response).await?;

        if payload["data"].is_null() {
            let message = payload["errors"][0]["message"]
                .as_str()
                .unwrap_or("empty response")
                .to_string();
            return Err(PlatformError::Api {
                status: 200,
                message,
            });
        }
        Ok(payload)
    }

    async fn user_id(&self, screen_name: &str) -> Result<String, PlatformError> {
        let payload = self
            .graphql_get(
                query_id::USER_BY_SCREEN_NAME,
                "UserByScreenName",
                json!({ "screen_name": screen_name, "withSafetyModeUserFields": true }),
            )
            .await?;
        parse::user_rest_id(&payload)
            .ok_or_else(|| PlatformError::NotFound(format!("user {}", screen_name)))
    }
}

#[async_trait]
impl PlatformClient for TwitterClientImpl {
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), PlatformError> {
        self.jar_mut().clear();
        self.set_guest_token(None);
        self.activate_guest().await?;

        let mut step = self
            .onboarding_task(
                Some("login"),
                json!({
                    "input_flow_data": {
                        "flow_context": {
                            "debug_overrides": {},
                            "start_location": { "location": "splash_screen" }
                        }
                    },
                    "subtask_versions": {}
                }),
            )
            .await?;

        for _ in 0..MAX_LOGIN_STEPS {
            let Some(subtask) = step.subtasks.first() else {
                break;
            };
            tracing::debug!(subtask = %subtask, "Login flow step");

            let input = match subtask.as_str() {
                "LoginJsInstrumentationSubtask" => json!({
                    "subtask_id": subtask,
                    "js_instrumentation": { "response": "{}", "link": "next_link" }
                }),
                "LoginEnterUserIdentifierSSO" => json!({
                    "subtask_id": subtask,
                    "settings_list": {
                        "setting_responses": [{
                            "key": "user_identifier",
                            "response_data": { "text_data": { "result": credentials.username } }
                        }],
                        "link": "next_link"
                    }
                }),
                "LoginEnterAlternateIdentifierSubtask" | "LoginAcid" => json!({
                    "subtask_id": subtask,
                    "enter_text": { "text": credentials.email, "link": "next_link" }
                }),
                "LoginEnterPassword" => json!({
                    "subtask_id": subtask,
                    "enter_password": { "password": credentials.password, "link": "next_link" }
                }),
                "AccountDuplicationCheck" => json!({
                    "subtask_id": subtask,
                    "check_logged_in_account": { "link": "AccountDuplicationCheck_false" }
                }),
                "LoginSuccessSubtask" => break,
                other => return Err(PlatformError::LoginRejected(other.to_string())),
            };

            step = self
                .onboarding_task(
                    None,
                    json!({ "flow_token": step.flow_token, "subtask_inputs": [input] }),
                )
                .await?;
        }

        self.set_guest_token(None);
        if self.jar().contains_key("auth_token") {
            Ok(())
        } else {
            Err(PlatformError::LoginRejected(
                "login flow finished without a session cookie".to_string(),
            ))
        }
    }

    fn restore_cookies(&self, cookies: &CookieBlob) -> Result<(), PlatformError> {
        if cookies.get("auth_token").is_none() {
            return Err(PlatformError::InvalidCookies(
                "missing auth_token".to_string(),
            ));
        }
        *self.jar_mut() = cookies.0.clone();
        self.set_guest_token(None);
        Ok(())
    }

    fn export_cookies(&self) -> CookieBlob {
        CookieBlob(self.jar().clone())
    }

    async fn user_tweets(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError> {
        let user_id = self.user_id(screen_name).await?;
        let payload = self
            .graphql_get(
                query_id::USER_TWEETS,
                "UserTweets",
                json!({
                    "userId": user_id,
                    "count": count,
                    "includePromotedContent": false,
                    "withQuickPromoteEligibilityTweetFields": true,
                    "withVoice": true,
                    "withV2Timeline": true
                }),
            )
            .await?;

        let mut tweets = parse::user_timeline(&payload);
        tweets.truncate(count as usize);
        Ok(tweets)
    }

    async fn list_tweets(
        &self,
        list_id: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError> {
        let payload = self
            .graphql_get(
                query_id::LIST_LATEST_TWEETS,
                "ListLatestTweetsTimeline",
                json!({ "listId": list_id, "count": count }),
            )
            .await?;

        let mut tweets = parse::list_timeline(&payload);
        tweets.truncate(count as usize);
        Ok(tweets)
    }
}

/// Creates `TwitterClientImpl`s that share API origin and timeout
pub struct TwitterClientFactory {
    api_url: String,
    timeout: Duration,
}

impl TwitterClientFactory {
    pub fn new(api_url: String, timeout: Duration) -> Self {
        Self { api_url, timeout }
    }
}

impl ClientFactory for TwitterClientFactory {
    fn create(&self, proxy: Option<&str>) -> Result<Arc<dyn PlatformClient>, PlatformError> {
        Ok(Arc::new(TwitterClientImpl::new(
            &self.api_url,
            proxy,
            self.timeout,
        )?))
    }
}
