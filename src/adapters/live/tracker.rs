//! Live adapter for the `BugTracker` port using the Bugzilla REST API.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, OnceLock};

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{Credentials, Server};
use crate::error::PortError;
use crate::ports::BugTracker;
use crate::tracker::record::{
    BugId, BugRecord, BugUpdate, Comment, FieldDescriptor, Product, User,
};

/// Header carrying an API key.
const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";

/// Live tracker talking to one Bugzilla server.
///
/// Calls block on a private current-thread runtime. Field metadata and the
/// product list are fetched at most once; user searches are cached per query.
pub struct LiveBugTracker {
    client: Client,
    runtime: tokio::runtime::Runtime,
    rest: Url,
    credentials: Credentials,
    fields: OnceLock<Vec<FieldDescriptor>>,
    products: OnceLock<Vec<Product>>,
    users: Mutex<HashMap<String, Vec<User>>>,
}

/// `{"bugs": [..]}` as returned by `GET bug/{id}`.
#[derive(Deserialize)]
struct BugsResponse {
    bugs: Vec<BugRecord>,
}

/// `GET field/bug`.
#[derive(Deserialize)]
struct FieldsResponse {
    fields: Vec<FieldDescriptor>,
}

/// `GET product`.
#[derive(Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

/// `GET user`.
#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

/// `POST bug` and `POST bug/{id}/comment`.
#[derive(Deserialize)]
struct CreatedResponse {
    id: u64,
}

/// `GET bug/{id}/comment`: comments keyed by bug number.
#[derive(Deserialize)]
struct CommentsResponse {
    bugs: HashMap<String, BugComments>,
}

#[derive(Deserialize)]
struct BugComments {
    comments: Vec<Comment>,
}

/// Error body; Bugzilla sets `error: true` and may still answer 200.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
}

impl LiveBugTracker {
    /// Creates a tracker for `server`.
    ///
    /// # Errors
    ///
    /// Returns an error if the async runtime cannot be created or the
    /// server URL cannot carry a REST path.
    pub fn new(server: &Server) -> Result<Self, PortError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let rest = server.url.join("rest/")?;
        Ok(Self {
            client: Client::new(),
            runtime,
            rest,
            credentials: server.credentials.clone(),
            fields: OnceLock::new(),
            products: OnceLock::new(),
            users: Mutex::new(HashMap::new()),
        })
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, PortError> {
        let url = self.rest.join(path)?;
        tracing::debug!(%method, %url, "tracker request");

        let mut request = self.client.request(method, url).query(query);
        match &self.credentials {
            Credentials::Anonymous => {}
            Credentials::ApiKey(key) => request = request.header(API_KEY_HEADER, key),
            Credentials::Login { user, password } => {
                request = request.query(&[
                    ("Bugzilla_login", user.as_str()),
                    ("Bugzilla_password", password.as_str()),
                ]);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        self.runtime.block_on(send(request))
    }
}

/// Prefix an error with what was being attempted.
fn failed<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> PortError {
    move |e| format!("{what}: {e}").into()
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, PortError> {
    let response = request.send().await.map_err(failed("request failed"))?;
    let status = response.status();
    let http_error = || format!("HTTP {}", status.as_u16());
    let text = response
        .text()
        .await
        .map_err(failed("failed to read response"))?;

    if let Ok(body) = serde_json::from_str::<ErrorResponse>(&text) {
        if body.error {
            return Err(body.message.unwrap_or_else(http_error).into());
        }
    }
    if !status.is_success() {
        return Err(http_error().into());
    }
    serde_json::from_str(&text).map_err(failed("unexpected response"))
}

impl BugTracker for LiveBugTracker {
    fn get_bug(&self, id: BugId) -> Result<BugRecord, PortError> {
        let response: BugsResponse = self.request(Method::GET, &format!("bug/{id}"), &[], None)?;
        response
            .bugs
            .into_iter()
            .next()
            .ok_or_else(|| format!("bug {id} not returned").into())
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, PortError> {
        if let Some(fields) = self.fields.get() {
            return Ok(fields.clone());
        }
        let response: FieldsResponse = self.request(Method::GET, "field/bug", &[], None)?;
        Ok(self.fields.get_or_init(|| response.fields).clone())
    }

    fn products(&self) -> Result<Vec<Product>, PortError> {
        if let Some(products) = self.products.get() {
            return Ok(products.clone());
        }
        let response: ProductsResponse =
            self.request(Method::GET, "product", &[("type", "accessible")], None)?;
        Ok(self.products.get_or_init(|| response.products).clone())
    }

    fn match_users(&self, query: &str) -> Result<Vec<User>, PortError> {
        let cached = self
            .users
            .lock()
            .map_err(|_| -> PortError { "user cache poisoned".into() })?
            .get(query)
            .cloned();
        if let Some(users) = cached {
            return Ok(users);
        }
        let response: UsersResponse = self.request(Method::GET, "user", &[("match", query)], None)?;
        if let Ok(mut cache) = self.users.lock() {
            cache.insert(query.to_string(), response.users.clone());
        }
        Ok(response.users)
    }

    fn update_bug(&self, id: BugId, update: &BugUpdate) -> Result<(), PortError> {
        let body = serde_json::to_value(update)?;
        let _: Value = self.request(Method::PUT, &format!("bug/{id}"), &[], Some(&body))?;
        Ok(())
    }

    fn add_comment(&self, id: BugId, text: &str) -> Result<(), PortError> {
        let body = json!({ "comment": text });
        let created: CreatedResponse =
            self.request(Method::POST, &format!("bug/{id}/comment"), &[], Some(&body))?;
        tracing::debug!(bug = %id, comment = created.id, "comment created");
        Ok(())
    }

    fn comments(&self, id: BugId) -> Result<Vec<Comment>, PortError> {
        let mut response: CommentsResponse =
            self.request(Method::GET, &format!("bug/{id}/comment"), &[], None)?;
        response
            .bugs
            .remove(&id.to_string())
            .map(|bug| bug.comments)
            .ok_or_else(|| format!("no comments returned for bug {id}").into())
    }

    fn create_bug(&self, data: &BTreeMap<String, Value>) -> Result<BugId, PortError> {
        // REST takes the first comment as `description`.
        let mut data = data.clone();
        if let Some(text) = data.remove("comment") {
            data.entry("description".to_string()).or_insert(text);
        }
        let body = serde_json::to_value(&data)?;
        let created: CreatedResponse = self.request(Method::POST, "bug", &[], Some(&body))?;
        let id = u32::try_from(created.id)
            .map_err(|_| format!("bug number out of range: {}", created.id))?;
        Ok(BugId(id))
    }
}

/// Tracker used when no server is needed or none could be configured.
///
/// Every call fails; commands that never reach the tracker run normally.
pub struct Unconfigured;

impl Unconfigured {
    fn fail<T>() -> Result<T, PortError> {
        Err("no tracker configured".into())
    }
}

impl BugTracker for Unconfigured {
    fn get_bug(&self, _id: BugId) -> Result<BugRecord, PortError> {
        Self::fail()
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, PortError> {
        Self::fail()
    }

    fn products(&self) -> Result<Vec<Product>, PortError> {
        Self::fail()
    }

    fn match_users(&self, _query: &str) -> Result<Vec<User>, PortError> {
        Self::fail()
    }

    fn update_bug(&self, _id: BugId, _update: &BugUpdate) -> Result<(), PortError> {
        Self::fail()
    }

    fn add_comment(&self, _id: BugId, _text: &str) -> Result<(), PortError> {
        Self::fail()
    }

    fn comments(&self, _id: BugId) -> Result<Vec<Comment>, PortError> {
        Self::fail()
    }

    fn create_bug(&self, _data: &BTreeMap<String, Value>) -> Result<BugId, PortError> {
        Self::fail()
    }
}
