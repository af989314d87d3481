use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LeadMagnetId, LinkId},
    error::ApiError,
    protocol::{
        LeadMagnet, Link, LinkChanges, NewLeadMagnet, NewLink, ReorderAck, ReorderRequest,
    },
};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, Result},
    store::{LeadMagnetStore, LinkStore},
};

/// Endpoint and credentials the client talks to. Passed in explicitly; the
/// client never reads ambient session state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    base_url: String,
    bearer_token: Option<String>,
    request_timeout: Option<Duration>,
}

impl SessionContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            bearer_token: None,
            request_timeout: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

/// Entity a request addresses, so 404/409 can be reported against it.
pub(crate) struct Subject<'a> {
    pub entity: &'static str,
    pub id: &'a str,
}

pub struct ApiClient {
    http: Client,
    context: SessionContext,
}

impl ApiClient {
    pub fn new(context: SessionContext) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = context.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::HttpClient)?;
        Ok(Self { http, context })
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn set_bearer_token(&mut self, token: Option<String>) {
        self.context.bearer_token = token.filter(|token| !token.is_empty());
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.context.base_url)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.put(self.url(path)))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.patch(self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.delete(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.context.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and maps transport failures and non-2xx statuses
    /// into `ClientError`.
    pub(crate) async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        subject: Option<Subject<'_>>,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|source| {
            warn!(endpoint, error = %source, "api request failed before a response arrived");
            ClientError::Network {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint, status = status.as_u16(), "api request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|api_error| api_error.message)
            .unwrap_or(body);
        warn!(endpoint, status = status.as_u16(), %message, "api request rejected");

        Err(match (status, subject) {
            (StatusCode::NOT_FOUND, Some(subject)) => ClientError::NotFound {
                entity: subject.entity,
                id: subject.id.to_string(),
            },
            (StatusCode::CONFLICT, Some(subject)) => ClientError::Conflict {
                entity: subject.entity,
                id: subject.id.to_string(),
            },
            _ => ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            },
        })
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        subject: Option<Subject<'_>>,
    ) -> Result<T> {
        self.send(endpoint, request, subject)
            .await?
            .json()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

const LINKS: &str = "/api/links";
const LINKS_REORDER: &str = "/api/links/reorder";
const LEAD_MAGNETS: &str = "/api/lead-magnets";

#[async_trait]
impl LinkStore for ApiClient {
    async fn list_links(&self) -> Result<Vec<Link>> {
        let links: Vec<Link> = self.send_json(LINKS, self.get(LINKS), None).await?;
        info!(count = links.len(), "fetched links");
        Ok(links)
    }

    async fn create_link(&self, link: &NewLink) -> Result<Link> {
        let created: Link = self
            .send_json(LINKS, self.post(LINKS).json(link), None)
            .await?;
        info!(link_id = %created.id, order = created.order, "created link");
        Ok(created)
    }

    async fn update_link(&self, id: &LinkId, changes: &LinkChanges) -> Result<Link> {
        let path = format!("{LINKS}/{id}");
        self.send_json(
            &path,
            self.patch(&path).json(changes),
            Some(Subject {
                entity: "link",
                id: id.as_str(),
            }),
        )
        .await
    }

    async fn delete_link(&self, id: &LinkId) -> Result<()> {
        let path = format!("{LINKS}/{id}");
        self.send(
            &path,
            self.delete(&path),
            Some(Subject {
                entity: "link",
                id: id.as_str(),
            }),
        )
        .await?;
        info!(link_id = %id, "deleted link");
        Ok(())
    }

    async fn reorder_link(&self, request: &ReorderRequest) -> Result<ReorderAck> {
        let response = self
            .send(
                LINKS_REORDER,
                self.patch(LINKS_REORDER).json(request),
                Some(Subject {
                    entity: "link",
                    id: request.moved_id.as_str(),
                }),
            )
            .await?;
        let body = response.bytes().await.map_err(|source| ClientError::Network {
            endpoint: LINKS_REORDER.to_string(),
            source,
        })?;
        // Servers may acknowledge with an empty body.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ReorderAck::default());
        }
        Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable reorder acknowledgement");
            ReorderAck::default()
        }))
    }
}

#[async_trait]
impl LeadMagnetStore for ApiClient {
    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>> {
        self.send_json(LEAD_MAGNETS, self.get(LEAD_MAGNETS), None)
            .await
    }

    async fn create_lead_magnet(&self, lead_magnet: &NewLeadMagnet) -> Result<LeadMagnet> {
        let created: LeadMagnet = self
            .send_json(LEAD_MAGNETS, self.post(LEAD_MAGNETS).json(lead_magnet), None)
            .await?;
        info!(lead_magnet_id = %created.id, "created lead magnet");
        Ok(created)
    }

    async fn replace_lead_magnet(
        &self,
        id: &LeadMagnetId,
        lead_magnet: &NewLeadMagnet,
    ) -> Result<LeadMagnet> {
        let path = format!("{LEAD_MAGNETS}/{id}");
        self.send_json(
            &path,
            self.put(&path).json(lead_magnet),
            Some(Subject {
                entity: "lead magnet",
                id: id.as_str(),
            }),
        )
        .await
    }

    async fn delete_lead_magnet(&self, id: &LeadMagnetId) -> Result<()> {
        let path = format!("{LEAD_MAGNETS}/{id}");
        self.send(
            &path,
            self.delete(&path),
            Some(Subject {
                entity: "lead magnet",
                id: id.as_str(),
            }),
        )
        .await?;
        info!(lead_magnet_id = %id, "deleted lead magnet");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
