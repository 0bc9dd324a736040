//! HubSpot v3 objects API client.
//!
//! Thin wrapper over `reqwest` with static bearer-token auth. Every method
//! is a single request against `/crm/v3/objects/...`; non-2xx statuses are
//! surfaced as [`CrmError::Api`] with the response body attached.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::types::{ContactProperties, ContactRecord, DealProperties};
use crate::{CrmApi, CrmError};

pub struct HubSpotClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HubSpotClient {
    pub fn new(base_url: String, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, CrmError> {
        let response = request.bearer_auth(self.api_key.expose_secret()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::Api { status: status.as_u16(), body });
        }

        Ok(response)
    }
}

#[derive(Serialize)]
struct PropertiesBody<T> {
    properties: T,
}

#[derive(Deserialize)]
struct ObjectEnvelope {
    id: String,
    #[serde(default)]
    properties: PropertyMap,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyMap {
    email: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Vec<ObjectEnvelope>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    filter_groups: Vec<FilterGroup>,
}

#[derive(Serialize)]
struct FilterGroup {
    filters: Vec<Filter>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Filter {
    property_name: &'static str,
    operator: &'static str,
    value: String,
}

fn email_search_request(email: &str) -> SearchRequest {
    SearchRequest {
        filter_groups: vec![FilterGroup {
            filters: vec![Filter {
                property_name: "email",
                operator: "EQ",
                value: email.to_string(),
            }],
        }],
    }
}

impl From<ObjectEnvelope> for ContactRecord {
    fn from(envelope: ObjectEnvelope) -> Self {
        Self {
            id: envelope.id,
            email: envelope.properties.email,
            firstname: envelope.properties.firstname,
            lastname: envelope.properties.lastname,
            phone: envelope.properties.phone,
        }
    }
}

#[async_trait]
impl CrmApi for HubSpotClient {
    async fn create_contact(
        &self,
        properties: ContactProperties,
    ) -> Result<ContactRecord, CrmError> {
        tracing::debug!(operation = "create_contact", "sending CRM request");
        let response = self
            .execute(
                self.http
                    .post(self.url("/crm/v3/objects/contacts"))
                    .json(&PropertiesBody { properties }),
            )
            .await?;

        let envelope: ObjectEnvelope = response.json().await?;
        Ok(envelope.into())
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: ContactProperties,
    ) -> Result<ContactRecord, CrmError> {
        tracing::debug!(operation = "update_contact", contact_id, "sending CRM request");
        let response = self
            .execute(
                self.http
                    .patch(self.url(&format!("/crm/v3/objects/contacts/{contact_id}")))
                    .json(&PropertiesBody { properties }),
            )
            .await?;

        let envelope: ObjectEnvelope = response.json().await?;
        Ok(envelope.into())
    }

    async fn search_contact(&self, email: &str) -> Result<Option<ContactRecord>, CrmError> {
        tracing::debug!(operation = "search_contact", "sending CRM request");
        let response = self
            .execute(
                self.http
                    .post(self.url("/crm/v3/objects/contacts/search"))
                    .json(&email_search_request(email)),
            )
            .await?;

        let envelope: SearchEnvelope = response.json().await?;
        Ok(envelope.results.into_iter().next().map(ContactRecord::from))
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<(), CrmError> {
        tracing::debug!(operation = "delete_contact", contact_id, "sending CRM request");
        self.execute(self.http.delete(self.url(&format!("/crm/v3/objects/contacts/{contact_id}"))))
            .await?;
        Ok(())
    }

    async fn create_deal(&self, properties: DealProperties) -> Result<String, CrmError> {
        tracing::debug!(operation = "create_deal", "sending CRM request");
        let response = self
            .execute(
                self.http
                    .post(self.url("/crm/v3/objects/deals"))
                    .json(&PropertiesBody { properties }),
            )
            .await?;

        let envelope: ObjectEnvelope = response.json().await?;
        Ok(envelope.id)
    }
}
