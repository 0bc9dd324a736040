//! CRM action handling: classify, extract, call, report.
//!
//! Every path through [`CrmActionHandler::handle`] ends in a typed value -
//! either a [`CrmOutcome`] describing what the CRM now looks like, or a
//! [`CrmActionError`] naming why nothing was done. The handler never mutates
//! the CRM without an email address in hand, and an update never runs when
//! the search found nothing or the request carried no new values.

use std::fmt;

use crmpilot_core::{classify, extract_contact_fields, extract_deal_fields, extract_email};
use crmpilot_core::{ExtractMode, ExtractedFields, FieldKey, Intent};
use crmpilot_crm::{ContactProperties, ContactRecord, CrmApi, CrmError, DealProperties};
use thiserror::Error;

/// What a successful CRM action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CrmOutcome {
    ContactCreated { email: String },
    ContactUpdated { email: String },
    ContactFound { contact: ContactRecord },
    ContactNotFound { email: String },
    ContactDeleted { email: String },
    DealCreated { name: Option<String>, amount: Option<String> },
}

impl fmt::Display for CrmOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContactCreated { email } => write!(f, "Contact created: {email}"),
            Self::ContactUpdated { email } => write!(f, "Contact updated: {email}"),
            Self::ContactFound { contact } => write!(f, "Contact found:\n{}", contact.describe()),
            Self::ContactNotFound { email } => write!(f, "No contact found with email {email}"),
            Self::ContactDeleted { email } => write!(f, "Contact deleted: {email}"),
            Self::DealCreated { name, amount } => {
                let name = name.as_deref().unwrap_or("unnamed deal");
                match amount {
                    Some(amount) => write!(f, "Deal created: {name} (amount: {amount})"),
                    None => write!(f, "Deal created: {name}"),
                }
            }
        }
    }
}

/// Why no CRM action happened. Input-shape failures and remote failures are
/// both rendered to prose at the dispatcher boundary; neither propagates
/// past it.
#[derive(Debug, Error)]
pub enum CrmActionError {
    #[error("no email address was found in the request, so no CRM operation was attempted")]
    MissingEmail,
    #[error("could not determine a CRM operation from the request")]
    UnrecognizedRequest,
    #[error("found contact {email} but no new field values were recognized, nothing was changed")]
    NothingToUpdate { email: String },
    #[error("the CRM request failed: {0}")]
    Remote(#[from] CrmError),
}

pub struct CrmActionHandler<C> {
    crm: C,
}

impl<C: CrmApi> CrmActionHandler<C> {
    pub fn new(crm: C) -> Self {
        Self { crm }
    }

    /// Interprets `request` and performs at most one CRM operation.
    pub async fn handle(&self, request: &str) -> Result<CrmOutcome, CrmActionError> {
        // Email gate first: without an address there is nothing to key any
        // contact or deal operation on, and no remote call may happen.
        let email = extract_email(request).ok_or(CrmActionError::MissingEmail)?;
        let intent = classify(request);
        tracing::info!(?intent, "handling CRM request");

        match intent {
            Intent::CreateContact => {
                let fields = extract_contact_fields(request, ExtractMode::Create);
                let properties = contact_properties(Some(&email), &fields);
                self.crm.create_contact(properties).await?;
                Ok(CrmOutcome::ContactCreated { email })
            }
            Intent::UpdateContact => {
                let Some(existing) = self.crm.search_contact(&email).await? else {
                    return Ok(CrmOutcome::ContactNotFound { email });
                };

                let fields = extract_contact_fields(request, ExtractMode::Update);
                if fields.is_empty() {
                    return Err(CrmActionError::NothingToUpdate { email });
                }

                let properties = contact_properties(None, &fields);
                self.crm.update_contact(&existing.id, properties).await?;
                Ok(CrmOutcome::ContactUpdated { email })
            }
            Intent::SearchContact => match self.crm.search_contact(&email).await? {
                Some(contact) => Ok(CrmOutcome::ContactFound { contact }),
                None => Ok(CrmOutcome::ContactNotFound { email }),
            },
            Intent::DeleteContact => {
                let Some(existing) = self.crm.search_contact(&email).await? else {
                    return Ok(CrmOutcome::ContactNotFound { email });
                };

                self.crm.delete_contact(&existing.id).await?;
                Ok(CrmOutcome::ContactDeleted { email })
            }
            Intent::CreateDeal => {
                let fields = extract_deal_fields(request);
                let name = fields.get(FieldKey::DealName).map(str::to_string);
                let amount = fields.get(FieldKey::Amount).map(str::to_string);
                let properties =
                    DealProperties { dealname: name.clone(), amount: amount.clone() };
                self.crm.create_deal(properties).await?;
                Ok(CrmOutcome::DealCreated { name, amount })
            }
            Intent::Unrecognized => Err(CrmActionError::UnrecognizedRequest),
        }
    }
}

fn contact_properties(email: Option<&str>, fields: &ExtractedFields) -> ContactProperties {
    ContactProperties {
        email: email.map(str::to_string),
        firstname: fields.get(FieldKey::FirstName).map(str::to_string),
        lastname: fields.get(FieldKey::LastName).map(str::to_string),
        phone: fields.get(FieldKey::Phone).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use crmpilot_crm::{ContactProperties, ContactRecord, CrmApi, CrmError, DealProperties};

    use super::{CrmActionError, CrmActionHandler, CrmOutcome};

    #[derive(Default)]
    struct RecordingCrm {
        calls: Mutex<Vec<String>>,
        search_result: Option<ContactRecord>,
        fail_remote: bool,
    }

    impl RecordingCrm {
        fn with_contact(contact: ContactRecord) -> Self {
            Self { search_result: Some(contact), ..Self::default() }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("call log mutex should not be poisoned").clone()
        }

        fn record(&self, call: String) -> Result<(), CrmError> {
            self.calls.lock().expect("call log mutex should not be poisoned").push(call);
            if self.fail_remote {
                return Err(CrmError::Api { status: 500, body: "boom".to_string() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CrmApi for RecordingCrm {
        async fn create_contact(
            &self,
            properties: ContactProperties,
        ) -> Result<ContactRecord, CrmError> {
            self.record(format!("create_contact {properties:?}"))?;
            Ok(ContactRecord { id: "new".to_string(), email: properties.email, ..Default::default() })
        }

        async fn update_contact(
            &self,
            contact_id: &str,
            properties: ContactProperties,
        ) -> Result<ContactRecord, CrmError> {
            self.record(format!("update_contact {contact_id} {properties:?}"))?;
            Ok(ContactRecord { id: contact_id.to_string(), ..Default::default() })
        }

        async fn search_contact(&self, email: &str) -> Result<Option<ContactRecord>, CrmError> {
            self.record(format!("search_contact {email}"))?;
            Ok(self.search_result.clone())
        }

        async fn delete_contact(&self, contact_id: &str) -> Result<(), CrmError> {
            self.record(format!("delete_contact {contact_id}"))
        }

        async fn create_deal(&self, properties: DealProperties) -> Result<String, CrmError> {
            self.record(format!("create_deal {properties:?}"))?;
            Ok("deal-1".to_string())
        }
    }

    fn known_contact() -> ContactRecord {
        ContactRecord {
            id: "1001".to_string(),
            email: Some("jane@example.com".to_string()),
            firstname: Some("Jane".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn request_without_email_never_reaches_the_crm() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let error = handler
            .handle("create a contact for my friend")
            .await
            .expect_err("missing email should fail");

        assert!(matches!(error, CrmActionError::MissingEmail));
        assert!(crm.calls().is_empty(), "no remote call may happen without an email");
    }

    #[tokio::test]
    async fn create_contact_sends_extracted_properties() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("Create contact for jane@example.com, first name is Jane, phone number is 555-123-4567")
            .await
            .expect("create should succeed");

        assert_eq!(outcome, CrmOutcome::ContactCreated { email: "jane@example.com".to_string() });
        let calls = crm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("create_contact"));
        assert!(calls[0].contains("jane@example.com"));
        assert!(calls[0].contains("5551234567"));
    }

    #[tokio::test]
    async fn update_stops_after_failed_search() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("update contact jane@example.com phone number to 555-123-4567")
            .await
            .expect("not-found is a terminal outcome, not an error");

        assert_eq!(outcome, CrmOutcome::ContactNotFound { email: "jane@example.com".to_string() });
        assert_eq!(crm.calls(), vec!["search_contact jane@example.com".to_string()]);
    }

    #[tokio::test]
    async fn update_with_no_recognized_fields_never_mutates() {
        let crm = Arc::new(RecordingCrm::with_contact(known_contact()));
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let error = handler
            .handle("update contact jane@example.com somehow")
            .await
            .expect_err("empty update set should fail");

        assert!(matches!(error, CrmActionError::NothingToUpdate { .. }));
        assert_eq!(crm.calls(), vec!["search_contact jane@example.com".to_string()]);
    }

    #[tokio::test]
    async fn update_patches_the_found_record() {
        let crm = Arc::new(RecordingCrm::with_contact(known_contact()));
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("update contact jane@example.com first name to Janet")
            .await
            .expect("update should succeed");

        assert_eq!(outcome, CrmOutcome::ContactUpdated { email: "jane@example.com".to_string() });
        let calls = crm.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].starts_with("update_contact 1001"));
        assert!(calls[1].contains("Janet"));
        assert!(!calls[1].contains("jane@example.com"), "email is the key, not an update value");
    }

    #[tokio::test]
    async fn search_renders_the_found_record() {
        let crm = Arc::new(RecordingCrm::with_contact(known_contact()));
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome =
            handler.handle("find contact jane@example.com").await.expect("search should succeed");

        let CrmOutcome::ContactFound { contact } = outcome else {
            panic!("expected a found contact");
        };
        assert_eq!(contact.id, "1001");
    }

    #[tokio::test]
    async fn search_without_match_reports_not_found() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("find contact jane@example.com")
            .await
            .expect("not-found is a terminal outcome, not an error");

        assert_eq!(outcome, CrmOutcome::ContactNotFound { email: "jane@example.com".to_string() });
        assert_eq!(crm.calls(), vec!["search_contact jane@example.com".to_string()]);
    }

    #[tokio::test]
    async fn delete_searches_then_deletes_by_id() {
        let crm = Arc::new(RecordingCrm::with_contact(known_contact()));
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("delete contact jane@example.com")
            .await
            .expect("delete should succeed");

        assert_eq!(outcome, CrmOutcome::ContactDeleted { email: "jane@example.com".to_string() });
        assert_eq!(
            crm.calls(),
            vec!["search_contact jane@example.com".to_string(), "delete_contact 1001".to_string()]
        );
    }

    #[tokio::test]
    async fn deal_creation_extracts_name_and_amount() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let outcome = handler
            .handle("Create deal for Acme Corp with amount $50,000, bill to jane@example.com")
            .await
            .expect("deal creation should succeed");

        assert_eq!(
            outcome,
            CrmOutcome::DealCreated {
                name: Some("Acme Corp".to_string()),
                amount: Some("50000".to_string()),
            }
        );
        let calls = crm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("Acme Corp"));
        assert!(calls[0].contains("50000"));
    }

    #[tokio::test]
    async fn remote_failures_become_typed_errors() {
        let crm = Arc::new(RecordingCrm { fail_remote: true, ..Default::default() });
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let error = handler
            .handle("create contact for jane@example.com")
            .await
            .expect_err("remote failure should surface");

        assert!(matches!(error, CrmActionError::Remote(_)));
    }

    #[tokio::test]
    async fn unrecognized_request_with_email_makes_no_call() {
        let crm = Arc::new(RecordingCrm::default());
        let handler = CrmActionHandler::new(Arc::clone(&crm));

        let error = handler
            .handle("tell the crm team jane@example.com says hi")
            .await
            .expect_err("unrecognized request should fail");

        assert!(matches!(error, CrmActionError::UnrecognizedRequest));
        assert!(crm.calls().is_empty());
    }

    #[test]
    fn outcome_rendering_is_stable() {
        let outcome = CrmOutcome::DealCreated {
            name: Some("Acme Corp".to_string()),
            amount: Some("50000".to_string()),
        };
        assert_eq!(outcome.to_string(), "Deal created: Acme Corp (amount: 50000)");

        let outcome = CrmOutcome::DealCreated { name: Some("Acme Corp".to_string()), amount: None };
        assert_eq!(outcome.to_string(), "Deal created: Acme Corp");
    }
}
