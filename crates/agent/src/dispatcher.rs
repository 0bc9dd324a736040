//! Rule-based dispatch: one request in, one prose reply out.
//!
//! The CRM branch runs when the request mentions the CRM vocabulary at all;
//! the notification branch runs whenever the request names an email address.
//! The branches succeed or fail independently and every failure is rendered
//! into the reply instead of propagating.

use std::sync::Arc;

use crmpilot_core::mentions_crm;
use crmpilot_crm::CrmApi;
use crmpilot_notify::Mailer;

use crate::actions::CrmActionHandler;
use crate::llm::LlmClient;
use crate::notifier::NotificationTrigger;

/// Fixed reply when neither branch fires.
pub const NO_ACTION_MESSAGE: &str = "No action was performed.";

pub struct Dispatcher<C, M> {
    actions: CrmActionHandler<C>,
    notifier: NotificationTrigger<M>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl<C: CrmApi, M: Mailer> Dispatcher<C, M> {
    pub fn new(crm: C, mailer: M, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            actions: CrmActionHandler::new(crm),
            notifier: NotificationTrigger::new(mailer),
            llm,
        }
    }

    /// The completion client carried for future conversational features.
    /// Nothing in `process` consults it.
    pub fn llm_client(&self) -> Option<&dyn LlmClient> {
        self.llm.as_deref()
    }

    /// Routes `request` through the CRM and notification branches and
    /// renders the aggregate reply.
    pub async fn process(&self, request: &str) -> String {
        let mut sections = Vec::new();
        let mut crm_summary = None;

        if mentions_crm(request) {
            let rendered = match self.actions.handle(request).await {
                Ok(outcome) => outcome.to_string(),
                Err(error) => {
                    tracing::warn!(%error, "CRM action did not complete");
                    error.to_string()
                }
            };
            sections.push(format!("CRM: {rendered}"));
            crm_summary = Some(rendered);
        }

        if let Some(outcome) = self.notifier.notify(request, crm_summary.as_deref()).await {
            sections.push(format!("Notification: {outcome}"));
        }

        if sections.is_empty() {
            return NO_ACTION_MESSAGE.to_string();
        }
        sections.join("\n")
    }
}
