//! Completion-email trigger.
//!
//! Fires whenever the original request names an email address, independent
//! of whether the CRM branch ran or succeeded. The recipient is the first
//! address in the request, which means a request naming two addresses sends
//! the notification to the same address the CRM operation used.

use std::fmt;

use crmpilot_core::extract_email;
use crmpilot_notify::Mailer;

pub const NOTIFICATION_SUBJECT: &str = "CRM Action Completed";

/// Result of one send attempt. Mail failures are an outcome, not an error;
/// they never abort the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent { recipient: String },
    Failed { recipient: String, reason: String },
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { recipient } => write!(f, "email sent to {recipient}"),
            Self::Failed { recipient, reason } => {
                write!(f, "email to {recipient} failed: {reason}")
            }
        }
    }
}

pub struct NotificationTrigger<M> {
    mailer: M,
}

impl<M: Mailer> NotificationTrigger<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Sends a completion email when `request` names an address; `None`
    /// means the trigger did not fire at all.
    pub async fn notify(
        &self,
        request: &str,
        crm_summary: Option<&str>,
    ) -> Option<NotificationOutcome> {
        let recipient = extract_email(request)?;
        let body = compose_body(request, crm_summary);

        match self.mailer.send(&recipient, NOTIFICATION_SUBJECT, &body).await {
            Ok(()) => {
                tracing::info!(recipient = %recipient, "notification email sent");
                Some(NotificationOutcome::Sent { recipient })
            }
            Err(error) => {
                tracing::warn!(recipient = %recipient, %error, "notification email failed");
                Some(NotificationOutcome::Failed { recipient, reason: error.to_string() })
            }
        }
    }
}

fn compose_body(request: &str, crm_summary: Option<&str>) -> String {
    let result = crm_summary.unwrap_or("no CRM action was performed");
    format!(
        "Dear User,\n\n\
         The following CRM action has been completed.\n\n\
         Request: {request}\n\
         Result: {result}\n\n\
         Best regards,\n\
         CRM Automation"
    )
}
