//! Keyword-rule intent classification.
//!
//! Rules are evaluated in a fixed order and the first satisfied rule wins,
//! which doubles as the tie-break: "create or update contact" classifies as
//! create. All matching is case-insensitive substring containment over the
//! raw request.

/// The CRM operation a request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    CreateContact,
    UpdateContact,
    SearchContact,
    DeleteContact,
    CreateDeal,
    Unrecognized,
}

/// Classifies `text` into an [`Intent`]. Pure; the email-presence gate is
/// enforced by the action handler, not here.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();

    if lowered.contains("create") && lowered.contains("contact") {
        return Intent::CreateContact;
    }
    if lowered.contains("update") && lowered.contains("contact") {
        return Intent::UpdateContact;
    }
    if ["find", "search", "lookup"].iter().any(|keyword| lowered.contains(keyword)) {
        return Intent::SearchContact;
    }
    if ["delete", "remove"].iter().any(|keyword| lowered.contains(keyword)) {
        return Intent::DeleteContact;
    }
    if lowered.contains("create") && lowered.contains("deal") {
        return Intent::CreateDeal;
    }

    Intent::Unrecognized
}

/// Whether `text` looks like it is about the CRM at all. The dispatcher uses
/// this to decide if the CRM branch should run.
pub fn mentions_crm(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["contact", "deal", "crm", "hubspot"].iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::{classify, mentions_crm, Intent};

    #[test]
    fn rule_order_decides_classification() {
        let cases = [
            ("Create a contact for jane@example.com", Intent::CreateContact),
            ("please UPDATE the contact record", Intent::UpdateContact),
            ("find contact jane@example.com", Intent::SearchContact),
            ("lookup jane@example.com", Intent::SearchContact),
            ("remove contact jane@example.com", Intent::DeleteContact),
            ("create deal for Acme Corp", Intent::CreateDeal),
            ("what is the weather", Intent::Unrecognized),
        ];

        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "text: {text}");
        }
    }

    #[test]
    fn create_beats_update_when_both_appear() {
        assert_eq!(classify("create or update contact jane@example.com"), Intent::CreateContact);
    }

    #[test]
    fn search_beats_delete_when_both_appear() {
        // `find and delete` stops at the find rule; deletion needs its own
        // request.
        assert_eq!(classify("find and delete contact jane@example.com"), Intent::SearchContact);
    }

    #[test]
    fn deal_without_create_is_unrecognized() {
        assert_eq!(classify("a deal happened"), Intent::Unrecognized);
    }

    #[test]
    fn crm_mentions_are_case_insensitive() {
        assert!(mentions_crm("open a DEAL"));
        assert!(mentions_crm("sync with HubSpot"));
        assert!(mentions_crm("contact me"));
        assert!(!mentions_crm("send an email to bob@example.com"));
    }
}
