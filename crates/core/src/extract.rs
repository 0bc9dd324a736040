//! Regex-driven field extraction.
//!
//! All extraction is a declarative rule table: each rule names a target
//! field, an ordered list of patterns (first match wins), and a
//! post-processing function that normalizes the captured text. Accuracy
//! depends entirely on the phrasing conventions baked into the patterns;
//! there is no language understanding here and that is intentional.

use regex_lite::Regex;

use crate::domain::{ExtractMode, ExtractedFields, FieldKey};

/// Matches the first email-shaped substring. Loose on purpose: it will
/// happily swallow trailing dots, so `jane@example.com.` captures the dot.
const EMAIL_PATTERN: &str = r"[\w.-]+@[\w.-]+";

struct FieldRule {
    field: FieldKey,
    patterns: &'static [&'static str],
    post: fn(&str) -> Option<String>,
}

const CONTACT_CREATE_RULES: &[FieldRule] = &[
    FieldRule {
        field: FieldKey::FirstName,
        patterns: &[r"(?i)first\s*name\s*(?:is|:)?\s*(\w+)"],
        post: trimmed,
    },
    FieldRule {
        field: FieldKey::LastName,
        patterns: &[r"(?i)last\s*name\s*(?:is|:)?\s*(\w+)"],
        post: trimmed,
    },
    FieldRule {
        field: FieldKey::Phone,
        patterns: &[
            r"(?i)phone\s*number\s*(?:is|:)?\s*([\d\s\-\+\(\)]+)",
            r"(?i)phone\s*(?:is|:)?\s*([\d\s\-\+\(\)]+)",
            r"(?i)phone\s*:?\s*(\d+)",
            // Last resort for capture-time requests only: any standalone run
            // of five or more digits.
            r"(\d{5,})",
        ],
        post: digits,
    },
];

const CONTACT_UPDATE_RULES: &[FieldRule] = &[
    FieldRule {
        field: FieldKey::FirstName,
        patterns: &[r"(?i)first\s*name\s*to\s*(?:is|:)?\s*(\w+)"],
        post: trimmed,
    },
    FieldRule {
        field: FieldKey::LastName,
        patterns: &[r"(?i)last\s*name\s*to\s*(?:is|:)?\s*(\w+)"],
        post: trimmed,
    },
    FieldRule {
        field: FieldKey::Phone,
        patterns: &[
            r"(?i)phone\s*number\s*to\s*(?:is|:)?\s*([\d\s\-\+\(\)]+)",
            r"(?i)phone\s*to\s*(?:is|:)?\s*([\d\s\-\+\(\)]+)",
            r"(?i)phone\s*(?:is|:)?\s*([\d\s\-\+\(\)]+)",
        ],
        post: digits,
    },
];

const DEAL_RULES: &[FieldRule] = &[
    FieldRule {
        field: FieldKey::DealName,
        patterns: &[r"(?i)deal\s*(?:for|with|:)?\s*([^,.]+)"],
        post: deal_name,
    },
    FieldRule {
        field: FieldKey::Amount,
        patterns: &[r"\$?(\d+(?:,\d+)*(?:\.\d+)?)"],
        post: amount,
    },
];

/// Returns the first email-shaped substring of `text`, if any.
pub fn extract_email(text: &str) -> Option<String> {
    let regex = Regex::new(EMAIL_PATTERN).ok()?;
    regex.find(text).map(|found| found.as_str().to_string())
}

/// Extracts contact properties from `text` under the given phrasing mode.
/// Pure and idempotent; the email address is handled separately by
/// [`extract_email`].
pub fn extract_contact_fields(text: &str, mode: ExtractMode) -> ExtractedFields {
    let rules = match mode {
        ExtractMode::Create => CONTACT_CREATE_RULES,
        ExtractMode::Update => CONTACT_UPDATE_RULES,
    };
    apply_rules(text, rules)
}

/// Extracts deal name and amount from `text`.
pub fn extract_deal_fields(text: &str) -> ExtractedFields {
    apply_rules(text, DEAL_RULES)
}

fn apply_rules(text: &str, rules: &[FieldRule]) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    for rule in rules {
        if let Some(value) = first_match(text, rule) {
            fields.insert(rule.field, value);
        }
    }
    fields
}

fn first_match(text: &str, rule: &FieldRule) -> Option<String> {
    for pattern in rule.patterns {
        let Ok(regex) = Regex::new(pattern) else {
            continue;
        };
        let Some(captures) = regex.captures(text) else {
            continue;
        };
        if let Some(group) = captures.get(1) {
            if let Some(value) = (rule.post)(group.as_str()) {
                return Some(value);
            }
        }
    }
    None
}

fn trimmed(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn digits(raw: &str) -> Option<String> {
    let value: String = raw.chars().filter(char::is_ascii_digit).collect();
    (!value.is_empty()).then_some(value)
}

/// Trims the capture and cuts a trailing `with ...` clause, so an amount
/// phrase tacked onto the deal name does not leak into it.
fn deal_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    let lowered = name.to_ascii_lowercase();
    if let Some(index) = lowered.find(" with ") {
        name = name[..index].trim_end();
    }
    (!name.is_empty()).then(|| name.to_string())
}

fn amount(raw: &str) -> Option<String> {
    let value: String = raw.chars().filter(|ch| *ch != ',').collect();
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::{extract_contact_fields, extract_deal_fields, extract_email};
    use crate::domain::{ExtractMode, FieldKey};

    #[test]
    fn email_is_first_match_in_text() {
        let cases = [
            ("Create a contact for jane@example.com", Some("jane@example.com")),
            ("notify bob@corp.io and cc carol@corp.io", Some("bob@corp.io")),
            ("no address in here", None),
        ];

        for (text, expected) in cases {
            assert_eq!(extract_email(text).as_deref(), expected, "text: {text}");
        }
    }

    #[test]
    fn email_capture_keeps_trailing_punctuation() {
        // Known looseness of the pattern: a sentence-ending dot sticks to
        // the address.
        assert_eq!(extract_email("Find contact jane@example.com.").as_deref(), Some("jane@example.com."));
    }

    #[test]
    fn create_mode_accepts_is_colon_and_bare_phrasing() {
        let cases = [
            ("first name is Jane", Some("Jane")),
            ("first name: Jane", Some("Jane")),
            ("First Name Jane", Some("Jane")),
            ("last name is Doe", None),
        ];

        for (text, expected) in cases {
            let fields = extract_contact_fields(text, ExtractMode::Create);
            assert_eq!(fields.get(FieldKey::FirstName), expected, "text: {text}");
        }
    }

    #[test]
    fn update_mode_requires_to_phrasing_for_names() {
        let fields = extract_contact_fields("update first name is Jane", ExtractMode::Update);
        assert_eq!(fields.get(FieldKey::FirstName), None);

        let fields = extract_contact_fields("update first name to Jane", ExtractMode::Update);
        assert_eq!(fields.get(FieldKey::FirstName), Some("Jane"));
    }

    #[test]
    fn phone_is_normalized_to_digits() {
        let fields =
            extract_contact_fields("contact with phone number is 555-123-4567", ExtractMode::Create);
        assert_eq!(fields.get(FieldKey::Phone), Some("5551234567"));

        let fields = extract_contact_fields(
            "change phone number to (555) 123-4567 please",
            ExtractMode::Update,
        );
        assert_eq!(fields.get(FieldKey::Phone), Some("5551234567"));
    }

    #[test]
    fn create_mode_falls_back_to_digit_runs() {
        let fields = extract_contact_fields("new contact, reachable at 5551234", ExtractMode::Create);
        assert_eq!(fields.get(FieldKey::Phone), Some("5551234"));
    }

    #[test]
    fn update_mode_has_no_digit_run_fallback() {
        let fields = extract_contact_fields("update the record, ref 5551234", ExtractMode::Update);
        assert_eq!(fields.get(FieldKey::Phone), None);
    }

    #[test]
    fn deal_name_stops_at_amount_clause() {
        let fields = extract_deal_fields("Create deal for Acme Corp with amount $50,000");
        assert_eq!(fields.get(FieldKey::DealName), Some("Acme Corp"));
        assert_eq!(fields.get(FieldKey::Amount), Some("50000"));
    }

    #[test]
    fn deal_name_alternation_consumes_leading_with() {
        let fields = extract_deal_fields("create deal with Acme Corp");
        assert_eq!(fields.get(FieldKey::DealName), Some("Acme Corp"));
    }

    #[test]
    fn amount_strips_commas_and_keeps_decimals() {
        let fields = extract_deal_fields("deal for Initech with amount $1,234.56");
        assert_eq!(fields.get(FieldKey::Amount), Some("1234.56"));
    }

    #[test]
    fn deal_without_amount_leaves_amount_absent() {
        let fields = extract_deal_fields("create deal for Hooli");
        assert_eq!(fields.get(FieldKey::DealName), Some("Hooli"));
        assert_eq!(fields.get(FieldKey::Amount), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Create contact for jane@example.com, first name is Jane, phone 5551234567";
        let first = extract_contact_fields(text, ExtractMode::Create);
        let second = extract_contact_fields(text, ExtractMode::Create);
        assert_eq!(first, second);
    }
}
