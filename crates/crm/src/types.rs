use serde::{Deserialize, Serialize};

/// Outbound contact properties. Absent fields are omitted from the payload
/// entirely so the CRM never sees an empty-string overwrite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactProperties {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.firstname.is_none()
            && self.lastname.is_none()
            && self.phone.is_none()
    }
}

/// Outbound deal properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DealProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// A contact as the CRM reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

impl ContactRecord {
    /// Multi-line description used when a search result is shown to the
    /// user.
    pub fn describe(&self) -> String {
        let unknown = "<unknown>";
        format!(
            "id: {}\nemail: {}\nfirst name: {}\nlast name: {}\nphone: {}",
            self.id,
            self.email.as_deref().unwrap_or(unknown),
            self.firstname.as_deref().unwrap_or(unknown),
            self.lastname.as_deref().unwrap_or(unknown),
            self.phone.as_deref().unwrap_or(unknown),
        )
    }
}
