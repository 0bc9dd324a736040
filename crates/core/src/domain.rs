use std::collections::BTreeMap;

/// Property slots the extractor knows how to fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKey {
    Email,
    FirstName,
    LastName,
    Phone,
    DealName,
    Amount,
}

/// Whether a request is phrased as an initial capture (`first name is Jane`)
/// or as a correction (`first name to Jane`). Update phrasing is stricter on
/// purpose: name changes need the `to` form, and a stray run of digits is
/// never taken as a new phone number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractMode {
    Create,
    Update,
}

/// Fields recovered from a single request.
///
/// A key is present only when a pattern matched; absence means unknown.
/// Values are never empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    fields: BTreeMap<FieldKey, String>,
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, dropping empty values instead of storing
    /// them.
    pub fn insert(&mut self, key: FieldKey, value: String) {
        if !value.is_empty() {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
