use serde::Deserialize;
use std::collections::HashMap;

/// Raw values as typed into the lead form. Absent fields deserialize to "".
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadFormData {
    pub full_name: String,
    pub email: String,
    pub insurance: String,
    pub summary: String,
}

impl LeadFormData {
    pub fn new(full_name: &str, email: &str, insurance: &str, summary: &str) -> Self {
        LeadFormData {
            full_name: full_name.to_string(),
            email: email.to_string(),
            insurance: insurance.to_string(),
            summary: summary.to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = LeadFormData::default();
    }
}

impl From<HashMap<String, String>> for LeadFormData {
    fn from(mut fields: HashMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).unwrap_or_default();

        LeadFormData {
            full_name: take("fullName"),
            email: take("email"),
            insurance: take("insurance"),
            summary: take("summary"),
        }
    }
}
