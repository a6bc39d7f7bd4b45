/// A required lead field, trimmed and guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LeadField(String);

impl LeadField {
    /// Trims the raw value and rejects it when nothing is left.
    pub fn parse(raw: &str) -> Option<LeadField> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for LeadField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
