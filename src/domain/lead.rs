use crate::domain::lead_field::LeadField;
use crate::domain::lead_form_data::LeadFormData;

/// A validated case-review request.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub full_name: LeadField,
    pub email: LeadField,
    pub insurance: LeadField,
    pub summary: LeadField,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required field `{field}`.")]
pub struct ValidationError {
    pub field: &'static str,
}

impl Lead {
    /// Trims every field and fails on the first one left empty, checked in
    /// form order.
    pub fn parse(form: &LeadFormData) -> Result<Lead, ValidationError> {
        let required = |field: &'static str, raw: &str| {
            LeadField::parse(raw).ok_or(ValidationError { field })
        };

        Ok(Lead {
            full_name: required("fullName", &form.full_name)?,
            email: required("email", &form.email)?,
            insurance: required("insurance", &form.insurance)?,
            summary: required("summary", &form.summary)?,
        })
    }
}

impl TryFrom<LeadFormData> for Lead {
    type Error = ValidationError;

    fn try_from(form: LeadFormData) -> Result<Self, Self::Error> {
        Lead::parse(&form)
    }
}
