pub mod lead;
pub mod lead_field;
pub mod lead_form_data;
