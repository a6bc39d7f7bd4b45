mod health_check;
mod leads;

pub use health_check::health_check;
pub use leads::handle_submit_lead;
