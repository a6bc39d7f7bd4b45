use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::lead_form_data::LeadFormData;
use crate::intake::{LeadIntake, SubmissionError};

#[derive(serde::Serialize)]
struct SubmittedBody {
    status: &'static str,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: &'static str,
}

// Lead fields are personal data and stay out of the span.
#[tracing::instrument(name = "Submitting a lead handler", skip(form, intake))]
pub async fn handle_submit_lead(
    form: web::Form<LeadFormData>,
    intake: web::Data<LeadIntake>,
) -> Result<HttpResponse, SubmissionError> {
    intake.submit(form.into_inner()).await?;

    Ok(HttpResponse::Created().json(SubmittedBody {
        status: "submitted",
    }))
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmissionError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // The cause is already logged by the intake, only the generic message leaves the server.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.user_message(),
        })
    }
}
