use actix_web::HttpResponse;

/// Liveness probe, answers 200 with an empty body while the server accepts requests.
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
