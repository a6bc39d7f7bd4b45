use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::intake::LeadIntake;
use crate::routes::{handle_submit_lead, health_check};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let intake = LeadIntake::new(config.get_intake_config()).map_err(std::io::Error::other)?;

        tracing::info!(
            store_enabled = intake.is_store_enabled(),
            webhook_enabled = intake.is_webhook_enabled(),
            "Lead intake configured"
        );

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, intake)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, intake: LeadIntake) -> Result<Server, std::io::Error> {
    let intake = web::Data::new(intake);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/leads", web::post().to(handle_submit_lead))
            .app_data(intake.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
