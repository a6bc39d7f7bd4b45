use reqwest::Response;
use secrecy::Secret;
use std::collections::HashMap;
use wiremock::MockServer;

use lead_intake::{
    config::{get_configuration, Settings},
    startup::Application,
};

pub const WEBHOOK_PATH: &str = "/hooks/lead";
pub const STORE_PATH: &str = "/rest/v1/leads";

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub store_server: MockServer,
    pub webhook_server: MockServer,
}

impl TestApp {
    /// Spawns the server with both the record store and the webhook pointing at mock servers.
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with(true, true).await
    }

    /// Spawns the server with neither integration configured.
    pub async fn spawn_app_without_integrations() -> TestApp {
        Self::spawn_app_with(false, false).await
    }

    async fn spawn_app_with(with_store: bool, with_webhook: bool) -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let store_server = MockServer::start().await;
        let webhook_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);

        if with_store {
            config.set_record_store(
                Some(store_server.uri()),
                Some(Secret::new(String::from("test-anon-key"))),
            );
        } else {
            config.set_record_store(None, None);
        }

        if with_webhook {
            config.set_webhook_url(Some(format!("{}{}", webhook_server.uri(), WEBHOOK_PATH)));
        } else {
            config.set_webhook_url(None);
        }

        let address = launch(&config).await;

        TestApp {
            address,
            config,
            store_server,
            webhook_server,
        }
    }

    /// Launches a fresh server built from the current `config` and points `address` at it.
    pub async fn restart(&mut self) {
        self.address = launch(&self.config).await;
    }

    pub async fn post_lead(&self, body: HashMap<&str, &str>) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/leads", self.address);

        client
            .post(&url)
            .form(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

async fn launch(config: &Settings) -> String {
    let application = Application::build(config.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://127.0.0.1:{}", application.get_port());

    tokio::spawn(application.run_until_stop());

    address
}

pub fn jane_doe() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("fullName", "Jane Doe"),
        ("email", "jane@example.com"),
        ("insurance", "Acme Health"),
        ("summary", "Denied MRI"),
    ])
}
