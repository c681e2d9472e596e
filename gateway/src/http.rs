use crate::config::Config;
use crate::guardrails::GuardrailsService;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web::{self, Data},
    App, HttpServer,
};
use futures::{Future, TryFutureExt};
use guardgate_core::handler::{configure_routes, json_config};
use guardgate_core::types::guardrails::service::GuardResolver;
use thiserror::Error;

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CorsOptions {
    Permissive,
    Custom(Vec<String>, usize),
}

impl CorsOptions {
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsOptions::Permissive
        } else {
            CorsOptions::Custom(origins.to_vec(), 3600)
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Actix(#[from] std::io::Error),
}

pub struct ApiServer {
    config: Config,
    guards: Data<Box<dyn GuardResolver>>,
}

impl ApiServer {
    pub fn new(config: Config, guards: GuardrailsService) -> Self {
        let guards: Box<dyn GuardResolver> = Box::new(guards);
        Self {
            config,
            guards: Data::new(guards),
        }
    }

    pub fn print_useful_info(&self) {
        println!("\n🛡️  Guardgate starting up:");
        println!(
            "   🚀 HTTP server ready at: \x1b[36mhttp://{}:{}\x1b[0m",
            self.config.http.host, self.config.http.port
        );

        let guards = self.guards.guards();
        println!("   🧩 {} guards registered", guards.len());
        if let Some(default_guard) = self.guards.default_guard() {
            println!("   ⭐ Default guard: {default_guard}");
        }

        let model = guards
            .first()
            .map(|(id, _)| id.as_str())
            .unwrap_or("<guard id>");
        println!("\n⚡Quick Start ⚡");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        println!(
            "\x1b[33mcurl -X POST \x1b[36mhttp://{}:{}/v1/moderations\x1b[33m \\\x1b[0m",
            self.config.http.host, self.config.http.port
        );
        println!("\x1b[33m  -H \x1b[32m\"Content-Type: application/json\"\x1b[33m \\\x1b[0m");
        println!("\x1b[33m  -d\x1b[0m \x1b[32m'{{");
        println!("    \"model\": \"{model}\",");
        println!("    \"input\": \"Hello Guardgate!\"");
        println!("  }}'\x1b[0m");
        println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
    }

    pub fn start(self) -> Result<impl Future<Output = Result<(), ServerError>>, ServerError> {
        let cors_options = CorsOptions::from_origins(&self.config.http.cors_allowed_origins);
        let guards = self.guards.clone();

        let server = HttpServer::new(move || {
            let cors = Self::get_cors(cors_options.clone());
            Self::create_app_entry(cors, guards.clone())
        })
        .bind((self.config.http.host.as_str(), self.config.http.port))?
        .run()
        .map_err(ServerError::Actix);

        self.print_useful_info();

        Ok(server)
    }

    fn create_app_entry(
        cors: Cors,
        guards: Data<Box<dyn GuardResolver>>,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Response = ServiceResponse<impl MessageBody>,
            Config = (),
            InitError = (),
            Error = actix_web::Error,
        >,
    > {
        App::new()
            .app_data(json_config())
            .app_data(guards)
            .wrap(Logger::default())
            .wrap(cors)
            .configure(configure_routes)
            .default_service(web::to(not_found))
    }

    fn get_cors(cors: CorsOptions) -> Cors {
        match cors {
            CorsOptions::Permissive => Cors::permissive(),
            CorsOptions::Custom(origins, max_age) => origins
                .into_iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(&origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(max_age),
        }
    }
}

async fn not_found() -> actix_web::HttpResponse {
    actix_web::HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}
