//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{BotConfig, ServerConfig};

#[cfg(feature = "metrics")]
use metrics::{MetricsWiring, wire_metrics};
use state_builders::{build_bot_dispatcher, build_diesel_ports, build_http_state};

#[cfg(not(feature = "metrics"))]
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use gunter_backend::Trace;
#[cfg(debug_assertions)]
use gunter_backend::doc::ApiDoc;
#[cfg(not(feature = "metrics"))]
use gunter_backend::domain::ports::NoOpGameMetrics;
use gunter_backend::inbound::http::api_scope;
use gunter_backend::inbound::http::health::{HealthState, health, live, ready, root};
use gunter_backend::inbound::http::state::HttpState;
use gunter_backend::inbound::telegram::{BotDispatcher, webhook};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bot: Option<web::Data<BotDispatcher>>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        bot,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(root)
        .service(health)
        .service(ready)
        .service(live);

    let app = match bot {
        Some(dispatcher) => app.app_data(dispatcher).service(webhook),
        None => app,
    };

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the database pool, binding, and
///   optional Telegram and metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails,
/// or when the game counters cannot be registered on the Prometheus registry.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let MetricsWiring {
        middleware: prometheus,
        game: game_metrics,
    } = wire_metrics(config.prometheus.clone())?;
    #[cfg(not(feature = "metrics"))]
    let game_metrics = Arc::new(NoOpGameMetrics);

    let ports = build_diesel_ports(&config, game_metrics);
    let bot = build_bot_dispatcher(&ports, config.bot.as_ref());
    let http_state = build_http_state(ports);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            bot: bot.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
