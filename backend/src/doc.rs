//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every WebApp endpoint, the service probes, and the
//! Telegram webhook, together with the schema wrappers that document domain
//! types without coupling them to utoipa.
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::garage::{EngineTuneResponse, UpgradeResponse, ValveTuneResponse};
use crate::inbound::http::health::{HealthStatus, ServiceStatus};
use crate::inbound::http::marketplace::{CreateListingBody, ListingBody, PurchaseResponse};
use crate::inbound::http::players::{CarBody, PerformanceBody, PlayerBody};
use crate::inbound::http::races::RaceResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ItemKindSchema};
use crate::inbound::telegram::WebhookAck;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gunter Life garage API",
        description = "Garage, race, and marketplace endpoints for the Telegram WebApp."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::root,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::players::get_player,
        crate::inbound::http::garage::tune_valves,
        crate::inbound::http::garage::tune_engine,
        crate::inbound::http::garage::upgrade_turbo,
        crate::inbound::http::garage::upgrade_suspension,
        crate::inbound::http::garage::upgrade_subwoofer,
        crate::inbound::http::races::race_bot,
        crate::inbound::http::marketplace::list_listings,
        crate::inbound::http::marketplace::get_listing,
        crate::inbound::http::marketplace::create_listing,
        crate::inbound::http::marketplace::buy_listing,
        crate::inbound::telegram::webhook,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ItemKindSchema,
        ServiceStatus,
        HealthStatus,
        PlayerBody,
        CarBody,
        PerformanceBody,
        ValveTuneResponse,
        EngineTuneResponse,
        UpgradeResponse,
        RaceResponse,
        ListingBody,
        CreateListingBody,
        PurchaseResponse,
        WebhookAck,
    )),
    tags(
        (name = "players", description = "Player profiles and cars"),
        (name = "garage", description = "Upgrades and tuning"),
        (name = "races", description = "Races against the scripted bot"),
        (name = "marketplace", description = "Avito listings and purchases"),
        (name = "telegram", description = "Telegram bot webhook"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
