//! Domain entities, game rules, services, and ports.
//!
//! Everything here is transport agnostic. Inbound adapters talk to the
//! driving ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload shared by every adapter.
//! - [`UpgradeState`] / [`Performance`]: the car performance model.
//! - [`resolve_race`]: race resolution against the scripted bot.
//! - [`GarageService`], [`RaceService`], [`MarketplaceService`]: use cases.

pub mod car;
pub mod error;
pub mod inventory;
pub mod listing;
pub mod performance;
pub mod player;
pub mod ports;
pub mod pricing;
pub mod race;
pub mod tokens;
pub mod trace_id;
pub mod upgrades;

mod garage_service;
mod marketplace_service;
mod race_service;

pub use self::car::{
    Car, CarId, CarSetup, CarValidationError, EngineTunePower, MAX_ENGINE_TUNE_POWER,
    MAX_PART_LEVEL, Subwoofer, SubwooferLevel, SuspensionLevel, TurboLevel, ValveQuality,
};
pub use self::error::{Error, ErrorCode};
pub use self::garage_service::GarageService;
pub use self::inventory::Inventory;
pub use self::listing::{
    CAR_SALE_TOKEN_BONUS, DESCRIPTION_MAX, ItemKind, Listing, ListingId, ListingValidationError,
    NewListing, Price,
};
pub use self::marketplace_service::{MAX_LISTING_PAGE, MarketplaceService};
pub use self::performance::{Performance, PowerBreakdown, UpgradeState};
pub use self::player::{
    Garage, InsufficientFunds, NewPlayer, Player, PlayerId, PlayerProfile, PlayerStats,
    STARTING_CASH, TelegramId, Wallet,
};
pub use self::pricing::{
    ENGINE_TUNE_MIN_POWER, ENGINE_TUNE_PRICE, UpgradePart, VALVE_TUNE_PRICE,
    valve_tune_success_chance,
};
pub use self::race::{
    LOSS_CASH_PENALTY, NOISE_MAX, NOISE_MIN, NoiseOutOfRange, RaceNoise, RaceOutcome,
    WIN_CASH_REWARD, WIN_TOKEN_REWARD, bot_baseline, race_score, resolve_race,
};
pub use self::race_service::RaceService;
pub use self::tokens::{DonationPackage, TokenHolding, TokenSnapshot};
pub use self::trace_id::TraceId;
pub use self::upgrades::{LABEL_MAX, PartUpgrade, UpgradeError, apply_engine_tune, apply_valve_tune};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use gunter_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such garage"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
