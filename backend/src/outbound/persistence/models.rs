//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion to domain types happens in
//! [`super::row_mapping`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{cars, listings, players, race_history};

/// Row struct for reading from the players table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = players)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlayerRow {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub balance_cash: f64,
    pub balance_token: f64,
    pub total_earned_tokens: f64,
    pub garage_level: i32,
    pub garage_slots: i32,
    pub races_won: i32,
    pub races_lost: i32,
    pub fights_won: i32,
    pub fights_lost: i32,
    pub reputation: i32,
    pub inventory: Value,
    pub created_at: DateTime<Utc>,
    pub version: i64,
}

/// Insertable struct for first contact; every other column has a default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = players)]
pub(crate) struct NewPlayerRow<'a> {
    pub telegram_id: i64,
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
}

/// Changeset written whenever a use case saves a player.
///
/// `version` carries the next value; the write filters on the loaded one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = players)]
pub(crate) struct PlayerUpdate<'a> {
    pub balance_cash: f64,
    pub balance_token: f64,
    pub total_earned_tokens: f64,
    pub garage_level: i32,
    pub garage_slots: i32,
    pub races_won: i32,
    pub races_lost: i32,
    pub fights_won: i32,
    pub fights_lost: i32,
    pub reputation: i32,
    pub inventory: &'a Value,
    pub version: i64,
}

/// Row struct for reading from the cars table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub engine_level: i16,
    pub engine_power_multiplier: f64,
    pub turbo_level: i16,
    pub suspension_level: i16,
    pub handling_bonus: f64,
    pub valves_tuned: bool,
    pub valves_tune_quality: f64,
    pub engine_tuned: bool,
    pub engine_tune_power: f64,
    pub wiring_quality: i16,
    pub reliability_bonus: f64,
    pub subwoofer_level: i16,
    pub subwoofer_power: i32,
    pub subwoofer_brand: String,
    pub music_genre: String,
    pub body_kit: String,
    pub tint_level: i16,
    pub color: String,
    pub condition: f64,
    pub mileage: i64,
}

/// Mutable car columns, shared by the insert and update paths. The cached
/// statistics are refreshed from the performance model on every write.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = cars)]
pub(crate) struct CarValues<'a> {
    pub name: &'a str,
    pub engine_level: i16,
    pub engine_power_multiplier: f64,
    pub turbo_level: i16,
    pub turbo_boost: f64,
    pub suspension_level: i16,
    pub handling_bonus: f64,
    pub valves_tuned: bool,
    pub valves_tune_quality: f64,
    pub engine_tuned: bool,
    pub engine_tune_power: f64,
    pub wiring_quality: i16,
    pub reliability_bonus: f64,
    pub subwoofer_level: i16,
    pub subwoofer_power: i32,
    pub subwoofer_brand: &'a str,
    pub music_genre: &'a str,
    pub body_kit: &'a str,
    pub tint_level: i16,
    pub color: &'a str,
    pub condition: f64,
    pub mileage: i64,
    pub top_speed: f64,
    pub acceleration: f64,
    pub handling: f64,
}

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: i64,
    pub seller_id: i64,
    pub item_type: String,
    pub item_data: Value,
    pub price: f64,
    pub description: String,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub seller_id: i64,
    pub item_type: &'a str,
    pub item_data: &'a Value,
    pub price: f64,
    pub description: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = race_history)]
pub(crate) struct NewRaceRow {
    pub player_id: i64,
    pub opponent_id: Option<i64>,
    pub winner_id: Option<i64>,
    pub bet_amount: f64,
    pub created_at: DateTime<Utc>,
}
