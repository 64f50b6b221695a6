//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered players with balances, stats, and the inventory blob.
    players (id) {
        id -> Int8,
        /// Telegram user id; unique.
        telegram_id -> Int8,
        username -> Nullable<Varchar>,
        first_name -> Nullable<Varchar>,
        balance_cash -> Float8,
        balance_token -> Float8,
        total_earned_tokens -> Float8,
        garage_level -> Int4,
        garage_slots -> Int4,
        races_won -> Int4,
        races_lost -> Int4,
        fights_won -> Int4,
        fights_lost -> Int4,
        reputation -> Int4,
        inventory -> Jsonb,
        created_at -> Timestamptz,
        /// Incremented on every write for optimistic concurrency.
        version -> Int8,
    }
}

diesel::table! {
    /// Active car per player with upgrade state and cached statistics.
    cars (id) {
        id -> Int8,
        owner_id -> Int8,
        name -> Varchar,
        engine_level -> Int2,
        engine_power_multiplier -> Float8,
        turbo_level -> Int2,
        turbo_boost -> Float8,
        suspension_level -> Int2,
        handling_bonus -> Float8,
        valves_tuned -> Bool,
        valves_tune_quality -> Float8,
        engine_tuned -> Bool,
        engine_tune_power -> Float8,
        wiring_quality -> Int2,
        reliability_bonus -> Float8,
        subwoofer_level -> Int2,
        subwoofer_power -> Int4,
        subwoofer_brand -> Varchar,
        music_genre -> Varchar,
        body_kit -> Varchar,
        tint_level -> Int2,
        color -> Varchar,
        condition -> Float8,
        mileage -> Int8,
        top_speed -> Float8,
        acceleration -> Float8,
        handling -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Marketplace listings. `is_sold` flips once.
    listings (id) {
        id -> Int8,
        seller_id -> Int8,
        item_type -> Varchar,
        item_data -> Jsonb,
        price -> Float8,
        description -> Text,
        is_sold -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    race_history (id) {
        id -> Int8,
        player_id -> Int8,
        /// NULL for races against the bot.
        opponent_id -> Nullable<Int8>,
        /// NULL when the bot won.
        winner_id -> Nullable<Int8>,
        bet_amount -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(cars -> players (owner_id));
diesel::joinable!(listings -> players (seller_id));

diesel::allow_tables_to_appear_in_same_query!(players, cars, listings, race_history);
