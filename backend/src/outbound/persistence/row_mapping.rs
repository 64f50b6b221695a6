//! Conversions between Diesel rows and domain types.
//!
//! Rows are validated on the way in; a row that violates a domain invariant
//! surfaces as a query error rather than a panic.

use serde_json::Value;

use crate::domain::{
    Car, CarId, CarSetup, EngineTunePower, Garage, Inventory, ItemKind, Listing, ListingId, Player,
    PlayerId, PlayerProfile, PlayerStats, Price, Subwoofer, SubwooferLevel, SuspensionLevel,
    TelegramId, TurboLevel, ValveQuality, Wallet,
};

use super::models::{CarRow, CarValues, ListingRow, PlayerRow, PlayerUpdate};

/// Reason a stored row could not be mapped.
pub(crate) type RowError = String;

fn small<T: TryFrom<i16>>(column: &str, value: i16) -> Result<T, RowError> {
    T::try_from(value).map_err(|_| format!("{column} out of range: {value}"))
}

fn count<T: TryFrom<i32>>(column: &str, value: i32) -> Result<T, RowError> {
    T::try_from(value).map_err(|_| format!("{column} out of range: {value}"))
}

fn setup_from_row(row: CarRow) -> Result<CarSetup, RowError> {
    let turbo_level =
        TurboLevel::new(small("turbo_level", row.turbo_level)?).map_err(|e| e.to_string())?;
    let suspension_level = SuspensionLevel::new(small("suspension_level", row.suspension_level)?)
        .map_err(|e| e.to_string())?;
    let subwoofer_level = SubwooferLevel::new(small("subwoofer_level", row.subwoofer_level)?)
        .map_err(|e| e.to_string())?;
    let valves = if row.valves_tuned {
        Some(ValveQuality::new(row.valves_tune_quality).map_err(|e| e.to_string())?)
    } else {
        None
    };
    let engine_tune = if row.engine_tuned {
        Some(EngineTunePower::new(row.engine_tune_power).map_err(|e| e.to_string())?)
    } else {
        None
    };
    if !row.engine_power_multiplier.is_finite() || row.engine_power_multiplier < 0.0 {
        return Err(format!(
            "engine_power_multiplier invalid: {}",
            row.engine_power_multiplier
        ));
    }

    Ok(CarSetup {
        name: row.name,
        engine_level: small("engine_level", row.engine_level)?,
        engine_power_multiplier: row.engine_power_multiplier,
        turbo_level,
        suspension_level,
        handling_bonus: row.handling_bonus,
        valves,
        engine_tune,
        wiring_quality: small("wiring_quality", row.wiring_quality)?,
        reliability_bonus: row.reliability_bonus,
        subwoofer: Subwoofer {
            level: subwoofer_level,
            power_watts: count("subwoofer_power", row.subwoofer_power)?,
            brand: row.subwoofer_brand,
            music_genre: row.music_genre,
        },
        body_kit: row.body_kit,
        tint_level: small("tint_level", row.tint_level)?,
        color: row.color,
        condition: row.condition,
        mileage: row.mileage,
    })
}

pub(crate) fn car_from_row(row: CarRow) -> Result<Car, RowError> {
    let id = CarId::new(row.id);
    let owner_id = PlayerId::new(row.owner_id);
    Ok(Car {
        id,
        owner_id,
        setup: setup_from_row(row)?,
    })
}

/// Decode the stored inventory blob.
///
/// Missing buckets default to empty. A bucket that does not decode fails the
/// whole row so the blob is never written back with items dropped.
pub(crate) fn inventory_from_value(value: Value) -> Result<Inventory, RowError> {
    if value.is_null() {
        return Ok(Inventory::default());
    }
    serde_json::from_value(value).map_err(|err| format!("inventory invalid: {err}"))
}

pub(crate) fn player_from_row(row: PlayerRow) -> Result<Player, RowError> {
    let inventory = inventory_from_value(row.inventory)?;
    Ok(Player {
        id: PlayerId::new(row.id),
        telegram_id: TelegramId::new(row.telegram_id),
        username: row.username,
        first_name: row.first_name,
        wallet: Wallet {
            cash: row.balance_cash,
            tokens: row.balance_token,
            total_earned_tokens: row.total_earned_tokens,
        },
        garage: Garage {
            level: count("garage_level", row.garage_level)?,
            slots: count("garage_slots", row.garage_slots)?,
        },
        stats: PlayerStats {
            races_won: count("races_won", row.races_won)?,
            races_lost: count("races_lost", row.races_lost)?,
            fights_won: count("fights_won", row.fights_won)?,
            fights_lost: count("fights_lost", row.fights_lost)?,
            reputation: row.reputation,
        },
        inventory,
        created_at: row.created_at,
        version: row.version,
    })
}

pub(crate) fn profile_from_rows(
    player: PlayerRow,
    car: Option<CarRow>,
) -> Result<PlayerProfile, RowError> {
    Ok(PlayerProfile {
        player: player_from_row(player)?,
        car: car.map(car_from_row).transpose()?,
    })
}

fn to_i32(column: &str, value: u32) -> Result<i32, RowError> {
    i32::try_from(value).map_err(|_| format!("{column} exceeds column range: {value}"))
}

pub(crate) fn player_update<'a>(
    player: &Player,
    inventory: &'a Value,
) -> Result<PlayerUpdate<'a>, RowError> {
    Ok(PlayerUpdate {
        balance_cash: player.wallet.cash,
        balance_token: player.wallet.tokens,
        total_earned_tokens: player.wallet.total_earned_tokens,
        garage_level: to_i32("garage_level", player.garage.level)?,
        garage_slots: to_i32("garage_slots", player.garage.slots)?,
        races_won: to_i32("races_won", player.stats.races_won)?,
        races_lost: to_i32("races_lost", player.stats.races_lost)?,
        fights_won: to_i32("fights_won", player.stats.fights_won)?,
        fights_lost: to_i32("fights_lost", player.stats.fights_lost)?,
        reputation: player.stats.reputation,
        inventory,
        version: player
            .version
            .checked_add(1)
            .ok_or_else(|| format!("version exhausted: {}", player.version))?,
    })
}

pub(crate) fn car_values(setup: &CarSetup) -> Result<CarValues<'_>, RowError> {
    let breakdown = setup.upgrade_state().power_breakdown();
    let performance = setup.performance();
    Ok(CarValues {
        name: &setup.name,
        engine_level: i16::from(setup.engine_level),
        engine_power_multiplier: setup.engine_power_multiplier,
        turbo_level: i16::from(setup.turbo_level.get()),
        turbo_boost: breakdown.turbo,
        suspension_level: i16::from(setup.suspension_level.get()),
        handling_bonus: setup.handling_bonus,
        valves_tuned: setup.valves.is_some(),
        valves_tune_quality: setup.valves.map_or(0.0, ValveQuality::get),
        engine_tuned: setup.engine_tune.is_some(),
        engine_tune_power: setup.engine_tune.map_or(0.0, EngineTunePower::get),
        wiring_quality: i16::from(setup.wiring_quality),
        reliability_bonus: setup.reliability_bonus,
        subwoofer_level: i16::from(setup.subwoofer.level.get()),
        subwoofer_power: to_i32("subwoofer_power", setup.subwoofer.power_watts)?,
        subwoofer_brand: &setup.subwoofer.brand,
        music_genre: &setup.subwoofer.music_genre,
        body_kit: &setup.body_kit,
        tint_level: i16::from(setup.tint_level),
        color: &setup.color,
        condition: setup.condition,
        mileage: setup.mileage,
        top_speed: performance.top_speed,
        acceleration: performance.acceleration,
        handling: performance.handling,
    })
}

pub(crate) fn listing_from_row(row: ListingRow) -> Result<Listing, RowError> {
    Ok(Listing {
        id: ListingId::new(row.id),
        seller_id: PlayerId::new(row.seller_id),
        item_kind: row
            .item_type
            .parse::<ItemKind>()
            .map_err(|e| e.to_string())?,
        item_data: row.item_data,
        price: Price::new(row.price).map_err(|e| e.to_string())?,
        description: row.description,
        is_sold: row.is_sold,
        created_at: row.created_at,
    })
}
