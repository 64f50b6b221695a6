//! PostgreSQL-backed `PlayerRepository` implementation using Diesel ORM.
//!
//! A player and their car are always written together inside one
//! transaction, so a crash can never leave a player without the starter car
//! or a race result without its history row. Saves are guarded by the
//! player's `version` column; a copy loaded before another write (a
//! marketplace settlement, say) is rejected instead of overwriting it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{PlayerPersistenceError, PlayerRepository, RaceRecord, Registration};
use crate::domain::{CarSetup, NewPlayer, PlayerProfile, TelegramId, TokenHolding};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CarRow, NewPlayerRow, NewRaceRow, PlayerRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{RowError, car_values, player_update, profile_from_rows};
use super::schema::{cars, players, race_history};

/// Diesel-backed implementation of the `PlayerRepository` port.
#[derive(Clone)]
pub struct DieselPlayerRepository {
    pool: DbPool,
}

impl DieselPlayerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PlayerPersistenceError {
    map_pool_error(error, PlayerPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PlayerPersistenceError {
    map_diesel_error(
        error,
        PlayerPersistenceError::query,
        PlayerPersistenceError::connection,
    )
}

fn row_error(error: RowError) -> PlayerPersistenceError {
    PlayerPersistenceError::query(format!("invalid stored player: {error}"))
}

type ProfileRows = (PlayerRow, Option<CarRow>);

async fn load_rows(
    conn: &mut AsyncPgConnection,
    telegram_id: i64,
) -> QueryResult<Option<ProfileRows>> {
    let Some(player) = players::table
        .filter(players::telegram_id.eq(telegram_id))
        .select(PlayerRow::as_select())
        .first(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };
    let car = cars::table
        .filter(cars::owner_id.eq(player.id))
        .select(CarRow::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(Some((player, car)))
}

/// Row-level values derived from a profile before entering a transaction.
struct ProfileWrite<'a> {
    player_id: i64,
    loaded_version: i64,
    player: super::models::PlayerUpdate<'a>,
    car: Option<(i64, super::models::CarValues<'a>)>,
}

fn profile_write<'a>(
    profile: &'a PlayerProfile,
    inventory: &'a serde_json::Value,
) -> Result<ProfileWrite<'a>, PlayerPersistenceError> {
    let player = player_update(&profile.player, inventory).map_err(row_error)?;
    let car = profile
        .car
        .as_ref()
        .map(|car| car_values(&car.setup).map(|values| (car.id.get(), values)))
        .transpose()
        .map_err(row_error)?;
    Ok(ProfileWrite {
        player_id: profile.player.id.get(),
        loaded_version: profile.player.version,
        player,
        car,
    })
}

/// Failures of a profile write that roll its transaction back.
#[derive(Debug)]
enum WriteError {
    Diesel(diesel::result::Error),
    Stale { player_id: i64, version: i64 },
}

impl From<diesel::result::Error> for WriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn write_error(error: WriteError) -> PlayerPersistenceError {
    match error {
        WriteError::Diesel(error) => diesel_error(error),
        WriteError::Stale { player_id, version } => PlayerPersistenceError::stale(format!(
            "player {player_id} is no longer at version {version}"
        )),
    }
}

async fn write_profile(
    conn: &mut AsyncPgConnection,
    write: &ProfileWrite<'_>,
) -> Result<(), WriteError> {
    let updated = diesel::update(
        players::table
            .filter(players::id.eq(write.player_id))
            .filter(players::version.eq(write.loaded_version)),
    )
    .set(&write.player)
    .execute(conn)
    .await?;
    if updated == 0 {
        return Err(WriteError::Stale {
            player_id: write.player_id,
            version: write.loaded_version,
        });
    }
    if let Some((car_id, values)) = &write.car {
        diesel::update(cars::table.filter(cars::id.eq(*car_id)))
            .set(values)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl PlayerRepository for DieselPlayerRepository {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<PlayerProfile>, PlayerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = load_rows(&mut conn, telegram_id.get())
            .await
            .map_err(diesel_error)?;
        rows.map(|(player, car)| profile_from_rows(player, car))
            .transpose()
            .map_err(row_error)
    }

    async fn register(&self, player: &NewPlayer) -> Result<Registration, PlayerPersistenceError> {
        let new_row = NewPlayerRow {
            telegram_id: player.telegram_id.get(),
            username: player.username.as_deref(),
            first_name: player.first_name.as_deref(),
        };
        let starter = CarSetup::default();
        let starter_values = car_values(&starter).map_err(row_error)?;
        let telegram_id = player.telegram_id.get();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let (rows, created) = conn
            .transaction(|conn| {
                async move {
                    let inserted: Option<i64> = diesel::insert_into(players::table)
                        .values(&new_row)
                        .on_conflict(players::telegram_id)
                        .do_nothing()
                        .returning(players::id)
                        .get_result(conn)
                        .await
                        .optional()?;

                    if let Some(player_id) = inserted {
                        diesel::insert_into(cars::table)
                            .values((cars::owner_id.eq(player_id), &starter_values))
                            .execute(conn)
                            .await?;
                    }

                    let rows = load_rows(conn, telegram_id)
                        .await?
                        .ok_or(diesel::result::Error::NotFound)?;
                    Ok::<_, diesel::result::Error>((rows, inserted.is_some()))
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;

        debug!(telegram_id, created, "player registration processed");
        let (player_row, car_row) = rows;
        let profile = profile_from_rows(player_row, car_row).map_err(row_error)?;
        Ok(Registration { profile, created })
    }

    async fn save(&self, profile: &PlayerProfile) -> Result<(), PlayerPersistenceError> {
        let inventory = serde_json::to_value(&profile.player.inventory)
            .map_err(|err| PlayerPersistenceError::query(err.to_string()))?;
        let write = profile_write(profile, &inventory)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| async move { write_profile(conn, &write).await }.scope_boxed())
            .await
            .map_err(write_error)
    }

    async fn save_race(
        &self,
        profile: &PlayerProfile,
        record: &RaceRecord,
    ) -> Result<(), PlayerPersistenceError> {
        let inventory = serde_json::to_value(&profile.player.inventory)
            .map_err(|err| PlayerPersistenceError::query(err.to_string()))?;
        let write = profile_write(profile, &inventory)?;
        let race_row = NewRaceRow {
            player_id: record.player_id.get(),
            opponent_id: record.opponent_id.map(|id| id.get()),
            winner_id: record.winner_id.map(|id| id.get()),
            bet_amount: record.bet_amount,
            created_at: record.raced_at,
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                write_profile(conn, &write).await?;
                diesel::insert_into(race_history::table)
                    .values(&race_row)
                    .execute(conn)
                    .await?;
                Ok::<_, WriteError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(write_error)
    }

    async fn token_balances(&self) -> Result<Vec<TokenHolding>, PlayerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(i64, f64)> = players::table
            .select((players::telegram_id, players::balance_token))
            .order((players::balance_token.desc(), players::telegram_id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(telegram_id, balance)| TokenHolding {
                telegram_id: TelegramId::new(telegram_id),
                balance,
            })
            .collect())
    }
}
