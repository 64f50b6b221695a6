//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/` (through
//! the `test-support` feature). The in-memory adapters honour the same
//! contracts as the Diesel repositories so services can be exercised end to
//! end without PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::ports::{
    BotMessenger, BotMessengerError, ChatId, ChatReply, Dice, ListingPersistenceError,
    ListingRepository, PlayerPersistenceError, PlayerRepository, PurchaseSettlement, RaceRecord,
    Registration,
};
use crate::domain::{
    Car, CarId, CarSetup, Garage, Inventory, ItemKind, Listing, ListingId, NewListing, NewPlayer,
    Player, PlayerId, PlayerProfile, PlayerStats, Price, RaceNoise, TelegramId, TokenHolding,
    Wallet,
};

/// Freshly registered player with the starter car.
#[must_use]
pub fn sample_profile(player_id: i64, telegram_id: i64) -> PlayerProfile {
    let id = PlayerId::new(player_id);
    PlayerProfile {
        player: Player {
            id,
            telegram_id: TelegramId::new(telegram_id),
            username: Some(format!("racer{telegram_id}")),
            first_name: Some("Gunter".to_owned()),
            wallet: Wallet::default(),
            garage: Garage::default(),
            stats: PlayerStats::default(),
            inventory: Inventory::default(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
            version: 0,
        },
        car: Some(Car {
            id: CarId::new(player_id),
            owner_id: id,
            setup: CarSetup::default(),
        }),
    }
}

/// Unsold listing with a small JSON payload. `price` must be positive.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures use literal prices")]
pub fn sample_listing(id: i64, seller_id: i64, kind: ItemKind, price: f64) -> Listing {
    Listing {
        id: ListingId::new(id),
        seller_id: PlayerId::new(seller_id),
        item_kind: kind,
        item_data: json!({ "name": format!("{kind} #{id}") }),
        price: Price::new(price).expect("positive fixture price"),
        description: "test listing".to_owned(),
        is_sold: false,
        created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).single().unwrap_or_default(),
    }
}

#[derive(Debug, Default)]
struct StoreState {
    players: Vec<PlayerProfile>,
    listings: Vec<Listing>,
    races: Vec<RaceRecord>,
}

/// Shared in-memory backing store for the repository doubles.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn players(&self) -> InMemoryPlayerRepository {
        InMemoryPlayerRepository {
            store: self.clone(),
        }
    }

    #[must_use]
    pub fn listings(&self) -> InMemoryListingRepository {
        InMemoryListingRepository {
            store: self.clone(),
        }
    }

    /// Insert a profile directly, bypassing registration.
    pub async fn insert_profile(&self, profile: PlayerProfile) {
        self.state.lock().await.players.push(profile);
    }

    pub async fn profile(&self, telegram_id: TelegramId) -> Option<PlayerProfile> {
        let state = self.state.lock().await;
        state
            .players
            .iter()
            .find(|p| p.player.telegram_id == telegram_id)
            .cloned()
    }

    pub async fn races(&self) -> Vec<RaceRecord> {
        self.state.lock().await.races.clone()
    }
}

fn upsert(
    players: &mut [PlayerProfile],
    profile: &PlayerProfile,
) -> Result<(), PlayerPersistenceError> {
    let slot = players
        .iter_mut()
        .find(|p| p.player.id == profile.player.id)
        .ok_or_else(|| PlayerPersistenceError::query("player row missing"))?;
    if slot.player.version != profile.player.version {
        return Err(PlayerPersistenceError::stale(format!(
            "player {} is no longer at version {}",
            profile.player.id, profile.player.version
        )));
    }
    *slot = profile.clone();
    slot.player.version += 1;
    Ok(())
}

/// [`PlayerRepository`] over [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryPlayerRepository {
    store: InMemoryStore,
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<PlayerProfile>, PlayerPersistenceError> {
        Ok(self.store.profile(telegram_id).await)
    }

    async fn register(&self, player: &NewPlayer) -> Result<Registration, PlayerPersistenceError> {
        let mut state = self.store.state.lock().await;
        if let Some(existing) = state
            .players
            .iter()
            .find(|p| p.player.telegram_id == player.telegram_id)
        {
            return Ok(Registration {
                profile: existing.clone(),
                created: false,
            });
        }
        let next_id = i64::try_from(state.players.len())
            .map_err(|err| PlayerPersistenceError::query(err.to_string()))?
            + 1;
        let mut profile = sample_profile(next_id, player.telegram_id.get());
        profile.player.username.clone_from(&player.username);
        profile.player.first_name.clone_from(&player.first_name);
        profile.player.created_at = Utc::now();
        state.players.push(profile.clone());
        Ok(Registration {
            profile,
            created: true,
        })
    }

    async fn save(&self, profile: &PlayerProfile) -> Result<(), PlayerPersistenceError> {
        let mut state = self.store.state.lock().await;
        upsert(&mut state.players, profile)
    }

    async fn save_race(
        &self,
        profile: &PlayerProfile,
        record: &RaceRecord,
    ) -> Result<(), PlayerPersistenceError> {
        let mut state = self.store.state.lock().await;
        upsert(&mut state.players, profile)?;
        state.races.push(*record);
        Ok(())
    }

    async fn token_balances(&self) -> Result<Vec<TokenHolding>, PlayerPersistenceError> {
        let state = self.store.state.lock().await;
        Ok(state
            .players
            .iter()
            .map(|p| TokenHolding {
                telegram_id: p.player.telegram_id,
                balance: p.player.wallet.tokens,
            })
            .collect())
    }
}

/// [`ListingRepository`] over [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryListingRepository {
    store: InMemoryStore,
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError> {
        let mut state = self.store.state.lock().await;
        let id = i64::try_from(state.listings.len())
            .map_err(|err| ListingPersistenceError::query(err.to_string()))?
            + 1;
        let created = Listing {
            id: ListingId::new(id),
            seller_id: listing.seller_id,
            item_kind: listing.item_kind,
            item_data: listing.item_data.clone(),
            price: listing.price,
            description: listing.description.clone(),
            is_sold: false,
            created_at: Utc::now(),
        };
        state.listings.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let state = self.store.state.lock().await;
        Ok(state.listings.iter().find(|l| l.id == id).cloned())
    }

    async fn list_open(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError> {
        let state = self.store.state.lock().await;
        let mut open: Vec<Listing> = state
            .listings
            .iter()
            .filter(|l| !l.is_sold)
            .cloned()
            .collect();
        open.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.get().cmp(&a.id.get())));
        open.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(open)
    }

    async fn settle_purchase(
        &self,
        settlement: &PurchaseSettlement,
    ) -> Result<(), ListingPersistenceError> {
        let mut state = self.store.state.lock().await;
        let raw_id = settlement.listing_id.get();
        let StoreState {
            players, listings, ..
        } = &mut *state;

        let listing = listings
            .iter_mut()
            .find(|l| l.id == settlement.listing_id)
            .ok_or_else(|| ListingPersistenceError::query(format!("listing {raw_id} missing")))?;
        if listing.is_sold {
            return Err(ListingPersistenceError::already_sold(raw_id));
        }

        let buyer_index = players
            .iter()
            .position(|p| p.player.id == settlement.buyer_id)
            .ok_or_else(|| ListingPersistenceError::query("buyer row missing"))?;
        let seller_index = players
            .iter()
            .position(|p| p.player.id == settlement.seller_id)
            .ok_or_else(|| ListingPersistenceError::query("seller row missing"))?;

        if let Some(buyer) = players.get_mut(buyer_index) {
            buyer
                .player
                .wallet
                .debit_cash(settlement.price)
                .map_err(|_| ListingPersistenceError::insufficient_funds(raw_id))?;
            buyer
                .player
                .inventory
                .push(settlement.item_kind, settlement.item_data.clone());
            buyer.player.version += 1;
        }
        if let Some(seller) = players.get_mut(seller_index) {
            seller.player.wallet.credit_cash(settlement.price);
            if settlement.seller_token_bonus > 0.0 {
                seller
                    .player
                    .wallet
                    .credit_tokens(settlement.seller_token_bonus);
            }
            seller.player.version += 1;
        }
        listing.is_sold = true;
        Ok(())
    }
}

/// A message captured by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Sent {
        chat: ChatId,
        reply: ChatReply,
    },
    Edited {
        chat: ChatId,
        message_id: i64,
        reply: ChatReply,
    },
    Answered {
        callback_id: String,
        text: Option<String>,
    },
}

/// [`BotMessenger`] that records every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl RecordingMessenger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl BotMessenger for RecordingMessenger {
    async fn send_message(&self, chat: ChatId, reply: &ChatReply) -> Result<(), BotMessengerError> {
        self.sent.lock().await.push(SentMessage::Sent {
            chat,
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: &ChatReply,
    ) -> Result<(), BotMessengerError> {
        self.sent.lock().await.push(SentMessage::Edited {
            chat,
            message_id,
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<String>,
    ) -> Result<(), BotMessengerError> {
        self.sent.lock().await.push(SentMessage::Answered {
            callback_id: callback_id.to_owned(),
            text,
        });
        Ok(())
    }
}

/// [`Dice`] returning fixed values.
#[derive(Debug, Clone, Copy)]
pub struct FixedDice {
    pub unit: f64,
    pub noise: RaceNoise,
}

impl Default for FixedDice {
    fn default() -> Self {
        Self {
            unit: 0.5,
            noise: RaceNoise::neutral(),
        }
    }
}

impl Dice for FixedDice {
    fn unit(&self) -> f64 {
        self.unit
    }

    fn race_noise(&self) -> RaceNoise {
        self.noise
    }
}
