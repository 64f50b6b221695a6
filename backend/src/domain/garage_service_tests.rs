//! Tests for the garage service.

use std::sync::{Arc, Mutex};

use super::*;
use crate::domain::ports::{MockDice, MockPlayerRepository};
use crate::domain::{ErrorCode, PartUpgrade, TokenHolding};
use crate::test_support::sample_profile;
use rstest::rstest;

const TG: TelegramId = TelegramId::new(4242);

fn service(
    repo: MockPlayerRepository,
    dice: MockDice,
) -> GarageService<MockPlayerRepository, MockDice> {
    GarageService::new(Arc::new(repo), Arc::new(dice), Some(TelegramId::new(1)))
}

/// Repository returning `profile` and capturing whatever gets saved.
fn repo_with(profile: PlayerProfile) -> (MockPlayerRepository, Arc<Mutex<Option<PlayerProfile>>>) {
    let saved = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&saved);
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id()
        .returning(move |_| Ok(Some(profile.clone())));
    repo.expect_save().returning(move |profile| {
        *sink.lock().expect("save sink") = Some(profile.clone());
        Ok(())
    });
    (repo, saved)
}

fn saved_profile(saved: &Arc<Mutex<Option<PlayerProfile>>>) -> PlayerProfile {
    saved
        .lock()
        .expect("save sink")
        .clone()
        .expect("profile saved")
}

#[rstest]
#[tokio::test]
async fn upgrade_debits_price_and_installs_part() {
    let (repo, saved) = repo_with(sample_profile(1, TG.get()));
    let service = service(repo, MockDice::new());

    let receipt = service
        .upgrade(UpgradeRequest {
            telegram_id: TG,
            upgrade: PartUpgrade::turbo(2).expect("valid"),
        })
        .await
        .expect("upgrade succeeds");

    assert!((receipt.price - 3500.0).abs() < 1e-9);
    assert!((receipt.wallet.cash - 1500.0).abs() < 1e-9);
    assert!((receipt.performance.power - 130.0).abs() < 1e-9);
    let stored = saved_profile(&saved);
    assert_eq!(stored.car.expect("car").setup.turbo_level.get(), 2);
}

#[rstest]
#[tokio::test]
async fn upgrade_with_insufficient_funds_saves_nothing() {
    let mut profile = sample_profile(1, TG.get());
    profile.player.wallet.cash = 100.0;
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id()
        .return_once(move |_| Ok(Some(profile)));
    repo.expect_save().never();
    let service = service(repo, MockDice::new());

    let error = service
        .upgrade(UpgradeRequest {
            telegram_id: TG,
            upgrade: PartUpgrade::suspension(1).expect("valid"),
        })
        .await
        .expect_err("insufficient funds");

    assert_eq!(error.code(), ErrorCode::InsufficientFunds);
    let details = error.details().expect("details");
    assert_eq!(details["required"], 1000.0);
    assert_eq!(details["available"], 100.0);
}

#[rstest]
#[tokio::test]
async fn upgrade_rejects_downgrade() {
    let mut profile = sample_profile(1, TG.get());
    if let Some(car) = profile.car.as_mut() {
        PartUpgrade::turbo(3).expect("valid").apply(&mut car.setup);
    }
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id()
        .return_once(move |_| Ok(Some(profile)));
    repo.expect_save().never();
    let service = service(repo, MockDice::new());

    let error = service
        .upgrade(UpgradeRequest {
            telegram_id: TG,
            upgrade: PartUpgrade::turbo(1).expect("valid"),
        })
        .await
        .expect_err("downgrade rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn unknown_player_is_not_found() {
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id().return_once(|_| Ok(None));
    let service = service(repo, MockDice::new());

    let error = service.profile(TG).await.expect_err("missing player");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn failed_valve_tune_still_charges() {
    let (repo, saved) = repo_with(sample_profile(1, TG.get()));
    let mut dice = MockDice::new();
    // Garage level 1 succeeds below 0.6.
    dice.expect_unit().times(1).return_const(0.75);
    let service = service(repo, dice);

    let outcome = service.tune_valves(TG).await.expect("attempt recorded");

    assert!(!outcome.success);
    assert_eq!(outcome.quality, None);
    assert!((outcome.wallet.cash - 4700.0).abs() < 1e-9);
    assert_eq!(saved_profile(&saved).car.expect("car").setup.valves, None);
}

#[rstest]
#[tokio::test]
async fn successful_valve_tune_rolls_quality() {
    let (repo, _saved) = repo_with(sample_profile(1, TG.get()));
    let mut dice = MockDice::new();
    let mut rolls = vec![0.1, 0.9].into_iter();
    dice.expect_unit()
        .times(2)
        .returning(move || rolls.next().unwrap_or_default());
    let service = service(repo, dice);

    let outcome = service.tune_valves(TG).await.expect("attempt recorded");

    assert!(outcome.success);
    let quality = outcome.quality.expect("quality").get();
    assert!((quality - 0.9).abs() < 1e-9);
    // 100 + 100 * (0.10 + 0.9 * 0.20)
    assert!((outcome.performance.power - 128.0).abs() < 1e-9);
}

#[rstest]
#[tokio::test]
async fn engine_tune_sets_bonus() {
    let (repo, _saved) = repo_with(sample_profile(1, TG.get()));
    let mut dice = MockDice::new();
    dice.expect_unit().times(1).return_const(1.0);
    let service = service(repo, dice);

    let outcome = service.tune_engine(TG).await.expect("calibrated");

    assert!((outcome.tune_power.get() - 0.25).abs() < 1e-9);
    assert!((outcome.wallet.cash - 4200.0).abs() < 1e-9);
    assert!((outcome.performance.power - 125.0).abs() < 1e-9);
}

#[rstest]
#[case(100, 100.0)]
#[case(500, 550.0)]
#[case(1000, 1200.0)]
#[tokio::test]
async fn donation_credits_package(#[case] amount: u32, #[case] tokens: f64) {
    let (repo, saved) = repo_with(sample_profile(1, TG.get()));
    let service = service(repo, MockDice::new());

    let receipt = service.donate(TG, amount).await.expect("credited");

    assert!((receipt.wallet.tokens - tokens).abs() < 1e-9);
    assert!((saved_profile(&saved).player.wallet.total_earned_tokens - tokens).abs() < 1e-9);
}

#[rstest]
#[tokio::test]
async fn donation_rejects_unknown_amount() {
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id().never();
    let service = service(repo, MockDice::new());

    let error = service.donate(TG, 42).await.expect_err("unknown package");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn token_snapshot_is_admin_only() {
    let mut repo = MockPlayerRepository::new();
    repo.expect_token_balances().times(1).return_once(|| {
        Ok(vec![TokenHolding {
            telegram_id: TG,
            balance: 5.0,
        }])
    });
    let service = service(repo, MockDice::new());

    let denied = service.token_snapshot(TG).await.expect_err("not admin");
    assert_eq!(denied.code(), ErrorCode::Forbidden);

    let snapshot = service
        .token_snapshot(TelegramId::new(1))
        .await
        .expect("admin snapshot");
    assert_eq!(snapshot.holdings.len(), 1);
}

#[rstest]
#[tokio::test]
async fn connection_failures_map_to_service_unavailable() {
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id()
        .return_once(|_| Err(PlayerPersistenceError::connection("pool timed out")));
    let service = service(repo, MockDice::new());

    let error = service.profile(TG).await.expect_err("unavailable");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn stale_saves_map_to_conflict() {
    let profile = sample_profile(9, TG.get());
    let mut repo = MockPlayerRepository::new();
    repo.expect_find_by_telegram_id()
        .return_once(move |_| Ok(Some(profile)));
    repo.expect_save()
        .return_once(|_| Err(PlayerPersistenceError::stale("player 9 is no longer at version 0")));
    let service = service(repo, MockDice::new());

    let error = service.donate(TG, 100).await.expect_err("stale write");
    assert_eq!(error.code(), ErrorCode::Conflict);
}
