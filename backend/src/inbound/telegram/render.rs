//! HTML chat replies for commands and callbacks.

use crate::domain::ports::{ChatReply, DonationReceipt, Keyboard, KeyboardButton};
use crate::domain::{
    CAR_SALE_TOKEN_BONUS, DonationPackage, PlayerProfile, TokenSnapshot, WIN_TOKEN_REWARD,
};

use super::command::CallbackAction;

/// Telegram caps messages at 4096 characters; leave room for the wrapper.
const SNAPSHOT_CHUNK_CHARS: usize = 3500;

/// Escape text interpolated into HTML parse mode.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

fn webapp_link(base: &str, page: &str) -> String {
    format!("{}/{page}", base.trim_end_matches('/'))
}

pub fn welcome(webapp_url: &str) -> ChatReply {
    ChatReply::text(
        "🔰 <b>Welcome to GUNTER LIFE!</b>\n\n\
         This is where the crew builds cars, races and hangs out.\n\
         You already have a starter car. Tune the valves, fit a turbo, make it yours.\n\n\
         👇 Tap the button to enter the garage!",
    )
    .with_keyboard(
        Keyboard::default()
            .row(vec![KeyboardButton::web_app(
                "🚗 Open garage",
                webapp_link(webapp_url, "garage"),
            )])
            .row(vec![KeyboardButton::web_app(
                "💰 Avito market",
                webapp_link(webapp_url, "avito"),
            )])
            .row(vec![KeyboardButton::callback(
                "📊 My profile",
                CallbackAction::PROFILE,
            )])
            .row(vec![KeyboardButton::callback(
                "🎁 GUNTER tokens",
                CallbackAction::TOKENS,
            )]),
    )
}

pub fn profile(profile: &PlayerProfile) -> ChatReply {
    let player = &profile.player;
    let car_info = profile.car.as_ref().map_or_else(
        || "🚗 <b>No car</b>".to_owned(),
        |car| {
            let perf = car.performance();
            format!(
                "🚗 <b>{}</b>\n\
                 ⚡ Power: {:.0} hp\n\
                 💨 Top speed: {:.0} km/h\n\
                 🔄 0-100: {:.1} s\n\
                 🎚 Handling: {:.1}",
                escape_html(&car.setup.name),
                perf.power,
                perf.top_speed,
                perf.acceleration,
                perf.handling,
            )
        },
    );
    let username = player
        .username
        .as_deref()
        .map_or_else(|| "no username".to_owned(), |name| format!("@{}", escape_html(name)));

    ChatReply::text(format!(
        "👤 <b>{name}</b>\n\
         🆔 {username}\n\n\
         💰 <b>Balance:</b>\n\
         💵 Cash: {cash:.0} $\n\
         🎮 GUNTER tokens: {tokens:.2}\n\n\
         🏆 <b>Stats:</b>\n\
         🏁 Races: {races_won} won / {races_lost} lost\n\
         🤜 Fights: {fights_won} won / {fights_lost} lost\n\
         ⭐ Reputation: {reputation}\n\n\
         {car_info}\n\n\
         🏢 Garage level: {garage_level}",
        name = escape_html(player.display_name()),
        cash = player.wallet.cash,
        tokens = player.wallet.tokens,
        races_won = player.stats.races_won,
        races_lost = player.stats.races_lost,
        fights_won = player.stats.fights_won,
        fights_lost = player.stats.fights_lost,
        reputation = player.stats.reputation,
        garage_level = player.garage.level,
    ))
}

pub fn tokens(profile: &PlayerProfile) -> ChatReply {
    let wallet = &profile.player.wallet;
    ChatReply::text(format!(
        "🎮 <b>GUNTER TOKEN (GTR)</b>\n\n\
         Your balance: <b>{balance:.2} GTR</b>\n\
         Earned in total: {earned:.2} GTR\n\n\
         <b>How to earn tokens:</b>\n\
         • Win a street race: +{race:.0} GTR\n\
         • Sell a car on Avito: +{sale:.0} GTR\n\
         • Donate: bonus GTR on bigger packages\n\n\
         💰 <i>Tokens are being prepared for listing!</i>",
        balance = wallet.tokens,
        earned = wallet.total_earned_tokens,
        race = WIN_TOKEN_REWARD,
        sale = CAR_SALE_TOKEN_BONUS,
    ))
    .with_keyboard(Keyboard::default().row(vec![KeyboardButton::callback(
        "💸 Buy tokens (donate)",
        CallbackAction::DONATE,
    )]))
}

pub fn donate_menu() -> ChatReply {
    let keyboard = DonationPackage::ALL
        .into_iter()
        .fold(Keyboard::default(), |keyboard, package| {
            keyboard.row(vec![KeyboardButton::callback(
                format!("⭐ {:.0} GTR for {}", package.tokens(), package.amount()),
                CallbackAction::donate_data(package.amount()),
            )])
        })
        .row(vec![KeyboardButton::callback(
            "🔙 Back",
            CallbackAction::TOKENS,
        )]);
    ChatReply::text(
        "💎 <b>GUNTER token shop</b>\n\n\
         Bigger packages come with bonus tokens.\n\
         Tokens are credited right after payment.",
    )
    .with_keyboard(keyboard)
}

pub fn donation_received(receipt: &DonationReceipt) -> ChatReply {
    ChatReply::text(format!(
        "✅ <b>Payment received!</b>\n\n\
         Credited <b>{:.0} GTR</b>.\n\
         Current balance: {:.2} GTR",
        receipt.package.tokens(),
        receipt.wallet.tokens,
    ))
}

/// Snapshot summary followed by the CSV split into message-sized chunks.
pub fn airdrop_snapshot(snapshot: &TokenSnapshot) -> Vec<ChatReply> {
    let mut replies = vec![ChatReply::text(format!(
        "📦 <b>Airdrop snapshot</b>\n\nHolders: {}\nTotal: {:.2} GTR",
        snapshot.holdings.len(),
        snapshot.total(),
    ))];

    let mut chunk = String::new();
    for line in snapshot.to_csv().lines() {
        if !chunk.is_empty() && chunk.len() + line.len() + 1 > SNAPSHOT_CHUNK_CHARS {
            replies.push(csv_block(&chunk));
            chunk.clear();
        }
        chunk.push_str(line);
        chunk.push('\n');
    }
    if !chunk.is_empty() {
        replies.push(csv_block(&chunk));
    }
    replies
}

fn csv_block(chunk: &str) -> ChatReply {
    ChatReply::text(format!("<pre>{}</pre>", escape_html(chunk.trim_end())))
}

pub fn player_not_found() -> ChatReply {
    ChatReply::text("❌ Player not found. Send /start to get your starter car.")
}

pub fn rejected(message: &str) -> ChatReply {
    ChatReply::text(format!("❌ {}", escape_html(message)))
}

pub fn forbidden() -> ChatReply {
    ChatReply::text("⛔ This command is for the administrator only.")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
