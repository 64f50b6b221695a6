//! Parsing of slash commands and callback data.

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Airdrop,
}

impl BotCommand {
    /// Parse `/start`, `/start@GunterBot`, or `/start payload`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        match name {
            "start" => Some(Self::Start),
            "airdrop" => Some(Self::Airdrop),
            _ => None,
        }
    }
}

/// Inline button callback payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Profile,
    Tokens,
    DonateMenu,
    Donate(u32),
    Unknown(String),
}

impl CallbackAction {
    pub const PROFILE: &'static str = "profile";
    pub const TOKENS: &'static str = "tokens";
    pub const DONATE: &'static str = "donate";

    pub fn parse(data: &str) -> Self {
        match data {
            Self::PROFILE => Self::Profile,
            Self::TOKENS => Self::Tokens,
            Self::DONATE => Self::DonateMenu,
            other => other
                .strip_prefix("donate_")
                .and_then(|amount| amount.parse().ok())
                .map_or_else(|| Self::Unknown(other.to_owned()), Self::Donate),
        }
    }

    /// Callback data for a donation button.
    pub fn donate_data(amount: u32) -> String {
        format!("donate_{amount}")
    }
}
