//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The WebApp JSON API lives under [`http`]; the Telegram bot webhook under
//! [`telegram`].

pub mod http;
pub mod telegram;
