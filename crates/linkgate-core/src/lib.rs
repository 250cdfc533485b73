#![deny(missing_docs)]
//! Linkgate core library.
//!
//! Transport-agnostic logic for the subscription-gated link shortener bot:
//! settings, membership checks, the shortening client and the dispatcher.

/// Configuration management.
pub mod config;
/// Update dispatcher and its injected context.
pub mod dispatcher;
/// Channel membership lookups.
pub mod membership;
/// Reply cards and inline keyboard descriptors.
pub mod reply;
/// In-memory set of users that pressed /start.
pub mod seen_users;
/// Link shortening service client.
pub mod shortener;
/// Chat transport seam used by the dispatcher.
pub mod transport;
/// User-facing texts.
pub mod views;

#[cfg(test)]
pub mod testing;

/// Telegram user identifier as delivered by the transport.
pub type UserId = i64;

pub use dispatcher::GateContext;
