//! This module aggregates the command groups of the bot.

/// NHL lookups and per-channel game update settings.
pub mod hockey;
/// Paginated browsing of NASA imagery and data.
pub mod nasa;
