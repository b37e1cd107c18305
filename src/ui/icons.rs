//! Emoji used by the terminal board, with plain-text fallbacks.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "-");
pub static MOVE: Emoji<'_, '_> = Emoji("➡️  ", "->");

// Card details
pub static LOCATION: Emoji<'_, '_> = Emoji("📍 ", "@ ");
pub static SALARY: Emoji<'_, '_> = Emoji("💰 ", "$ ");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "on ");
pub static NOTE: Emoji<'_, '_> = Emoji("📝 ", "# ");
