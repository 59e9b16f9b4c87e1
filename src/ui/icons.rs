//! Status icons with plain-text fallbacks.

use console::Emoji;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[--] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!!] ");
