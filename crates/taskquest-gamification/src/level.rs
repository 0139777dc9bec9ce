// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level curve.
//!
//! `level = floor(sqrt(xp / 100))`: level 1 at 100 XP, 2 at 400, 3 at 900.
//! A record with no XP is level 0.

/// XP needed per squared level.
pub const XP_PER_LEVEL_UNIT: u64 = 100;

/// Level reached with `xp` total experience.
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from((xp / XP_PER_LEVEL_UNIT).isqrt()).unwrap_or(u32::MAX)
}

/// Minimum total XP for `level`.
pub fn xp_for_level(level: u32) -> u64 {
    u64::from(level)
        .saturating_mul(u64::from(level))
        .saturating_mul(XP_PER_LEVEL_UNIT)
}
