// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules, one per table. Each takes a `&Database` and runs its
//! statements on the single writer thread.

pub mod stats;
pub mod tasks;
pub mod users;
