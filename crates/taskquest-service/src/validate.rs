// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input normalization for task fields.

use taskquest_core::TaskQuestError;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Trimmed title, 1 to 100 characters.
pub fn title(raw: &str) -> Result<String, TaskQuestError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TaskQuestError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(TaskQuestError::Validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

/// Trimmed description; blank becomes `None`.
pub fn description(raw: Option<&str>) -> Result<Option<String>, TaskQuestError> {
    let Some(description) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(TaskQuestError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(Some(description.to_string()))
}

/// Trimmed, non-empty entries in their original order.
pub fn words(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}
