use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::UserId;

/// Input validation failures for a plan request. Nothing is sent when these occur.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanRequestError {
    #[error("please describe what you want to study")]
    MissingSyllabus,
    #[error("number of days must be a whole number between 1 and {max}")]
    InvalidDays { max: u32 },
    #[error("please choose a difficulty level")]
    MissingDifficulty,
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = PlanRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PlanRequestError::MissingDifficulty);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PlanRequestError::UnknownDifficulty(trimmed.to_string()))
    }
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanForm {
    pub user_id: String,
    pub syllabus: String,
    pub days: String,
    pub difficulty: String,
}

/// A validated request to generate a new study plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub user_id: UserId,
    pub syllabus: String,
    pub days: u32,
    pub difficulty: Difficulty,
}

impl GenerateRequest {
    pub const MAX_DAYS: u32 = 365;

    /// Validates form input. A blank user falls back to `fallback_user`.
    ///
    /// # Errors
    ///
    /// Returns `PlanRequestError` when a required field is empty or malformed.
    pub fn from_form(form: &PlanForm, fallback_user: &UserId) -> Result<Self, PlanRequestError> {
        let syllabus = form.syllabus.trim();
        if syllabus.is_empty() {
            return Err(PlanRequestError::MissingSyllabus);
        }
        let days = form
            .days
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| (1..=Self::MAX_DAYS).contains(days))
            .ok_or(PlanRequestError::InvalidDays { max: Self::MAX_DAYS })?;
        let difficulty = form.difficulty.parse::<Difficulty>()?;
        let user_id = UserId::new(form.user_id.as_str()).unwrap_or_else(|_| fallback_user.clone());

        Ok(Self {
            user_id,
            syllabus: syllabus.to_string(),
            days,
            difficulty,
        })
    }
}
