//! Completion style profile model.
//!
//! # Responsibility
//! - Define the per-user configuration record that steers completions.
//! - Own the rule line attached to each awareness/sophistication level.
//!
//! # Invariants
//! - `name` is non-blank after trim for persisted profiles.
//! - Enum levels serialize to their human-facing labels.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How aware the target reader is of the problem and the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarketAwareness {
    #[default]
    #[serde(rename = "unaware")]
    Unaware,
    #[serde(rename = "problem aware")]
    ProblemAware,
    #[serde(rename = "solution aware")]
    SolutionAware,
    #[serde(rename = "product aware")]
    ProductAware,
    #[serde(rename = "most aware")]
    MostAware,
}

impl MarketAwareness {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unaware => "unaware",
            Self::ProblemAware => "problem aware",
            Self::SolutionAware => "solution aware",
            Self::ProductAware => "product aware",
            Self::MostAware => "most aware",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "unaware" => Some(Self::Unaware),
            "problem aware" => Some(Self::ProblemAware),
            "solution aware" => Some(Self::SolutionAware),
            "product aware" => Some(Self::ProductAware),
            "most aware" => Some(Self::MostAware),
            _ => None,
        }
    }

    /// Prompt rule line for this awareness level.
    pub fn rule(self) -> &'static str {
        match self {
            Self::Unaware => "- Gently introduce the problem before mentioning solutions",
            Self::ProblemAware => {
                "- Focus on differentiating the problem from common misunderstandings"
            }
            Self::SolutionAware => "- Contrast with inferior solutions they might have tried",
            Self::ProductAware => "- Emphasize unique mechanisms and proof elements",
            Self::MostAware => "- Create urgency with time-sensitive offers and risk reversal",
        }
    }
}

/// How crowded the market is with competing claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarketSophistication {
    #[default]
    #[serde(rename = "No competition")]
    NoCompetition,
    #[serde(rename = "Some competition")]
    SomeCompetition,
    #[serde(rename = "More competition W/ specific claims")]
    SpecificClaims,
    #[serde(rename = "Heavy competition W/ mechanism")]
    HeavyMechanism,
    #[serde(rename = "Heavy competition W/ advanced mechanism")]
    HeavyAdvancedMechanism,
}

impl MarketSophistication {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoCompetition => "No competition",
            Self::SomeCompetition => "Some competition",
            Self::SpecificClaims => "More competition W/ specific claims",
            Self::HeavyMechanism => "Heavy competition W/ mechanism",
            Self::HeavyAdvancedMechanism => "Heavy competition W/ advanced mechanism",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "No competition" => Some(Self::NoCompetition),
            "Some competition" => Some(Self::SomeCompetition),
            "More competition W/ specific claims" => Some(Self::SpecificClaims),
            "Heavy competition W/ mechanism" => Some(Self::HeavyMechanism),
            "Heavy competition W/ advanced mechanism" => Some(Self::HeavyAdvancedMechanism),
            _ => None,
        }
    }

    /// Prompt rule line for this sophistication level.
    pub fn rule(self) -> &'static str {
        match self {
            Self::NoCompetition => "- Make bold benefit-focused claims",
            Self::SomeCompetition => "- Use specific numbers and timeframes",
            Self::SpecificClaims => "- Lead with unique mechanism early",
            Self::HeavyMechanism => "- Introduce new problem mechanism first",
            Self::HeavyAdvancedMechanism => "- Use story-driven indirect approach",
        }
    }
}

/// Named completion style scoped to one user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub market_awareness: MarketAwareness,
    pub market_sophistication: MarketSophistication,
    pub product_name: String,
    pub big_problem: String,
    pub big_promise: String,
    pub problem_mechanism: String,
    pub solution_mechanism: String,
    pub proof_elements: String,
    /// Example copy; only a bounded prefix reaches the prompt.
    pub training_data: String,
    pub purpose: String,
    /// RFC 3339 creation timestamp as supplied by the caller.
    pub created_at: String,
}

/// Validation failure for style profile writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleValidationError {
    BlankName,
    BlankUserId,
}

impl Display for StyleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "style name must not be blank"),
            Self::BlankUserId => write!(f, "style must be scoped to a user"),
        }
    }
}

impl Error for StyleValidationError {}

impl StyleProfile {
    pub fn validate(&self) -> Result<(), StyleValidationError> {
        if self.name.trim().is_empty() {
            return Err(StyleValidationError::BlankName);
        }
        if self.user_id.trim().is_empty() {
            return Err(StyleValidationError::BlankUserId);
        }
        Ok(())
    }
}
