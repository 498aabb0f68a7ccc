//! Heuristic confidence scoring

use crate::extract::{ExtractedFields, FieldExtractors};

/// Score before any bonus
pub const BASE_SCORE: f64 = 0.5;

/// Upper bound of any local score
pub const MAX_SCORE: f64 = 0.95;

const JOB_TITLE_BONUS: f64 = 0.15;
const COMPANY_BONUS: f64 = 0.10;
const LOCATION_BONUS: f64 = 0.10;
const SKILLS_BONUS: f64 = 0.10;
const SALARY_BONUS: f64 = 0.05;
const JOB_TYPE_BONUS: f64 = 0.05;
const EXPERIENCE_BONUS: f64 = 0.05;

// Length thresholds in characters, each adding LENGTH_BONUS
const LENGTH_THRESHOLDS: [usize; 2] = [100, 500];
const LENGTH_BONUS: f64 = 0.05;

/// Score fields already extracted from `text`.
///
/// Each found field adds its bonus, text longer than 100 and 500 characters
/// adds 0.05 each, and the sum is capped at 0.95.
#[must_use]
pub fn score_fields(fields: &ExtractedFields, text: &str) -> f64 {
    let bonuses = [
        (fields.job_title.is_some(), JOB_TITLE_BONUS),
        (fields.company_name.is_some(), COMPANY_BONUS),
        (fields.location.is_some(), LOCATION_BONUS),
        (!fields.required_skills.is_empty(), SKILLS_BONUS),
        (fields.salary_range.is_some(), SALARY_BONUS),
        (fields.job_type.is_some(), JOB_TYPE_BONUS),
        (fields.experience_level.is_some(), EXPERIENCE_BONUS),
    ];

    let length = text.chars().count();
    let length_bonus: f64 = LENGTH_THRESHOLDS
        .iter()
        .filter(|threshold| length > **threshold)
        .map(|_| LENGTH_BONUS)
        .sum();

    let score = bonuses
        .iter()
        .filter(|(found, _)| *found)
        .map(|(_, bonus)| bonus)
        .sum::<f64>()
        + BASE_SCORE
        + length_bonus;

    score.min(MAX_SCORE)
}

/// Extract every field from normalized `text` and score the outcome
#[must_use]
pub fn confidence_score(text: &str) -> f64 {
    let extractors = FieldExtractors::shared();
    score_fields(&extractors.extract_all(text), text)
}
