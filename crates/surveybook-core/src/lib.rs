//! # surveybook-core
//!
//! Core domain model and traits for the surveybook survey toolkit.
//!
//! This crate provides:
//! - Domain types: `ResponseRecord`, `ResponseAnswers`, `Demographics`, `LikertScore`
//! - The Survey Data column contract: `DataColumn`
//! - Code book catalog: `Attitude`, `Personality`, `Category`
//! - Diagnostics for category coverage
//! - Core trait: `Report`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use surveybook_core::{SubmittedResponse, Gender, MaritalStatus, AgeCategory};
//!
//! let submitted = SubmittedResponse {
//!     q1_worried_global_warming: 6,
//!     q2_global_warming_threat: 7,
//!     q3_british_use_too_much_petrol: 5,
//!     q4_look_petrol_substitutes: 6,
//!     q5_petrol_prices_too_high: 7,
//!     q6_high_prices_impact_cars: 5,
//!     personality_novelist: 2,
//!     personality_innovator: 5,
//!     personality_trendsetter: 4,
//!     personality_forerunner: 3,
//!     personality_mainstreamer: 4,
//!     personality_classic: 1,
//!     gender: "Female".into(),
//!     marital_status: "Married".into(),
//!     age_category: "18 to 34".into(),
//! };
//!
//! let answers = submitted.validate().unwrap();
//! assert_eq!(answers.demographics.gender, Gender::Female);
//! assert_eq!(answers.demographics.marital_status, MaritalStatus::Married);
//! assert_eq!(answers.demographics.age_category, AgeCategory::Age18To34);
//! ```

pub mod columns;
pub mod diagnostics;
pub mod stats;

pub use columns::{Attitude, DataColumn, Personality, AGREEMENT_LABELS, DESCRIPTION_LABELS};
pub use diagnostics::{
    analyze_responses, CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity,
};
pub use stats::{CategoryCount, SurveyStats};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier assigned to a response when it is persisted
pub type ResponseId = u32;

/// Lowest point of every survey scale
pub const SCALE_MIN: u8 = 1;

/// Highest point of every survey scale
pub const SCALE_MAX: u8 = 7;

/// Innovator scores at or above this value are classified as "High"
pub const DEFAULT_INNOVATOR_THRESHOLD: u8 = 5;

// ============================================================================
// Likert Score
// ============================================================================

/// A validated answer on the 1..=7 survey scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertScore(u8);

impl LikertScore {
    /// Midpoint of the scale ("neither disagree nor agree")
    pub const NEUTRAL: Self = Self(4);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (SCALE_MIN..=SCALE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ScoreOutOfRange {
                field: "score".into(),
                value: i64::from(value),
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Validate a raw integer coming from an untrusted source
    fn parse_field(field: &str, raw: i64) -> Result<Self, ValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|v| (SCALE_MIN..=SCALE_MAX).contains(v))
            .map(Self)
            .ok_or_else(|| ValidationError::ScoreOutOfRange {
                field: field.into(),
                value: raw,
            })
    }
}

impl TryFrom<u8> for LikertScore {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LikertScore> for u8 {
    fn from(score: LikertScore) -> Self {
        score.0
    }
}

impl fmt::Display for LikertScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary classification of the Innovator personality score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InnovatorBucket {
    Low,
    High,
}

impl InnovatorBucket {
    pub const ALL: [InnovatorBucket; 2] = [InnovatorBucket::Low, InnovatorBucket::High];

    /// High when `score >= threshold`, Low otherwise
    pub fn classify(score: LikertScore, threshold: u8) -> Self {
        if score.value() >= threshold {
            InnovatorBucket::High
        } else {
            InnovatorBucket::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InnovatorBucket::Low => "Low Innovator",
            InnovatorBucket::High => "High Innovator",
        }
    }

    /// COUNTIFS criterion selecting this bucket, e.g. `"<5"` or `">=5"`
    pub fn criterion(self, threshold: u8) -> String {
        match self {
            InnovatorBucket::Low => format!("<{threshold}"),
            InnovatorBucket::High => format!(">={threshold}"),
        }
    }
}

// ============================================================================
// Demographic Categories
// ============================================================================

/// A closed demographic category whose canonical strings are written into
/// the Survey Data sheet and matched verbatim by generated formulas.
pub trait Category: Copy + PartialEq + 'static {
    /// Column header in the Survey Data sheet
    const FIELD: &'static str;
    /// Question shown in the code book
    const QUESTION: &'static str;
    /// Every value, in code book order
    const ALL: &'static [Self];

    /// Canonical, case-sensitive string
    fn as_str(self) -> &'static str;

    /// Numeric code listed in the code book (1-based)
    fn code(self) -> u8 {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .map(|p| p as u8 + 1)
            .unwrap_or(0)
    }

    /// Parse a canonical string; no case or whitespace normalization
    fn parse_canonical(field: &str, raw: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == raw)
            .ok_or_else(|| ValidationError::UnknownCategory {
                field: field.into(),
                value: raw.into(),
            })
    }
}

/// Respondent gender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Category for Gender {
    const FIELD: &'static str = "Gender";
    const QUESTION: &'static str = "What is your gender?";
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Respondent marital status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Married,
    Unmarried,
}

impl Category for MaritalStatus {
    const FIELD: &'static str = "Marital_Status";
    const QUESTION: &'static str = "What is your marital status?";
    const ALL: &'static [Self] = &[MaritalStatus::Married, MaritalStatus::Unmarried];

    fn as_str(self) -> &'static str {
        match self {
            MaritalStatus::Married => "Married",
            MaritalStatus::Unmarried => "Unmarried",
        }
    }
}

/// Respondent age bracket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    #[serde(rename = "18 to 34")]
    Age18To34,
    #[serde(rename = "35 to 65")]
    Age35To65,
    #[serde(rename = "65 and older")]
    Age65Plus,
}

impl Category for AgeCategory {
    const FIELD: &'static str = "Age_Category";
    const QUESTION: &'static str = "What is your age category?";
    const ALL: &'static [Self] = &[
        AgeCategory::Age18To34,
        AgeCategory::Age35To65,
        AgeCategory::Age65Plus,
    ];

    fn as_str(self) -> &'static str {
        match self {
            AgeCategory::Age18To34 => "18 to 34",
            AgeCategory::Age35To65 => "35 to 65",
            AgeCategory::Age65Plus => "65 and older",
        }
    }
}

macro_rules! impl_category_text {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.pad(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = ValidationError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Category>::parse_canonical(<$ty as Category>::FIELD, s)
                }
            }
        )*
    };
}

impl_category_text!(Gender, MaritalStatus, AgeCategory);

/// The three demographic answers of a response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub age_category: AgeCategory,
}

impl Demographics {
    pub fn new(gender: Gender, marital_status: MaritalStatus, age_category: AgeCategory) -> Self {
        Self {
            gender,
            marital_status,
            age_category,
        }
    }

    /// Apply a post-hoc correction; unset fields are left unchanged
    pub fn apply(&mut self, patch: &DemographicsPatch) {
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(marital_status) = patch.marital_status {
            self.marital_status = marital_status;
        }
        if let Some(age_category) = patch.age_category {
            self.age_category = age_category;
        }
    }
}

/// Partial demographics correction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_category: Option<AgeCategory>,
}

impl DemographicsPatch {
    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.marital_status.is_none() && self.age_category.is_none()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// The fully validated answers of one respondent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAnswers {
    /// Attitude scores in `Attitude::ALL` order
    pub attitudes: [LikertScore; 6],
    /// Personality scores in `Personality::ALL` order
    pub personality: [LikertScore; 6],
    pub demographics: Demographics,
}

impl ResponseAnswers {
    /// Answers with every score at the scale midpoint
    pub fn neutral(demographics: Demographics) -> Self {
        Self {
            attitudes: [LikertScore::NEUTRAL; 6],
            personality: [LikertScore::NEUTRAL; 6],
            demographics,
        }
    }

    /// Set one attitude score
    pub fn attitude(mut self, question: Attitude, score: LikertScore) -> Self {
        self.attitudes[question.index()] = score;
        self
    }

    /// Set one personality score
    pub fn personality(mut self, trait_: Personality, score: LikertScore) -> Self {
        self.personality[trait_.index()] = score;
        self
    }
}

/// Raw submission as received from a client, before validation
///
/// Field names follow the survey form. Every field is required; scores are
/// kept wide so out-of-range input can be reported instead of truncated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResponse {
    pub q1_worried_global_warming: i64,
    pub q2_global_warming_threat: i64,
    pub q3_british_use_too_much_petrol: i64,
    pub q4_look_petrol_substitutes: i64,
    pub q5_petrol_prices_too_high: i64,
    pub q6_high_prices_impact_cars: i64,
    pub personality_novelist: i64,
    pub personality_innovator: i64,
    pub personality_trendsetter: i64,
    pub personality_forerunner: i64,
    pub personality_mainstreamer: i64,
    pub personality_classic: i64,
    pub gender: String,
    pub marital_status: String,
    pub age_category: String,
}

impl SubmittedResponse {
    /// Check every field and convert to typed answers
    pub fn validate(&self) -> Result<ResponseAnswers, ValidationError> {
        let attitudes = [
            LikertScore::parse_field("q1_worried_global_warming", self.q1_worried_global_warming)?,
            LikertScore::parse_field("q2_global_warming_threat", self.q2_global_warming_threat)?,
            LikertScore::parse_field(
                "q3_british_use_too_much_petrol",
                self.q3_british_use_too_much_petrol,
            )?,
            LikertScore::parse_field("q4_look_petrol_substitutes", self.q4_look_petrol_substitutes)?,
            LikertScore::parse_field("q5_petrol_prices_too_high", self.q5_petrol_prices_too_high)?,
            LikertScore::parse_field("q6_high_prices_impact_cars", self.q6_high_prices_impact_cars)?,
        ];
        let personality = [
            LikertScore::parse_field("personality_novelist", self.personality_novelist)?,
            LikertScore::parse_field("personality_innovator", self.personality_innovator)?,
            LikertScore::parse_field("personality_trendsetter", self.personality_trendsetter)?,
            LikertScore::parse_field("personality_forerunner", self.personality_forerunner)?,
            LikertScore::parse_field("personality_mainstreamer", self.personality_mainstreamer)?,
            LikertScore::parse_field("personality_classic", self.personality_classic)?,
        ];
        let demographics = Demographics {
            gender: Gender::parse_canonical("gender", &self.gender)?,
            marital_status: MaritalStatus::parse_canonical("marital_status", &self.marital_status)?,
            age_category: AgeCategory::parse_canonical("age_category", &self.age_category)?,
        };

        Ok(ResponseAnswers {
            attitudes,
            personality,
            demographics,
        })
    }
}

/// One persisted survey response
///
/// Scores are fixed at creation; only demographics can be corrected later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    id: ResponseId,
    submitted_at: DateTime<Utc>,
    answers: ResponseAnswers,
}

impl ResponseRecord {
    pub fn new(id: ResponseId, submitted_at: DateTime<Utc>, answers: ResponseAnswers) -> Self {
        Self {
            id,
            submitted_at,
            answers,
        }
    }

    pub fn id(&self) -> ResponseId {
        self.id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn answers(&self) -> &ResponseAnswers {
        &self.answers
    }

    pub fn attitude(&self, question: Attitude) -> LikertScore {
        self.answers.attitudes[question.index()]
    }

    pub fn personality(&self, trait_: Personality) -> LikertScore {
        self.answers.personality[trait_.index()]
    }

    pub fn demographics(&self) -> &Demographics {
        &self.answers.demographics
    }

    /// Apply a demographics correction
    pub fn patch_demographics(&mut self, patch: &DemographicsPatch) {
        self.answers.demographics.apply(patch);
    }

    /// Value this record contributes to a Survey Data column
    pub fn cell(&self, column: DataColumn) -> CellValue {
        let demographics = self.demographics();
        match column {
            DataColumn::Id => CellValue::Number(f64::from(self.id)),
            DataColumn::Attitude(q) => CellValue::Number(f64::from(self.attitude(q).value())),
            DataColumn::Personality(p) => CellValue::Number(f64::from(self.personality(p).value())),
            DataColumn::Gender => CellValue::Text(demographics.gender.as_str()),
            DataColumn::MaritalStatus => CellValue::Text(demographics.marital_status.as_str()),
            DataColumn::AgeCategory => CellValue::Text(demographics.age_category.as_str()),
        }
    }
}

/// A single cell of the Survey Data sheet
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(&'static str),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Report generation over an ordered snapshot of responses
pub trait Report {
    type Output;

    /// Render the responses (ordered by submission time) to the output format
    fn render(&self, records: &[ResponseRecord]) -> Result<Self::Output, ReportError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Submission validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between 1 and 7, got {value}")]
    ScoreOutOfRange { field: String, value: i64 },

    #[error("{field} has unknown value '{value}'")]
    UnknownCategory { field: String, value: String },
}

/// Report generation error
#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing to export; surfaced to callers as a distinct condition
    #[error("No survey responses found to export")]
    EmptyInput,

    #[error("Range '{0}' requested before it was registered (sheet build order violated)")]
    UnregisteredRange(String),

    #[error("Range '{0}' registered twice")]
    DuplicateRange(String),

    #[error("Invalid report settings: {0}")]
    InvalidConfig(String),

    #[error("Sheet '{0}' is listed for presentation but was never built")]
    SheetNotBuilt(String),

    #[error("Workbook error: {0}")]
    Xlsx(String),
}

impl ReportError {
    /// True for the caller-facing "nothing to export" condition
    pub fn is_empty_input(&self) -> bool {
        matches!(self, ReportError::EmptyInput)
    }
}

// ============================================================================
// Tests
// ============================================================================
