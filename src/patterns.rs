//! Ordered pattern lists for each extracted field
//!
//! Every field owns a [`PatternList`]: compiled patterns tried in order, the
//! first non-empty capture wins. Lists are plain data so their precedence can
//! be inspected and tested on its own.

use crate::error::{ExtractError, Result};
use regex::Regex;
use std::fmt;

/// Two-letter codes for the 50 US states plus DC
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Technologies recognized anywhere in the text, in canonical spelling
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    "Swift",
    "Kotlin",
    "TypeScript",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "Laravel",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Git",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Redis",
    "Elasticsearch",
    "Machine Learning",
    "AI",
    "Data Science",
    "DevOps",
    "Agile",
    "Scrum",
];

/// Employment types in canonical spelling
const JOB_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Contract",
    "Temporary",
    "Internship",
    "Freelance",
    "Remote",
    "Hybrid",
    "On-site",
];

/// Seniority keywords in canonical spelling
const SENIORITY: &[&str] = &[
    "Entry-level",
    "Junior",
    "Mid-level",
    "Senior",
    "Lead",
    "Principal",
    "Architect",
];

const ROLE_NOUNS: &str = "Developer|Engineer|Manager|Analyst|Designer|Specialist|Coordinator|Assistant|Director|Lead|Senior|Junior";
const ENTITY_SUFFIXES: &str = "Inc|Corp|LLC|Ltd|Company|Group|Solutions|Technologies|Systems";
const PHRASE: &str = r"([^.!?\n]+)";
const NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?k?";
const TIME_UNIT: &str =
    r"\s*(?:(?:per|a|an|/)\s*)?(?:year|month|hour|annum|annually|monthly|hourly)\b";
// A rate with no range needs a connector or an adverb, so "5 year contract" is not pay
const RATE_UNIT: &str =
    r"\s*(?:(?:per|a|an|/)\s*(?:year|month|hour|annum)|annually|monthly|hourly)\b";

pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Field a pattern list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    JobTitle,
    CompanyName,
    Location,
    RequiredSkills,
    SalaryRange,
    JobType,
    ExperienceLevel,
    Email,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobTitle => "job_title",
            Self::CompanyName => "company_name",
            Self::Location => "location",
            Self::RequiredSkills => "required_skills",
            Self::SalaryRange => "salary_range",
            Self::JobType => "job_type",
            Self::ExperienceLevel => "experience_level",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What part of a match a pattern yields
#[derive(Debug, Clone, Copy)]
pub enum Capture {
    /// First capturing group
    Group,

    /// Entire match
    Whole,

    /// First capturing group, split on `,` / `;` into items longer than two chars
    List,

    /// Entire match, mapped onto a canonical spelling
    Canonical(&'static [&'static str]),
}

/// A single compiled pattern
#[derive(Debug, Clone)]
pub struct FieldPattern {
    name: &'static str,
    regex: Regex,
    capture: Capture,
}

impl FieldPattern {
    fn compile(field: Field, name: &'static str, pattern: &str, capture: Capture) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| ExtractError::Pattern {
            field: field.as_str(),
            source,
        })?;
        Ok(Self {
            name,
            regex,
            capture,
        })
    }

    /// Short label identifying the pattern within its list
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// First value this pattern yields in `text`
    #[must_use]
    pub fn first(&self, text: &str) -> Option<String> {
        self.regex
            .captures_iter(text)
            .flat_map(|caps| self.values(&caps))
            .next()
    }

    /// Every value this pattern yields in `text`, in text order
    #[must_use]
    pub fn all(&self, text: &str) -> Vec<String> {
        self.regex
            .captures_iter(text)
            .flat_map(|caps| self.values(&caps))
            .collect()
    }

    fn values(&self, caps: &regex::Captures<'_>) -> Vec<String> {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let group = caps.get(1).map_or("", |m| m.as_str());

        match self.capture {
            Capture::Group => non_empty(group).into_iter().collect(),
            Capture::Whole => non_empty(whole).into_iter().collect(),
            Capture::List => group
                .split([',', ';'])
                .map(str::trim)
                .filter(|item| item.chars().count() > 2)
                .map(str::to_string)
                .collect(),
            Capture::Canonical(terms) => canonical(terms, whole)
                .map(str::to_string)
                .into_iter()
                .collect(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Map a matched keyword onto its canonical spelling.
///
/// Comparison ignores case and any space, hyphen or dot.
#[must_use]
pub fn canonical(terms: &'static [&'static str], matched: &str) -> Option<&'static str> {
    let key = fold(matched);
    terms.iter().copied().find(|term| fold(term) == key)
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordered list of patterns for one field
#[derive(Debug, Clone)]
pub struct PatternList {
    field: Field,
    patterns: Vec<FieldPattern>,
}

impl PatternList {
    fn new(field: Field) -> Self {
        Self {
            field,
            patterns: Vec::new(),
        }
    }

    fn push(mut self, name: &'static str, pattern: &str, capture: Capture) -> Result<Self> {
        self.patterns
            .push(FieldPattern::compile(self.field, name, pattern, capture)?);
        Ok(self)
    }

    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPattern> {
        self.patterns.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First value of the first pattern that yields one
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<String> {
        self.patterns.iter().find_map(|p| p.first(text))
    }

    /// Values of every pattern, pattern order first, then text order
    #[must_use]
    pub fn all_matches(&self, text: &str) -> Vec<String> {
        self.patterns.iter().flat_map(|p| p.all(text)).collect()
    }
}

/// Keyword consulted when no pattern of a field matched
#[derive(Debug, Clone)]
pub struct KeywordDefault {
    regex: Regex,
    value: &'static str,
}

impl KeywordDefault {
    #[must_use]
    pub const fn value(&self) -> &'static str {
        self.value
    }

    #[must_use]
    pub fn applies(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn keyword_defaults(field: Field, entries: &[(&str, &'static str)]) -> Result<Vec<KeywordDefault>> {
    entries
        .iter()
        .map(|&(pattern, value)| {
            Regex::new(pattern)
                .map(|regex| KeywordDefault { regex, value })
                .map_err(|source| ExtractError::Pattern {
                    field: field.as_str(),
                    source,
                })
        })
        .collect()
}

/// Region codes that may follow a place name in a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gazetteer {
    codes: Vec<String>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::from_codes(US_STATE_CODES.iter().copied())
    }
}

impl Gazetteer {
    /// Build a gazetteer from codes; blanks are skipped and duplicates dropped
    #[must_use]
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if !code.is_empty() && !list.iter().any(|c| c == code) {
                list.push(code.to_string());
            }
        }
        Self { codes: list }
    }

    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    // Longer codes first so a code never shadows one it prefixes
    fn alternation(&self) -> Option<String> {
        if self.codes.is_empty() {
            return None;
        }
        let mut codes: Vec<&String> = self.codes.iter().collect();
        codes.sort_by_key(|c| std::cmp::Reverse(c.len()));
        Some(
            codes
                .into_iter()
                .map(|c| regex::escape(c))
                .collect::<Vec<_>>()
                .join("|"),
        )
    }
}

/// Build the vocabulary alternation; one and two letter terms match case-sensitively
fn vocabulary_pattern() -> String {
    let mut terms: Vec<&str> = SKILL_VOCABULARY.to_vec();
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let alternatives = terms
        .into_iter()
        .map(|term| {
            let body = regex::escape(term).replace(' ', r"\s+");
            let start = if term.starts_with(|c: char| c.is_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            let end = if term.ends_with(|c: char| c.is_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            if term.chars().count() <= 2 {
                format!("{start}(?-i:{body}){end}")
            } else {
                format!("{start}{body}{end}")
            }
        })
        .collect::<Vec<_>>()
        .join("|");

    format!("(?i)(?:{alternatives})")
}

/// All compiled patterns used by the field extractors
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    pub job_title: PatternList,
    pub company_name: PatternList,
    pub location: PatternList,
    pub required_skills: PatternList,
    pub salary_range: PatternList,
    pub job_type: PatternList,
    pub job_type_defaults: Vec<KeywordDefault>,
    pub experience_level: PatternList,
    pub experience_defaults: Vec<KeywordDefault>,
    pub email: PatternList,
}

impl FieldPatterns {
    /// Compile every pattern, using `gazetteer` for locations
    pub fn new(gazetteer: &Gazetteer) -> Result<Self> {
        Ok(Self {
            job_title: job_title_patterns()?,
            company_name: company_patterns()?,
            location: location_patterns(gazetteer)?,
            required_skills: skill_patterns()?,
            salary_range: salary_patterns()?,
            job_type: job_type_patterns()?,
            job_type_defaults: keyword_defaults(
                Field::JobType,
                &[
                    (r"(?i)full.?time", "Full-time"),
                    (r"(?i)part.?time", "Part-time"),
                    (r"(?i)contract", "Contract"),
                    (r"(?i)remote", "Remote"),
                    (r"(?i)hybrid", "Hybrid"),
                ],
            )?,
            experience_level: experience_patterns()?,
            experience_defaults: keyword_defaults(
                Field::ExperienceLevel,
                &[
                    (r"(?i)entry.?level|junior", "Entry-level"),
                    (r"(?i)mid.?level", "Mid-level"),
                    (r"(?i)senior|lead|principal|architect", "Senior"),
                ],
            )?,
            email: PatternList::new(Field::Email).push("address", EMAIL_PATTERN, Capture::Whole)?,
        })
    }
}

fn job_title_patterns() -> Result<PatternList> {
    PatternList::new(Field::JobTitle)
        .push(
            "hiring_lead_in",
            &format!(
                r"(?i)\b(?:We are hiring|Looking for|Seeking|Position available|Job opening|Career opportunity)[:\s]+{PHRASE}"
            ),
            Capture::Group,
        )?
        .push(
            "title_label",
            &format!(r"(?i)\b(?:Title|Position|Role)\s*:\s*{PHRASE}"),
            Capture::Group,
        )?
        .push(
            "role_noun",
            &format!(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?:{ROLE_NOUNS}))\b"),
            Capture::Group,
        )?
        .push(
            "team_lead_in",
            &format!(r"(?i)\b(?:Join our team as|Become our|We need a|Hiring for)[:\s]+{PHRASE}"),
            Capture::Group,
        )
}

fn company_patterns() -> Result<PatternList> {
    let name = r"(?:[A-Z][A-Za-z0-9&'.-]*,?\s+){1,4}";
    PatternList::new(Field::CompanyName)
        .push(
            "preposition",
            &format!(r"\b(?i:at|with|for|join)\s+({name}(?:{ENTITY_SUFFIXES}))\b"),
            Capture::Group,
        )?
        .push(
            "company_label",
            &format!(r"(?i)\b(?:Company|Organization|Team)\s*:\s*{PHRASE}"),
            Capture::Group,
        )?
        .push(
            "entity_suffix",
            &format!(r"\b({name}(?:{ENTITY_SUFFIXES}))\b"),
            Capture::Group,
        )
}

fn location_patterns(gazetteer: &Gazetteer) -> Result<PatternList> {
    let list = PatternList::new(Field::Location).push(
        "location_label",
        &format!(
            r"(?i)\b(?:Location\s*:|Based in:?|Office in:?|Work from:?|Remote\s*:|Hybrid\s*:)\s*{PHRASE}"
        ),
        Capture::Group,
    )?;

    let Some(codes) = gazetteer.alternation() else {
        return Ok(list);
    };
    // A dot only inside a word ("St.Louis"), never at a sentence end
    let word = r"[A-Z](?:[a-zA-Z'-]|\.[a-zA-Z])*";
    let place = format!(r"(?:{word}\s+){{0,3}}{word}");

    list.push(
        "preposition_region",
        &format!(r"\b(?i:in|at)\s+({place},?\s+(?:{codes}))\b"),
        Capture::Group,
    )?
    .push(
        "place_region",
        &format!(r"\b({place},\s*(?:{codes}))\b"),
        Capture::Group,
    )
}

fn skill_patterns() -> Result<PatternList> {
    PatternList::new(Field::RequiredSkills)
        .push(
            "requirements_list",
            &format!(r"(?i)\b(?:Requirements|Skills|Qualifications|Must have|Required)\s*:\s*{PHRASE}"),
            Capture::List,
        )?
        .push(
            "experience_list",
            &format!(
                r"(?i)\b(?:Experience with|Knowledge of|Proficiency in|Familiarity with)[:\s]+{PHRASE}"
            ),
            Capture::List,
        )?
        .push(
            "vocabulary",
            &vocabulary_pattern(),
            Capture::Canonical(SKILL_VOCABULARY),
        )
}

fn salary_patterns() -> Result<PatternList> {
    let range = format!(r"\s*(?:-|to)\s*\$?{NUMBER}");
    PatternList::new(Field::SalaryRange)
        .push(
            "salary_label",
            &format!(
                r"(?i)\b(?:Salary|Compensation|Pay)[:\s]+(\$?{NUMBER}(?:{range})?{TIME_UNIT})"
            ),
            Capture::Group,
        )?
        .push(
            "currency_amount",
            &format!(r"(?i)(\${NUMBER}(?:{range})?{TIME_UNIT})"),
            Capture::Group,
        )?
        .push(
            "numeric_range",
            &format!(r"(?i)\b({NUMBER}{range}{TIME_UNIT})"),
            Capture::Group,
        )?
        .push(
            "numeric_rate",
            &format!(r"(?i)\b({NUMBER}{RATE_UNIT})"),
            Capture::Group,
        )
}

fn job_type_patterns() -> Result<PatternList> {
    PatternList::new(Field::JobType)
        .push(
            "job_type_label",
            &format!(r"(?i)\b(?:Job Type|Employment Type|Work Type|Schedule)\s*:\s*{PHRASE}"),
            Capture::Group,
        )?
        .push(
            "employment_keyword",
            r"(?i)\b(?:Full[- ]?time|Part[- ]?time|Contract|Temporary|Internship|Freelance|Remote|Hybrid|On[- ]?site)\b",
            Capture::Canonical(JOB_TYPES),
        )
}

fn experience_patterns() -> Result<PatternList> {
    PatternList::new(Field::ExperienceLevel)
        .push(
            "experience_label",
            &format!(r"(?i)\b(?:Years of Experience|Experience|Level)\s*:\s*{PHRASE}"),
            Capture::Group,
        )?
        .push(
            "years_of_experience",
            r"(?i)\b(\d+\+?\s*years?\s+(?:of\s+)?experience)",
            Capture::Group,
        )?
        .push(
            "seniority_keyword",
            r"(?i)\b(?:Entry[- ]?level|Junior|Mid[- ]?level|Senior|Lead|Principal|Architect)\b",
            Capture::Canonical(SENIORITY),
        )
}
