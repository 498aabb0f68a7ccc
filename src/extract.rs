//! Field extractors over normalized text

use crate::error::Result;
use crate::patterns::{FieldPatterns, Gazetteer, KeywordDefault, PatternList};
use crate::types::MAX_SKILLS;
use indexmap::IndexSet;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_EXTRACTORS: LazyLock<FieldExtractors> = LazyLock::new(|| {
    FieldExtractors::new(&Gazetteer::default()).unwrap()
});

/// Job fields pulled from one text, before scoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub required_skills: Vec<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
}

/// The set of field extractors, sharing one compiled pattern set
#[derive(Debug, Clone)]
pub struct FieldExtractors {
    patterns: FieldPatterns,
}

impl FieldExtractors {
    /// Compile extractors whose location patterns use `gazetteer`
    pub fn new(gazetteer: &Gazetteer) -> Result<Self> {
        Ok(Self {
            patterns: FieldPatterns::new(gazetteer)?,
        })
    }

    /// Shared extractors using the default US gazetteer
    #[must_use]
    pub fn shared() -> &'static Self {
        &DEFAULT_EXTRACTORS
    }

    #[must_use]
    pub const fn patterns(&self) -> &FieldPatterns {
        &self.patterns
    }

    /// Run every field extractor over already normalized text
    #[must_use]
    pub fn extract_all(&self, text: &str) -> ExtractedFields {
        let fields = ExtractedFields {
            job_title: self.job_title(text),
            company_name: self.company_name(text),
            location: self.location(text),
            required_skills: self.required_skills(text),
            salary_range: self.salary_range(text),
            job_type: self.job_type(text),
            experience_level: self.experience_level(text),
        };
        debug!(?fields, "Extracted fields");
        fields
    }

    #[must_use]
    pub fn job_title(&self, text: &str) -> Option<String> {
        self.patterns.job_title.first_match(text)
    }

    #[must_use]
    pub fn company_name(&self, text: &str) -> Option<String> {
        self.patterns.company_name.first_match(text)
    }

    #[must_use]
    pub fn location(&self, text: &str) -> Option<String> {
        self.patterns.location.first_match(text)
    }

    /// Skills from every pattern, deduplicated in first-seen order, at most ten
    #[must_use]
    pub fn required_skills(&self, text: &str) -> Vec<String> {
        dedup_skills(self.patterns.required_skills.all_matches(text))
    }

    #[must_use]
    pub fn salary_range(&self, text: &str) -> Option<String> {
        self.patterns.salary_range.first_match(text)
    }

    #[must_use]
    pub fn job_type(&self, text: &str) -> Option<String> {
        resolve(&self.patterns.job_type, &self.patterns.job_type_defaults, text)
    }

    #[must_use]
    pub fn experience_level(&self, text: &str) -> Option<String> {
        resolve(&self.patterns.experience_level, &self.patterns.experience_defaults, text)
    }

    #[must_use]
    pub fn email(&self, text: &str) -> Option<String> {
        self.patterns.email.first_match(text)
    }

    /// Domain of the first email address in `text`
    #[must_use]
    pub fn domain(&self, text: &str) -> Option<String> {
        self.email(text).as_deref().and_then(domain_of)
    }
}

/// Pattern match first, keyword default second
fn resolve(patterns: &PatternList, defaults: &[KeywordDefault], text: &str) -> Option<String> {
    patterns
        .first_match(text)
        .or_else(|| keyword_default(defaults, text))
}

/// First keyword default that applies to `text`
#[must_use]
pub fn keyword_default(defaults: &[KeywordDefault], text: &str) -> Option<String> {
    defaults
        .iter()
        .find(|d| d.applies(text))
        .map(|d| d.value().to_string())
}

/// Deduplicate skills preserving first-seen order and cap at ten
#[must_use]
pub fn dedup_skills<I>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: IndexSet<String> = IndexSet::new();
    for skill in skills {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        if seen.len() == MAX_SKILLS {
            break;
        }
        seen.insert(skill.to_string());
    }
    seen.into_iter().collect()
}

/// Part of an email address after `@`
#[must_use]
pub fn domain_of(email: &str) -> Option<String> {
    email
        .split_once('@')
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
}

#[must_use]
pub fn extract_job_title(text: &str) -> Option<String> {
    FieldExtractors::shared().job_title(text)
}

#[must_use]
pub fn extract_company_name(text: &str) -> Option<String> {
    FieldExtractors::shared().company_name(text)
}

#[must_use]
pub fn extract_location(text: &str) -> Option<String> {
    FieldExtractors::shared().location(text)
}

#[must_use]
pub fn extract_required_skills(text: &str) -> Vec<String> {
    FieldExtractors::shared().required_skills(text)
}

#[must_use]
pub fn extract_salary_range(text: &str) -> Option<String> {
    FieldExtractors::shared().salary_range(text)
}

#[must_use]
pub fn extract_job_type(text: &str) -> Option<String> {
    FieldExtractors::shared().job_type(text)
}

#[must_use]
pub fn extract_experience_level(text: &str) -> Option<String> {
    FieldExtractors::shared().experience_level(text)
}

#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    FieldExtractors::shared().email(text)
}

#[must_use]
pub fn extract_domain(text: &str) -> Option<String> {
    FieldExtractors::shared().domain(text)
}
