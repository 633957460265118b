//! Study technique suggestions from a rule table.
//!
//! Rules are keyed by subject category. A subject's explicit `category` is
//! authoritative; only when it is missing is the name matched against
//! keyword lists, and the first list in table order that matches decides
//! (so "Math History" is quantitative).

use serde::{Deserialize, Serialize};

use crate::models::{StudyTechnique, Subject, SubjectCategory};

/// A technique and the improvement it is expected to bring (fraction)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueEffect {
    pub technique: StudyTechnique,
    pub expected_improvement: f64,
}

impl TechniqueEffect {
    fn new(technique: StudyTechnique, expected_improvement: f64) -> Self {
        Self {
            technique,
            expected_improvement,
        }
    }
}

/// Name keywords that imply a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryKeywords {
    pub category: SubjectCategory,
    /// Lowercase substrings of the subject name
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    pub category: SubjectCategory,
    pub techniques: Vec<TechniqueEffect>,
    pub reason: String,
}

/// The technique rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechniqueRuleTable {
    /// Subjects at or above this difficulty get `difficulty_techniques`
    pub high_difficulty: u8,
    pub difficulty_techniques: Vec<TechniqueEffect>,
    pub category_rules: Vec<CategoryRule>,
    /// Fallback classification, checked in order
    pub keyword_fallback: Vec<CategoryKeywords>,
    /// Subjects with more topics than this get `interleaving`
    pub interleaving_topic_threshold: usize,
    pub interleaving: TechniqueEffect,
    pub max_suggestions: usize,
}

impl Default for TechniqueRuleTable {
    fn default() -> Self {
        let keywords = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            high_difficulty: 4,
            difficulty_techniques: vec![
                TechniqueEffect::new(StudyTechnique::ActiveRecall, 0.25),
                TechniqueEffect::new(StudyTechnique::Feynman, 0.2),
            ],
            category_rules: vec![
                CategoryRule {
                    category: SubjectCategory::Quantitative,
                    techniques: vec![TechniqueEffect::new(StudyTechnique::PracticeProblems, 0.3)],
                    reason: "Problem-solving subjects improve fastest with worked practice".to_string(),
                },
                CategoryRule {
                    category: SubjectCategory::Memorization,
                    techniques: vec![
                        TechniqueEffect::new(StudyTechnique::SpacedRepetition, 0.35),
                        TechniqueEffect::new(StudyTechnique::Flashcards, 0.2),
                    ],
                    reason: "Fact-heavy subjects stick with spaced review".to_string(),
                },
                CategoryRule {
                    category: SubjectCategory::Language,
                    techniques: vec![
                        TechniqueEffect::new(StudyTechnique::SpacedRepetition, 0.35),
                        TechniqueEffect::new(StudyTechnique::Flashcards, 0.2),
                    ],
                    reason: "Vocabulary sticks with spaced review".to_string(),
                },
                CategoryRule {
                    category: SubjectCategory::Conceptual,
                    techniques: vec![TechniqueEffect::new(StudyTechnique::Elaboration, 0.2)],
                    reason: "Connecting ideas deepens conceptual understanding".to_string(),
                },
            ],
            keyword_fallback: vec![
                CategoryKeywords {
                    category: SubjectCategory::Quantitative,
                    keywords: keywords(&["math", "programming", "physics"]),
                },
                CategoryKeywords {
                    category: SubjectCategory::Memorization,
                    keywords: keywords(&["history", "language", "vocabulary"]),
                },
            ],
            interleaving_topic_threshold: 3,
            interleaving: TechniqueEffect::new(StudyTechnique::Interleaving, 0.15),
            max_suggestions: 5,
        }
    }
}

/// A technique recommended for one or more subjects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueSuggestion {
    pub technique: StudyTechnique,
    pub subject_ids: Vec<String>,
    pub expected_improvement: f64,
    pub reason: String,
}

impl TechniqueRuleTable {
    /// Category from the subject itself, else from the first matching keyword list
    pub fn resolve_category(&self, subject: &Subject) -> Option<SubjectCategory> {
        if subject.category.is_some() {
            return subject.category;
        }
        let name = subject.name.to_lowercase();
        self.keyword_fallback
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| name.contains(k.as_str())))
            .map(|entry| entry.category)
    }

    /// Suggestions merged by technique, best expected improvement first.
    ///
    /// A technique suggested for several subjects appears once, listing every
    /// subject and keeping the highest improvement.
    pub fn suggest(&self, subjects: &[Subject]) -> Vec<TechniqueSuggestion> {
        let mut merged: Vec<TechniqueSuggestion> = Vec::new();
        let mut add = |effect: &TechniqueEffect, subject: &Subject, reason: String| {
            match merged.iter_mut().find(|s| s.technique == effect.technique) {
                Some(existing) => {
                    if !existing.subject_ids.contains(&subject.id) {
                        existing.subject_ids.push(subject.id.clone());
                    }
                    if effect.expected_improvement > existing.expected_improvement {
                        existing.expected_improvement = effect.expected_improvement;
                        existing.reason = reason;
                    }
                }
                None => merged.push(TechniqueSuggestion {
                    technique: effect.technique,
                    subject_ids: vec![subject.id.clone()],
                    expected_improvement: effect.expected_improvement,
                    reason,
                }),
            }
        };

        for subject in subjects {
            if subject.difficulty_clamped() >= self.high_difficulty {
                for effect in &self.difficulty_techniques {
                    add(effect, subject, format!("{} is rated hard; test yourself instead of rereading", subject.name));
                }
            }
            if let Some(category) = self.resolve_category(subject) {
                if let Some(rule) = self.category_rules.iter().find(|r| r.category == category) {
                    for effect in &rule.techniques {
                        add(effect, subject, rule.reason.clone());
                    }
                }
            }
            if subject.topics.len() > self.interleaving_topic_threshold {
                add(
                    &self.interleaving,
                    subject,
                    format!("Mixing the {} topics of {} improves discrimination", subject.topics.len(), subject.name),
                );
            }
        }

        merged.sort_by(|a, b| {
            b.expected_improvement
                .partial_cmp(&a.expected_improvement)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        merged.truncate(self.max_suggestions);
        merged
    }
}
