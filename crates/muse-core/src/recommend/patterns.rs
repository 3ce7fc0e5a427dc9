//! Static prompt classification table for backend recommendation.
//!
//! Each pattern pairs a compiled regular expression with the backends that
//! handle that kind of prompt well. The table is data: adding a pattern or
//! a candidate is a change here, never new conditionals in the scoring
//! logic. Built once at first use, read-only afterwards.

use lazy_static::lazy_static;
use regex::Regex;

use crate::backend::BackendId;

/// One backend suggested by a matching pattern.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub backend: BackendId,
    /// Base score contribution in [0, 1].
    pub base_score: f64,
    pub reason: &'static str,
}

/// A prompt feature detector with its candidate backends.
#[derive(Debug)]
pub struct PromptPattern {
    /// Feature name reported as a detected feature.
    pub name: &'static str,
    pub matcher: Regex,
    /// Candidates in preference order.
    pub candidates: &'static [Candidate],
}

impl PromptPattern {
    fn new(name: &'static str, pattern: &str, candidates: &'static [Candidate]) -> Self {
        Self {
            name,
            // Table patterns are compile-time constants; a bad one is a
            // programmer error caught by the table test below.
            matcher: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid prompt pattern '{name}': {e}");
            }),
            candidates,
        }
    }
}

const fn candidate(backend: BackendId, base_score: f64, reason: &'static str) -> Candidate {
    Candidate {
        backend,
        base_score,
        reason,
    }
}

/// Fallback ranking used when no pattern matches, reported under the
/// `general` feature.
pub const DEFAULT_CANDIDATES: &[Candidate] = &[
    candidate(BackendId::Openai, 0.6, "reliable general-purpose default"),
    candidate(BackendId::Mistral, 0.5, "fast general-purpose alternative"),
    candidate(BackendId::Llama, 0.4, "inexpensive open-weights fallback"),
];

// Candidate lists need 'static promotion, so each lives in a named const.
const ROLEPLAY: &[Candidate] = &[
    candidate(BackendId::Unity, 0.9, "tuned for character personas and immersive roleplay"),
    candidate(BackendId::Mistral, 0.5, "follows persona instructions consistently"),
    candidate(BackendId::Llama, 0.4, "handles casual in-character chat"),
];

const CODE: &[Candidate] = &[
    candidate(BackendId::Openai, 0.85, "strong code generation and debugging"),
    candidate(BackendId::Deepseek, 0.8, "code-focused training corpus"),
    candidate(BackendId::Mistral, 0.35, "adequate for short snippets"),
];

const CREATIVE_WRITING: &[Candidate] = &[
    candidate(BackendId::Llama, 0.8, "expressive long-form creative output"),
    candidate(BackendId::Unity, 0.6, "vivid narrative voice"),
    candidate(BackendId::Mistral, 0.5, "solid structured prose"),
];

const ANALYSIS: &[Candidate] = &[
    candidate(BackendId::Openai, 0.8, "careful step-by-step reasoning"),
    candidate(BackendId::Deepseek, 0.7, "strong analytical benchmarks"),
    candidate(BackendId::Mistral, 0.5, "concise summaries"),
];

const CURRENT_EVENTS: &[Candidate] = &[
    candidate(BackendId::Searchgpt, 0.9, "retrieval-backed answers about recent events"),
    candidate(BackendId::Openai, 0.4, "broad world knowledge up to training cutoff"),
];

const LONG_FORM: &[Candidate] = &[
    candidate(BackendId::Openai, 0.75, "coherent multi-section drafts"),
    candidate(BackendId::Mistral, 0.65, "fast long-form drafting"),
];

const TRANSLATION: &[Candidate] = &[
    candidate(BackendId::Mistral, 0.8, "strong multilingual coverage"),
    candidate(BackendId::Openai, 0.6, "reliable high-resource language pairs"),
];

const MARKETING: &[Candidate] = &[
    candidate(BackendId::Openai, 0.7, "on-brand persuasive copy"),
    candidate(BackendId::Mistral, 0.6, "quick copy variations"),
    candidate(BackendId::Llama, 0.5, "casual social-media tone"),
];

lazy_static! {
    /// The classification table, in evaluation order.
    pub static ref PATTERNS: Vec<PromptPattern> = vec![
        PromptPattern::new(
            "roleplay",
            r"\b(you are (a|an|my)|act as|roleplay|role[- ]play|stay in character|pretend to be|persona)\b",
            ROLEPLAY,
        ),
        PromptPattern::new(
            "code",
            r"\b(code|function|bug|debug|compile|script|regex|algorithm|refactor|stack trace)\b",
            CODE,
        ),
        PromptPattern::new(
            "creative_writing",
            r"\b(story|stories|poem|poetry|fiction|lyrics|screenplay|write me)\b",
            CREATIVE_WRITING,
        ),
        PromptPattern::new(
            "analysis",
            r"\b(explain|analyze|analyse|compare|summarize|summarise|reasoning|pros and cons|why does)\b",
            ANALYSIS,
        ),
        PromptPattern::new(
            "current_events",
            r"\b(latest|news|today|current|recent|this (week|month|year)|right now)\b",
            CURRENT_EVENTS,
        ),
        PromptPattern::new(
            "long_form",
            r"\b(article|blog post|essay|proposal|report|whitepaper|newsletter|landing page)\b",
            LONG_FORM,
        ),
        PromptPattern::new(
            "translation",
            r"\b(translate|translation|in (spanish|french|german|italian|portuguese|japanese|czech))\b",
            TRANSLATION,
        ),
        PromptPattern::new(
            "marketing",
            r"\b(brand|campaign|tagline|slogan|ad copy|marketing|social media|seo)\b",
            MARKETING,
        ),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_compiles_and_is_sane() {
        let names: Vec<&str> = PATTERNS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "roleplay",
                "code",
                "creative_writing",
                "analysis",
                "current_events",
                "long_form",
                "translation",
                "marketing",
            ]
        );
        for pattern in PATTERNS.iter() {
            assert!(!pattern.candidates.is_empty(), "{} has no candidates", pattern.name);
            for c in pattern.candidates {
                assert!(
                    (0.0..=1.0).contains(&c.base_score),
                    "{}: base score out of range",
                    pattern.name
                );
                assert!(!c.reason.is_empty());
            }
        }
    }

    #[test]
    fn test_roleplay_detection() {
        let pattern = PATTERNS.iter().find(|p| p.name == "roleplay").unwrap();
        assert!(pattern.matcher.is_match("you are a pirate, speak like one"));
        assert!(pattern.matcher.is_match("act as my interviewer"));
        assert!(!pattern.matcher.is_match("what is the capital of france"));
    }

    #[test]
    fn test_code_detection() {
        let pattern = PATTERNS.iter().find(|p| p.name == "code").unwrap();
        assert!(pattern.matcher.is_match("fix this bug in my function"));
        assert!(!pattern.matcher.is_match("write a poem about rain"));
    }

    #[test]
    fn test_nothing_matches_empty_prompt() {
        for pattern in PATTERNS.iter() {
            assert!(!pattern.matcher.is_match(""), "{} matched empty input", pattern.name);
        }
    }
}
