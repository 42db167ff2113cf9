//! Keyword-based framework selection.
//!
//! A static, ordered rule table maps keywords found in the lowercased user
//! prompt to framework names. All firing rules contribute; the result is
//! deduplicated in first-seen order and capped.

use std::collections::HashSet;

use tracing::debug;

/// Maximum number of frameworks applied to one prompt.
pub const MAX_FRAMEWORKS: usize = 3;

/// Framework used when no rule fires.
pub const DEFAULT_FRAMEWORK: &str = "CRISPE";

/// A selection rule: any keyword substring match adds the frameworks.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRule {
    /// What the rule detects.
    pub intent: &'static str,
    pub keywords: &'static [&'static str],
    pub frameworks: &'static [&'static str],
}

impl SelectionRule {
    /// Whether any keyword occurs in the (already lowercased) prompt.
    pub fn matches(&self, lowered_prompt: &str) -> bool {
        self.keywords.iter().any(|k| lowered_prompt.contains(k))
    }
}

/// Rules in evaluation order.
pub const RULES: &[SelectionRule] = &[
    SelectionRule {
        intent: "analysis / reasoning",
        keywords: &["analyze", "why", "compare", "evaluate", "recommend", "reason", "steps"],
        frameworks: &["CoT", "DEEP", "SCOR"],
    },
    SelectionRule {
        intent: "self-consistency",
        keywords: &["multiple solutions", "self-consistency", "try several", "best answer"],
        frameworks: &["CoT+SC"],
    },
    SelectionRule {
        intent: "writing / content creation",
        keywords: &["write", "create", "story", "copy", "draft", "blog", "article", "post"],
        frameworks: &["CRAFT", "TACT", "FEARS", "PEEL"],
    },
    SelectionRule {
        intent: "summarization / clarity",
        keywords: &["summarize", "overview", "simplify", "explain", "condense"],
        frameworks: &["ICED", "Prompt Sandwich"],
    },
    SelectionRule {
        intent: "structured data",
        keywords: &["data", "table", "insight", "metric", "analyze data", "dataset"],
        frameworks: &["DIET", "TREE"],
    },
    SelectionRule {
        intent: "editing / improvement",
        keywords: &["improve", "refine", "revise", "edit", "polish"],
        frameworks: &["CUP", "ICED", "LEAP"],
    },
    SelectionRule {
        intent: "tool-using agent",
        keywords: &["act", "observe", "tool", "search", "browse", "action plan", "react"],
        frameworks: &["ReACT"],
    },
    SelectionRule {
        intent: "communication alignment",
        keywords: &["audience", "purpose", "message", "persona"],
        frameworks: &["RAP", "RTCO"],
    },
    SelectionRule {
        intent: "instruction / teaching",
        keywords: &["teach", "lesson", "tutorial", "steps", "guide", "instruct", "expectation"],
        frameworks: &["RAISE", "SCQA"],
    },
    SelectionRule {
        intent: "decision / selection",
        keywords: &["decide", "choose", "select", "evaluate options", "tradeoffs"],
        frameworks: &["APE", "SCOR"],
    },
    SelectionRule {
        intent: "dialogue agent",
        keywords: &["chatbot", "dialogue", "conversation", "role-play", "assistant"],
        frameworks: &["PAIR"],
    },
    SelectionRule {
        intent: "strategy / creative mapping",
        keywords: &["motivation", "brainstorm", "parameters", "product", "strategy", "map"],
        frameworks: &["MAPP"],
    },
    SelectionRule {
        intent: "coaching / goal setting",
        keywords: &["coach", "goal", "reality", "options", "way forward", "plan"],
        frameworks: &["GROW"],
    },
    SelectionRule {
        intent: "general structure",
        keywords: &["outline", "structure", "format", "role", "context", "output"],
        frameworks: &["RTCO"],
    },
];

/// Select up to [`MAX_FRAMEWORKS`] frameworks for a prompt.
///
/// ```
/// use promptsmith::frameworks::select_frameworks;
///
/// assert_eq!(select_frameworks("Why did sales drop?"), ["CoT", "DEEP", "SCOR"]);
/// assert_eq!(select_frameworks("hello"), ["CRISPE"]);
/// ```
pub fn select_frameworks(user_prompt: &str) -> Vec<String> {
    select_frameworks_capped(user_prompt, MAX_FRAMEWORKS)
}

/// Select frameworks with a custom cap.
pub fn select_frameworks_capped(user_prompt: &str, max: usize) -> Vec<String> {
    let lowered = user_prompt.to_lowercase();

    let mut candidates: Vec<&str> = Vec::new();
    for rule in RULES.iter().filter(|r| r.matches(&lowered)) {
        debug!("Selection rule fired: {}", rule.intent);
        candidates.extend(rule.frameworks);
    }
    if candidates.is_empty() {
        candidates.push(DEFAULT_FRAMEWORK);
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|name| seen.insert(*name))
        .take(max)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_selects_reasoning_frameworks() {
        assert_eq!(
            select_frameworks("Compare these two vendors"),
            ["CoT", "DEEP", "SCOR"]
        );
    }

    #[test]
    fn writing_prompt_is_capped_at_three() {
        assert_eq!(
            select_frameworks("Draft a blog article"),
            ["CRAFT", "TACT", "FEARS"]
        );
    }

    #[test]
    fn no_keywords_falls_back_to_default() {
        assert_eq!(select_frameworks("hello there"), [DEFAULT_FRAMEWORK]);
        assert_eq!(select_frameworks(""), [DEFAULT_FRAMEWORK]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(select_frameworks("SUMMARIZE THIS"), ["ICED", "Prompt Sandwich"]);
    }

    #[test]
    fn duplicates_removed_in_first_seen_order() {
        // "polish" -> CUP, ICED, LEAP; "explain" -> ICED, Prompt Sandwich.
        assert_eq!(
            select_frameworks_capped("explain and polish", 10),
            ["ICED", "Prompt Sandwich", "CUP", "LEAP"]
        );
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "react" contains "act"; "reaction" contains both.
        assert_eq!(select_frameworks("a reaction"), ["ReACT"]);
    }

    #[test]
    fn later_rules_contribute_after_earlier_ones() {
        assert_eq!(
            select_frameworks_capped("why does our chatbot fail", 10),
            ["CoT", "DEEP", "SCOR", "PAIR"]
        );
    }

    #[test]
    fn custom_cap() {
        assert_eq!(select_frameworks_capped("write a story", 1), ["CRAFT"]);
        assert!(select_frameworks_capped("write a story", 0).is_empty());
    }

    #[test]
    fn every_rule_has_keywords_and_frameworks() {
        for rule in RULES {
            assert!(!rule.keywords.is_empty(), "{}", rule.intent);
            assert!(!rule.frameworks.is_empty(), "{}", rule.intent);
        }
    }
}
