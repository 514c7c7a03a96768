//! Prompt construction and output shaping for model-backed completion.

use crate::model::style::StyleProfile;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

const NO_PREVIOUS_CONTENT: &str = "No previous content";

/// Builds the generation prompt for one completion.
///
/// Training examples are cut to `training_prefix_chars` characters.
pub fn build_prompt(
    style: &StyleProfile,
    previous_content: &str,
    current_content: &str,
    training_prefix_chars: usize,
) -> String {
    let training: String = style.training_data.chars().take(training_prefix_chars).collect();
    let context = if previous_content.is_empty() {
        NO_PREVIOUS_CONTENT
    } else {
        previous_content
    };

    format!(
        "{purpose}\nExamples:\n{training}\n\n\
You are a world-class direct response copywriter. Continue the following text while STRICTLY ADHERING to these parameters:\n\n\
Market Awareness: {awareness}\n\
Market Sophistication: {sophistication}\n\
Product: {product}\n\
Big Problem: {problem}\n\
Big Promise: {promise}\n\
Problem Mechanism: {problem_mechanism}\n\
Solution Mechanism: {solution_mechanism}\n\
Proof Elements: {proof}\n\n\
RULES:\n\
{awareness_rule}\n\
{sophistication_rule}\n\
- Use conversational, story-driven language\n\
- Include subtle psychological triggers\n\
- Address hidden objections naturally\n\
- Mirror the prospect's internal dialogue\n\n\
Document context:\n{context}\n\n\
Current incomplete sentence:\n{current_content}\n\n\
Completion (continue directly in the same voice/style):",
        purpose = style.purpose,
        awareness = style.market_awareness.label(),
        sophistication = style.market_sophistication.label(),
        product = style.product_name,
        problem = style.big_problem,
        promise = style.big_promise,
        problem_mechanism = style.problem_mechanism,
        solution_mechanism = style.solution_mechanism,
        proof = style.proof_elements,
        awareness_rule = style.market_awareness.rule(),
        sophistication_rule = style.market_sophistication.rule(),
    )
}

/// Reduces raw model output to its first sentence, terminated by a period.
///
/// Empty segments between terminators are skipped. Output with no text at
/// all yields `"."`.
pub fn single_sentence(raw: &str) -> String {
    let first = SENTENCE_END_RE
        .split(raw.trim())
        .find(|segment| !segment.is_empty())
        .unwrap_or("");
    format!("{first}.")
}
