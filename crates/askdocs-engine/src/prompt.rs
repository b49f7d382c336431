//! Prompt assembly for the two answer tiers.

use askdocs_core::ScoredPassage;

/// System instruction for the primary tier: a tutor persona that
/// grounds answers in the retrieved excerpts.
pub const PRIMARY_INSTRUCTION: &str = "You are a tutor answering from the \
provided document excerpts. Ground every answer in the excerpts, use \
encouraging language, offer simple analogies and examples, and suggest \
related follow-up questions. If the excerpts do not contain the answer, \
say so plainly.";

/// System instruction for the fallback tier: a terse assistant used
/// when the primary prompt was too large for the model.
pub const FALLBACK_INSTRUCTION: &str = "You are a question-answering \
assistant. Answer concisely using only the provided document excerpts. \
If the excerpts do not contain the relevant information, reply that the \
provided material cannot answer the question.";

/// Join the retrieved passages and the question into one user prompt.
pub fn build_prompt(question: &str, retrieved: &[ScoredPassage]) -> String {
    let mut context = String::new();
    for (i, scored) in retrieved.iter().enumerate() {
        if i > 0 {
            context.push_str("\n\n---\n\n");
        }
        context.push_str(&scored.passage.text);
    }

    format!("Excerpts:\n\n{}\n\nQuestion: {}", context, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdocs_core::Passage;

    fn scored(text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                text: text.to_string(),
                source_path: "doc.txt".to_string(),
                page_or_row: None,
                sequence_index: 0,
            },
            score: 0.5,
        }
    }

    #[test]
    fn test_build_prompt_joins_passages() {
        let prompt = build_prompt("why?", &[scored("first"), scored("second")]);
        assert!(prompt.contains("first\n\n---\n\nsecond"));
        assert!(prompt.ends_with("Question: why?"));
    }

    #[test]
    fn test_build_prompt_no_passages() {
        let prompt = build_prompt("why?", &[]);
        assert!(prompt.contains("Question: why?"));
    }
}
