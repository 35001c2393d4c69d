//! Prompt templates for plot descriptions.

const FIELD: &str = "bioinformatics";

/// Role and goal shared by every prompt
pub fn prompt_base() -> String {
    format!(
        "You are an assistant to a data scientist, in the field of {}. \
         Your task is to describe plots, with minimal interpretation, unless explicitely asked otherwise. \
         The goal is to enable accesibility features in data analysis tools. ",
        FIELD
    )
}

pub const DEFAULT_CONTEXT: &str =
    "Additional context: the plot represents an UMAP embedding of different clusters for cell types.";

/// One-sentence summary
pub const CONCISE_SUFFIX: &str = "Describe this plot in one clear and concise sentence.";

/// Bullet-point breakdown, answered as SSML
pub const DETAILED_SUFFIX: &str = "Describe the key characteristics of the clusters in this plot, \
     focusing on their relative positions, sizes, and separation. \
     Use four or less bullet points for your description. \
     Enclose answer in <speak> tags, and use basic SSML tags to improve generation, \
     but avoid html tags and <break> in particular.";

/// Prompt for the first description of an image
pub fn build_initial_prompt(verbose: bool, question: Option<&str>) -> String {
    let suffix = if verbose {
        DETAILED_SUFFIX
    } else {
        CONCISE_SUFFIX
    };

    let mut prompt = format!("{}{} {}", prompt_base(), suffix, DEFAULT_CONTEXT);

    if let Some(q) = question.filter(|q| !q.is_empty()) {
        prompt.push(' ');
        prompt.push_str(q);
    }

    prompt
}

/// Prompt for a follow-up question, carrying the previous answer as context
pub fn build_follow_up_prompt(previous: &str, question: &str) -> String {
    format!(
        "{}{} Previous description: {} User question: {}",
        prompt_base(),
        DEFAULT_CONTEXT,
        previous,
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concise_prompt() {
        let prompt = build_initial_prompt(false, None);
        assert!(prompt.starts_with("You are an assistant to a data scientist, in the field of bioinformatics. "));
        assert!(prompt.contains("one clear and concise sentence. Additional context:"));
        assert!(prompt.ends_with("cell types."));
        assert!(!prompt.contains("<speak>"));
    }

    #[test]
    fn test_detailed_prompt_asks_for_ssml() {
        let prompt = build_initial_prompt(true, None);
        assert!(prompt.contains("four or less bullet points"));
        assert!(prompt.contains("<speak>"));
        assert!(!prompt.contains("one clear and concise sentence"));
    }

    #[test]
    fn test_question_appended_with_space() {
        let prompt = build_initial_prompt(false, Some("Which cluster is largest?"));
        assert!(prompt.ends_with("cell types. Which cluster is largest?"));
    }

    #[test]
    fn test_empty_question_ignored() {
        assert_eq!(
            build_initial_prompt(true, Some("")),
            build_initial_prompt(true, None)
        );
    }

    #[test]
    fn test_follow_up_prompt_layout() {
        let prompt = build_follow_up_prompt("Two clusters.", "Are they separated?");
        assert!(prompt.starts_with(&prompt_base()));
        assert!(prompt.ends_with(
            "cell types. Previous description: Two clusters. User question: Are they separated?"
        ));
    }
}
