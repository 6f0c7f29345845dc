// System message sent ahead of every question
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Wraps a coding question in the fixed instruction template.
///
/// The question is embedded verbatim; the same input always yields the same prompt.
pub fn build_prompt(question: &str) -> String {
    format!(
        "Write a Python code solution for the following problem description:\n\n\
         {question}\n\n\
         Provide the code in a format that is ready to run, without any unnecessary comments or text. \
         After the solution, include a brief summary in comments."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("reverse a list"), build_prompt("reverse a list"));
    }

    #[test]
    fn question_is_embedded_verbatim() {
        let question = "  parse  \"CSV\"\nwith {braces}  ";
        let prompt = build_prompt(question);
        assert!(prompt.contains(question));
        assert!(prompt.starts_with("Write a Python code solution"));
        assert!(prompt.ends_with("include a brief summary in comments."));
    }

    #[test]
    fn empty_question_still_formats() {
        let prompt = build_prompt("");
        assert!(prompt.contains("problem description:\n\n\n\n"));
    }
}
