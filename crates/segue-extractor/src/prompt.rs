//! Prompts for the transition validation oracle

/// Builds the yes/no validation prompt for one transition
pub struct PromptBuilder<'a> {
    transition: &'a str,
    context_a: Option<&'a str>,
    context_b: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(transition: &'a str) -> Self {
        Self {
            transition,
            context_a: None,
            context_b: None,
        }
    }

    /// Add the paragraphs the transition sits between
    pub fn with_context(mut self, context_a: Option<&'a str>, context_b: Option<&'a str>) -> Self {
        self.context_a = context_a;
        self.context_b = context_b;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(VALIDATION_QUESTION);
        prompt.push('\n');
        prompt.push_str(&format!("Phrase: \"{}\"\n", self.transition));

        if self.context_a.is_some() || self.context_b.is_some() {
            prompt.push_str("\nIt appears between these two paragraphs:\n");
            if let Some(a) = self.context_a {
                prompt.push_str(&format!("Paragraph A: {}\n", a));
            }
            if let Some(b) = self.context_b {
                prompt.push_str(&format!("Paragraph B: {}\n", b));
            }
            prompt.push('\n');
        }

        prompt.push_str(ANSWER_FORMAT);
        prompt
    }
}

const VALIDATION_QUESTION: &str = "Is the following phrase a short transition commonly used to connect paragraphs in a news or editorial article?";

const ANSWER_FORMAT: &str = "Respond only with \"Yes\" or \"No\".";
