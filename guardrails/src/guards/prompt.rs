//! Llama Guard 3 prompt rendering.
//!
//! The rendered text is what the backend model was trained on, so every literal
//! below is reproduced byte for byte.

const PROMPT_HEADER: &str = "<|begin_of_text|><|start_header_id|>user<|end_header_id|>";
const CATEGORIES_START: &str = "<BEGIN UNSAFE CONTENT CATEGORIES>\n";
const CATEGORIES_END: &str = "<END UNSAFE CONTENT CATEGORIES>\n";
const CONVERSATION_START: &str = "<BEGIN CONVERSATION>\n";
const CONVERSATION_END: &str = "<END CONVERSATION>\n";
const PROMPT_FOOTER: &str = "<|eot_id|><|start_header_id|>assistant<|end_header_id|>";

pub const DEFAULT_ROLE: &str = "user";

/// One conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> Turn<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: DEFAULT_ROLE,
            content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    role: &'a str,
    categories: Option<&'a [String]>,
}

impl Default for PromptBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PromptBuilder<'a> {
    pub fn new() -> Self {
        Self {
            role: DEFAULT_ROLE,
            categories: None,
        }
    }

    /// Role whose last message is assessed
    pub fn with_role(mut self, role: &'a str) -> Self {
        self.role = role;
        self
    }

    /// Categories listed in the policy block, in the given order
    pub fn with_categories(mut self, categories: &'a [String]) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn build(&self, conversation: &[Turn<'_>]) -> String {
        let role = capitalize(self.role);
        let mut prompt = String::new();

        prompt.push_str(PROMPT_HEADER);
        prompt.push_str(&format!(
            "Task: Check if there is unsafe content in '{role}' messages in conversations according to our safety policy with the below categories."
        ));

        if let Some(categories) = self.categories {
            prompt.push_str(CATEGORIES_START);
            for category in categories {
                prompt.push_str(category);
                prompt.push('\n');
            }
            prompt.push_str(CATEGORIES_END);
        }

        prompt.push_str(CONVERSATION_START);
        for turn in conversation {
            prompt.push_str(&format!("{}: {}\n", capitalize(turn.role), turn.content));
        }
        prompt.push_str(CONVERSATION_END);

        prompt.push_str(&format!(
            "Provide your safety assessment for ONLY THE LAST {role} message in the above conversation:\n - First line must read 'safe' or 'unsafe'.\n - If unsafe, a second line must include a comma-separated list of violated categories."
        ));
        prompt.push_str(PROMPT_FOOTER);

        prompt
    }
}

/// First character upper case, the rest lower case
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
