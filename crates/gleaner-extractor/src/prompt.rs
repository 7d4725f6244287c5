//! LLM prompt construction for tag and action item extraction

use serde_json::{json, Value};

/// Builds the system instruction, user prompt and response schema
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a prompt builder for one note body
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// System instruction constraining the model to the response shape
    pub fn system(&self) -> &'static str {
        SYSTEM_INSTRUCTIONS
    }

    /// Build the user prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.text.len() + 128);
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }

    /// JSON schema of the expected response object
    pub fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "action_items": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["tags", "action_items"]
        })
    }
}

const SYSTEM_INSTRUCTIONS: &str = r#"You extract tags and action items from personal notes.

Rules:
- A tag is a short topic keyword. Include every #hashtag in the text, without the '#'.
- An action item is a concrete task someone still has to do.
- Copy action items as written; do not include list bullets, numbering, checkboxes or prefixes such as "TODO:".
- Do not invent tasks or tags that the text does not support.
- If nothing qualifies, return empty arrays.
- Respond with a single JSON object and nothing else."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{"tags": ["string"], "action_items": ["string"]}"#;
