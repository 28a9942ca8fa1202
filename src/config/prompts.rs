//! Prompt templates for NoteVidya.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub notes: NotesPrompts,
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for turning a lecture transcript into study notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesPrompts {
    pub user: String,
}

impl Default for NotesPrompts {
    fn default() -> Self {
        Self {
            user: r#"**Input:**
A transcript of a YouTube lecture video:

{{transcript}}

**Task:**
Analyze the transcript and generate comprehensive, structured notes for students. The notes should be detailed, easy to understand, and organized with clear headings and subheadings. Break down complex concepts, highlight key points, and include examples or explanations where necessary to aid student comprehension.

**Output Requirements:**

- Begin with a main title reflecting the lecture topic.
- Use clear headings and subheadings to organize content (e.g., Introduction, Key Concepts, Examples, Summary).
- For each section, provide detailed explanations, definitions, and important points.
- Highlight any important terms, formulas, or concepts.
- Where appropriate, use bullet points or numbered lists for clarity.
- End with a concise summary of the lecture's main takeaways.

**Instructions for the Summarizer:**
- Focus on clarity and depth to help students understand the material.
- Avoid simply copying the transcript; rephrase and condense information as needed.
- Ensure the notes are suitable for study and revision purposes."#
                .to_string(),
        }
    }
}

/// Prompt for answering a question from retrieved transcript excerpts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            user: "Use the following context to answer:\n{{context}}\n\nQuestion: {{question}}\nAnswer in clear English:"
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let notes_path = custom_path.join("notes.toml");
            if notes_path.exists() {
                let content = std::fs::read_to_string(&notes_path)?;
                prompts.notes = toml::from_str(&content)?;
            }

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are resolved in one pass over the template, so values
    /// are inserted verbatim even when they contain `{{...}}` themselves.
    /// Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.notes.user.contains("{{transcript}}"));
        assert!(prompts.rag.user.contains("{{context}}"));
        assert!(prompts.rag.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_keeps_placeholders_inside_values() {
        let context = "In Jinja you write {{question}} to print a variable.";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), "What does Jinja print?".to_string());

        let out = Prompts::render("{{context}}\nQ: {{question}}", &vars);
        assert_eq!(
            out,
            "In Jinja you write {{question}} to print a variable.\nQ: What does Jinja print?"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let vars = HashMap::from([("name".to_string(), "{{count}}".to_string())]);
        assert_eq!(
            Prompts::render("{{name}} and {{missing}}", &vars),
            "{{count}} and {{missing}}"
        );
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("audience".to_string(), "undergraduates".to_string());
        prompts
            .variables
            .insert("question".to_string(), "ignored".to_string());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is entropy?".to_string());

        let out = prompts.render_with_custom("{{question}} for {{audience}}", &vars);
        assert_eq!(out, "What is entropy? for undergraduates");
    }

    #[test]
    fn test_load_custom_rag_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "user = \"Context: {{context}} / Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.user, "Context: {{context}} / Q: {{question}}");
        assert_eq!(prompts.notes.user, NotesPrompts::default().user);
    }
}
