//! Prompt templates for commit message generation.

/// Maximum length for sanitized diff text.
const MAX_DIFF_SANITIZED_LENGTH: usize = 30_000;

/// Shape of the JSON the template asks the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// `{"commit_messages": ["subject", ...]}`
    Subjects,
    /// `{"commit_messages": [{"subject": ..., "body": ...}, ...]}`
    SubjectAndBody,
}

/// One wording of the generation request.
#[derive(Debug)]
pub struct PromptTemplate {
    pub id: &'static str,
    instructions: &'static str,
    shape: OutputShape,
}

pub static TEMPLATES: [PromptTemplate; 4] = [
    PromptTemplate {
        id: "summary",
        instructions: "Summarize the staged changes above as a commit message that accurately \
reflects what was modified. Follow the Conventional Commits format, use the imperative mood, \
and keep the subject under 50 characters.",
        shape: OutputShape::Subjects,
    },
    PromptTemplate {
        id: "concise",
        instructions: "Write a clear, concise commit message for the staged changes above. \
Use the Conventional Commits format (`type(scope): description`), imperative mood, and no \
trailing period. Keep the subject under 50 characters.",
        shape: OutputShape::Subjects,
    },
    PromptTemplate {
        id: "reviewer",
        instructions: "You are reviewing the staged changes above. Propose a commit message a \
reviewer would accept: Conventional Commits subject in the imperative mood, under 50 \
characters, and a short body of hyphen bullet points explaining why the change was made.",
        shape: OutputShape::SubjectAndBody,
    },
    PromptTemplate {
        id: "detailed",
        instructions: "Write commit messages for the staged changes above following these rules:
- Subject: `type(scope): subject`, imperative mood, at most 72 characters, no trailing period.
- Be specific in the subject; avoid vague verbs such as \"update\" or \"change\".
- Body: at most 256 characters, hyphen bullet points covering what was done and why.",
        shape: OutputShape::SubjectAndBody,
    },
];

impl PromptTemplate {
    /// Render the full prompt for `diff`, asking for `count` messages.
    pub fn render(&self, diff: &str, count: u8) -> String {
        let mut sanitized = sanitize_diff(diff);
        let truncation_note = if truncate_on_char_boundary(&mut sanitized, MAX_DIFF_SANITIZED_LENGTH) {
            "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
        } else {
            ""
        };

        let format = match self.shape {
            OutputShape::Subjects => {
                r#"{
    "commit_messages": [
        "commit message 1",
        "commit message 2"
    ]
}"#
            }
            OutputShape::SubjectAndBody => {
                r#"{
    "commit_messages": [
        {
            "id": 1,
            "subject": "<type>(<scope>): <subject>",
            "body": "<body as hyphen bullet points>"
        }
    ]
}"#
            }
        };

        format!(
            r#"Here is the output of `git diff --staged`:
```
{sanitized}
```{truncation_note}

{instructions}

Respond with a valid JSON object containing exactly {count} commit messages, in this format:
{format}

Respond with ONLY the JSON object. Do not prefix it with "Output:", "Response:" or any other text."#,
            instructions = self.instructions,
        )
    }
}

/// Pick the template for a generation round.
///
/// Rotating by round means a refresh usually asks with a different wording.
pub fn select_template(round: u64) -> &'static PromptTemplate {
    &TEMPLATES[(round % TEMPLATES.len() as u64) as usize]
}

/// Sanitize diff text for inclusion in a prompt.
///
/// Removes ANSI escape sequences, control characters (except newlines and
/// tabs) and trailing whitespace.
pub fn sanitize_diff(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            // CSI sequence: ESC [ params final-byte
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        if ch.is_control() && ch != '\n' && ch != '\t' {
            continue;
        }
        result.push(ch);
    }

    let trimmed_len = result.trim_end().len();
    result.truncate(trimmed_len);
    result
}

/// Truncate `text` to at most `max_len` bytes. Returns whether anything was cut.
fn truncate_on_char_boundary(text: &mut String, max_len: usize) -> bool {
    if text.len() <= max_len {
        return false;
    }

    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    true
}
