//! System instructions for document generation.

use indoc::{formatdoc, indoc};

use crate::kind::DocumentKind;

/// Instruction for writing a new text document. The prompt is its title.
pub const TEXT_PROMPT: &str = indoc! {"
    Write about the given topic. Markdown is supported. Use headings wherever \
    appropriate.
"};

/// Instruction for writing a new code document. The prompt is its title.
pub const CODE_PROMPT: &str = indoc! {"
    You are a code generator that creates self-contained, executable code \
    snippets. When writing code:

    1. Each snippet should be complete and runnable on its own
    2. Prefer using print statements to display outputs
    3. Include helpful comments explaining the code
    4. Keep snippets concise (generally under 15 lines)
    5. Avoid external dependencies, use the standard library
    6. Handle potential errors gracefully
    7. Return meaningful output that demonstrates the code's functionality
    8. Don't use input() or other interactive functions
    9. Don't access files or network resources
    10. Don't use infinite loops
"};

/// Instruction for revising an existing document of the given kind. The
/// prompt is the description of the requested change.
#[must_use]
pub fn update_document_prompt(existing_content: &str, kind: DocumentKind) -> String {
    let subject = match kind {
        DocumentKind::Text => "document",
        DocumentKind::Code => "code snippet",
    };

    formatdoc! {"
        Improve the following contents of the {subject} based on the given \
        prompt. Revise the existing contents instead of starting over.

        {existing_content}
    "}
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
