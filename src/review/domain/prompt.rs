//! Fix-request prompt rendering.

use super::PromptRenderError;
use minijinja::{Environment, context};

const FIX_REQUEST_TEMPLATE: &str = "The code has the following issues that need to be fixed:

{% for issue in issues %}{{ loop.index }}. {{ issue }}
{% endfor %}
Please fix these issues in the code.

Current code:
```
{{ artifact }}
```";

/// Renders the prompt asking a coder to fix `issues` in `artifact`.
///
/// Issues are listed one per line, numbered from one, followed by the
/// artifact in a fenced block.
///
/// # Errors
///
/// Returns [`PromptRenderError`] when the template engine rejects the input.
///
/// # Examples
///
///     use multiagent::review::domain::fix_request;
///
///     let prompt = fix_request("let x = 1", &["missing semicolon".to_owned()])
///         .expect("template renders");
///     assert!(prompt.contains("1. missing semicolon\n"));
///     assert!(prompt.ends_with("```\nlet x = 1\n```"));
pub fn fix_request(artifact: &str, issues: &[String]) -> Result<String, PromptRenderError> {
    Environment::new()
        .render_str(FIX_REQUEST_TEMPLATE, context! { issues, artifact })
        .map_err(|err| PromptRenderError {
            template: "fix request",
            reason: err.to_string(),
        })
}
