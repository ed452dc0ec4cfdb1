//! Role instructions and phase request templates.

use crate::review::domain::PromptRenderError;
use crate::routing::domain::AgentRole;
use crate::specification::domain::TaskSpecification;
use crate::task::domain::Phase;
use minijinja::{Environment, Value, context};

const SPEC_BLOCK: &str = "\
Task: {{ spec.name }}
{% if spec.description %}
{{ spec.description }}
{% endif %}
{%- for heading, items in sections %}{% if items %}
{{ heading }}:
{% for item in items %}- {{ item }}
{% endfor %}{% endif %}{% endfor %}
{%- if spec.notes %}
Notes:
{{ spec.notes }}
{% endif %}";

const PLAN_TEMPLATE: &str = "\
{{ spec_block }}
Write the implementation plan for this task: the file structure, the \
interfaces between components, and the order of work.";

const IMPLEMENT_TEMPLATE: &str = "\
{{ spec_block }}
Implement the task following this plan:
```
{{ plan }}
```
Reply with the complete code.";

const TESTS_TEMPLATE: &str = "\
{{ spec_block }}
Write tests covering this implementation:
```
{{ implementation }}
```
Reply with the complete test code.";

const REVIEW_TEMPLATE: &str = "\
{{ spec_block }}
Review the {{ phase }} artifact below for logic errors, security holes, and \
style problems.
```
{{ artifact }}
```
Answer with a JSON object of the form \
{\"approved\": true|false, \"issues\": [\"...\"]}. List every issue as a \
separate string and approve only when nothing remains to fix.";

/// Returns the standing instructions sent to `role`.
///
/// # Examples
///
///     use multiagent::orchestration::adapters::router::system_prompt;
///     use multiagent::routing::domain::AgentRole;
///
///     assert!(system_prompt(AgentRole::Reviewer).contains("APPROVED"));
#[must_use]
pub const fn system_prompt(role: AgentRole) -> &'static str {
    match role {
        AgentRole::Manager => {
            "You are a Project Manager. Coordinate the architect, coders, and reviewers \
             and keep the task moving towards delivery."
        }
        AgentRole::Architect => {
            "You are a Lead Architect. Design the system architecture: define the file \
             structure, the interfaces, and the technology choices coders must follow."
        }
        AgentRole::Coder => {
            "You are a Senior Developer. Implement the features according to the \
             architecture. When the reviewer reports issues, fix every one of them."
        }
        AgentRole::CoderFrontend => {
            "You are a Senior Frontend Developer. Implement the features according to \
             the architecture. When the reviewer reports issues, fix every one of them."
        }
        AgentRole::CoderBackend => {
            "You are a Senior Backend Developer. Implement the features according to \
             the architecture. When the reviewer reports issues, fix every one of them."
        }
        AgentRole::Tester => {
            "You are a Senior Test Engineer. Write thorough, deterministic tests for the \
             code you are given and fix the tests when the reviewer reports issues."
        }
        AgentRole::Reviewer => {
            "You are a Senior QA and Code Reviewer with a zero-bug policy. Check for \
             logic errors, security holes, and style problems. Say APPROVED only when \
             the code is perfect and the task is finished."
        }
    }
}

fn render(
    name: &'static str,
    template: &str,
    spec: &TaskSpecification,
    extra: Value,
) -> Result<String, PromptRenderError> {
    let failed = |err: minijinja::Error| PromptRenderError {
        template: name,
        reason: err.to_string(),
    };
    let env = Environment::new();
    let sections = [
        ("Requirements", spec.requirements()),
        ("Constraints", spec.constraints()),
        ("Acceptance criteria", spec.acceptance_criteria()),
        ("Files to modify", spec.files_to_modify()),
        ("Files to create", spec.files_to_create()),
        ("Tests required", spec.tests_required()),
    ];
    let spec_block = env
        .render_str(SPEC_BLOCK, context! { spec, sections })
        .map_err(failed)?;
    env.render_str(template, context! { spec_block, ..extra })
        .map_err(failed)
}

pub(super) fn plan_request(spec: &TaskSpecification) -> Result<String, PromptRenderError> {
    render("plan", PLAN_TEMPLATE, spec, context! {})
}

pub(super) fn implement_request(
    spec: &TaskSpecification,
    plan: &str,
) -> Result<String, PromptRenderError> {
    render("implementation", IMPLEMENT_TEMPLATE, spec, context! { plan })
}

pub(super) fn tests_request(
    spec: &TaskSpecification,
    implementation: &str,
) -> Result<String, PromptRenderError> {
    render("tests", TESTS_TEMPLATE, spec, context! { implementation })
}

pub(super) fn review_request(
    phase: Phase,
    spec: &TaskSpecification,
    artifact: &str,
) -> Result<String, PromptRenderError> {
    render(
        "review",
        REVIEW_TEMPLATE,
        spec,
        context! { phase => phase.as_str(), artifact },
    )
}
