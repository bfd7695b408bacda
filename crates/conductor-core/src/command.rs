//! Plan to command-line synthesis.
//!
//! Pure string assembly: no I/O, no environment reads, no execution. A
//! malformed plan here is a bug in the orchestrator, not a runtime
//! condition, so the checks are assertions.

use serde::Serialize;

use crate::orchestrator::OrchestrationPlan;

// ---------------------------------------------------------------------------
// CommandInvocation
// ---------------------------------------------------------------------------

/// Program name plus ordered arguments, ready for a process spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    /// Shell-style rendering for display. Arguments with whitespace or
    /// shell metacharacters are single-quoted.
    pub fn shell_words(&self) -> String {
        let mut out = quote(&self.program).into_owned();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&quote(arg));
        }
        out
    }
}

fn quote(arg: &str) -> std::borrow::Cow<'_, str> {
    let needs_quoting = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || "\"'\\$`!*?[](){};&|<>~#".contains(c));
    if !needs_quoting {
        return std::borrow::Cow::Borrowed(arg);
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('\'');
    for c in arg.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    std::borrow::Cow::Owned(quoted)
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Assemble the invocation for a plan: base args, then each plan arg as
/// `--flag value` in map order, then the request text as the final
/// positional argument.
pub fn synthesize(plan: &OrchestrationPlan) -> CommandInvocation {
    assert!(
        !plan.specialists.is_empty(),
        "orchestration plan has no specialists"
    );
    assert!(
        !plan.tool_command.program.is_empty(),
        "orchestration plan has no program"
    );

    let mut args = plan.tool_command.base_args.clone();
    for (flag, value) in &plan.args {
        args.push(format!("--{flag}"));
        args.push(value.clone());
    }
    args.push(plan.request.clone());

    CommandInvocation {
        program: plan.tool_command.program.clone(),
        args,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
