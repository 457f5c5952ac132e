//! Stateful fence tracking over successive document lines.
//!
//! Trackers are fed one line at a time and report whether that line belongs
//! to a fenced region. Delimiter lines count as part of their region on both
//! ends: the opening line, every interior line, and the closing line all
//! report "inside". One tracker instance covers one scan pass over one
//! document and is never shared.

use crate::classifiers;

/// Dual tracker for fenced code blocks and YAML blocks.
///
/// While inside a fence, only that fence's own delimiter rule is consulted
/// for the exit, so a `---` line inside a code block stays code. When
/// outside, the code fence test runs before the YAML test; a line is never
/// in both states. An unclosed fence runs to the end of input.
pub struct FenceTracker {
    in_code: bool,
    in_yaml: bool,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self { in_code: false, in_yaml: false }
    }

    /// Feed the next line. Returns true iff the line is fence syntax or
    /// fence interior and should be skipped by content classifiers.
    pub fn feed(&mut self, line: &str) -> bool {
        if self.in_code {
            if classifiers::code_fence(line).is_some() {
                self.in_code = false;
            }
            return true;
        }
        if self.in_yaml {
            if classifiers::yaml_delimiter(line) {
                self.in_yaml = false;
            }
            return true;
        }
        if classifiers::code_fence(line).is_some() {
            self.in_code = true;
            return true;
        }
        if classifiers::yaml_delimiter(line) {
            self.in_yaml = true;
            return true;
        }
        false
    }
}

impl Default for FenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// What a line means to a [`DirectiveFenceTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveLine {
    /// Not part of any directive.
    Outside,
    /// Backtick fence whose info string declared the directive named here.
    Opening(String),
    /// Interior line of an open directive.
    Body,
    /// Backtick fence closing the open directive.
    Closing,
}

/// Tracker for MyST directive fences, `` ```{name} arguments ``.
///
/// Only backtick fences qualify as delimiters. When a target name is given,
/// only directives with that exact name open; otherwise any directive does.
/// A backtick fence without a directive-shaped info string stays outside.
pub struct DirectiveFenceTracker {
    in_directive: bool,
}

impl DirectiveFenceTracker {
    pub fn new() -> Self {
        Self { in_directive: false }
    }

    /// Feed the next line and classify it relative to directive fences.
    pub fn feed(&mut self, line: &str, target: Option<&str>) -> DirectiveLine {
        if self.in_directive {
            if classifiers::backtick_fence(line).is_some() {
                self.in_directive = false;
                return DirectiveLine::Closing;
            }
            return DirectiveLine::Body;
        }

        let Some(fence) = classifiers::backtick_fence(line) else {
            return DirectiveLine::Outside;
        };
        let Some(directive) = classifiers::directive_string(&fence.arguments) else {
            return DirectiveLine::Outside;
        };
        if target.is_some_and(|name| name != directive.name) {
            return DirectiveLine::Outside;
        }
        self.in_directive = true;
        DirectiveLine::Opening(directive.name)
    }
}

impl Default for DirectiveFenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
