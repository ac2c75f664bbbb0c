//! Per-request profile completeness check.

use domains::{CompletenessRule, User};

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect(Location),
}

/// Sends signed-in users with an unfinished profile to the setup page.
#[derive(Debug, Clone)]
pub struct ProfileGate {
    rule: CompletenessRule,
    setup_path: String,
}

impl ProfileGate {
    /// `setup_path` is exempt from the redirect, otherwise the setup page
    /// would redirect to itself.
    pub fn new(rule: CompletenessRule, setup_path: impl Into<String>) -> Self {
        ProfileGate {
            rule,
            setup_path: setup_path.into(),
        }
    }

    pub fn check(&self, actor: Option<&User>, path: &str) -> GateDecision {
        match actor {
            Some(user) if !user.is_profile_complete(self.rule) && path != self.setup_path => {
                GateDecision::Redirect(Location::ProfileSet)
            }
            _ => GateDecision::Proceed,
        }
    }
}
