//! Prometheus counters for the profile gate and content mutations.

use std::fmt;

use domains::{ContentKind, DomainError};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Action {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Ok,
    Denied,
    Invalid,
    Error,
}

impl Outcome {
    fn of<T>(result: &Result<T, DomainError>) -> Self {
        match result {
            Ok(_) => Outcome::Ok,
            Err(
                DomainError::PermissionDenied(_)
                | DomainError::ConfirmationRequired
                | DomainError::Unauthenticated,
            ) => Outcome::Denied,
            Err(DomainError::Validation(_) | DomainError::NotFound { .. }) => Outcome::Invalid,
            Err(_) => Outcome::Error,
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MutationLabels {
    pub kind: String,
    pub action: Action,
    pub outcome: Outcome,
}

pub struct Metrics {
    registry: Registry,
    gate_redirects: Counter,
    mutations: Family<MutationLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("gate_redirects", &self.gate_redirects.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("review_market");
        let gate_redirects = Counter::default();
        let mutations = Family::<MutationLabels, Counter>::default();
        registry.register(
            "profile_gate_redirects",
            "Requests sent to profile setup because the profile was incomplete",
            gate_redirects.clone(),
        );
        registry.register(
            "content_mutations",
            "Create, update and delete attempts by outcome",
            mutations.clone(),
        );
        Self {
            registry,
            gate_redirects,
            mutations,
        }
    }

    pub fn gate_redirect(&self) {
        self.gate_redirects.inc();
    }

    pub fn record<T>(&self, kind: ContentKind, action: Action, result: &Result<T, DomainError>) {
        self.mutations
            .get_or_create(&MutationLabels {
                kind: kind.entity().to_string(),
                action,
                outcome: Outcome::of(result),
            })
            .inc();
    }

    /// OpenMetrics text exposition.
    pub fn encode(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_the_exposition() {
        let metrics = Metrics::new();
        metrics.gate_redirect();
        metrics.record::<()>(ContentKind::Post, Action::Create, &Ok(()));
        metrics.record::<()>(
            ContentKind::Post,
            Action::Delete,
            &Err(DomainError::PermissionDenied("not yours".into())),
        );

        let text = metrics.encode().unwrap();
        assert!(text.contains("review_market_profile_gate_redirects_total 1"));
        assert!(text.contains(r#"action="Create""#));
        assert!(text.contains(r#"outcome="Denied""#));
        assert!(text.ends_with("# EOF\n"));
    }
}
