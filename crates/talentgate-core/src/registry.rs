//! The capability registry.
//!
//! A plain value the orchestrator owns and threads where needed — there is
//! no global registry. Registration records a descriptor per capability so
//! operators can list what is installed and under which thresholds.

use serde::{Deserialize, Serialize};
use tracing::info;

use talentgate_contracts::error::{PipelineError, PipelineResult};

use crate::task::AgentTask;

/// Registry row for one installed capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub kind: String,
    pub description: String,
    pub confidence_threshold: f64,
}

impl AgentDescriptor {
    pub fn from_task<I, O>(task: &dyn AgentTask<Input = I, Output = O>) -> Self {
        Self {
            kind: task.kind().to_string(),
            description: task.description().to_string(),
            confidence_threshold: task.confidence_threshold(),
        }
    }
}

/// The set of capabilities installed in one orchestrator.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability. Kinds must be unique within one registry.
    pub fn register(&mut self, descriptor: AgentDescriptor) -> PipelineResult<()> {
        if self.agents.iter().any(|a| a.kind == descriptor.kind) {
            return Err(PipelineError::Config {
                reason: format!("agent kind '{}' registered twice", descriptor.kind),
            });
        }
        info!(agent_kind = %descriptor.kind, threshold = descriptor.confidence_threshold, "agent registered");
        self.agents.push(descriptor);
        Ok(())
    }

    pub fn descriptor(&self, kind: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.kind == kind)
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentDescriptor, AgentRegistry};
    use talentgate_contracts::error::PipelineError;

    fn descriptor(kind: &str) -> AgentDescriptor {
        AgentDescriptor {
            kind: kind.to_string(),
            description: "test capability".to_string(),
            confidence_threshold: 0.7,
        }
    }

    #[test]
    fn registers_and_looks_up() {
        let mut registry = AgentRegistry::new();
        registry.register(descriptor("Matcher")).unwrap();
        registry.register(descriptor("Ranker")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.descriptor("Matcher").unwrap().kind, "Matcher");
        assert!(registry.descriptor("Unknown").is_none());
        assert_eq!(registry.list()[1].kind, "Ranker");
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let mut registry = AgentRegistry::new();
        registry.register(descriptor("Matcher")).unwrap();

        match registry.register(descriptor("Matcher")) {
            Err(PipelineError::Config { reason }) => {
                assert!(reason.contains("registered twice"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }
}
