//! Orchestration — agents, message routing, and scheduling
//!
//! Agents are stateful actors with a FIFO inbox. The [`AgentOrchestrator`]
//! registers them, routes [`AgentMessage`]s between them, and drives their
//! think/act cycles either from one shared thread (sequential) or one thread
//! per agent (parallel).
//!
//! # Cycle
//!
//! ```text
//! Idle ──► Thinking ──► Acting ──► Idle        (driven by cycle())
//!
//! Learning / Communicating / Suspended / Terminated
//!     reachable only via set_state() — caller-managed extension states
//! ```

mod agent;
mod orchestrator;

pub use agent::{Agent, AgentCore, AgentMessage, AgentState, CognitiveAgent};
pub use orchestrator::{AgentOrchestrator, Strategy};
