//! Agents — state machine, inbox, and the callback-based cognitive agent

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::orchestrator::AgentOrchestrator;
use crate::{Error, Result};

/// Agent lifecycle state.
///
/// `cycle()` only ever drives `Idle → Thinking → Acting → Idle`. The
/// remaining states are caller-managed extension points reached via
/// [`Agent::set_state`]; the engine never enters or leaves them on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Idle,
    Thinking,
    Acting,
    Learning,
    Communicating,
    Suspended,
    Terminated,
}

/// Immutable inter-agent message record.
///
/// The timestamp is advisory: [`AgentMessage::new`] leaves it at the 0
/// sentinel, [`AgentMessage::stamped`] fills it with wall-clock milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentMessage {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub content: String,
    pub timestamp: u64,
}

impl AgentMessage {
    pub fn new(from: &str, to: &str, kind: &str, content: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind: kind.to_string(),
            content: content.to_string(),
            timestamp: 0,
        }
    }

    pub fn stamped(from: &str, to: &str, kind: &str, content: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            ..Self::new(from, to, kind, content)
        }
    }
}

/// Shared agent plumbing: identity, state, inbox, orchestrator backref.
///
/// Implementors of [`Agent`] embed one of these and hand it out via
/// [`Agent::core`]; the trait's provided methods delegate here.
pub struct AgentCore {
    id: String,
    name: String,
    state: Mutex<AgentState>,
    inbox: Mutex<VecDeque<AgentMessage>>,
    orchestrator: Mutex<Weak<AgentOrchestrator>>,
}

impl AgentCore {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            state: Mutex::new(AgentState::Idle),
            inbox: Mutex::new(VecDeque::new()),
            orchestrator: Mutex::new(Weak::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AgentState {
        *self.state.lock()
    }

    pub fn set_state(&self, state: AgentState) {
        *self.state.lock() = state;
    }

    /// Enqueue a message. Never blocks, never fails.
    pub fn receive_message(&self, message: AgentMessage) {
        self.inbox.lock().push_back(message);
    }

    pub fn has_messages(&self) -> bool {
        !self.inbox.lock().is_empty()
    }

    /// Dequeue FIFO. Calling on an empty inbox is a contract violation and
    /// fails; check [`AgentCore::has_messages`] first.
    pub fn next_message(&self) -> Result<AgentMessage> {
        self.inbox
            .lock()
            .pop_front()
            .ok_or_else(|| Error::NoMessages(self.id.clone()))
    }

    /// Orchestrator this agent is registered with, if it is still alive
    pub fn orchestrator(&self) -> Option<Arc<AgentOrchestrator>> {
        self.orchestrator.lock().upgrade()
    }

    pub(super) fn attach_orchestrator(&self, orchestrator: Weak<AgentOrchestrator>) {
        *self.orchestrator.lock() = orchestrator;
    }
}

/// A cooperating actor driven by the orchestrator.
///
/// Implementors supply the plumbing via [`Agent::core`] plus `think`/`act`;
/// everything else has a provided implementation.
pub trait Agent: Send + Sync {
    fn core(&self) -> &AgentCore;

    fn think(&self);
    fn act(&self);

    /// Extension hook; the base engine never calls it
    fn learn(&self) {}

    /// Handle one inbound message. Default: ignore.
    fn on_message(&self, _message: &AgentMessage) {}

    fn id(&self) -> &str {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn state(&self) -> AgentState {
        self.core().state()
    }

    fn set_state(&self, state: AgentState) {
        self.core().set_state(state);
    }

    fn receive_message(&self, message: AgentMessage) {
        self.core().receive_message(message);
    }

    fn has_messages(&self) -> bool {
        self.core().has_messages()
    }

    fn next_message(&self) -> Result<AgentMessage> {
        self.core().next_message()
    }

    /// One scheduling cycle: think, then act, then return to idle
    fn cycle(&self) {
        self.set_state(AgentState::Thinking);
        self.think();

        self.set_state(AgentState::Acting);
        self.act();

        self.set_state(AgentState::Idle);
    }

    /// Drain the inbox through [`Agent::on_message`]
    fn process_messages(&self) {
        while self.has_messages() {
            match self.next_message() {
                Ok(message) => self.on_message(&message),
                Err(_) => break,
            }
        }
    }
}

type Callback = Box<dyn FnMut() + Send>;

/// Callback-driven agent with free-text knowledge and goal logs.
///
/// `think`/`act` invoke externally supplied closures when set; the default
/// message handler appends `"Received: {content} from {sender}"` to the
/// knowledge log.
pub struct CognitiveAgent {
    core: AgentCore,
    knowledge: Mutex<Vec<String>>,
    goals: Mutex<Vec<String>>,
    think_callback: Mutex<Option<Callback>>,
    act_callback: Mutex<Option<Callback>>,
}

impl CognitiveAgent {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            core: AgentCore::new(id, name),
            knowledge: Mutex::new(Vec::new()),
            goals: Mutex::new(Vec::new()),
            think_callback: Mutex::new(None),
            act_callback: Mutex::new(None),
        }
    }

    pub fn set_think_callback<F: FnMut() + Send + 'static>(&self, callback: F) {
        *self.think_callback.lock() = Some(Box::new(callback));
    }

    pub fn set_act_callback<F: FnMut() + Send + 'static>(&self, callback: F) {
        *self.act_callback.lock() = Some(Box::new(callback));
    }

    pub fn add_knowledge(&self, entry: &str) {
        self.knowledge.lock().push(entry.to_string());
    }

    pub fn add_goal(&self, goal: &str) {
        self.goals.lock().push(goal.to_string());
    }

    pub fn knowledge(&self) -> Vec<String> {
        self.knowledge.lock().clone()
    }

    pub fn goals(&self) -> Vec<String> {
        self.goals.lock().clone()
    }
}

impl Agent for CognitiveAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn think(&self) {
        if let Some(callback) = self.think_callback.lock().as_mut() {
            callback();
        }
    }

    fn act(&self) {
        if let Some(callback) = self.act_callback.lock().as_mut() {
            callback();
        }
    }

    fn on_message(&self, message: &AgentMessage) {
        self.add_knowledge(&format!(
            "Received: {} from {}",
            message.content, message.from
        ));
    }
}
