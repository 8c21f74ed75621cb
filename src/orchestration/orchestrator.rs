//! Agent registry, message routing, and the two scheduling strategies

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::agent::{Agent, AgentMessage, AgentState};

/// Idle wait between cycles in both scheduling loops. Also bounds shutdown
/// latency: each loop re-checks the running flag once per iteration.
const CYCLE_IDLE: Duration = Duration::from_millis(100);

/// Scheduling strategy selected before [`AgentOrchestrator::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// One thread calling `run_cycle()` over all agents
    Sequential,
    /// One thread per registered agent, each cycling independently
    Parallel,
}

/// Registers agents, routes messages between them, and drives their cycles.
///
/// `run_cycle` holds the registry lock for the entire pass, so an agent
/// callback that re-enters the orchestrator's registry operations
/// (register/unregister/broadcast/run_cycle) from inside `cycle()` will
/// deadlock on the non-reentrant lock. `send_message` resolves the recipient
/// before delivery and is safe to call from a callback only outside
/// `run_cycle`-driven execution; agents running under `start()` threads may
/// use it freely.
pub struct AgentOrchestrator {
    agents: Mutex<Vec<Arc<dyn Agent>>>,
    running: Arc<AtomicBool>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    strategy: Mutex<Strategy>,
    // Handed to registered agents as their backref and to the sequential
    // scheduling thread, which must not keep the orchestrator alive
    weak_self: Weak<AgentOrchestrator>,
}

impl AgentOrchestrator {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            agents: Mutex::new(Vec::new()),
            running: Arc::new(AtomicBool::new(false)),
            threads: Mutex::new(Vec::new()),
            strategy: Mutex::new(Strategy::Parallel),
            weak_self: weak.clone(),
        })
    }

    /// Register an agent and point its backref at this orchestrator
    pub fn register_agent(&self, agent: Arc<dyn Agent>) {
        agent.core().attach_orchestrator(self.weak_self.clone());
        self.agents.lock().push(agent);
    }

    pub fn unregister_agent(&self, agent_id: &str) {
        self.agents.lock().retain(|agent| agent.id() != agent_id);
    }

    pub fn get_agent(&self, agent_id: &str) -> Option<Arc<dyn Agent>> {
        self.agents
            .lock()
            .iter()
            .find(|agent| agent.id() == agent_id)
            .cloned()
    }

    /// Deliver to `message.to`. An unknown recipient drops the message
    /// silently; missing recipients are an expected runtime condition, not an
    /// error.
    pub fn send_message(&self, message: AgentMessage) {
        match self.get_agent(&message.to) {
            Some(recipient) => recipient.receive_message(message),
            None => trace!(to = %message.to, "dropping message for unknown agent"),
        }
    }

    /// Deliver to every registered agent except the sender
    pub fn broadcast(&self, message: AgentMessage) {
        for agent in self.agents.lock().iter() {
            if agent.id() != message.from {
                agent.receive_message(message.clone());
            }
        }
    }

    /// One synchronous pass: cycle every agent that is not suspended or
    /// terminated. Holds the registry lock for the whole pass.
    pub fn run_cycle(&self) {
        for agent in self.agents.lock().iter() {
            if !matches!(
                agent.state(),
                AgentState::Suspended | AgentState::Terminated
            ) {
                agent.cycle();
            }
        }
    }

    pub fn set_strategy(&self, strategy: Strategy) {
        *self.strategy.lock() = strategy;
    }

    pub fn strategy(&self) -> Strategy {
        *self.strategy.lock()
    }

    /// Spawn the scheduling threads for the current strategy. No-op while
    /// already running. Parallel spawns one thread per *currently registered*
    /// agent; agents registered afterwards are not picked up until a restart.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let strategy = self.strategy();
        debug!(?strategy, "starting orchestration");

        let mut threads = self.threads.lock();
        match strategy {
            Strategy::Parallel => {
                for agent in self.agents.lock().iter() {
                    let agent = Arc::clone(agent);
                    let running = Arc::clone(&self.running);
                    threads.push(std::thread::spawn(move || {
                        while running.load(Ordering::SeqCst) {
                            if !matches!(
                                agent.state(),
                                AgentState::Suspended | AgentState::Terminated
                            ) {
                                agent.cycle();
                            }
                            std::thread::sleep(CYCLE_IDLE);
                        }
                    }));
                }
            }
            Strategy::Sequential => {
                let weak = self.weak_self.clone();
                let running = Arc::clone(&self.running);
                threads.push(std::thread::spawn(move || {
                    while running.load(Ordering::SeqCst) {
                        // The thread holds only a weak ref; it winds down if
                        // the orchestrator is dropped without stop()
                        let Some(orchestrator) = weak.upgrade() else {
                            break;
                        };
                        orchestrator.run_cycle();
                        drop(orchestrator);
                        std::thread::sleep(CYCLE_IDLE);
                    }
                }));
            }
        }
    }

    /// Clear the running flag and join every scheduling thread. Worst-case
    /// latency is one idle wait per thread.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);

        let threads: Vec<JoinHandle<()>> = self.threads.lock().drain(..).collect();
        if !threads.is_empty() {
            debug!(count = threads.len(), "stopping orchestration threads");
        }
        for handle in threads {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.lock().len()
    }
}

impl Drop for AgentOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::agent::CognitiveAgent;
    use std::sync::atomic::AtomicUsize;

    fn counting_agent(id: &str) -> (Arc<CognitiveAgent>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let agent = Arc::new(CognitiveAgent::new(id, id));
        let thinks = Arc::new(AtomicUsize::new(0));
        let acts = Arc::new(AtomicUsize::new(0));

        let t = Arc::clone(&thinks);
        agent.set_think_callback(move || {
            t.fetch_add(1, Ordering::SeqCst);
        });
        let a = Arc::clone(&acts);
        agent.set_act_callback(move || {
            a.fetch_add(1, Ordering::SeqCst);
        });

        (agent, thinks, acts)
    }

    #[test]
    fn test_register_unregister_and_lookup() {
        let orchestrator = AgentOrchestrator::new();
        let agent = Arc::new(CognitiveAgent::new("a1", "alice"));
        orchestrator.register_agent(agent.clone());

        assert_eq!(orchestrator.agent_count(), 1);
        assert!(orchestrator.get_agent("a1").is_some());
        assert!(agent.core().orchestrator().is_some());

        orchestrator.unregister_agent("a1");
        assert_eq!(orchestrator.agent_count(), 0);
        assert!(orchestrator.get_agent("a1").is_none());
    }

    #[test]
    fn test_run_cycle_skips_suspended_and_terminated() {
        let orchestrator = AgentOrchestrator::new();
        let (active, active_thinks, _) = counting_agent("active");
        let (suspended, suspended_thinks, _) = counting_agent("suspended");
        let (terminated, terminated_thinks, _) = counting_agent("terminated");

        orchestrator.register_agent(active.clone());
        orchestrator.register_agent(suspended.clone());
        orchestrator.register_agent(terminated.clone());

        suspended.set_state(AgentState::Suspended);
        terminated.set_state(AgentState::Terminated);

        orchestrator.run_cycle();

        assert_eq!(active_thinks.load(Ordering::SeqCst), 1);
        assert_eq!(suspended_thinks.load(Ordering::SeqCst), 0);
        assert_eq!(terminated_thinks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_message_routing_and_silent_drop() {
        let orchestrator = AgentOrchestrator::new();
        let bob = Arc::new(CognitiveAgent::new("b", "bob"));
        orchestrator.register_agent(bob.clone());

        orchestrator.send_message(AgentMessage::new("a", "b", "greeting", "hi"));
        assert!(bob.has_messages());
        assert_eq!(bob.next_message().unwrap().content, "hi");

        // Unknown recipient: silently dropped, nothing changes
        orchestrator.send_message(AgentMessage::new("a", "nobody", "greeting", "hi"));
        assert!(!bob.has_messages());
    }

    #[test]
    fn test_broadcast_excludes_sender() {
        let orchestrator = AgentOrchestrator::new();
        let alice = Arc::new(CognitiveAgent::new("a", "alice"));
        let bob = Arc::new(CognitiveAgent::new("b", "bob"));
        let carol = Arc::new(CognitiveAgent::new("c", "carol"));
        orchestrator.register_agent(alice.clone());
        orchestrator.register_agent(bob.clone());
        orchestrator.register_agent(carol.clone());

        orchestrator.broadcast(AgentMessage::new("a", "", "notice", "ping"));

        assert!(!alice.has_messages());
        assert!(bob.has_messages());
        assert!(carol.has_messages());
    }

    #[test]
    fn test_parallel_start_and_stop_join() {
        let orchestrator = AgentOrchestrator::new();
        let (agent, thinks, acts) = counting_agent("worker");
        orchestrator.register_agent(agent);

        orchestrator.set_strategy(Strategy::Parallel);
        orchestrator.start();
        assert!(orchestrator.is_running());

        // Redundant start is a no-op
        orchestrator.start();

        std::thread::sleep(Duration::from_millis(250));
        orchestrator.stop();
        assert!(!orchestrator.is_running());

        let thought = thinks.load(Ordering::SeqCst);
        let acted = acts.load(Ordering::SeqCst);
        assert!(thought >= 1);
        assert_eq!(thought, acted);

        // Joined: counters stay put after stop
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(thinks.load(Ordering::SeqCst), thought);
    }

    #[test]
    fn test_sequential_strategy_cycles_all_agents() {
        let orchestrator = AgentOrchestrator::new();
        let (first, first_thinks, _) = counting_agent("first");
        let (second, second_thinks, _) = counting_agent("second");
        orchestrator.register_agent(first);
        orchestrator.register_agent(second);

        orchestrator.set_strategy(Strategy::Sequential);
        orchestrator.start();
        std::thread::sleep(Duration::from_millis(250));
        orchestrator.stop();

        assert!(first_thinks.load(Ordering::SeqCst) >= 1);
        assert!(second_thinks.load(Ordering::SeqCst) >= 1);
    }
}
