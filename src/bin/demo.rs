//! Cognitive fusion walkthrough
//!
//! Builds a small animal taxonomy with embeddings, queries it, shifts
//! relevance and attention, trains the similarity learner, and wires three
//! message-passing agents into a perception → reasoning → action pipeline.
//!
//! Run: `cargo run --bin demo`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fusion_reactor::{
    Agent, AgentMessage, AttentionValue, Embedding, FusionReactor, TruthValue,
};

fn separator(title: &str) {
    println!("\n{}", "=".repeat(70));
    if !title.is_empty() {
        println!("  {title}");
        println!("{}", "=".repeat(70));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 4-dimensional embeddings keep the demo readable
    let reactor = Arc::new(FusionReactor::new(4, 0.01));

    knowledge_representation(&reactor);
    relevance_and_attention(&reactor);
    neural_learning(&reactor);
    agent_orchestration(&reactor);
    system_status(&reactor);

    separator("");
    println!("\nDemonstration complete\n");
}

fn knowledge_representation(reactor: &FusionReactor) {
    separator("Knowledge Representation with Embeddings");

    let cat = reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
    let dog = reactor.add_concept("dog", Some(Embedding::from(vec![0.7, 0.3, 0.8, 0.2])));
    let fish = reactor.add_concept("fish", Some(Embedding::from(vec![0.2, 0.8, 0.3, 0.9])));
    let mammal = reactor.add_concept("mammal", None);
    let animal = reactor.add_concept("animal", None);

    println!("Created concepts: cat, dog, fish, mammal, animal");

    let links = [
        reactor.add_inheritance(cat.handle(), mammal.handle()),
        reactor.add_inheritance(dog.handle(), mammal.handle()),
        reactor.add_inheritance(mammal.handle(), animal.handle()),
    ];
    println!("Created inheritance links:");
    for link in &links {
        println!("  - {}", link.to_display(reactor.atomspace()));
    }

    cat.set_truth_value(TruthValue::new(0.95, 0.9));
    dog.set_truth_value(TruthValue::new(0.95, 0.9));
    fish.set_truth_value(TruthValue::new(0.90, 0.85));
    println!("\nTruth values set, e.g. cat {}", cat.truth_value());

    println!("\nConcepts similar to 'cat':");
    let query = Embedding::from(vec![0.8, 0.2, 0.9, 0.1]);
    for (name, similarity) in reactor.query_similar(&query, 3, 0.0).expect("query dims match") {
        println!("  - {name} (similarity: {similarity:.3})");
    }
}

fn relevance_and_attention(reactor: &FusionReactor) {
    separator("Relevance Realization and Attention");

    let cats = reactor.atomspace().get_atoms_by_name("cat");
    let cat = &cats[0];
    println!("Initial relevance for 'cat': {}", reactor.get_relevance(cat.handle()));

    reactor.update_relevance(cat.handle(), 0.3);
    println!("After usage increase: {}", reactor.get_relevance(cat.handle()));

    let attention = reactor.get_attention(cat.handle());
    println!("\nAttention for 'cat': sti={} lti={} vlti={}", attention.sti, attention.lti, attention.vlti);

    // Push one link into the attentional focus and spread a hop
    let links = reactor.atomspace().get_atoms_by_name("InheritanceLink");
    let link = &links[0];
    reactor.set_attention(link.handle(), AttentionValue::new(0.8, 0.5, 0.5));
    reactor.spread_attention();
    println!("\nAttention spread one hop from {}", link.to_display(reactor.atomspace()));
}

fn neural_learning(reactor: &FusionReactor) {
    separator("Neural Learnability");

    println!("Learning: 'cat' and 'dog' should be similar (target: 0.9)");
    let loss = reactor.learn_similarity("cat", "dog", 0.9).expect("stored dims match");
    println!("  Loss: {loss:.4}");

    println!("Learning: 'cat' and 'fish' should be dissimilar (target: 0.2)");
    let loss = reactor.learn_similarity("cat", "fish", 0.2).expect("stored dims match");
    println!("  Loss: {loss:.4}");

    println!("\nQuerying similar concepts after learning:");
    let query = Embedding::from(vec![0.8, 0.2, 0.9, 0.1]);
    for (name, similarity) in reactor.query_similar(&query, 3, 0.0).expect("query dims match") {
        println!("  - {name} (similarity: {similarity:.3})");
    }
}

fn agent_orchestration(reactor: &Arc<FusionReactor>) {
    separator("Agent Orchestration");

    let perceiver = reactor.create_agent("perceiver", "Perception Agent");
    let reasoner = reactor.create_agent("reasoner", "Reasoning Agent");
    let actor = reactor.create_agent("actor", "Action Agent");

    let perceiver_cycles = Arc::new(AtomicUsize::new(0));
    let reasoner_cycles = Arc::new(AtomicUsize::new(0));
    let actor_cycles = Arc::new(AtomicUsize::new(0));

    // Deliveries below go straight to the recipient's inbox: routing through
    // the orchestrator from inside a cycle would re-enter the registry lock.
    {
        let agent = Arc::clone(&perceiver);
        let count = Arc::clone(&perceiver_cycles);
        perceiver.set_think_callback(move || {
            agent.add_knowledge("Observed: new pattern in data");
            count.fetch_add(1, Ordering::SeqCst);
        });

        let recipient = Arc::clone(&reasoner);
        let count = Arc::clone(&perceiver_cycles);
        perceiver.set_act_callback(move || {
            if count.load(Ordering::SeqCst) == 1 {
                recipient.receive_message(AgentMessage::new(
                    "perceiver",
                    "reasoner",
                    "observation",
                    "New pattern detected",
                ));
            }
        });
    }

    {
        let agent = Arc::clone(&reasoner);
        let count = Arc::clone(&reasoner_cycles);
        reasoner.set_think_callback(move || {
            agent.add_knowledge("Processing information");
            count.fetch_add(1, Ordering::SeqCst);
        });

        let agent = Arc::clone(&reasoner);
        let recipient = Arc::clone(&actor);
        reasoner.set_act_callback(move || {
            if agent.has_messages() {
                agent.process_messages();
                recipient.receive_message(AgentMessage::new(
                    "reasoner",
                    "actor",
                    "command",
                    "Execute plan A",
                ));
            }
        });
    }

    {
        let agent = Arc::clone(&actor);
        let count = Arc::clone(&actor_cycles);
        actor.set_think_callback(move || {
            agent.add_knowledge("Ready for action");
            count.fetch_add(1, Ordering::SeqCst);
        });

        let agent = Arc::clone(&actor);
        actor.set_act_callback(move || {
            if agent.has_messages() {
                agent.process_messages();
                agent.add_knowledge("Action completed");
            }
        });
    }

    println!("Agents created: Perceiver, Reasoner, Actor");
    println!("\nRunning 3 orchestration cycles...");
    for cycle in 1..=3 {
        println!("\n--- Cycle {cycle} ---");
        reactor.run_orchestration_cycle();
        println!("  Perceiver: {} cycles", perceiver_cycles.load(Ordering::SeqCst));
        println!("  Reasoner:  {} cycles", reasoner_cycles.load(Ordering::SeqCst));
        println!("  Actor:     {} cycles", actor_cycles.load(Ordering::SeqCst));
    }

    println!("\nActor log:");
    for entry in actor.knowledge() {
        println!("  - {entry}");
    }
}

fn system_status(reactor: &FusionReactor) {
    separator("Integrated Cognitive System");

    let stats = reactor.get_system_stats();
    println!("\nFusion Reactor status:");
    println!("{}", "-".repeat(40));
    println!("  Atoms in knowledge base: {}", stats.atom_count);
    println!("  Neural embeddings:       {}", stats.embedding_count);
    println!("  Active agents:           {}", stats.agent_count);
    println!("  Orchestration running:   {}", if stats.orchestration_running { "yes" } else { "no" });
    println!("  Embedding dimensions:    {}", reactor.embedding_dims());
    println!("  Learning rate:           {}", reactor.learning_rate());
}
