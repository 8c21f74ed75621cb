//! End-to-end properties of the fusion core.
//!
//! Exercises the cross-component behavior a caller observes through the
//! facade: dedup, similarity ranking, attention spreading, similarity
//! learning, agent cycles and message routing.
//!
//! Run: `cargo test --test reactor_e2e`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fusion_reactor::{
    Agent, AgentMessage, AttentionValue, Embedding, FusionReactor, Strategy,
};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// =============================================================================
// Knowledge + similarity
// =============================================================================

/// Creating the same concept twice yields the same handle, and the embedding
/// argument on the duplicate is ignored.
#[test]
fn e2e_concept_dedup_by_name() {
    let reactor = FusionReactor::new(4, 0.01);
    let first = reactor.add_concept("cat", None);
    let second = reactor.add_concept("cat", Some(Embedding::from(vec![1.0, 0.0, 0.0, 0.0])));

    assert_eq!(first.handle(), second.handle());
    assert!(!second.has_embedding());
    assert_eq!(reactor.get_system_stats().atom_count, 1);
}

/// The §2-style scenario: two nearby animal embeddings, query at one of them.
#[test]
fn e2e_similarity_query_ranks_cat_then_dog() {
    let reactor = FusionReactor::new(4, 0.01);
    reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
    reactor.add_concept("dog", Some(Embedding::from(vec![0.7, 0.3, 0.8, 0.2])));

    let query = Embedding::from(vec![0.8, 0.2, 0.9, 0.1]);
    let hits = reactor.query_similar(&query, 2, 0.0).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, "cat");
    assert!(approx_eq(hits[0].1, 1.0));
    assert_eq!(hits[1].0, "dog");
    assert!(hits[1].1 < 1.0);
    assert!(hits[1].1 > 0.9);
}

/// A query of the wrong dimensionality is a hard error at the facade, unlike
/// the store's permissive zero-similarity scan.
#[test]
fn e2e_query_dimension_mismatch_is_error() {
    let reactor = FusionReactor::new(4, 0.01);
    reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
    assert!(reactor
        .query_similar(&Embedding::from(vec![1.0, 0.0]), 2, 0.0)
        .is_err());
}

// =============================================================================
// Attention spreading
// =============================================================================

/// One call spreads exactly one hop; a second call spreads again.
#[test]
fn e2e_attention_spread_single_hop() {
    let reactor = FusionReactor::new(4, 0.01);
    let a = reactor.add_concept("a", None);
    let b = reactor.add_concept("b", None);
    let link = reactor.add_similarity(a.handle(), b.handle());

    reactor.set_attention(link.handle(), AttentionValue::new(0.8, 0.5, 0.5));
    reactor.set_attention(a.handle(), AttentionValue::new(0.2, 0.5, 0.5));
    reactor.set_attention(b.handle(), AttentionValue::new(0.2, 0.5, 0.5));

    reactor.spread_attention();
    assert!(approx_eq(reactor.get_attention(a.handle()).sti, 0.3));
    assert!(approx_eq(reactor.get_attention(b.handle()).sti, 0.3));
    assert!(approx_eq(reactor.get_attention(link.handle()).sti, 0.8));

    // Not idempotent: the same sources spread again
    reactor.spread_attention();
    assert!(approx_eq(reactor.get_attention(a.handle()).sti, 0.4));
    assert!(approx_eq(reactor.get_attention(b.handle()).sti, 0.4));
}

// =============================================================================
// Learning
// =============================================================================

/// Missing names report the -1.0 sentinel; known names report a true loss.
#[test]
fn e2e_learn_similarity_sentinel_and_loss() {
    let reactor = FusionReactor::new(4, 0.01);

    let sentinel = reactor
        .learn_similarity("missing", "also-missing", 0.9)
        .unwrap();
    assert_eq!(sentinel, -1.0);

    reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
    reactor.add_concept("dog", Some(Embedding::from(vec![0.7, 0.3, 0.8, 0.2])));

    let loss = reactor.learn_similarity("cat", "dog", 0.9).unwrap();
    assert!(loss >= 0.0);
}

/// The sentinel path leaves the network untouched: a transform before and
/// after a failed lookup produces identical output.
#[test]
fn e2e_sentinel_does_not_mutate_network() {
    let reactor = FusionReactor::new(4, 0.01);
    let probe = Embedding::from(vec![0.3, 0.1, 0.4, 0.2]);

    let before = reactor.transform_embedding(&probe).unwrap();
    reactor.learn_similarity("ghost", "phantom", 0.5).unwrap();
    let after = reactor.transform_embedding(&probe).unwrap();

    assert_eq!(before, after);
}

// =============================================================================
// Agents
// =============================================================================

/// Within one cycle, think always precedes act, exactly once each.
#[test]
fn e2e_cycle_think_then_act() {
    let reactor = FusionReactor::new(4, 0.01);
    let agent = reactor.create_agent("a1", "worker");

    let thinks = Arc::new(AtomicUsize::new(0));
    let acts = Arc::new(AtomicUsize::new(0));

    let t = Arc::clone(&thinks);
    agent.set_think_callback(move || {
        t.fetch_add(1, Ordering::SeqCst);
    });
    let t = Arc::clone(&thinks);
    let a = Arc::clone(&acts);
    agent.set_act_callback(move || {
        // think already ran in this cycle
        assert_eq!(t.load(Ordering::SeqCst), a.load(Ordering::SeqCst) + 1);
        a.fetch_add(1, Ordering::SeqCst);
    });

    reactor.run_orchestration_cycle();
    assert_eq!(thinks.load(Ordering::SeqCst), 1);
    assert_eq!(acts.load(Ordering::SeqCst), 1);
}

/// Registered recipients receive content intact; unknown recipients are a
/// silent no-op.
#[test]
fn e2e_message_delivery_and_silent_drop() {
    let reactor = FusionReactor::new(4, 0.01);
    let _alice = reactor.create_agent("a", "alice");
    let bob = reactor.create_agent("b", "bob");

    reactor.send_message(AgentMessage::new("a", "b", "note", "the payload"));
    assert!(bob.has_messages());
    assert_eq!(bob.next_message().unwrap().content, "the payload");

    reactor.send_message(AgentMessage::new("a", "nobody", "note", "lost"));
    assert!(!bob.has_messages());
}

/// Parallel orchestration spins agents until stop, which joins all threads.
#[test]
fn e2e_parallel_orchestration_start_stop() {
    let reactor = FusionReactor::new(4, 0.01);
    let agent = reactor.create_agent("w", "worker");

    let cycles = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&cycles);
    agent.set_think_callback(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    reactor.set_orchestration_strategy(Strategy::Parallel);
    reactor.start_orchestration();
    assert!(reactor.get_system_stats().orchestration_running);

    std::thread::sleep(std::time::Duration::from_millis(250));
    reactor.stop_orchestration();
    assert!(!reactor.get_system_stats().orchestration_running);

    let after_stop = cycles.load(Ordering::SeqCst);
    assert!(after_stop >= 1);

    // No thread survives stop()
    std::thread::sleep(std::time::Duration::from_millis(150));
    assert_eq!(cycles.load(Ordering::SeqCst), after_stop);
}

/// Messages received through routing land in the knowledge log via the
/// default handler.
#[test]
fn e2e_default_handler_logs_received_messages() {
    let reactor = FusionReactor::new(4, 0.01);
    let _sender = reactor.create_agent("s", "sender");
    let receiver = reactor.create_agent("r", "receiver");

    reactor.send_message(AgentMessage::new("s", "r", "chat", "hello"));
    receiver.process_messages();

    assert_eq!(receiver.knowledge(), vec!["Received: hello from s"]);
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn e2e_stats_reflect_all_components() {
    let reactor = FusionReactor::new(4, 0.01);
    let cat = reactor.add_concept("cat", Some(Embedding::from(vec![0.8, 0.2, 0.9, 0.1])));
    let animal = reactor.add_concept("animal", None);
    reactor.add_inheritance(cat.handle(), animal.handle());
    reactor.create_agent("a1", "alice");
    reactor.create_agent("a2", "bob");

    let stats = reactor.get_system_stats();
    assert_eq!(stats.atom_count, 3);
    assert_eq!(stats.embedding_count, 1);
    assert_eq!(stats.agent_count, 2);
    assert!(!stats.orchestration_running);
}
