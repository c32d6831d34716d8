//! End-to-end tests for the response engine.
//!
//! These drive `ResponseEngine` through both paths:
//! - remote replies from a fake backend and from a mock HTTP server
//! - deterministic fallback when the key is missing or the backend fails
//! - mode switching, history and credential handling

#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Notify;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::error::GuardianError;
use crate::synth::{synthesize, SynthesisContext};

/// What the fake backend does on every call
#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Transport,
    Malformed,
}

struct FakeAi {
    outcome: Outcome,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeAi {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteAi for FakeAi {
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        if credential.trim().is_empty() {
            return Err(GuardianError::NoCredential);
        }
        match &self.outcome {
            Outcome::Reply(text) => Ok(text.clone()),
            Outcome::Transport => Err(GuardianError::Transport("connection refused".into())),
            Outcome::Malformed => Err(GuardianError::MalformedResponse("no candidates".into())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

/// Backend whose first call parks until the test releases it.
struct GatedAi {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl GatedAi {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }
}

#[async_trait::async_trait]
impl RemoteAi for GatedAi {
    async fn generate(&self, _credential: &str, prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        if call == 0 {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok("held reply".to_string())
    }

    fn backend_name(&self) -> &'static str {
        "gated"
    }
}

fn seeded_config() -> EngineConfig {
    EngineConfig {
        template_seed: Some(7),
        ..EngineConfig::default()
    }
}

fn engine_with(ai: Arc<FakeAi>) -> ResponseEngine {
    ResponseEngine::new(ai, seeded_config())
}

fn knife_scene() -> Vec<Detection> {
    vec![Detection::new("person", 0.91), Detection::new("knife", 0.77)]
}

// ============================================================================
// Fallback path
// ============================================================================

#[tokio::test]
async fn test_no_credential_never_calls_remote() {
    let ai = FakeAi::new(Outcome::Reply("remote".into()));
    let engine = engine_with(ai.clone());

    let reply = engine
        .respond_detailed("what do you see", &knife_scene(), MissionMode::Policing)
        .await;

    assert_eq!(ai.calls(), 0);
    assert_eq!(reply.source, ResponseSource::Fallback);
    assert_eq!(reply.failure, Some(ErrorKind::NoCredential));
    assert!(reply.text.starts_with("I can see 1 person and 1 knife"));
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn test_transport_failure_returns_synthesized_reply() {
    let ai = FakeAi::new(Outcome::Transport);
    let engine = engine_with(ai.clone());
    engine.set_credential("AIzaTEST");

    let detections: Vec<Detection> = Vec::new();
    let text = engine.respond("hello", &detections, MissionMode::Medical).await;

    let expected = synthesize(
        Intent::Greeting,
        &SynthesisContext::new("hello", &detections, profile_for(MissionMode::Medical)),
        &mut StdRng::seed_from_u64(7),
    );

    assert_eq!(ai.calls(), 1);
    assert_eq!(text, expected);
    assert_eq!(engine.last_failure(), Some(ErrorKind::Transport));
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn test_malformed_response_falls_back() {
    let ai = FakeAi::new(Outcome::Malformed);
    let engine = engine_with(ai);
    engine.set_credential("AIzaTEST");

    let reply = engine
        .respond_detailed("who are you", &[], MissionMode::Defense)
        .await;
    assert_eq!(reply.source, ResponseSource::Fallback);
    assert_eq!(reply.intent, Intent::Personality);
    assert_eq!(reply.failure, Some(ErrorKind::MalformedResponse));
    assert!(reply.text.ends_with("Currently operating in DEFENSE mode."));
}

#[tokio::test]
async fn test_knife_scene_in_defense_is_threat() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));

    let reply = engine
        .respond_detailed("are we safe", &knife_scene(), MissionMode::Defense)
        .await;

    assert_eq!(reply.intent, Intent::Threat);
    assert!(reply.text.contains("knife"));
    assert!(reply.text.contains("heightened security protocol"));
    assert!(!reply.text.contains("Risk level: LOW"));
}

#[tokio::test]
async fn test_mixed_case_label_is_object_specific() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));
    let detections = vec![Detection::new("Person", 0.91), Detection::new("Knife", 0.77)];

    let reply = engine
        .respond_detailed("tell me more on the knife", &detections, MissionMode::Defense)
        .await;

    assert_eq!(reply.intent, Intent::ObjectSpecific);
    assert!(reply
        .text
        .starts_with("I can see the knife you're referring to with 77% confidence."));
}

#[tokio::test]
async fn test_hello_without_detections_is_greeting() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));

    let reply = engine.respond_detailed("hello", &[], MissionMode::Policing).await;

    assert_eq!(reply.intent, Intent::Greeting);
    assert!(reply
        .text
        .contains("Awaiting camera activation for full environmental analysis."));
    assert!(!reply.text.contains("I can see"));
}

// ============================================================================
// Remote path
// ============================================================================

#[tokio::test]
async fn test_remote_success_appends_history() {
    let ai = FakeAi::new(Outcome::Reply("Two people, no threats.".into()));
    let engine = engine_with(ai.clone());
    engine.set_credential("AIzaTEST");

    let reply = engine
        .respond_detailed("status", &knife_scene(), MissionMode::Defense)
        .await;

    assert_eq!(reply.source, ResponseSource::Remote);
    assert_eq!(reply.text, "Two people, no threats.");
    assert_eq!(reply.failure, None);
    assert_eq!(engine.last_failure(), None);

    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_text, "status");
    assert_eq!(history[0].assistant_text, "Two people, no threats.");

    let prompt = ai.last_prompt.lock().clone().unwrap();
    assert!(prompt.contains("operating in DEFENSE mode"));
    assert!(prompt.contains("Priority objects in view: 1 person and 1 knife"));
    assert!(prompt.contains("User question: status"));
}

#[tokio::test]
async fn test_success_clears_previous_failure() {
    let engine = engine_with(FakeAi::new(Outcome::Reply("ok".into())));
    engine.respond("hi", &[], MissionMode::Policing).await;
    assert_eq!(engine.last_failure(), Some(ErrorKind::NoCredential));

    engine.set_credential("AIzaTEST");
    engine.respond("hi", &[], MissionMode::Policing).await;
    assert_eq!(engine.last_failure(), None);
}

#[tokio::test]
async fn test_prompt_includes_recent_turns_when_configured() {
    let ai = FakeAi::new(Outcome::Reply("Noted.".into()));
    let engine = ResponseEngine::new(
        ai.clone(),
        EngineConfig {
            prompt_history_turns: 1,
            ..seeded_config()
        },
    );
    engine.set_credential("AIzaTEST");

    engine.respond("first question", &[], MissionMode::Policing).await;
    engine.respond("second question", &[], MissionMode::Policing).await;

    let prompt = ai.last_prompt.lock().clone().unwrap();
    assert!(prompt.contains("User: first question\nGuardian X: Noted."));
}

#[tokio::test]
async fn test_concurrent_responses_both_recorded() {
    let ai = FakeAi::new(Outcome::Reply("ack".into()));
    let engine = Arc::new(engine_with(ai.clone()));
    engine.set_credential("AIzaTEST");

    let detections = knife_scene();
    let (a, b) = futures::join!(
        engine.respond("one", &detections, MissionMode::Defense),
        engine.respond("two", &detections, MissionMode::Medical),
    );

    assert_eq!(a, "ack");
    assert_eq!(b, "ack");
    assert_eq!(ai.calls(), 2);
    assert_eq!(engine.history().len(), 2);
}

#[tokio::test]
async fn test_history_limit_respected() {
    let engine = ResponseEngine::new(
        FakeAi::new(Outcome::Reply("ack".into())),
        EngineConfig {
            history_limit: 2,
            ..seeded_config()
        },
    );
    engine.set_credential("AIzaTEST");
    for q in ["a", "b", "c"] {
        engine.respond(q, &[], MissionMode::Policing).await;
    }

    let users: Vec<String> = engine.history().into_iter().map(|t| t.user_text).collect();
    assert_eq!(users, vec!["b", "c"]);

    engine.clear_history();
    assert!(engine.history().is_empty());
}

// ============================================================================
// Modes, credentials and snapshots
// ============================================================================

#[tokio::test]
async fn test_mode_switch_changes_only_next_reply() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));

    let first = engine.respond_active("how do you work", &[]).await;
    engine.set_mode("medical").unwrap();
    let second = engine.respond_active("how do you work", &[]).await;

    assert!(first.contains("Policing mode combines facial recognition"));
    assert!(second.contains("My medical systems utilize fluorescence imaging"));
    assert_eq!(engine.active_mode(), MissionMode::Medical);
}

#[tokio::test]
async fn test_in_flight_call_keeps_captured_mode_and_key() {
    let ai = GatedAi::new();
    let engine = ResponseEngine::new(ai.clone(), seeded_config());
    engine.set_credential("AIzaTEST");

    let (reply, ()) = futures::join!(engine.respond_active("status report", &[]), async {
        ai.entered.notified().await;
        engine.clear_credential();
        engine.set_mode("medical").unwrap();
        ai.release.notify_one();
    });

    // the suspended call finishes on the remote path under POLICING
    assert_eq!(reply, "held reply");
    assert!(ai
        .last_prompt
        .lock()
        .as_deref()
        .is_some_and(|p| p.contains("operating in POLICING mode")));
    assert_eq!(engine.history().len(), 1);

    let next = engine
        .respond_detailed("how do you work", &[], engine.active_mode())
        .await;
    assert_eq!(next.source, ResponseSource::Fallback);
    assert_eq!(next.mode, MissionMode::Medical);
    assert_eq!(next.failure, Some(ErrorKind::NoCredential));
    assert!(next.text.contains("My medical systems utilize fluorescence imaging"));
    assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_mode_keeps_active() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));
    assert!(matches!(
        engine.set_mode("naval"),
        Err(GuardianError::InvalidMode(_))
    ));
    assert_eq!(engine.active_mode(), MissionMode::Policing);
}

#[tokio::test]
async fn test_credential_set_and_clear() {
    let ai = FakeAi::new(Outcome::Reply("remote".into()));
    let engine = engine_with(ai.clone());

    engine.set_credential("   ");
    assert!(!engine.has_credential());

    engine.set_credential("AIzaTEST");
    assert!(engine.has_credential());
    assert_eq!(engine.respond("hi", &[], MissionMode::Policing).await, "remote");

    engine.clear_credential();
    assert!(!engine.has_credential());
    assert_ne!(engine.respond("hi", &[], MissionMode::Policing).await, "remote");
    assert_eq!(ai.calls(), 1);
}

#[tokio::test]
async fn test_verify_credential() {
    let ai = FakeAi::new(Outcome::Reply("API key working".into()));
    let engine = engine_with(ai.clone());

    assert!(matches!(
        engine.verify_credential("not-a-key").await,
        Err(GuardianError::InvalidCredential(_))
    ));
    assert_eq!(ai.calls(), 0);

    let reply = engine.verify_credential(" AIzaSyGOOD ").await.unwrap();
    assert_eq!(reply, "API key working");
    assert_eq!(
        ai.last_prompt.lock().as_deref(),
        Some(crate::ai::PROBE_PROMPT)
    );
    // verification does not install the key
    assert!(!engine.has_credential());

    let failing = engine_with(FakeAi::new(Outcome::Transport));
    assert!(matches!(
        failing.verify_credential("AIzaSyGOOD").await,
        Err(GuardianError::Transport(_))
    ));
}

#[test]
fn test_snapshot_uses_active_mode_threshold() {
    let engine = engine_with(FakeAi::new(Outcome::Transport));
    let raw = vec![
        RawDetection::new("person", 0.9),
        RawDetection::new("car", 0.25),
    ];

    // POLICING sensitivity is 0.3
    assert_eq!(engine.snapshot(&raw).len(), 1);

    // DEFENSE sensitivity is 0.2
    engine.set_mode("defense").unwrap();
    assert_eq!(engine.snapshot(&raw).len(), 2);
}

#[test]
fn test_snapshot_threshold_override() {
    let engine = ResponseEngine::new(
        FakeAi::new(Outcome::Transport),
        EngineConfig {
            threshold_override: Some(0.95),
            ..seeded_config()
        },
    );
    let raw = vec![RawDetection::new("person", 0.9)];
    assert!(engine.snapshot(&raw).is_empty());
}

#[test]
fn test_config_from_settings() {
    let mut settings = GuardianSettings::default();
    settings.engine.default_mode = "defense".into();
    settings.engine.template_seed = Some(3);
    let config = EngineConfig::from_settings(&settings).unwrap();
    assert_eq!(config.initial_mode, MissionMode::Defense);
    assert_eq!(config.template_seed, Some(3));

    settings.engine.default_mode = "naval".into();
    assert!(EngineConfig::from_settings(&settings).is_err());
}

// ============================================================================
// Full stack against a mock HTTP server
// ============================================================================

#[tokio::test]
async fn test_gemini_backed_engine_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "AIzaE2E"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "*Area secure.*" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = GuardianSettings::default();
    settings.ai.endpoint = format!("{}/v1beta", server.uri());
    settings.engine.template_seed = Some(1);
    let engine = ResponseEngine::from_settings(&settings).unwrap();
    engine.set_credential("AIzaE2E");

    let reply = engine
        .respond_detailed("are we safe", &knife_scene(), MissionMode::Defense)
        .await;
    assert_eq!(reply.source, ResponseSource::Remote);
    assert_eq!(reply.text, "Area secure.");
}

#[tokio::test]
async fn test_gemini_backed_engine_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut settings = GuardianSettings::default();
    settings.ai.endpoint = format!("{}/v1beta", server.uri());
    let engine = ResponseEngine::from_settings(&settings).unwrap();
    engine.set_credential("AIzaE2E");

    let reply = engine
        .respond_detailed("are we safe", &knife_scene(), MissionMode::Defense)
        .await;
    assert_eq!(reply.source, ResponseSource::Fallback);
    assert_eq!(reply.failure, Some(ErrorKind::Transport));
    assert!(reply.text.starts_with("Alert: Potential threat objects detected - knife."));
}
