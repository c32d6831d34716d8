//! CLI output rendering.
//!
//! Replies go to stdout as plain text or JSON lines. Diagnostics go to stderr
//! so scripted consumers can read stdout unmodified.

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

use crate::detection::Detection;
use crate::engine::{ConversationTurn, EngineReply};
use crate::error::ErrorKind;
use crate::mission::profile_for;
use crate::synth::{object_summary, threat_panel, ThreatPanel};

/// One JSON line per reply.
#[derive(Debug, Serialize)]
pub struct ReplyRecord<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(flatten)]
    pub reply: &'a EngineReply,
    pub detections: usize,
    pub threat: ThreatPanel,
}

impl<'a> ReplyRecord<'a> {
    pub fn new(reply: &'a EngineReply, detections: &[Detection]) -> Self {
        Self {
            kind: "reply",
            reply,
            detections: detections.len(),
            threat: threat_panel(detections),
        }
    }
}

/// Print a reply in the selected output mode.
pub fn print_reply(
    reply: &EngineReply,
    detections: &[Detection],
    json_mode: bool,
    quiet_mode: bool,
) -> Result<()> {
    if json_mode {
        println!("{}", serde_json::to_string(&ReplyRecord::new(reply, detections))?);
    } else {
        println!("{}", reply.text);
        if !quiet_mode {
            eprintln!("{}", reply_footer(reply));
        }
    }
    io::stdout().flush()?;
    Ok(())
}

/// Print a plain line (acknowledgements, notices) in the selected mode.
pub fn print_notice(kind: &'static str, text: &str, json_mode: bool) -> Result<()> {
    if json_mode {
        let json = serde_json::json!({ "type": kind, "text": text });
        println!("{}", json);
    } else {
        println!("{}", text);
    }
    io::stdout().flush()?;
    Ok(())
}

/// "[fallback | greeting | POLICING | no_credential]"
pub fn reply_footer(reply: &EngineReply) -> String {
    let source = match reply.source {
        crate::engine::ResponseSource::Remote => "remote",
        crate::engine::ResponseSource::Fallback => "fallback",
    };
    match reply.failure {
        Some(kind) => format!("[{} | {} | {} | {}]", source, reply.intent, reply.mode, kind),
        None => format!("[{} | {} | {}]", source, reply.intent, reply.mode),
    }
}

/// Numbered transcript of completed exchanges.
pub fn format_history(turns: &[ConversationTurn]) -> String {
    if turns.is_empty() {
        return "No conversation history.".to_string();
    }

    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            format!(
                "{}. [{}]\n   You: {}\n   Guardian X: {}",
                i + 1,
                turn.timestamp.format("%H:%M:%S"),
                turn.user_text,
                turn.assistant_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Status block shown by `/status`.
pub fn format_status(
    mode: crate::mission::MissionMode,
    remote_enabled: bool,
    last_failure: Option<ErrorKind>,
    detections: &[Detection],
) -> String {
    let profile = profile_for(mode);
    let panel = threat_panel(detections);

    let mut lines = vec![
        format!("Mode: {} ({})", mode, profile.summary),
        format!("Baseline risk: {}", profile.risk),
        format!(
            "Remote model: {}",
            if remote_enabled { "enabled" } else { "disabled" }
        ),
        format!("In view: {}", object_summary(detections)),
        format!(
            "Threat level: {} - {}",
            panel.level.as_str().to_uppercase(),
            panel.detail
        ),
    ];
    if let Some(kind) = last_failure {
        lines.push(format!("Last remote failure: {}", kind));
    }
    lines.join("\n")
}
