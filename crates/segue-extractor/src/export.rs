//! Serializers for extraction output
//!
//! All functions are pure over their input. Text formats end with a newline
//! unless empty.

use crate::error::ExtractorError;
use segue_domain::{DuplicateEntry, Triple};
use serde::Serialize;

#[derive(Serialize)]
struct TripleRecord<'a> {
    paragraph_a: &'a str,
    transition: &'a str,
    paragraph_b: &'a str,
}

impl<'a> From<&'a Triple> for TripleRecord<'a> {
    fn from(triple: &'a Triple) -> Self {
        Self {
            paragraph_a: &triple.paragraph_a,
            transition: &triple.transition,
            paragraph_b: &triple.paragraph_b,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn new(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRecord {
    messages: Vec<ChatMessage>,
}

/// One transition per line
pub fn transitions_txt<S: AsRef<str>>(transitions: &[S]) -> String {
    lines(transitions.iter().map(|t| t.as_ref().to_string()))
}

/// One `"{text} ({count}x)"` entry per line
pub fn duplicates_txt(duplicates: &[DuplicateEntry]) -> String {
    lines(duplicates.iter().map(ToString::to_string))
}

/// Pretty JSON array of `{paragraph_a, transition, paragraph_b}` objects
pub fn fewshots_json(triples: &[Triple]) -> Result<String, ExtractorError> {
    let records: Vec<TripleRecord<'_>> = triples.iter().map(TripleRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Newline-delimited chat records for fine-tuning
///
/// Each record carries an optional system message, a user message with both
/// contexts and an assistant message holding the transition verbatim. An
/// empty `system` is treated as absent.
pub fn fine_tune_jsonl(triples: &[Triple], system: Option<&str>) -> Result<String, ExtractorError> {
    let system = system.filter(|s| !s.trim().is_empty());
    let mut out = String::new();

    for triple in triples {
        let mut messages = Vec::with_capacity(3);
        if let Some(instruction) = system {
            messages.push(ChatMessage::new("system", instruction));
        }
        messages.push(ChatMessage::new("user", user_message(triple)));
        messages.push(ChatMessage::new("assistant", triple.transition.as_str()));

        out.push_str(&serde_json::to_string(&ChatRecord { messages })?);
        out.push('\n');
    }

    Ok(out)
}

/// User turn of a fine-tuning record
pub fn user_message(triple: &Triple) -> String {
    format!(
        "Paragraph A: {}\nParagraph B: {}",
        triple.paragraph_a, triple.paragraph_b
    )
}

fn lines(items: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&item);
        out.push('\n');
    }
    out
}
