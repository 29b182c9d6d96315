//! The text-generation collaborator ("muse"). One request/response call,
//! no retries, no streaming; every failure path substitutes a hardcoded
//! line, so the feature never visibly breaks.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::mirror::Mirror;

pub const FALLBACK_REACTION: &str = "That sounds absolutely lovely! ✨";

#[async_trait]
pub trait Muse: Send + Sync {
    /// A single instruction-in, freeform-text-out call.
    async fn generate(&self, instruction: &str) -> EngineResult<String>;
}

/// Hosted generative-text API over REST.
pub struct GeminiMuse {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiMuse {
    pub fn new(api_key: String) -> GeminiMuse {
        GeminiMuse {
            client: reqwest::Client::new(),
            api_key,
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

#[async_trait]
impl Muse for GeminiMuse {
    async fn generate(&self, instruction: &str) -> EngineResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": instruction }] }]
        });
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(EngineError::RemoteRejected(format!(
                "muse: {}",
                resp.status()
            )));
        }
        let value: serde_json::Value = resp.json().await?;
        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| EngineError::RemoteRejected("muse: empty response".into()))
    }
}

/// Reaction to a prompt answer. Successful reactions are cached in the
/// mirror; any failure yields the fallback line instead of an error.
pub async fn reaction_to(muse: &dyn Muse, mirror: &Mirror, prompt: &str, answer: &str) -> String {
    let instruction = format!(
        "I was asked: \"{prompt}\". My answer is: \"{answer}\". \
         Give me a very short, sweet, and romantic 1-sentence reaction as a Valentine's AI."
    );
    match muse.generate(&instruction).await {
        Ok(text) if !text.is_empty() => {
            mirror.save_reaction(&text);
            text
        }
        Ok(_) => FALLBACK_REACTION.to_string(),
        Err(e) => {
            debug!(error = %e, "muse reaction failed, using fallback");
            FALLBACK_REACTION.to_string()
        }
    }
}

/// A handful of short confessions for seeding an empty offline wall.
/// Returns an empty list rather than an error when the muse misbehaves.
pub async fn seed_confessions(muse: &dyn Muse) -> Vec<String> {
    let instruction = "Generate 3 unique, short, anonymous romantic confessions \
                       or cute date ideas. Return them as a JSON array of strings.";
    let text = match muse.generate(instruction).await {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "muse seeding failed");
            return Vec::new();
        }
    };

    if let Ok(items) = serde_json::from_str::<Vec<String>>(&text) {
        return items;
    }
    // Not valid JSON; salvage non-empty lines.
    text.lines()
        .map(|l| l.trim().trim_matches(['-', '*', '"']).trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
