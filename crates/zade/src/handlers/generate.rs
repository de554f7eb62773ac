//! Fallback handler for utterances no rule claims

use async_trait::async_trait;
use tracing::info;

use super::{required_text, Handler, HandlerOutcome, HandlerResult};
use crate::{context::EngineContext, intent::Intent, slots::SlotPayload};

/// Forwards the normalized utterance to the generator and returns its output verbatim
pub struct GenerateHandler;

#[async_trait]
impl Handler for GenerateHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let prompt = required_text(Intent::Generate, &payload)?;
        info!("Processing query with generator...");
        let reply = ctx
            .generator
            .generate(&prompt, ctx.settings.max_length)
            .await?;
        Ok(HandlerResult::text(reply))
    }
}
