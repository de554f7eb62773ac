//! Handlers whose main job is a side effect on the desktop

use async_trait::async_trait;

use super::{
    required_text, Effect, Handler, HandlerError, HandlerOutcome, HandlerResult, SideEffect,
};
use crate::{
    capabilities::LaunchAck, context::EngineContext, intent::Intent, slots::SlotPayload,
};

pub const UNSUPPORTED_APPLICATION: &str = "Sorry, I cannot open that application.";

/// Prefix `https://` unless the site already names a scheme
pub fn website_url(site: &str) -> String {
    if site.contains("://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}

pub struct OpenWebsiteHandler;

#[async_trait]
impl Handler for OpenWebsiteHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let site = required_text(Intent::OpenWebsite, &payload)?;
        let url = website_url(&site);
        ctx.launcher.open_url(&url).await?;
        Ok(HandlerResult::with_effect(
            format!("Opening {}", site),
            Effect::Performed(SideEffect::OpenUrl(url)),
        ))
    }
}

pub struct OpenAppHandler;

#[async_trait]
impl Handler for OpenAppHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        // A bare "open" names no application, which is the same answer as an unknown one
        let name = match required_text(Intent::OpenApp, &payload) {
            Ok(name) => name,
            Err(HandlerError::MissingSlot(_)) => {
                return Ok(HandlerResult::text(UNSUPPORTED_APPLICATION))
            }
            Err(err) => return Err(err),
        };
        match ctx.launcher.launch_app(&name).await? {
            LaunchAck::Launched(display) => Ok(HandlerResult::with_effect(
                format!("Opening {}.", display),
                Effect::Performed(SideEffect::LaunchApp(display)),
            )),
            LaunchAck::Unsupported => Ok(HandlerResult::text(UNSUPPORTED_APPLICATION)),
        }
    }
}

/// Announces first; playback starts after the announcement is delivered
pub struct PlayMediaHandler;

#[async_trait]
impl Handler for PlayMediaHandler {
    async fn handle(&self, _ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let topic = required_text(Intent::PlayMedia, &payload)?;
        Ok(HandlerResult::with_effect(
            format!("Playing {} on YouTube.", topic),
            Effect::Deferred(SideEffect::PlayMedia(topic)),
        ))
    }
}
