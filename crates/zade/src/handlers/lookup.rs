//! Handlers backed by remote lookups

use async_trait::async_trait;

use super::{required_text, Handler, HandlerError, HandlerOutcome, HandlerResult};
use crate::{
    capabilities::{CapabilityError, Headline},
    context::EngineContext,
    intent::Intent,
    slots::SlotPayload,
};

pub struct WeatherHandler;

#[async_trait]
impl Handler for WeatherHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let city = required_text(Intent::Weather, &payload)?;
        let report = ctx.weather.get_weather(&city).await?;
        Ok(HandlerResult::text(report))
    }
}

pub struct NewsHandler;

pub(crate) fn render_headlines(headlines: &[Headline]) -> String {
    headlines
        .iter()
        .map(|headline| match headline.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", headline.title, description)
            }
            _ => headline.title.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Handler for NewsHandler {
    async fn handle(&self, ctx: &EngineContext, _payload: SlotPayload) -> HandlerOutcome {
        let headlines = ctx.news.get_top_headlines(ctx.settings.news_count).await?;
        if headlines.is_empty() {
            return Err(CapabilityError::NoResult("top headlines".to_string()).into());
        }
        Ok(HandlerResult::text(render_headlines(&headlines)))
    }
}

pub struct CurrencyHandler;

#[async_trait]
impl Handler for CurrencyHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let SlotPayload::Currency(request) = payload else {
            return Err(HandlerError::UnexpectedPayload(Intent::Currency));
        };

        let rate = ctx.currency.get_rate(&request.from, &request.to).await?;
        let converted = request.amount * rate;
        Ok(HandlerResult::text(format!(
            "{} {} is equal to {:.2} {}.",
            request.amount, request.from, converted, request.to
        )))
    }
}

pub struct TranslateHandler;

#[async_trait]
impl Handler for TranslateHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let SlotPayload::Translation { text, target_lang } = payload else {
            return Err(HandlerError::UnexpectedPayload(Intent::Translate));
        };
        if text.trim().is_empty() {
            return Err(HandlerError::MissingSlot(Intent::Translate));
        }

        let translated = ctx.translator.translate(&text, &target_lang).await?;
        Ok(HandlerResult::text(translated))
    }
}

pub struct SearchHandler;

#[async_trait]
impl Handler for SearchHandler {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let query = required_text(Intent::Search, &payload)?;
        let snippet = ctx.search.search(&query).await?;
        Ok(HandlerResult::text(snippet))
    }
}
