//! Tests for the handler registry and built-in handlers

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use crate::config::IntentsConfig;
    use crate::context::EngineContext;
    use crate::handlers::{
        summarize, website_url, Effect, Handler, HandlerError, HandlerOutcome, HandlerRegistry,
        HandlerResult, SideEffect, JOKES, UNSUPPORTED_APPLICATION,
    };
    use crate::intent::{Intent, IntentMatch, RuleTable};
    use crate::normalizer::normalize;
    use crate::slots::SlotPayload;
    use crate::test_support::{failing_generator_context, test_context, GENERATED};

    const APOLOGY: &str = "I'm sorry, I couldn't process your request.";

    async fn run(ctx: &EngineContext, raw: &str) -> HandlerResult {
        let utterance = normalize(raw);
        let matched = RuleTable::standard().resolve(&utterance);
        HandlerRegistry::standard()
            .invoke(ctx, &utterance, &matched)
            .await
    }

    struct PanickingHandler;

    #[async_trait]
    impl Handler for PanickingHandler {
        async fn handle(&self, _ctx: &EngineContext, _payload: SlotPayload) -> HandlerOutcome {
            panic!("joke database exploded");
        }
    }

    #[tokio::test]
    async fn test_weather_reply() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "weather in london").await;
        assert!(result.text.starts_with("The weather in london is currently"));
        assert_eq!(result.effect, Effect::None);
    }

    #[tokio::test]
    async fn test_service_error_becomes_apology() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "weather in atlantis").await;
        assert_eq!(result.text, APOLOGY);
        assert!(!result.has_side_effect());
    }

    #[tokio::test]
    async fn test_malformed_currency_becomes_apology() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "currency 100 usd").await;
        assert_eq!(result.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_currency_conversion_reply() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "currency 100 usd eur").await;
        assert_eq!(result.text, "100 USD is equal to 50.00 EUR.");
    }

    #[tokio::test]
    async fn test_unknown_currency_becomes_apology() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "currency 5 usd xyz").await;
        assert_eq!(result.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_generate_returns_output_verbatim() {
        let (ctx, recorders) = test_context();
        let result = run(&ctx, "Tell me about gravity").await;
        assert_eq!(result.text, GENERATED);

        let prompts = recorders.generator.prompts.lock().unwrap();
        assert_eq!(
            prompts.as_slice(),
            &[("tell me about gravity".to_string(), 120)]
        );
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_apology() {
        let (ctx, _) = failing_generator_context();
        let result = run(&ctx, "tell me about gravity").await;
        assert_eq!(result.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let (ctx, _) = test_context();
        let registry = HandlerRegistry::standard().register(Intent::Joke, PanickingHandler);
        let utterance = normalize("tell me a joke");
        let matched = RuleTable::standard().resolve(&utterance);
        assert_eq!(matched.intent, Intent::Joke);

        let result = registry.invoke(&ctx, &utterance, &matched).await;
        assert_eq!(result.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_custom_apology_is_used() {
        let (mut ctx, _) = test_context();
        ctx.settings.apology = "Nope.".to_string();
        let result = run(&ctx, "weather in atlantis").await;
        assert_eq!(result.text, "Nope.");
    }

    #[tokio::test]
    async fn test_open_website_performs_before_reply() {
        let (ctx, recorders) = test_context();
        let result = run(&ctx, "open website cnn.com").await;
        assert_eq!(result.text, "Opening cnn.com");
        assert_eq!(
            result.effect,
            Effect::Performed(SideEffect::OpenUrl("https://cnn.com".to_string()))
        );
        assert_eq!(
            recorders.launcher.urls.lock().unwrap().as_slice(),
            &["https://cnn.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_open_app_acknowledges_launch() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "open calculator").await;
        assert_eq!(result.text, "Opening Calculator.");
        assert!(result.has_side_effect());
    }

    #[tokio::test]
    async fn test_unsupported_app_is_not_an_error() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "open spreadsheet").await;
        assert_eq!(result.text, UNSUPPORTED_APPLICATION);
        assert_eq!(result.effect, Effect::None);
    }

    #[tokio::test]
    async fn test_bare_open_is_unsupported_app() {
        let (ctx, recorders) = test_context();
        let result = run(&ctx, "open").await;
        assert_eq!(result.text, UNSUPPORTED_APPLICATION);
        assert_eq!(result.effect, Effect::None);
        assert!(recorders.launcher.apps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_play_media_is_deferred() {
        let (ctx, recorders) = test_context();
        let result = run(&ctx, "play lofi beats on youtube").await;
        assert_eq!(result.text, "Playing lofi beats on YouTube.");
        assert_eq!(
            result.effect,
            Effect::Deferred(SideEffect::PlayMedia("lofi beats".to_string()))
        );
        // Nothing plays until the loop delivers the reply
        assert!(recorders.media.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_news_renders_headlines() {
        let (ctx, _) = test_context();
        let result = run(&ctx, "what's in the news").await;
        assert_eq!(
            result.text,
            "Markets rally: Stocks closed higher\nStorm warning"
        );
    }

    #[tokio::test]
    async fn test_translate_and_search_replies() {
        let (ctx, _) = test_context();
        assert_eq!(
            run(&ctx, "translate good morning to spanish").await.text,
            "[es] good morning"
        );
        assert_eq!(
            run(&ctx, "search for rust").await.text,
            "Top result for rust"
        );
        assert_eq!(run(&ctx, "search for nothing at all").await.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_empty_slot_becomes_apology() {
        let (ctx, _) = test_context();
        assert_eq!(run(&ctx, "search").await.text, APOLOGY);
        assert_eq!(run(&ctx, "translate").await.text, APOLOGY);
    }

    #[tokio::test]
    async fn test_time_and_joke_replies() {
        let (ctx, _) = test_context();
        let time = run(&ctx, "what time is it").await;
        assert!(time.text.starts_with("The current time is "));
        assert!(time.text.ends_with('.'));

        let joke = run(&ctx, "tell me a joke").await;
        assert!(JOKES.contains(&joke.text.as_str()));
    }

    #[tokio::test]
    async fn test_back_to_back_jokes_vary() {
        let (ctx, _) = test_context();
        let mut seen = HashSet::new();
        for _ in 0..40 {
            let joke = run(&ctx, "tell me a joke").await;
            assert!(JOKES.contains(&joke.text.as_str()));
            seen.insert(joke.text);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_summarize_keeps_three_sentences() {
        let text = "Rust is fast. It is safe! Is it fun? Yes. Very.";
        assert_eq!(summarize(text), "Rust is fast. It is safe! Is it fun?");
        assert_eq!(summarize("no punctuation here"), "no punctuation here");
    }

    #[test]
    fn test_summarize_handler() {
        let (ctx, _) = test_context();
        let result =
            tokio_test::block_on(run(&ctx, "summarize one. two. three. four."));
        assert_eq!(result.text, "one. two. three.");
    }

    #[test]
    fn test_website_url_adds_scheme() {
        assert_eq!(website_url("cnn.com"), "https://cnn.com");
        assert_eq!(website_url("http://example.org"), "http://example.org");
    }

    #[test]
    fn test_registry_from_config_restricts_handlers() {
        let intents = IntentsConfig {
            enabled: Some(vec![Intent::Time, Intent::Joke]),
        };
        let registry = HandlerRegistry::from_config(&intents);

        assert_eq!(
            registry.intents(),
            vec![Intent::Time, Intent::Joke, Intent::Generate]
        );

        let rules = registry.restrict_rules(RuleTable::standard());
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_disabled_intent_falls_through_to_generation() {
        let (ctx, recorders) = test_context();
        let registry = HandlerRegistry::from_config(&IntentsConfig {
            enabled: Some(vec![Intent::Time]),
        });
        let rules = registry.restrict_rules(RuleTable::standard());
        let utterance = normalize("weather in london");
        let matched = rules.resolve(&utterance);
        assert_eq!(
            matched,
            IntentMatch {
                intent: Intent::Generate,
                trigger: None
            }
        );

        let result = tokio_test::block_on(registry.invoke(&ctx, &utterance, &matched));
        assert_eq!(result.text, GENERATED);
        assert_eq!(recorders.generator.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unregistered_intent_reports_internal_error() {
        let err = HandlerError::Unregistered(Intent::Weather);
        assert_eq!(err.kind(), "internal");
        assert_eq!(
            HandlerError::MissingSlot(Intent::Search).kind(),
            "malformed_slot"
        );
    }

    #[test]
    fn test_registry_new_only_has_generator() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.intents(), vec![Intent::Generate]);
        assert!(HandlerRegistry::default().contains(Intent::PlayMedia));
    }
}
