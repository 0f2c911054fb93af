//! Node translator behavior: grouping, marker recovery, the repair loop,
//! fail-open, concurrency bounds, and cancellation latency.

mod common;

use common::{DroppingProvider, PrefixProvider, StallingProvider};
use lingua_kit_cache::NoopCache;
use lingua_kit_core::pipeline::PipelineExecutor;
use lingua_kit_core::{
    NodeTranslator, PipelineConfig, Scheduler, StepConfig, TextNode, TranslateError,
};
use lingua_kit_provider::{Provider, ProviderRegistry};
use lingua_kit_provider_utils::RetryPolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn setup(
    provider: Arc<dyn Provider>,
    provider_id: &str,
    inner_concurrency: usize,
) -> (NodeTranslator, PipelineConfig) {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(provider);
    let executor = Arc::new(PipelineExecutor::new(
        registry,
        Arc::new(NoopCache),
        RetryPolicy::none(),
        "en",
        "de",
    ));
    let scheduler = Arc::new(Scheduler::new(1, inner_concurrency));
    let pipeline =
        PipelineConfig::new("default").push_step(StepConfig::new("initial", provider_id, ""));
    (NodeTranslator::new(executor, scheduler), pipeline)
}

fn nodes_from(texts: &[&str]) -> Vec<TextNode> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| TextNode::from_raw(index as u32, text, format!("n:{index}")))
        .collect()
}

#[tokio::test]
async fn test_all_nodes_translated() {
    let provider = Arc::new(PrefixProvider::new("prefix"));
    let (translator, pipeline) = setup(provider.clone(), "prefix", 4);
    let mut nodes = nodes_from(&["Hello", "world", "again"]);

    let outcome = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.translated, 3);
    assert!(outcome.failed.is_empty());
    assert_eq!(nodes[0].translated_text, "[T] Hello");
    assert_eq!(nodes[1].translated_text, "[T] world");
    assert_eq!(nodes[2].translated_text, "[T] again");
}

#[tokio::test]
async fn test_dropped_node_recovered_by_repair_loop() {
    // The provider omits node 2's markers on the first call; the repair
    // pass re-sends it with neighbors 1 and 3 as context.
    let provider = Arc::new(DroppingProvider::new("droppy", 2));
    let (translator, pipeline) = setup(provider.clone(), "droppy", 4);
    let mut nodes = nodes_from(&["zero", "one", "two", "three"]);

    let outcome = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.translated, 4);
    assert!(nodes.iter().all(|n| !n.translated_text.is_empty()));
    // One initial pass plus one repair pass.
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_context_never_overwrites_success() {
    // Node 1 translates on the first pass. During the repair pass it rides
    // along as context; its already-recorded translation must survive.
    struct RewritingDropper {
        inner: DroppingProvider,
    }

    #[async_trait::async_trait]
    impl Provider for RewritingDropper {
        fn id(&self) -> &str {
            self.inner.id()
        }

        async fn translate(
            &self,
            request: lingua_kit_provider::TranslationRequest,
            cancel: CancellationToken,
        ) -> Result<lingua_kit_provider::TranslationResponse, lingua_kit_provider::ProviderError>
        {
            let call = self.inner.call_count();
            let mut response = self.inner.translate(request, cancel).await?;
            if call > 0 {
                // The repair pass returns different text for everything.
                response.text = response.text.replace("one", "ONE-REWRITTEN");
            }
            Ok(response)
        }
    }

    let provider = Arc::new(RewritingDropper {
        inner: DroppingProvider::new("droppy", 2),
    });
    let (translator, pipeline) = setup(provider, "droppy", 4);
    let mut nodes = nodes_from(&["zero", "one", "two", "three"]);

    translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    // The first pass's translation of node 1 wins.
    assert_eq!(nodes[1].translated_text, "one");
    assert_eq!(nodes[2].translated_text, "two");
}

#[tokio::test]
async fn test_fail_open_after_retries_exhausted() {
    // Drop node 1 on every call by scripting an always-dropping provider.
    struct AlwaysDrops;

    #[async_trait::async_trait]
    impl Provider for AlwaysDrops {
        fn id(&self) -> &str {
            "stubborn"
        }

        async fn translate(
            &self,
            request: lingua_kit_provider::TranslationRequest,
            _cancel: CancellationToken,
        ) -> Result<lingua_kit_provider::TranslationResponse, lingua_kit_provider::ProviderError>
        {
            let mut kept = Vec::new();
            let mut dropping = false;
            for line in request.text.lines() {
                if line == "@@NODE_START_1@@" {
                    dropping = true;
                    continue;
                }
                if line == "@@NODE_END_1@@" {
                    dropping = false;
                    continue;
                }
                if !dropping {
                    kept.push(line);
                }
            }
            Ok(lingua_kit_provider::TranslationResponse::new(kept.join("\n")))
        }
    }

    let (translator, pipeline) = setup(Arc::new(AlwaysDrops), "stubborn", 4);
    let translator = translator.with_max_retries(2);
    let mut nodes = nodes_from(&["zero", "one", "two"]);

    let outcome = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.failed, vec![1]);
    assert_eq!(outcome.translated, 2);
    // Fail-open: the node keeps empty translated text here; rendering
    // falls back to the original.
    assert_eq!(nodes[1].translated_text, "");
    assert_eq!(
        lingua_kit_core::translator::render_node(&nodes[1]),
        "one"
    );
}

#[tokio::test]
async fn test_whitespace_nodes_skipped() {
    let provider = Arc::new(PrefixProvider::new("prefix"));
    let (translator, pipeline) = setup(provider.clone(), "prefix", 4);
    let mut nodes = nodes_from(&["Hello", "   ", "world"]);

    let outcome = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.translated, 2);
    assert_eq!(nodes[1].translated_text, "");
    // The whitespace node was never part of any payload.
    let calls = provider.calls.lock().unwrap();
    assert!(calls.iter().all(|c| !c.text.contains("NODE_START_1@@")));
}

#[tokio::test]
async fn test_attribute_nodes_translate_like_text_nodes() {
    let provider = Arc::new(PrefixProvider::new("prefix"));
    let (translator, pipeline) = setup(provider, "prefix", 4);
    let mut nodes = vec![
        TextNode::attribute(0, "a cat", "alt", "img:0"),
        TextNode::from_raw(1, "Hello", "p:0"),
    ];

    translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(nodes[0].translated_text, "[T] a cat");
    assert_eq!(nodes[0].attribute_name.as_deref(), Some("alt"));
    assert_eq!(nodes[1].translated_text, "[T] Hello");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_provider_calls_bounded() {
    let provider = Arc::new(
        PrefixProvider::new("prefix").with_delay(Duration::from_millis(25)),
    );
    let (translator, pipeline) = setup(provider.clone(), "prefix", 2);
    // Small chunk budget: every node becomes its own group.
    let translator = translator.with_chunk_size(10);

    let texts: Vec<String> = (0..8).map(|i| format!("sentence number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let mut nodes = nodes_from(&refs);

    let outcome = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.translated, 8);
    assert!(provider.peak.load(std::sync::atomic::Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_cancellation_surfaces_quickly() {
    let (translator, pipeline) = setup(Arc::new(StallingProvider::new("stall")), "stall", 2);
    let mut nodes = nodes_from(&["Hello", "world"]);

    let cancel = CancellationToken::new();
    let cancel_trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_trigger.cancel();
    });

    let started = Instant::now();
    let err = translator
        .translate_nodes("doc", &mut nodes, &pipeline, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, TranslateError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
    // Fail-open at the caller: nothing was written.
    assert!(nodes.iter().all(|n| n.translated_text.is_empty()));
}
