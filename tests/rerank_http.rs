//! HTTP scoring backend against a local endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use vecflow::notify::{NotifyLevel, RecordingNotifier};
use vecflow::rerank::{
    HttpScoringBackend, RerankConfig, RerankError, RerankFusion, RerankOutcome, RerankRequest,
    ScoredItem, ScoringBackend,
};

use common::harness::{ScorerBehavior, spawn_scorer};

fn candidates() -> Vec<ScoredItem> {
    vec![
        ScoredItem::new("rust ownership rules", 0.62),
        ScoredItem::new("python decorators", 0.80),
        ScoredItem::new("borrow checker errors", 0.55),
        ScoredItem::new("cooking pasta", 0.40),
    ]
}

fn fusion_for(url: String) -> (RerankFusion, Arc<RecordingNotifier>) {
    let config = RerankConfig::endpoint(url, "test-key", "rerank-test").with_alpha(0.7);
    let sink = Arc::new(RecordingNotifier::new());
    let fusion = RerankFusion::new(config)
        .expect("client should build")
        .with_notifier(sink.clone());
    (fusion, sink)
}

fn texts(items: &[ScoredItem]) -> Vec<&str> {
    items.iter().map(|i| i.text.as_str()).collect()
}

#[tokio::test]
async fn test_sends_bearer_json_request() {
    let scorer = spawn_scorer(ScorerBehavior::Scores(vec![0.9, 0.1, 0.8, 0.0]))
        .await
        .expect("scorer should start");
    let config = RerankConfig::endpoint(scorer.url(), "test-key", "rerank-test")
        .with_top_n(2)
        .with_deduplication("collapse duplicates");
    let fusion = RerankFusion::new(config).unwrap();

    fusion.rerank("borrowing in rust", candidates()).await;

    let requests = scorer.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
    assert!(
        request
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    );
    assert_eq!(request.body.query, "borrowing in rust");
    assert_eq!(request.body.documents.len(), 4);
    assert_eq!(request.body.model, "rerank-test");
    assert_eq!(request.body.top_n, 2);
    assert_eq!(
        request.body.instruct.as_deref(),
        Some("collapse duplicates")
    );
}

#[tokio::test]
async fn test_reordered_indexed_results_fuse_by_index() {
    let scorer = spawn_scorer(ScorerBehavior::Scores(vec![0.9, 0.1, 0.8, 0.0]))
        .await
        .unwrap();
    let (fusion, sink) = fusion_for(scorer.url());

    let (ranked, outcome) = fusion.rerank_detailed("borrowing in rust", candidates()).await;

    // 0.9*0.7+0.62*0.3=0.816, 0.8*0.7+0.55*0.3=0.725, 0.1*0.7+0.8*0.3=0.31, 0.0+0.12
    assert_eq!(
        texts(&ranked),
        vec![
            "rust ownership rules",
            "borrow checker errors",
            "python decorators",
            "cooking pasta"
        ]
    );
    assert!((ranked[0].hybrid_score.unwrap() - 0.816).abs() < 1e-9);
    assert_eq!(ranked[3].rerank_score, Some(0.0));
    assert!(outcome.is_fused());
    assert_eq!(sink.count(NotifyLevel::Success), 1);
    assert_eq!(sink.count(NotifyLevel::Warning), 0);
}

#[tokio::test]
async fn test_http_500_falls_back_to_original_order() {
    let scorer = spawn_scorer(ScorerBehavior::Status(500)).await.unwrap();
    let (fusion, sink) = fusion_for(scorer.url());

    let (ranked, outcome) = fusion.rerank_detailed("q", candidates()).await;

    assert_eq!(
        texts(&ranked),
        vec![
            "python decorators",
            "rust ownership rules",
            "borrow checker errors",
            "cooking pasta"
        ]
    );
    assert!(ranked.iter().all(|i| i.rerank_score.is_none() && i.hybrid_score.is_none()));
    match outcome {
        RerankOutcome::Fallback {
            error: RerankError::Status { status, body },
        } => {
            assert_eq!(status, 500);
            assert_eq!(body, "scorer unavailable");
        }
        other => panic!("expected status fallback, got {other:?}"),
    }
    assert_eq!(sink.count(NotifyLevel::Warning), 1);
    assert_eq!(sink.notifications().len(), 1);
}

#[tokio::test]
async fn test_malformed_bodies_fall_back() {
    for behavior in [
        ScorerBehavior::Body(json!({ "data": [] })),
        ScorerBehavior::Body(json!({ "results": { "index": 0 } })),
        ScorerBehavior::Garbage,
    ] {
        let scorer = spawn_scorer(behavior.clone()).await.unwrap();
        let (fusion, sink) = fusion_for(scorer.url());

        let (ranked, outcome) = fusion.rerank_detailed("q", candidates()).await;

        assert!(
            matches!(
                outcome,
                RerankOutcome::Fallback {
                    error: RerankError::Protocol { .. }
                }
            ),
            "{behavior:?} gave {outcome:?}"
        );
        assert_eq!(ranked[0].text, "python decorators");
        assert!(ranked.iter().all(|i| !i.is_fused()));
        assert_eq!(sink.count(NotifyLevel::Warning), 1);
    }
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let scorer = spawn_scorer(ScorerBehavior::Delay(Duration::from_secs(5)))
        .await
        .unwrap();
    let config = RerankConfig::endpoint(scorer.url(), "k", "m")
        .with_timeout(Duration::from_millis(100));
    let backend = HttpScoringBackend::new(&config).unwrap();

    let request = RerankRequest {
        query: "q".to_string(),
        documents: vec!["a".to_string()],
        model: "m".to_string(),
        top_n: 1,
        instruct: None,
    };
    let err = backend.score(&request).await.unwrap_err();

    assert!(matches!(err, RerankError::Transport(_)));
    assert!(err.is_fallback_trigger());
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (fusion, sink) = fusion_for(format!("http://{addr}/v1/rerank"));

    let (ranked, outcome) = fusion.rerank_detailed("q", candidates()).await;

    assert!(outcome.is_fallback());
    assert_eq!(ranked.len(), 4);
    assert_eq!(sink.count(NotifyLevel::Warning), 1);
}

#[tokio::test]
async fn test_disabled_config_never_calls_endpoint() {
    let scorer = spawn_scorer(ScorerBehavior::Scores(vec![1.0; 4]))
        .await
        .unwrap();
    let mut config = RerankConfig::endpoint(scorer.url(), "k", "m");
    config.enabled = false;
    let fusion = RerankFusion::new(config).unwrap();

    let ranked = fusion.rerank("q", candidates()).await;

    assert_eq!(ranked, candidates());
    assert!(scorer.requests().is_empty());
}
