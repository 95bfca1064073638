//! Embeddings against a mock Ollama server.

mod common;

use ai_lib_ollama::{ContentGenerator, EmbedContentRequest, Error, Operation};
use common::MockOllama;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn single_text_returns_one_vector() {
    let mut mock = MockOllama::new().await;
    let m = mock
        .server
        .mock("POST", "/api/embeddings")
        .match_body(Matcher::PartialJson(json!({
            "model": "nomic-embed-text",
            "prompt": "hello"
        })))
        .with_status(200)
        .with_body(r#"{"embedding":[0.5,-0.25,1.0]}"#)
        .create_async()
        .await;

    let client = mock.client().await;
    let response = client
        .embed_content(&EmbedContentRequest::single("hello").with_model("nomic-embed-text"))
        .await
        .unwrap();
    m.assert_async().await;

    assert_eq!(response.len(), 1);
    assert_eq!(response.first(), Some(&[0.5f32, -0.25, 1.0][..]));
}

#[tokio::test]
async fn batch_returns_vector_per_input() {
    let mut mock = MockOllama::new().await;
    let m = mock
        .server
        .mock("POST", "/api/embeddings")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "prompt": ["a", "b"]
        })))
        .with_status(200)
        .with_body(r#"{"embeddings":[[1.0,0.0],[0.0,1.0]]}"#)
        .create_async()
        .await;

    let client = mock.client().await;
    let response = client
        .embed_content(&EmbedContentRequest::batch(vec!["a".into(), "b".into()]))
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(response.embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn single_shape_for_batch_is_an_embedding_error() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_json("POST", "/api/embeddings", 200, r#"{"embedding":[0.1]}"#)
        .await;

    let client = mock.client().await;
    let err = client
        .embed_content(&EmbedContentRequest::batch(vec!["a".into(), "b".into()]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Embedding { .. }));
    assert!(matches!(err.root(), Error::InvalidResponse(_)));
    assert!(err.to_string().starts_with("Failed to generate embeddings with Ollama"));

    let reports = mock.reporter.reports_for(Operation::Embed);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contents.is_empty());
}

#[tokio::test]
async fn backend_error_is_wrapped() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_json(
            "POST",
            "/api/embeddings",
            400,
            r#"{"error":"model does not support embeddings"}"#,
        )
        .await;

    let client = mock.client().await;
    let err = client
        .embed_content(&EmbedContentRequest::single("x"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
    assert!(err.to_string().contains("does not support embeddings"));
}
