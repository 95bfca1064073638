//! Streaming generation over NDJSON against a mock Ollama server.

mod common;

use ai_lib_ollama::{
    CancelHandle, Content, ContentGenerator, Error, FinishReason, FunctionDeclaration,
    GenerateContentRequest, GenerateContentResponse, Operation, Tool,
};
use common::MockOllama;
use mockito::Matcher;
use serde_json::json;
use tokio_stream::StreamExt;

async fn drain(
    client: &ai_lib_ollama::OllamaClient,
    request: &GenerateContentRequest,
) -> Vec<ai_lib_ollama::Result<GenerateContentResponse>> {
    let stream = client.generate_content_stream(request).await.unwrap();
    stream.collect().await
}

#[tokio::test]
async fn completion_stream_yields_one_response_per_line() {
    let mut mock = MockOllama::new().await;
    let generate = mock
        .server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(concat!(
            "{\"response\":\"Hel\",\"done\":false}\n",
            "{\"response\":\"lo\",\"done\":false}\n",
            "{\"response\":\"\",\"done\":true,\"prompt_eval_count\":3,\"eval_count\":2}\n",
        ))
        .create_async()
        .await;
    let chat = mock.forbid("POST", "/api/chat").await;

    let client = mock.client().await;
    let request = GenerateContentRequest::new(vec![Content::user("Say hello")]);
    let items = drain(&client, &request).await;
    generate.assert_async().await;
    chat.assert_async().await;

    let responses: Vec<_> = items.into_iter().map(Result::unwrap).collect();
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0].text(), "Hel");
    assert_eq!(responses[0].finish_reason(), None);
    assert!(responses[0].usage_metadata.is_none());
    assert_eq!(responses[1].finish_reason(), None);

    let last = &responses[2];
    assert_eq!(last.finish_reason(), Some(FinishReason::Stop));
    assert_eq!(last.usage_metadata.unwrap().total_token_count, 5);

    let text: String = responses.iter().map(|r| r.text()).collect();
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn malformed_line_does_not_stop_the_stream() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_ndjson(
            "/api/generate",
            &[
                r#"{"response":"a","done":false}"#,
                r#"{"response": oops"#,
                r#"{"response":"b","done":true}"#,
            ],
        )
        .await;

    let client = mock.client().await;
    let items = drain(&client, &GenerateContentRequest::new(vec![Content::user("x")])).await;
    let texts: Vec<String> = items.into_iter().map(|r| r.unwrap().text()).collect();
    assert_eq!(texts, vec!["a", "b"]);
    assert!(mock.reporter.is_empty());
}

#[tokio::test]
async fn chat_stream_carries_tool_calls() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_ndjson(
            "/api/chat",
            &[
                r#"{"message":{"role":"assistant","content":"Checking"},"done":false}"#,
                r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"lookup","arguments":{"id":7}}}]},"done":false}"#,
                r#"{"message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","prompt_eval_count":12,"eval_count":4}"#,
            ],
        )
        .await;

    let client = mock.client().await;
    let request = GenerateContentRequest::new(vec![Content::user("Find 7")])
        .with_tools(vec![Tool::new(vec![FunctionDeclaration::new("lookup")])]);
    let responses: Vec<_> = drain(&client, &request)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].text(), "Checking");
    let calls = responses[1].function_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.get("id"), Some(&json!(7)));
    assert_eq!(responses[1].finish_reason(), None);
    assert!(responses[2].candidates[0].content.parts.is_empty());
    assert_eq!(responses[2].finish_reason(), Some(FinishReason::Stop));
    assert_eq!(responses[2].usage_metadata.unwrap().prompt_token_count, 12);
}

#[tokio::test]
async fn bad_tool_arguments_surface_as_streaming_error() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_ndjson(
            "/api/chat",
            &[
                r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"lookup","arguments":"not json"}}]},"done":false}"#,
                r#"{"message":{"role":"assistant","content":"after"},"done":true}"#,
            ],
        )
        .await;

    let client = mock.client().await;
    let request = GenerateContentRequest::new(vec![Content::user("Find 7")])
        .with_tools(vec![Tool::new(vec![FunctionDeclaration::new("lookup")])]);
    let items = drain(&client, &request).await;

    assert_eq!(items.len(), 1);
    let err = items.into_iter().next().unwrap().unwrap_err();
    assert!(matches!(err, Error::Streaming { .. }));
    assert!(matches!(err.root(), Error::ToolArguments { .. }));
    assert_eq!(mock.reporter.reports_for(Operation::GenerateStream).len(), 1);
}

#[tokio::test]
async fn cancel_ends_stream_with_cancellation_error() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_ndjson(
            "/api/generate",
            &[
                r#"{"response":"one","done":false}"#,
                r#"{"response":"two","done":false}"#,
                r#"{"response":"three","done":true}"#,
            ],
        )
        .await;

    let client = mock.client().await;
    let cancel = CancelHandle::new();
    let request =
        GenerateContentRequest::new(vec![Content::user("count")]).with_cancel(cancel.clone());
    let mut stream = client.generate_content_stream(&request).await.unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text(), "one");

    cancel.cancel();
    let err = stream.next().await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn cancelled_before_send_fails_to_open() {
    let mut mock = MockOllama::new().await;
    let generate = mock.forbid("POST", "/api/generate").await;

    let client = mock.client().await;
    let cancel = CancelHandle::new();
    cancel.cancel();
    let request = GenerateContentRequest::new(vec![Content::user("hi")]).with_cancel(cancel);

    let err = match client.generate_content_stream(&request).await {
        Ok(_) => panic!("stream opened despite cancellation"),
        Err(e) => e,
    };
    assert!(matches!(err, Error::Streaming { .. }));
    assert!(err.is_cancelled());
    generate.assert_async().await;
    assert_eq!(mock.reporter.len(), 1);
}

#[tokio::test]
async fn http_error_fails_stream_open() {
    let mut mock = MockOllama::new().await;
    let _m = mock
        .mock_json("POST", "/api/generate", 500, r#"{"error":"out of memory"}"#)
        .await;

    let client = mock.client().await;
    let err = match client
        .generate_content_stream(&GenerateContentRequest::new(vec![Content::user("hi")]))
        .await
    {
        Ok(_) => panic!("expected HTTP 500 to fail"),
        Err(e) => e,
    };
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("out of memory"));
}
