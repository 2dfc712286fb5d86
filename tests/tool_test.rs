//! Tests for the knowledgebase tool against a mocked query endpoint.

use mockito::{Matcher, Server};
use ragula::{KnowledgebaseTool, RagulaClient, ToolError, ToolParams};
use serde_json::json;

fn tool_for(server: &Server) -> KnowledgebaseTool {
    KnowledgebaseTool::new(
        RagulaClient::new(&server.url(), Some("api-key".to_string())),
        "c1",
    )
}

#[tokio::test]
async fn test_execute_joins_snippets() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/collections/c1/query")
        .match_header("authorization", "Bearer api-key")
        .match_body(Matcher::Json(json!({"query": "foo"})))
        .with_status(200)
        .with_body(
            json!({
                "results": [
                    {"fileId": "f1", "score": 0.9, "contentSnippet": "A"},
                    {"fileId": "f2", "score": 0.5},
                    {"fileId": "f3", "score": 0.4, "contentSnippet": "B"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let output = tool_for(&server)
        .execute_json(json!({"query": "foo"}))
        .await
        .unwrap();

    assert_eq!(output.context, "A\n\nB");
    assert_eq!(serde_json::to_value(&output).unwrap(), json!({"context": "A\n\nB"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_execute_with_no_results() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/collections/c1/query")
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let output = tool_for(&server)
        .execute(&ToolParams {
            query: "nothing".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(output.context, "");
}

#[tokio::test]
async fn test_no_content_yields_empty_context() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/collections/c1/query")
        .with_status(204)
        .create_async()
        .await;

    let output = tool_for(&server)
        .execute_json(json!({"query": "foo"}))
        .await
        .unwrap();

    assert_eq!(output.context, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_whitespace_query_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/collections/c1/query")
        .match_body(Matcher::Json(json!({"query": "   "})))
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let output = tool_for(&server)
        .execute(&ToolParams {
            query: "   ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(output.context, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_query_never_calls_out() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/collections/c1/query")
        .expect(0)
        .create_async()
        .await;

    let tool = tool_for(&server);
    assert_eq!(
        tool.execute_json(json!({"query": ""})).await.unwrap_err(),
        ToolError::MissingQuery
    );
    assert_eq!(
        tool.execute_json(json!({"query": 42})).await.unwrap_err(),
        ToolError::MissingQuery
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_is_wrapped() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/collections/c1/query")
        .with_status(401)
        .with_body(r#"{"message": "Invalid API key"}"#)
        .create_async()
        .await;

    let err = tool_for(&server)
        .execute_json(json!({"query": "foo"}))
        .await
        .unwrap_err();

    assert_eq!(err, ToolError::Failed("[401] Invalid API key".to_string()));
    assert_eq!(err.to_string(), "Error fetching context: [401] Invalid API key");
}

#[tokio::test]
async fn test_malformed_success_body_is_wrapped() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/collections/c1/query")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = tool_for(&server)
        .execute_json(json!({"query": "foo"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Failed(ref message) if message.contains("maintenance")));
}

#[test]
fn test_from_api_key_targets_hosted_instance() {
    let tool = KnowledgebaseTool::from_api_key("key", "c9");
    assert_eq!(tool.collection_id(), "c9");
    assert_eq!(KnowledgebaseTool::definition().name, "knowledgebase");
}
