//! End-to-end tool invocations against a mock Deepself API.

use deepself::config::DeepselfConfig;
use deepself::tools::deepself::{CHAT, CREATE_MODEL, FINALIZE_ROOM, LIST_MODELS, START_ROOM, TRAIN_DOCUMENT};
use deepself::types::{OutputShape, ToolOutput};
use deepself::DeepselfPlugin;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

fn plugin_for(server: &Server, api_key: &str) -> DeepselfPlugin {
    DeepselfPlugin::new(&DeepselfConfig {
        api_key: api_key.into(),
        base_url: format!("{}/v1", server.url()),
        ..Default::default()
    })
    .unwrap()
}

async fn invoke(plugin: &DeepselfPlugin, tool: &str, args: Value) -> ToolOutput {
    plugin.invoke(tool, &args, &CancellationToken::new()).await
}

fn structured(out: &ToolOutput) -> &serde_json::Map<String, Value> {
    match out {
        ToolOutput::Structured(map) => map,
        other => panic!("expected structured output, got {other:?}"),
    }
}

#[tokio::test]
async fn create_model_wraps_basic_facts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/models")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "name": "Higher Self",
            "username": "h-001",
            "basic_facts": {"age": {"value": "30", "status": "stated"}}
        })))
        .with_status(200)
        .with_body(r#"{"id":"h-001","created":1700000000}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        CREATE_MODEL,
        json!({"name": "Higher Self", "username": "h-001", "basic_facts": {"age": "30"}}),
    )
    .await;

    assert!(!out.is_error(), "output was: {out:?}");
    assert_eq!(out.shape(), OutputShape::Text);
    assert!(out.text().contains("Model ID: h-001"));
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_fact_key_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        CREATE_MODEL,
        json!({"name": "n", "username": "u", "basic_facts": {"favorite_color": "blue"}}),
    )
    .await;

    assert!(out.is_error());
    assert!(out.text().contains("Invalid basic_facts key: favorite_color"));
    mock.assert_async().await;
}

#[tokio::test]
async fn train_document_defaults_perspective() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/models/h-001/training/documents")
        .match_body(Matcher::Json(json!({
            "label": "My Core Values",
            "content": "I value honesty.",
            "perspective": "first-person"
        })))
        .with_status(200)
        .with_body(
            r#"{"document_id":"doc-1","status":"processed","stats":{"epsilons_processed":3,"betas_processed":1}}"#,
        )
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        TRAIN_DOCUMENT,
        json!({"model": "h-001", "content": "I value honesty.", "label": "My Core Values"}),
    )
    .await;

    let map = structured(&out);
    assert_eq!(map["success"], true);
    assert_eq!(map["document_id"], "doc-1");
    assert_eq!(map["message"], "Training data added to h-001. Processed 3 insights.");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_label_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        TRAIN_DOCUMENT,
        json!({"model": "h-001", "content": "text"}),
    )
    .await;

    let map = structured(&out);
    assert_eq!(map["success"], false);
    assert_eq!(map["error"], "Missing required parameter: label");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_api_key_fails_every_tool_without_network() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let get = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "");
    let calls = [
        (CREATE_MODEL, json!({"name": "n", "username": "u"})),
        (LIST_MODELS, json!({})),
        (TRAIN_DOCUMENT, json!({"model": "m", "content": "c", "label": "l"})),
        (START_ROOM, json!({"user_model": "m", "interviewer_model": "socrates", "label": "l"})),
        (FINALIZE_ROOM, json!({"room_id": "r"})),
        (CHAT, json!({"model": "m", "message": "hi"})),
    ];
    for (tool, args) in calls {
        let out = invoke(&plugin, tool, args).await;
        assert!(out.is_error(), "{tool} should fail");
        assert!(
            out.text().contains("API key not configured"),
            "{tool}: {}",
            out.text()
        );
    }

    post.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn http_error_reports_status_and_body() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/v1/models")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;
    let finalize = server
        .mock("POST", "/v1/training/rooms/r-1/finalize")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-bad");

    let text = invoke(&plugin, LIST_MODELS, json!({})).await;
    assert_eq!(text.text(), "Error: Deepself API error (401): unauthorized");

    let envelope = invoke(&plugin, FINALIZE_ROOM, json!({"room_id": "r-1"})).await;
    let map = structured(&envelope);
    assert_eq!(map["success"], false);
    let error = map["error"].as_str().unwrap();
    assert!(error.contains("401"));
    assert!(error.contains("unauthorized"));

    list.assert_async().await;
    finalize.assert_async().await;
}

#[tokio::test]
async fn list_with_no_models() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/models")
        .with_status(200)
        .with_body(r#"{"object":"list","data":[]}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(&plugin, LIST_MODELS, json!({})).await;

    assert!(!out.is_error());
    assert!(out.text().starts_with("Found 0 deepself models."));
    assert!(!out.text().contains("Available Models:"));
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_sends_system_then_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Json(json!({
            "model": "socrates",
            "messages": [
                {"role": "system", "content": "be terse"},
                {"role": "user", "content": "hi"}
            ],
            "stream": false
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello."}}]}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        CHAT,
        json!({"model": "socrates", "message": "hi", "context": "be terse"}),
    )
    .await;

    assert_eq!(out.text(), "Hello.");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_with_room_continues_training() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"room_id": "room-7"})))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"Tell me more."}}]}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        CHAT,
        json!({"model": "socrates", "message": "I value honesty", "room_id": "room-7"}),
    )
    .await;

    assert_eq!(out.text(), "Tell me more.");
    mock.assert_async().await;
}

// Documents current behavior, not a contract: interviewer_model is echoed
// back but never sent to the service.
#[tokio::test]
async fn start_room_echoes_interviewer_only_locally() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/models/h-001/training/rooms")
        .match_body(Matcher::Json(json!({"label": "Values", "user_model": "h-001"})))
        .with_status(200)
        .with_body(r#"{"room_id":"room-7","status":"active"}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(
        &plugin,
        START_ROOM,
        json!({"user_model": "h-001", "interviewer_model": "socrates", "label": "Values"}),
    )
    .await;

    let map = structured(&out);
    assert_eq!(map["success"], true);
    assert_eq!(map["room_id"], "room-7");
    assert_eq!(map["interviewer_model"], "socrates");
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_tool_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(&plugin, "deepself_delete", json!({})).await;

    assert!(out.is_error());
    assert!(out.text().contains("Unknown tool: deepself_delete"));
    mock.assert_async().await;
}

#[tokio::test]
async fn cancelled_call_renders_cancellation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let out = plugin.invoke(LIST_MODELS, &json!({}), &cancel).await;

    assert_eq!(out.text(), "Error: Deepself request cancelled");
    mock.assert_async().await;
}

#[tokio::test]
async fn key_unusable_as_header_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-a\nb");
    let out = invoke(&plugin, LIST_MODELS, json!({})).await;

    assert!(out.is_error());
    assert!(out.text().contains("API key"), "output was: {out:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_reply_that_reads_like_an_error_is_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"Error: I cannot recall that."}}]}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(&plugin, CHAT, json!({"model": "socrates", "message": "hi"})).await;

    assert!(!out.is_error(), "output was: {out:?}");
    assert_eq!(out.text(), "Error: I cannot recall that.");
    mock.assert_async().await;
}

#[tokio::test]
async fn finalize_without_stats_omits_the_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/training/rooms/room-7/finalize")
        .with_status(200)
        .with_body(r#"{"status":"completed"}"#)
        .create_async()
        .await;

    let plugin = plugin_for(&server, "sk-test");
    let out = invoke(&plugin, FINALIZE_ROOM, json!({"room_id": "room-7"})).await;

    let map = structured(&out);
    assert_eq!(map["success"], true);
    assert_eq!(map["status"], "completed");
    assert!(!map.contains_key("stats"));
    mock.assert_async().await;
}
