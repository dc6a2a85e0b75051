use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockito::Matcher;
use serde_json::json;
use tower::ServiceExt;
use revue::{OpenAiClient, Provider, ProviderConfig, ProviderReply};

const COMPLETION: &str = r#"{
  "id": "chatcmpl-1",
  "choices": [
    {"index": 0, "message": {"role": "assistant", "content": "Looks good."}, "finish_reason": "stop"}
  ]
}"#;

fn config_for(api_base: String) -> ProviderConfig
{   ProviderConfig
    {   api_key: Some("sk-test".to_string())
      , api_base
      , timeout_secs: 5
      , ..ProviderConfig::default()
    }
}

#[tokio::test]
async fn extracts_first_choice_content()
{   let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
      .match_header("authorization", "Bearer sk-test")
      .match_body(Matcher::AllOf(vec![
        Matcher::PartialJson(json!({
          "model": "gpt-3.5-turbo"
        , "max_tokens": 512
        }))
      , Matcher::Regex(
          r#""role":"system","content":"You are an expert code reviewer.""#
            .to_string()
        )
      , Matcher::Regex(r#""role":"user","content":"hello""#.to_string())
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(COMPLETION)
      .create_async()
      .await;

    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(server.url())));
    let reply = client.generate_default("hello").await;

    assert_eq!(reply, ProviderReply::Generated("Looks good.".to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_becomes_failed_text()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/chat/completions")
      .with_status(500)
      .with_body("upstream exploded")
      .create_async()
      .await;

    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(server.url())));
    let reply = client.generate("hello", 0.2, 512).await;

    assert!(reply.is_failed());
    let text = reply.into_text();
    assert!(text.starts_with("AI model error: "), "{}", text);
    assert_eq!(text, "AI model error: API error: 500 Internal Server Error");
    assert!(!text.contains("upstream exploded"), "{}", text);
}

#[tokio::test]
async fn silent_provider_times_out_into_failed_text()
{   // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let mut held = vec![];
      while let Ok((socket, _)) = listener.accept().await
      {   held.push(socket);
      }
    });

    let config = ProviderConfig
    {   timeout_secs: 1
      , ..config_for(format!("http://{}", addr))
    };
    let client = tokio_test::assert_ok!(OpenAiClient::new(&config));

    let started = std::time::Instant::now();
    let reply = client.generate_default("hello").await;

    assert_eq!(
      reply
    , ProviderReply::Failed("AI model error: Request timed out".to_string())
    );
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}

#[tokio::test]
async fn empty_choices_becomes_failed_text()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/chat/completions")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"choices": []}"#)
      .create_async()
      .await;

    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(server.url())));
    let reply = client.generate_default("hello").await;

    assert_eq!(
      reply
    , ProviderReply::Failed(
        "AI model error: API response contained no choices".to_string()
      )
    );
}

#[tokio::test]
async fn missing_content_field_becomes_failed_text()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/chat/completions")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"choices": [{"message": {"role": "assistant"}}]}"#)
      .create_async()
      .await;

    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(server.url())));
    let text = client.generate_default("hello").await.into_text();

    assert!(text.starts_with("AI model error: Parse error:"), "{}", text);
}

#[tokio::test]
async fn unreachable_provider_becomes_failed_text()
{   // Nothing listens on port 1
    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(
      "http://127.0.0.1:1".to_string()
    )));
    let reply = client.generate_default("hello").await;

    assert!(reply.is_failed());
    assert!(reply.into_text().starts_with("AI model error: HTTP error:"));
}

#[tokio::test]
async fn review_endpoint_end_to_end_with_default_language()
{   let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
      .match_body(Matcher::Regex("following plaintext code".to_string()))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(COMPLETION)
      .create_async()
      .await;

    let client = tokio_test::assert_ok!(OpenAiClient::new(&config_for(server.url())));
    let app = revue::create_router(Arc::new(revue::AppState::new(
      Some("s3cret".to_string())
    , Arc::new(client)
    )));

    let req = Request::builder()
      .method("POST")
      .uri("/api/review")
      .header("content-type", "application/json")
      .header("authorization", "Bearer s3cret")
      .body(Body::from(r#"{"code":"ls -la"}"#))
      .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"review": "Looks good."}));
    mock.assert_async().await;
}
