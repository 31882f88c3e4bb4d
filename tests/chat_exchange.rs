//! End-to-end tests of the chat exchange against a mocked `/api/chat` server.

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use chatwidget::chat::{ChatConfig, ChatOutcome, ChatSession, SessionState, WidgetState};
use chatwidget::{ChatClient, ChatFailure, HtmlRenderer, Message, Renderer, Sender};

fn session_for(server: &mockito::ServerGuard) -> ChatSession<ChatClient> {
    let config = ChatConfig::new()
        .with_base_url(server.url())
        .with_timeout(Duration::from_secs(5));
    ChatSession::from_config(&config).expect("client should build")
}

#[tokio::test]
async fn hello_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!({
            "conversation": [{ "role": "user", "text": "Hello" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"Hi there!"}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    renderer.set_input("Hello");

    let request = session.prepare("Hello", &mut renderer).unwrap();
    assert_eq!(session.transcript().messages(), &[Message::user("Hello")]);
    assert_eq!(renderer.input(), "");
    assert!(renderer.is_thinking_visible());
    assert_eq!(session.state(), SessionState::AwaitingResponse);

    let result = session.transport().send(&request).await;
    let outcome = session.on_response(result, &mut renderer);

    assert_eq!(outcome, ChatOutcome::Reply("Hi there!".to_string()));
    assert_eq!(
        session.transcript().messages(),
        &[Message::user("Hello"), Message::bot("Hi there!")]
    );
    assert!(!renderer.is_thinking_visible());
    assert_eq!(session.state(), SessionState::Idle);
    mock.assert_async().await;
}

#[tokio::test]
async fn bold_reply_is_emphasized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"**hi**"}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    session.submit("greet me", &mut renderer).await;

    let bot = &renderer.messages_html()[1];
    assert!(bot.contains("<strong>hi</strong>"));
    assert!(!bot.contains('*'));
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_renders_one_apology() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    let outcome = session.submit("Hello", &mut renderer).await;

    assert_eq!(
        outcome,
        Some(ChatOutcome::Failed(ChatFailure::TransportFailure))
    );
    let bots: Vec<_> = session
        .transcript()
        .messages()
        .iter()
        .filter(|m| m.sender == Sender::Bot)
        .collect();
    assert_eq!(bots, vec![&Message::bot("Failed to get response from server.")]);
    assert!(!renderer.is_thinking_visible());
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_body_renders_no_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    let outcome = session.submit("Hello", &mut renderer).await;

    assert_eq!(outcome, Some(ChatOutcome::Failed(ChatFailure::EmptyResult)));
    assert_eq!(session.transcript().count_from(Sender::Bot), 1);
    assert_eq!(
        session.transcript().last(),
        Some(&Message::bot("Sorry, no response received."))
    );
    assert!(!renderer.is_thinking_visible());
    mock.assert_async().await;
}

#[tokio::test]
async fn json_without_a_result_object_renders_no_response() {
    for body in ["null", "[]", r#"["Hi"]"#, r#""str""#, "42", r#"{"result":7}"#] {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let mut session = session_for(&server);
        let mut renderer = HtmlRenderer::new();
        let outcome = session.submit("Hello", &mut renderer).await;

        assert_eq!(
            outcome,
            Some(ChatOutcome::Failed(ChatFailure::EmptyResult)),
            "body: {body}"
        );
        assert_eq!(
            session.transcript().last(),
            Some(&Message::bot("Sorry, no response received.")),
            "body: {body}"
        );
        assert!(!renderer.is_thinking_visible());
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn malformed_body_is_a_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    let outcome = session.submit("Hello", &mut renderer).await;

    assert_eq!(
        outcome,
        Some(ChatOutcome::Failed(ChatFailure::TransportFailure))
    );
    assert!(!renderer.is_thinking_visible());
    mock.assert_async().await;
}

#[tokio::test]
async fn whitespace_submission_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    assert_eq!(session.submit(" \t\n", &mut renderer).await, None);
    assert!(session.transcript().is_empty());
    assert_eq!(renderer.message_count(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn script_input_is_escaped_in_the_view() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"result":"<img src=x onerror=alert(1)>"}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    session.submit("<script>alert(1)</script>", &mut renderer).await;

    let html = renderer.to_html();
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let config = ChatConfig::new()
        .with_base_url("http://127.0.0.1:1/")
        .with_timeout(Duration::from_secs(5));
    let mut session = ChatSession::from_config(&config).unwrap();
    let mut renderer = HtmlRenderer::new();

    let outcome = session.submit("Hello", &mut renderer).await.unwrap();
    assert_eq!(outcome, ChatOutcome::Failed(ChatFailure::TransportFailure));
    assert_eq!(outcome.text(), "Failed to get response from server.");
    assert!(!renderer.is_thinking_visible());
    assert_eq!(session.stats().transport_failures, 1);
}

#[tokio::test]
async fn client_reports_status_code() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(503)
        .create_async()
        .await;

    let client = ChatClient::new(&server.url()).unwrap();
    let err = client
        .send(&chatwidget::ConversationRequest::from_user_text("Hello"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert!(err.is_transport());
}

#[tokio::test]
async fn renderer_trait_object_drives_session() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"result":"ok"}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut html = HtmlRenderer::new();
    let renderer: &mut dyn Renderer = &mut html;
    session.submit("one", renderer).await;
    session.submit("two", renderer).await;

    assert_eq!(html.message_count(), 4);
    assert_eq!(session.stats().replies, 2);
}

#[tokio::test]
async fn silent_server_times_out_as_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        // Accept and hold connections without ever answering.
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ChatConfig::new()
        .with_base_url(format!("http://{addr}/"))
        .with_timeout(Duration::from_secs(1));
    let mut session = ChatSession::from_config(&config).unwrap();
    let mut renderer = HtmlRenderer::new();

    let outcome = session.submit("Hello", &mut renderer).await;
    assert_eq!(
        outcome,
        Some(ChatOutcome::Failed(ChatFailure::TransportFailure))
    );
    assert!(!renderer.is_thinking_visible());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(
        session.transcript().last(),
        Some(&Message::bot("Failed to get response from server."))
    );
    server.abort();
}

#[tokio::test]
async fn closed_widget_sends_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"result":"Hi"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut renderer = HtmlRenderer::new();
    let mut widget = WidgetState::new();

    assert_eq!(
        session.submit_if_open(&widget, "Hello", &mut renderer).await,
        None
    );
    assert!(session.transcript().is_empty());
    assert_eq!(renderer.message_count(), 0);

    widget.open(&mut renderer);
    let outcome = session.submit_if_open(&widget, "Hello", &mut renderer).await;
    assert_eq!(outcome, Some(ChatOutcome::Reply("Hi".to_string())));

    widget.close(&mut renderer);
    assert_eq!(
        session.submit_if_open(&widget, "Again", &mut renderer).await,
        None
    );
    assert_eq!(session.message_count(), 2);
    mock.assert_async().await;
}
