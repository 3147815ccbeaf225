//! Integration tests for outbound chat and inbox messages.

mod common;

use common::MockFlowdock;
use common::mock::FLOW_TOKEN;
use flowbot::{InboxMessage, SendError, Sender};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_send_chat_success() {
    let mock = MockFlowdock::builder().spawn().await;
    let sender = Sender::new(&mock.config()).unwrap();

    sender.send_chat("hi", None).await.expect("send should succeed");

    let posts = mock.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].kind, "chat");
    assert_eq!(posts[0].token, FLOW_TOKEN);
    assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        posts[0].body,
        json!({"content": "hi", "external_user_name": "Flowbot"})
    );
}

#[tokio::test]
async fn test_send_chat_server_error() {
    let mock = MockFlowdock::builder()
        .post_status(StatusCode::INTERNAL_SERVER_ERROR)
        .spawn()
        .await;
    let sender = Sender::new(&mock.config()).unwrap();

    let err = sender.send_chat("hi", None).await.unwrap_err();

    match err {
        SendError::Status { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "mock failure");
        }
        other => panic!("Expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_send_thread_chat_uses_robot_name() {
    let mock = MockFlowdock::builder().spawn().await;
    let mut config = mock.config();
    config.robot.name = "DeployBot".to_string();
    let sender = Sender::new(&config).unwrap();

    sender.send_thread_chat("t-7", "on it").await.unwrap();

    assert_eq!(
        mock.posts()[0].body,
        json!({"content": "on it", "external_user_name": "DeployBot", "thread_id": "t-7"})
    );
}

#[tokio::test]
async fn test_send_inbox() {
    let mock = MockFlowdock::builder().spawn().await;
    let sender = Sender::new(&mock.config()).unwrap();

    let message = InboxMessage::new("CI", "ci@acme.test", "Build #12", "All green");
    sender.send_inbox(&message).await.unwrap();

    let posts = mock.posts();
    assert_eq!(posts[0].kind, "inbox");
    assert_eq!(posts[0].token, FLOW_TOKEN);
    assert_eq!(
        posts[0].body,
        json!({
            "source": "CI",
            "from_address": "ci@acme.test",
            "subject": "Build #12",
            "content": "All green",
        })
    );
}

#[tokio::test]
async fn test_send_inbox_rejected() {
    let mock = MockFlowdock::builder()
        .post_status(StatusCode::FORBIDDEN)
        .spawn()
        .await;
    let sender = Sender::new(&mock.config()).unwrap();

    let message = InboxMessage::new("CI", "ci@acme.test", "Build", "red");
    let err = sender.send_inbox(&message).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.error_code(), "status");
}

#[tokio::test]
async fn test_send_to_unreachable_endpoint_is_transport_error() {
    let mut config = flowbot::Config::new("http://127.0.0.1:1/stream", "tok", "u", "p");
    config.flowdock.chat_url = "http://127.0.0.1:1/messages/chat".to_string();
    let sender = Sender::new(&config).unwrap();

    let err = sender.send_chat("hi", None).await.unwrap_err();
    assert!(matches!(err, SendError::Transport(_)));
}
