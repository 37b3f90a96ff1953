//! Client tests against an in-process WebSocket gateway

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use grideye_panel::{
    Config, ConnectionStatus, Dashboard, LineGroup, PanelClient, PanelError, PanelModel, Profile,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Start a gateway that pushes `frames`, closes the socket and returns every
/// text message it received from the client
async fn start_gateway(frames: Vec<String>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        ws.send(Message::Text("connected".into())).await.unwrap();
        for frame in frames {
            ws.send(Message::Text(frame.into())).await.unwrap();
        }
        ws.close(None).await.unwrap();

        let mut received = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                received.push(text.as_str().to_owned());
            }
        }
        received
    });

    (port, handle)
}

fn config(port: u16, profile: Profile) -> Config {
    let mut config = Config::default();
    config.gateway.host = "127.0.0.1".to_string();
    config.gateway.port = port;
    config.panel.profile = profile;
    config
}

#[tokio::test]
async fn test_session_renders_frames_and_sends_handshake() {
    let (port, gateway) = start_gateway(vec![
        r#"{"TIME":"2024-03-01 12:00:00","SRC":"DEVICE","NLR":5,"LR":1}"#.to_string(),
        r#"{"GE_MIN":10,"GE_MAX":30,"GE_AVG":20}"#.to_string(),
    ])
    .await;

    let client = PanelClient::new(config(port, Profile::Enhanced));
    let mut dashboard = Dashboard::new(PanelModel::new(64, 64), Profile::Enhanced);
    let events = client.subscribe();

    client.connect().await.unwrap();
    tokio::time::timeout(Duration::from_secs(10), dashboard.run(events))
        .await
        .expect("gateway session did not finish");

    let panel = dashboard.renderer();
    assert_eq!(panel.line(LineGroup::NearLine, 1), Some(true));
    assert_eq!(panel.line(LineGroup::NearLine, 2), Some(false));
    assert_eq!(panel.line(LineGroup::NearLine, 3), Some(true));
    assert_eq!(panel.line(LineGroup::LineRelay, 1), Some(true));
    assert_eq!(panel.last_update(), Some("2024-03-01 12:00:00"));
    assert_eq!(panel.heat_colour(0, 0), None);
    assert_eq!(panel.status_text(), "closed");
    assert_eq!(client.status().await, ConnectionStatus::Closed);

    let received = tokio::time::timeout(Duration::from_secs(10), gateway)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        received.first().map(String::as_str),
        Some(r#"{"SRC":"WEB","CMD":"UPDATE_UI"}"#)
    );
}

#[tokio::test]
async fn test_send_after_close_is_silent() {
    let (port, gateway) = start_gateway(Vec::new()).await;

    let client = PanelClient::new(config(port, Profile::Legacy));
    let mut dashboard = Dashboard::new(PanelModel::new(8, 8), Profile::Legacy);
    let events = client.subscribe();

    client.connect().await.unwrap();
    tokio::time::timeout(Duration::from_secs(10), dashboard.run(events))
        .await
        .expect("gateway session did not finish");

    client.send("too late").await;
    assert!(matches!(
        client.try_send("too late").await,
        Err(PanelError::NotConnected)
    ));

    let received = tokio::time::timeout(Duration::from_secs(10), gateway)
        .await
        .unwrap()
        .unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_connection_refused_sets_error_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = PanelClient::new(config(port, Profile::Enhanced));
    let mut dashboard = Dashboard::new(PanelModel::new(8, 8), Profile::Enhanced);
    let events = client.subscribe();

    assert!(matches!(
        client.connect().await,
        Err(PanelError::ConnectionFailed(_))
    ));
    tokio::time::timeout(Duration::from_secs(5), dashboard.run(events))
        .await
        .unwrap();
    assert_eq!(dashboard.renderer().status_text(), "error occurred");
    assert_eq!(client.status().await, ConnectionStatus::Error);
}
