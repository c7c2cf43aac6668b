//! Test server and websocket client helpers

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use xfcanvas::backend::projects::{MemoryProjectStore, Project, ProjectStore};
use xfcanvas::backend::routes::create_router;
use xfcanvas::backend::server::{AppState, ServerConfig};
use xfcanvas::shared::Document;

use super::auth_helpers::TEST_SECRET;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(200);

/// A running server with direct access to its state and store
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub store: Arc<MemoryProjectStore>,
}

/// Start a server on an ephemeral port
pub async fn spawn_server() -> TestServer {
    let config = ServerConfig::builder()
        .port(0)
        .share_token_secret(TEST_SECRET)
        .build()
        .expect("Invalid test config");
    spawn_server_with(config).await
}

pub async fn spawn_server_with(config: ServerConfig) -> TestServer {
    let store = Arc::new(MemoryProjectStore::new());
    let state = AppState::new(&config, store.clone());
    let app = create_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestServer { addr, state, store }
}

impl TestServer {
    pub fn url(&self, target: &str) -> String {
        format!("ws://{}/api/v1/projects/{}/content", self.addr, target)
    }

    /// Create a project holding `content`
    pub async fn project_with(&self, content: Document) -> Project {
        let project = self.store.create_project("Test project", Some(1)).await;
        self.store
            .update_project_content(project.id, &content)
            .await
            .expect("Failed to seed project");
        project
    }

    pub async fn content(&self, project: &Project) -> Document {
        self.store
            .content(project.id)
            .await
            .expect("Project disappeared")
    }

    /// Open a connection and consume the snapshot frame
    pub async fn join(&self, target: &str) -> (WsClient, String) {
        let (mut ws, _) = connect_async(self.url(target))
            .await
            .expect("Failed to connect");
        let snapshot = next_text(&mut ws).await;
        (ws, snapshot)
    }

    /// Attempt a connection, returning the HTTP status of a refusal
    pub async fn refused_status(&self, target: &str) -> u16 {
        match connect_async(self.url(target)).await {
            Err(tungstenite::Error::Http(response)) => response.status().as_u16(),
            Err(e) => panic!("Expected an HTTP refusal, got {:?}", e),
            Ok(_) => panic!("Connection to {} was accepted", target),
        }
    }

    /// Wait until the registry holds `expected` connections for a project
    pub async fn wait_for_connections(&self, project: &Project, expected: usize) {
        let registry = &self.state.collab.registry;
        let waited = timeout(FRAME_TIMEOUT, async {
            while registry.connection_count(project.id) != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "Expected {} connections, registry has {}",
            expected,
            registry.connection_count(project.id)
        );
    }
}

pub async fn send_text(ws: &mut WsClient, frame: &str) {
    ws.send(Message::text(frame))
        .await
        .expect("Failed to send frame");
}

/// Next text frame, skipping control frames
pub async fn next_text(ws: &mut WsClient) -> String {
    let next = timeout(FRAME_TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
                Some(Ok(Message::Close(frame))) => panic!("Connection closed: {:?}", frame),
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("Receive error: {:?}", e),
                None => panic!("Connection ended"),
            }
        }
    })
    .await;
    next.expect("Timed out waiting for a frame")
}

/// Assert that no text frame arrives for a short while
pub async fn assert_silent(ws: &mut WsClient) {
    let next = timeout(SILENCE, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_owned()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(frame)) = next {
        panic!("Expected no frame, got {:?}", frame);
    }
}
