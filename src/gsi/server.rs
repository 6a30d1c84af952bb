use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tiny_http::{Method, Response, Server};
use url::Url;

use super::snapshot::GameSnapshot;
use super::store::SnapshotStore;
use crate::error::ListenerError;
use crate::presence::StatusLine;

/// Game state documents are small; anything bigger is not from the game.
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Helper to create a JSON response
fn json_response(status: u16, body: serde_json::Value) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(body.to_string()).with_status_code(status);
    if let Ok(header) =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
    {
        response.add_header(header);
    }
    response
}

/// Local HTTP listener the game pushes its state to.
pub struct GsiServer {
    pub port: u16,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl GsiServer {
    /// Binds `127.0.0.1:port` (0 picks a free port) and serves on a background thread.
    pub fn start(port: u16, store: SnapshotStore, status: StatusLine) -> Result<Self, ListenerError> {
        let server = Server::http(format!("127.0.0.1:{}", port)).map_err(|e| {
            ListenerError::Bind {
                port,
                reason: e.to_string(),
            }
        })?;

        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| ListenerError::Bind {
                port,
                reason: "listener has no IP address".to_string(),
            })?;

        tracing::info!("Game state listener started on port {}", port);

        let server = Arc::new(server);
        let handle = {
            let server = Arc::clone(&server);
            thread::spawn(move || Self::run_server(&server, &store, &status))
        };

        Ok(Self {
            port,
            server,
            handle: Some(handle),
        })
    }

    fn run_server(server: &Server, store: &SnapshotStore, status: &StatusLine) {
        for mut request in server.incoming_requests() {
            let full_url = format!("http://127.0.0.1{}", request.url());
            let path = match Url::parse(&full_url) {
                Ok(url) => url.path().to_string(),
                Err(e) => {
                    tracing::error!("Failed to parse listener URL: {}", e);
                    let response = json_response(400, serde_json::json!({"error": e.to_string()}));
                    request.respond(response).ok();
                    continue;
                }
            };

            let method = request.method().clone();
            let response = match (&method, path.as_str()) {
                (Method::Get, "/status") => Self::handle_status(status),
                (Method::Post, _) => Self::handle_push(&mut request, store),
                _ => json_response(404, serde_json::json!({"error": "Not found"})),
            };
            request.respond(response).ok();
        }

        tracing::info!("Game state listener stopped");
    }

    fn handle_push(
        request: &mut tiny_http::Request,
        store: &SnapshotStore,
    ) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut body = Vec::new();
        if let Err(e) = request
            .as_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut body)
        {
            tracing::warn!("Failed to read game state body: {}", e);
            return json_response(400, serde_json::json!({"error": e.to_string()}));
        }

        match GameSnapshot::from_json(&body) {
            Ok(snapshot) => {
                tracing::trace!("Game state received: {:?}", snapshot);
                store.write(snapshot);
                json_response(200, serde_json::json!({"status": "ok"}))
            }
            Err(e) => {
                tracing::warn!("{}", e);
                store.invalidate();
                json_response(400, serde_json::json!({"error": e.to_string()}))
            }
        }
    }

    fn handle_status(status: &StatusLine) -> Response<std::io::Cursor<Vec<u8>>> {
        match serde_json::to_value(status.get()) {
            Ok(body) => json_response(200, body),
            Err(e) => json_response(500, serde_json::json!({"error": e.to_string()})),
        }
    }

    /// Stops accepting requests and waits for the listener thread.
    pub fn shutdown(mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsi::GameState;
    use crate::presence::Phase;

    fn start() -> (GsiServer, SnapshotStore, StatusLine) {
        let store = SnapshotStore::default();
        let status = StatusLine::new();
        let server = GsiServer::start(0, store.clone(), status.clone()).unwrap();
        (server, store, status)
    }

    #[tokio::test]
    async fn pushed_state_lands_in_the_store() {
        let (server, store, _) = start();
        let url = format!("http://127.0.0.1:{}/", server.port);

        let response = reqwest::Client::new()
            .post(&url)
            .body(r#"{ "map": { "game_state": "in_progress" }, "player": { "hero": 6 } }"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let snapshot = store.read().snapshot.unwrap();
        assert_eq!(snapshot.game_state, GameState::InProgress);
        assert_eq!(snapshot.hero.as_deref(), Some("6"));
        server.shutdown();
    }

    #[tokio::test]
    async fn malformed_push_invalidates_the_store() {
        let (server, store, _) = start();
        store.write(GameSnapshot::default());
        let url = format!("http://127.0.0.1:{}/", server.port);

        let response = reqwest::Client::new()
            .post(&url)
            .body("definitely not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        assert!(store.read().snapshot.is_none());
        server.shutdown();
    }

    #[tokio::test]
    async fn status_endpoint_reports_driver_status() {
        let (server, _, status) = start();
        status.set("In Queue", Some(Phase::Queue), true);
        let url = format!("http://127.0.0.1:{}/status", server.port);

        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "In Queue");
        assert_eq!(body["phase"], "queue");
        assert_eq!(body["connected"], true);
        server.shutdown();
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let (server, _, _) = start();
        let url = format!("http://127.0.0.1:{}/nope", server.port);
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
        server.shutdown();
    }
}
