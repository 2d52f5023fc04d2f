//! Hand-rolled HTTP server for the leaderboard and presence API.
//!
//! One accept loop, one task per connection, a shared [`Store`] behind a
//! mutex, and a background task that prunes stale presence rows. The
//! protocol is plain HTTP/1.1 with JSON bodies and permissive CORS so a
//! browser game on another origin can talk to it.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::{interval, Duration};

use crate::constants::{LEADERBOARD_LIMIT, PRESENCE_CLEANUP_INTERVAL_MS, PRESENCE_TIMEOUT_MS};
use crate::web::store::Store;

const CORS_HEADERS: &str = "Access-Control-Allow-Origin: *\r\n\
    Access-Control-Allow-Methods: GET, POST, DELETE, OPTIONS\r\n\
    Access-Control-Allow-Headers: Content-Type\r\n";

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Run the server until the process exits.
pub async fn run_server(port: u16, store: Store) -> std::io::Result<()> {
    let store = Arc::new(Mutex::new(store));

    // Background presence cleanup
    let cleanup_store = Arc::clone(&store);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(PRESENCE_CLEANUP_INTERVAL_MS));
        loop {
            ticker.tick().await;
            let cutoff = now_ms() - PRESENCE_TIMEOUT_MS;
            match cleanup_store.lock().await.prune_presence(cutoff) {
                Ok(0) => {}
                Ok(n) => log::debug!("pruned {} stale presence rows", n),
                Err(e) => log::warn!("presence cleanup failed: {}", e),
            }
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://localhost:{}", port);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, store).await {
                        log::debug!("connection error from {}: {}", peer, e);
                    }
                });
            }
            Err(e) => log::warn!("accept error: {}", e),
        }
    }
}

/// Read one request, dispatch it, write one response, close.
async fn handle_connection(
    mut stream: TcpStream,
    store: Arc<Mutex<Store>>,
) -> std::io::Result<()> {
    let request = match read_request(&mut stream).await? {
        Some(r) => r,
        None => return Ok(()),
    };

    let response = route(&request, &store).await;
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

struct Request {
    method: String,
    path: String,
    body: String,
}

/// Read headers up to the blank line, then exactly Content-Length bytes of
/// body. Returns None on a malformed request line.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<Request>> {
    let mut buf = Vec::with_capacity(1024);
    let header_end = loop {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return Ok(None);
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = match lines.next() {
        Some(l) => l,
        None => return Ok(None),
    };
    let mut parts = request_line.split_whitespace();
    let (method, path) = match (parts.next(), parts.next()) {
        (Some(m), Some(p)) => (m.to_string(), p.to_string()),
        _ => return Ok(None),
    };

    let content_length = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .next()
        .unwrap_or(0);

    let mut body_bytes = buf[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body_bytes.extend_from_slice(&chunk[..n]);
    }
    body_bytes.truncate(content_length);

    Ok(Some(Request {
        method,
        path,
        body: String::from_utf8_lossy(&body_bytes).to_string(),
    }))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn json_response(status: &str, body: &Value) -> String {
    let body = body.to_string();
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        CORS_HEADERS,
        body.len(),
        body
    )
}

fn bad_request(message: &str) -> String {
    json_response("400 Bad Request", &json!({ "error": message }))
}

fn not_found() -> String {
    json_response("404 Not Found", &json!({ "error": "not found" }))
}

fn server_error(e: impl std::fmt::Display) -> String {
    log::error!("request failed: {}", e);
    json_response(
        "500 Internal Server Error",
        &json!({ "error": "internal error" }),
    )
}

async fn route(request: &Request, store: &Arc<Mutex<Store>>) -> String {
    if request.method == "OPTIONS" {
        return format!(
            "HTTP/1.1 204 No Content\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
            CORS_HEADERS
        );
    }

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/leaderboard") => {
            let store = store.lock().await;
            match store.top_scores(LEADERBOARD_LIMIT) {
                Ok(entries) => json_response("200 OK", &json!(entries)),
                Err(e) => server_error(e),
            }
        }
        ("POST", "/api/scores") => submit_score(&request.body, store).await,
        ("DELETE", "/api/scores") => {
            let store = store.lock().await;
            match store.clear_scores() {
                Ok(deleted) => json_response("200 OK", &json!({ "deleted": deleted })),
                Err(e) => server_error(e),
            }
        }
        ("GET", "/api/highscore") => {
            let store = store.lock().await;
            match store.high_score() {
                Ok(high) => json_response("200 OK", &json!({ "highScore": high })),
                Err(e) => server_error(e),
            }
        }
        ("GET", "/api/presence") => {
            let cutoff = now_ms() - PRESENCE_TIMEOUT_MS;
            let store = store.lock().await;
            match store.active_players(cutoff) {
                Ok(players) => json_response("200 OK", &json!(players)),
                Err(e) => server_error(e),
            }
        }
        ("POST", "/api/presence") => heartbeat(&request.body, store).await,
        ("DELETE", path) if path.starts_with("/api/presence/") => {
            let id = &path["/api/presence/".len()..];
            if id.is_empty() {
                return bad_request("missing presence id");
            }
            let store = store.lock().await;
            match store.remove_presence(id) {
                Ok(_) => json_response("200 OK", &json!({ "removed": true })),
                Err(e) => server_error(e),
            }
        }
        _ => not_found(),
    }
}

async fn submit_score(body: &str, store: &Arc<Mutex<Store>>) -> String {
    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return bad_request("invalid JSON body"),
    };

    let name = match payload.get("name").and_then(Value::as_str) {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => return bad_request("name is required"),
    };
    let score = match payload.get("score").and_then(Value::as_u64) {
        Some(s) => s as u32,
        None => return bad_request("score must be a non-negative number"),
    };
    let avatar = payload.get("avatar").and_then(Value::as_str);

    let store = store.lock().await;
    match store.add_score(&name, score, avatar) {
        Ok((id, rank)) => json_response(
            "200 OK",
            &json!({
                "id": id,
                "rank": rank,
                "isTopTen": store.is_top_ten(rank),
            }),
        ),
        Err(e) => server_error(e),
    }
}

async fn heartbeat(body: &str, store: &Arc<Mutex<Store>>) -> String {
    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return bad_request("invalid JSON body"),
    };

    let id = match payload.get("id").and_then(Value::as_str) {
        Some(i) if !i.trim().is_empty() => i.trim().to_string(),
        _ => return bad_request("id is required"),
    };
    let name = match payload.get("name").and_then(Value::as_str) {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => return bad_request("name is required"),
    };
    let avatar = payload.get("avatar").and_then(Value::as_str);
    let score = payload.get("score").and_then(Value::as_u64).unwrap_or(0) as u32;

    let store = store.lock().await;
    match store.upsert_presence(&id, &name, avatar, score, now_ms()) {
        Ok(()) => json_response("200 OK", &json!({ "ok": true })),
        Err(e) => server_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn call(
        store: &Arc<Mutex<Store>>,
        method: &str,
        path: &str,
        body: &str,
    ) -> (String, Value) {
        let request = Request {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
        };
        let response = route(&request, store).await;
        let status = response
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("HTTP/1.1 ")
            .to_string();
        let json_body = response
            .split("\r\n\r\n")
            .nth(1)
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);
        (status, json_body)
    }

    fn test_store() -> Arc<Mutex<Store>> {
        Arc::new(Mutex::new(Store::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_submit_and_fetch_leaderboard() {
        let store = test_store();

        let (status, body) = call(
            &store,
            "POST",
            "/api/scores",
            r#"{"name":"alice","score":12}"#,
        )
        .await;
        assert!(status.starts_with("200"));
        assert_eq!(body["rank"], 1);
        assert_eq!(body["isTopTen"], true);

        let (status, body) = call(&store, "GET", "/api/leaderboard", "").await;
        assert!(status.starts_with("200"));
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "alice");
        assert_eq!(body[0]["score"], 12);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let store = test_store();

        let (status, _) = call(&store, "POST", "/api/scores", r#"{"score":5}"#).await;
        assert!(status.starts_with("400"));

        let (status, _) =
            call(&store, "POST", "/api/scores", r#"{"name":"a","score":"x"}"#).await;
        assert!(status.starts_with("400"));

        let (status, _) = call(&store, "POST", "/api/scores", "not json").await;
        assert!(status.starts_with("400"));

        // Nothing was stored
        let (_, body) = call(&store, "GET", "/api/leaderboard", "").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_high_score_and_clear() {
        let store = test_store();
        call(&store, "POST", "/api/scores", r#"{"name":"a","score":7}"#).await;
        call(&store, "POST", "/api/scores", r#"{"name":"b","score":3}"#).await;

        let (_, body) = call(&store, "GET", "/api/highscore", "").await;
        assert_eq!(body["highScore"], 7);

        let (status, _) = call(&store, "DELETE", "/api/scores", "").await;
        assert!(status.starts_with("200"));

        let (_, body) = call(&store, "GET", "/api/highscore", "").await;
        assert_eq!(body["highScore"], 0);
    }

    #[tokio::test]
    async fn test_presence_lifecycle() {
        let store = test_store();

        let (status, _) = call(
            &store,
            "POST",
            "/api/presence",
            r#"{"id":"p1","name":"alice","score":4}"#,
        )
        .await;
        assert!(status.starts_with("200"));

        let (_, body) = call(&store, "GET", "/api/presence", "").await;
        let players = body.as_array().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0]["id"], "p1");
        assert_eq!(players[0]["score"], 4);

        let (status, _) = call(&store, "DELETE", "/api/presence/p1", "").await;
        assert!(status.starts_with("200"));

        let (_, body) = call(&store, "GET", "/api/presence", "").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_presence_requires_id_and_name() {
        let store = test_store();
        let (status, _) = call(&store, "POST", "/api/presence", r#"{"name":"x"}"#).await;
        assert!(status.starts_with("400"));
        let (status, _) = call(&store, "POST", "/api/presence", r#"{"id":"p1"}"#).await;
        assert!(status.starts_with("400"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let store = test_store();
        let (status, _) = call(&store, "GET", "/api/nope", "").await;
        assert!(status.starts_with("404"));
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let store = test_store();
        let request = Request {
            method: "OPTIONS".to_string(),
            path: "/api/scores".to_string(),
            body: String::new(),
        };
        let response = route(&request, &store).await;
        assert!(response.starts_with("HTTP/1.1 204"));
        assert!(response.contains("Access-Control-Allow-Origin: *"));
    }

    #[test]
    fn test_find_header_end() {
        assert_eq!(find_header_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(14));
        assert_eq!(find_header_end(b"partial\r\n"), None);
    }
}
