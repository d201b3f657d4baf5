//! # Protocol Server
//!
//! Line-framed JSON server through which a consensus engine drives the
//! ledger. Each line is one request envelope naming an operation and
//! carrying its payload; each reply is one line.
//!
//! A connection is served strictly one request at a time, and the
//! finalization and commit operations additionally serialize across
//! connections, so deliveries apply in the order the engine issues them
//! even if it ever opens more than one socket.

use ledger_app::{LedgerProtocol, LedgerService};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use shared_types::CODE_ENCODING_ERROR;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// One request from the consensus engine.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireRequest {
    /// The protocol operation to perform.
    op: WireOp,
    /// Operation payload, forwarded to the ledger as raw JSON bytes.
    /// Ignored by `commit`.
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireOp {
    Admit,
    Finalize,
    Commit,
    Query,
}

/// One reply line.
#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireResponse {
    /// Outcome code from the ledger's code table.
    code: u32,
    /// Operation result: the query payload or the commit digest. Empty
    /// for admission and finalization.
    #[serde_as(as = "Base64")]
    data: Vec<u8>,
    /// Human-readable rejection reason; empty on success.
    log: String,
}

impl WireResponse {
    fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: CODE_ENCODING_ERROR,
            data: Vec::new(),
            log: reason.into(),
        }
    }
}

/// TCP front end over a [`LedgerService`].
pub struct ProtocolServer {
    service: Arc<LedgerService>,
    // Held across finalize and commit so delivery order survives
    // multiple engine connections.
    delivery_lock: Mutex<()>,
}

impl ProtocolServer {
    /// Wrap a ledger service for serving.
    pub fn new(service: Arc<LedgerService>) -> Arc<Self> {
        Arc::new(Self {
            service,
            delivery_lock: Mutex::new(()),
        })
    }

    /// Accept engine connections until the task is dropped.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
        loop {
            let (socket, peer) = listener.accept().await?;
            info!(%peer, "engine connected");
            let server = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = server.handle_connection(socket).await {
                    debug!(%peer, error = %e, "connection closed");
                }
                info!(%peer, "engine disconnected");
            });
        }
    }

    async fn handle_connection(&self, socket: TcpStream) -> std::io::Result<()> {
        let (reader, mut writer) = socket.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.dispatch(&line).await;
            let mut encoded = match serde_json::to_vec(&response) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "reply failed to serialize");
                    continue;
                }
            };
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, line: &str) -> WireResponse {
        let request: WireRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(_) => return WireResponse::malformed("the request envelope does not decode"),
        };
        let payload = match serde_json::to_vec(&request.payload) {
            Ok(bytes) => bytes,
            Err(e) => return WireResponse::malformed(format!("the payload does not re-encode: {e}")),
        };

        match request.op {
            WireOp::Admit => {
                let outcome = self.service.admit(&payload).await;
                WireResponse {
                    code: outcome.code,
                    data: Vec::new(),
                    log: outcome.log,
                }
            }
            WireOp::Finalize => {
                let _guard = self.delivery_lock.lock().await;
                let outcome = self.service.finalize(&payload).await;
                WireResponse {
                    code: outcome.code,
                    data: Vec::new(),
                    log: outcome.log,
                }
            }
            WireOp::Commit => {
                let _guard = self.delivery_lock.lock().await;
                match self.service.commit() {
                    Ok(outcome) => WireResponse {
                        code: shared_types::CODE_OK,
                        data: outcome.data,
                        log: String::new(),
                    },
                    Err(e) => WireResponse::malformed(format!("commit failed: {e}")),
                }
            }
            WireOp::Query => {
                let outcome = self.service.query(&payload);
                WireResponse {
                    code: outcome.code,
                    data: outcome.value,
                    log: outcome.log,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ledger_app::test_utils::{service_fixture, signed_delivery};
    use ledger_app::LedgerConfig;
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{TxAction, CODE_OK, CODE_UNAUTHORIZED};
    use tokio::io::AsyncReadExt;

    async fn start_server() -> (String, Arc<ledger_app::test_utils::MockContentStore>) {
        let (service, content) = service_fixture(LedgerConfig::default(), Utc::now());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = ProtocolServer::new(Arc::new(service));
        tokio::spawn(server.serve(listener));
        (addr, content)
    }

    async fn roundtrip(stream: &mut TcpStream, request: serde_json::Value) -> serde_json::Value {
        let mut line = serde_json::to_vec(&request).unwrap();
        line.push(b'\n');
        stream.write_all(&line).await.unwrap();

        let mut reply = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            stream.read_exact(&mut byte).await.unwrap();
            if byte[0] == b'\n' {
                break;
            }
            reply.push(byte[0]);
        }
        serde_json::from_slice(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_finalize_then_commit_over_the_wire() {
        let (addr, content) = start_server().await;
        let mut stream = TcpStream::connect(&addr).await.unwrap();

        let key = Ed25519KeyPair::generate();
        let h = content.publish(b"payload");
        let envelope =
            serde_json::to_value(signed_delivery(&key, TxAction::Add, &[h])).unwrap();

        let reply = roundtrip(
            &mut stream,
            serde_json::json!({"Op": "finalize", "Payload": envelope}),
        )
        .await;
        assert_eq!(reply["Code"], CODE_OK);

        let reply = roundtrip(&mut stream, serde_json::json!({"Op": "commit"})).await;
        assert_eq!(reply["Code"], CODE_OK);
        assert!(!reply["Data"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admission_verdict_travels_back() {
        let (addr, content) = start_server().await;
        let mut stream = TcpStream::connect(&addr).await.unwrap();

        let key = Ed25519KeyPair::generate();
        let h = content.publish(b"payload");
        let mut envelope = signed_delivery(&key, TxAction::Add, &[h]);
        envelope.data.files.push("tampered".to_string());

        let reply = roundtrip(
            &mut stream,
            serde_json::json!({
                "Op": "admit",
                "Payload": serde_json::to_value(&envelope).unwrap(),
            }),
        )
        .await;
        assert_eq!(reply["Code"], CODE_UNAUTHORIZED);
        assert!(!reply["Log"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_garbage_line_answers_instead_of_dropping() {
        let (addr, _) = start_server().await;
        let mut stream = TcpStream::connect(&addr).await.unwrap();

        stream.write_all(b"not json at all\n").await.unwrap();
        let mut reply = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            stream.read_exact(&mut byte).await.unwrap();
            if byte[0] == b'\n' {
                break;
            }
            reply.push(byte[0]);
        }
        let reply: serde_json::Value = serde_json::from_slice(&reply).unwrap();
        assert_eq!(reply["Code"], CODE_ENCODING_ERROR);
    }
}
