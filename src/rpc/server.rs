//! Line-delimited JSON-RPC server over stdio or TCP
//!
//! The transport only parses requests and formats responses; every method
//! maps onto one `Orchestrator` call.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::types::{RpcRequest, RpcResponse};
use crate::error::OrchestratorError;
use crate::notification::{Category, NotificationId};
use crate::service::Orchestrator;

#[derive(Debug, Deserialize)]
struct NotifyParams {
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    app_type: String,
}

#[derive(Debug, Deserialize)]
struct IdParams {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ModeParams {
    active: bool,
    #[serde(default)]
    mode_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeParams {
    parent: String,
    child: String,
}

/// Deserialize params; missing or malformed params are a validation error
fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, OrchestratorError> {
    let params = params.unwrap_or_else(|| json!({}));
    serde_json::from_value(params)
        .map_err(|e| OrchestratorError::Validation(format!("invalid params: {}", e)))
}

fn parse_category(name: &str) -> Result<Category, OrchestratorError> {
    name.parse()
        .map_err(|e: crate::notification::UnknownCategory| OrchestratorError::Validation(e.to_string()))
}

/// JSON-RPC front end for an [`Orchestrator`]
#[derive(Debug, Clone)]
pub struct RpcServer {
    pub orchestrator: Orchestrator,
}

impl RpcServer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Serve stdin/stdout until EOF
    pub async fn run_stdio(&self) -> Result<()> {
        info!("RPC server started (stdio)");
        let reader = BufReader::new(tokio::io::stdin());
        self.serve_stream(reader, tokio::io::stdout()).await
    }

    /// Accept TCP connections on `127.0.0.1:port`, one task per client
    pub async fn run_tcp(&self, port: u16) -> Result<()> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        info!(addr = %listener.local_addr()?, "RPC server started (tcp)");

        loop {
            let (stream, peer) = listener.accept().await?;
            let server = self.clone();
            tokio::spawn(async move {
                debug!(peer = %peer, "Client connected");
                let (read_half, write_half) = stream.into_split();
                if let Err(e) = server.serve_stream(BufReader::new(read_half), write_half).await {
                    warn!(peer = %peer, error = %e, "Client connection failed");
                }
                debug!(peer = %peer, "Client disconnected");
            });
        }
    }

    /// Read one request per line, write one response per line
    pub async fn serve_stream<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 {
                break; // EOF
            }

            // A bad line gets a parse error; the connection stays up
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match serde_json::from_str::<RpcRequest>(line.trim()) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => {
                        warn!(error = %e, "Failed to parse request");
                        RpcResponse::parse_error(format!("Parse error: {}", e))
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Request is not valid UTF-8");
                    RpcResponse::parse_error(format!("Parse error: {}", e))
                }
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Dispatch one request
    pub async fn handle_request(&self, request: RpcRequest) -> RpcResponse {
        let result = match request.method.as_str() {
            "list" => self.handle_list(),
            "notify" => self.handle_notify(request.params),
            "dismiss" => self.handle_dismiss(request.params),
            "undo" => self.handle_undo(),
            "mode/set" => self.handle_set_mode(request.params),
            "visualize" => self.handle_visualize(),
            "next" => self.handle_next(),
            "summary" => self.handle_summary(request.params),
            "graph/add_edge" => self.handle_add_edge(request.params),
            "graph/remove_edge" => self.handle_remove_edge(request.params),
            _ => return RpcResponse::method_not_found(request.id, &request.method),
        };

        match result {
            Ok(value) => RpcResponse::success(request.id, value),
            Err(e) => match e.downcast_ref::<OrchestratorError>() {
                Some(core) => {
                    debug!(method = %request.method, error = %core, "Request rejected");
                    RpcResponse::from_core_error(request.id, core)
                }
                None => RpcResponse::internal_error(request.id, e.to_string()),
            },
        }
    }

    fn handle_list(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.orchestrator.list())?)
    }

    fn handle_notify(&self, params: Option<Value>) -> Result<Value> {
        let params: NotifyParams = parse_params(params)?;
        let receipt = self.orchestrator.notify(
            params.sender.as_deref().unwrap_or(""),
            &params.content,
            &params.app_type,
        )?;
        Ok(serde_json::to_value(receipt)?)
    }

    fn handle_dismiss(&self, params: Option<Value>) -> Result<Value> {
        let params: IdParams = parse_params(params)?;
        let dismissed = self.orchestrator.dismiss(NotificationId::from_raw(params.id))?;
        Ok(json!({ "dismissed": dismissed.id }))
    }

    fn handle_undo(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.orchestrator.undo()?)?)
    }

    fn handle_set_mode(&self, params: Option<Value>) -> Result<Value> {
        let params: ModeParams = parse_params(params)?;
        let mode = self
            .orchestrator
            .set_mode(params.active, params.mode_name.as_deref());
        Ok(serde_json::to_value(mode)?)
    }

    fn handle_visualize(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.orchestrator.visualize())?)
    }

    fn handle_next(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.orchestrator.deliver_next())?)
    }

    fn handle_summary(&self, params: Option<Value>) -> Result<Value> {
        let params: IdParams = parse_params(params)?;
        let id = NotificationId::from_raw(params.id);
        let summary = self.orchestrator.summarize(id)?;
        Ok(json!({ "id": id, "summary": summary }))
    }

    fn handle_add_edge(&self, params: Option<Value>) -> Result<Value> {
        let params: EdgeParams = parse_params(params)?;
        let parent = parse_category(&params.parent)?;
        let child = parse_category(&params.child)?;
        let added = self.orchestrator.add_dependency(parent, child)?;
        Ok(json!({ "parent": parent, "child": child, "added": added }))
    }

    fn handle_remove_edge(&self, params: Option<Value>) -> Result<Value> {
        let params: EdgeParams = parse_params(params)?;
        let parent = parse_category(&params.parent)?;
        let child = parse_category(&params.child)?;
        let removed = self.orchestrator.remove_dependency(parent, child);
        Ok(json!({ "removed": removed }))
    }
}
