//! Readshelf RPC Server: JSON-RPC over stdin/stdout for the UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"history.list", "params":{}}
//! Response: {"id":1, "result":[...]} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries protocol messages only.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use readshelf::app::App;
use readshelf::platform;
use readshelf::rpc_handler::handle_method;
use readshelf::services::settings_engine::SettingsEngineTrait;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("READSHELF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(message: &Value) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", message).and_then(|_| stdout.flush()).is_err() {
        error!("stdout closed, dropping response");
    }
}

fn database_path() -> PathBuf {
    match std::env::var("READSHELF_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir).join(platform::DATABASE_FILE),
        Err(_) => platform::default_database_path(),
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let db_path = database_path();
    let mut app = match App::open(&db_path, None) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, path = %db_path.display(), "failed to initialise readshelf");
            std::process::exit(1);
        }
    };

    if let Ok(url) = std::env::var("READSHELF_API_URL") {
        let applied = app
            .settings_engine
            .override_value("api_base_url", json!(url))
            .map_err(|e| e.to_string())
            .and_then(|_| app.apply_settings().map_err(|e| e.to_string()));
        if let Err(e) = applied {
            error!(error = %e, "ignoring READSHELF_API_URL");
        }
    }

    let app = Mutex::new(app);
    info!(path = %db_path.display(), "rpc server ready");
    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }
}
