//! Drives `java-indent-ls` over stdio: initialize, open a document and
//! wait for its diagnostics.
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::{json, Value};

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

const MISINDENTED: &str = "class A {\n    void f() {\n          int x = 1;\n    }\n}\n";
const DOC_URI: &str = "file:///tmp/java-indent-smoke/A.java";

struct Session {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl Session {
    fn spawn() -> Self {
        let bin_path = std::env::var("CARGO_BIN_EXE_java-indent-ls")
            .unwrap_or_else(|_| "target/debug/java-indent-ls".to_string());
        let mut child = Command::new(bin_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn language server");
        let stdout = child.stdout.take().expect("Child stdout should be available");
        Session {
            child,
            reader: BufReader::new(stdout),
        }
    }

    fn send(&mut self, message: &Value) {
        let body = message.to_string();
        let frame = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let stdin = self.child.stdin.as_mut().expect("Child stdin should be available");
        stdin.write_all(frame.as_bytes()).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    fn receive(&mut self) -> Value {
        let started = Instant::now();
        let mut content_length = None;
        loop {
            assert!(started.elapsed() < SERVER_TIMEOUT, "Timeout waiting for headers");
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => panic!("Unexpected EOF while reading headers"),
                Ok(_) if line.trim().is_empty() => break,
                Ok(_) => {
                    if let Some(value) = line.strip_prefix("Content-Length:") {
                        content_length =
                            Some(value.trim().parse::<usize>().expect("Invalid Content-Length"));
                    }
                }
                Err(e) => panic!("Error reading headers: {}", e),
            }
        }

        let mut body = vec![0u8; content_length.expect("Missing Content-Length header")];
        self.reader.read_exact(&mut body).expect("Failed to read body");
        serde_json::from_slice(&body).expect("Body should be JSON")
    }

    /// Skips log messages and other notifications until `method` arrives
    fn receive_notification(&mut self, method: &str) -> Value {
        let started = Instant::now();
        loop {
            assert!(started.elapsed() < SERVER_TIMEOUT, "Timeout waiting for {method}");
            let message = self.receive();
            if message.get("method").and_then(Value::as_str) == Some(method) {
                return message;
            }
        }
    }

    fn close(mut self) {
        drop(self.child.stdin.take());
        std::thread::sleep(SHUTDOWN_GRACE_PERIOD);
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            Ok(None) => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
            Err(e) => panic!("Error checking server status: {}", e),
        }
    }
}

fn initialize_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": { "publishDiagnostics": { "versionSupport": true } }
            },
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }
    })
}

#[test]
fn initialize_smoke() {
    let mut session = Session::spawn();
    session.send(&initialize_request());
    let response = session.receive();

    assert_eq!(response.get("id").and_then(Value::as_i64), Some(1));
    let result = response.get("result").expect("Response should contain 'result'");
    assert_eq!(
        result["capabilities"]["textDocumentSync"].as_i64(),
        Some(1),
        "Server should request full text sync"
    );
    assert_eq!(result["serverInfo"]["name"].as_str(), Some("java-indent-ls"));

    session.close();
}

#[test]
fn open_document_publishes_indentation_warnings() {
    let mut session = Session::spawn();
    session.send(&initialize_request());
    session.receive();
    session.send(&json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }));
    session.send(&json!({
        "jsonrpc": "2.0",
        "method": "textDocument/didOpen",
        "params": {
            "textDocument": {
                "uri": DOC_URI,
                "languageId": "java",
                "version": 3,
                "text": MISINDENTED
            }
        }
    }));

    let published = session.receive_notification("textDocument/publishDiagnostics");
    let params = &published["params"];
    assert_eq!(params["uri"].as_str(), Some(DOC_URI));
    assert_eq!(params["version"].as_i64(), Some(3));

    let diagnostics = params["diagnostics"].as_array().expect("diagnostics array");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic["range"]["start"]["line"].as_i64(), Some(2));
    assert_eq!(diagnostic["severity"].as_i64(), Some(2));
    assert_eq!(diagnostic["source"].as_str(), Some("java-indent"));
    let message = diagnostic["message"].as_str().unwrap_or_default();
    assert!(message.contains("expected level should be 8"), "{message}");

    session.close();
}
