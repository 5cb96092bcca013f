//! Integration tests for the filedock daemon.
//!
//! These tests start a real listener instance and drive the line protocol
//! over TCP to verify end-to-end functionality.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use filedock_daemon::config::{
    LimitsConfig, ListenConfig, LoggingConfig, Settings, StorageConfig,
};
use filedock_daemon::socket::SocketListener;

const PROMPT: &str = "> Enter a command, HELP, or QUIT:";

/// Test server instance.
struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    _temp_dir: TempDir,
    shutdown: Arc<tokio::sync::Notify>,
}

impl TestServer {
    /// Bind a listener on an ephemeral port over a temp storage root.
    async fn start() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("server-files");

        let settings = Settings {
            listen: ListenConfig {
                addr: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: StorageConfig { root: root.clone() },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "pretty".to_string(),
                file: None,
            },
            limits: LimitsConfig {
                max_line_bytes: 4096,
                max_connections: 8,
                prompt_delay_ms: 1,
            },
        };

        let listener = SocketListener::bind(Arc::new(settings))
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Listener has no local addr");

        let shutdown = Arc::new(tokio::sync::Notify::new());
        let shutdown_for_run = Arc::clone(&shutdown);

        tokio::spawn(async move {
            if let Err(e) = listener.run(shutdown_for_run).await {
                eprintln!("Listener error: {}", e);
            }
        });

        Self {
            addr,
            root,
            _temp_dir: temp_dir,
            shutdown,
        }
    }

    /// Connect a client and consume the greeting up to the first prompt.
    fn connect(&self) -> Client {
        let mut client = Client::connect(self.addr);
        let greeting = client.read_until_prompt();
        assert!(
            greeting
                .iter()
                .any(|l| l.contains("Connection established")),
            "missing banner in greeting: {:?}",
            greeting
        );
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// Synchronous line-protocol client.
struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("Failed to connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("Failed to set read timeout");
        let reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
        Self {
            reader,
            writer: stream,
        }
    }

    fn send(&mut self, line: &str) {
        writeln!(self.writer, "{}", line).expect("Failed to write to server");
        self.writer.flush().expect("Failed to flush");
    }

    /// Read lines until the standard prompt; returns everything before it.
    fn read_until_prompt(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let n = self
                .reader
                .read_line(&mut line)
                .expect("Read from server failed");
            assert!(n > 0, "server closed before prompt; got: {:?}", lines);
            let line = line.trim_end_matches(['\r', '\n']).to_string();
            if line == PROMPT {
                return lines;
            }
            lines.push(line);
        }
    }

    /// Send one command and collect its full response block.
    fn send_command(&mut self, line: &str) -> String {
        self.send(line);
        self.read_until_prompt().join("\n")
    }

    /// Read until the server closes the connection.
    fn read_to_eof(&mut self) -> usize {
        let mut total = 0;
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return total,
                Ok(n) => total += n,
                Err(e) => panic!("Read failed before EOF: {}", e),
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_banner_then_prompt_on_connect() {
    let server = TestServer::start().await;
    // connect() asserts the banner and consumes the first prompt
    let _client = server.connect();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_write_then_read_round_trip() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("write note.md hi there");
    assert!(response.contains("Data written to file: 'note.md'"));

    let stored = std::fs::read_to_string(server.root.join("note.md")).unwrap();
    assert_eq!(stored, "hi there");

    let response = client.send_command("read note.md");
    assert!(response.contains("> Requesting to read 'note.md'..."));
    assert!(response.contains("hi there"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_action_is_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("frobnicate x");
    assert!(response.contains("> ERROR: 'frobnicate' is not a valid command"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_line_is_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("");
    assert!(response.contains("> ERROR: '' is not a valid command"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_append_without_data_is_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("append a.txt");
    assert!(response.contains("> ERROR: APPEND: must specify file name and data"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_append_extends_file() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    client.send_command("write log.txt alpha");
    let response = client.send_command("append log.txt beta");
    assert!(response.contains("Data appended to file: 'log.txt'"));

    let stored = std::fs::read_to_string(server.root.join("log.txt")).unwrap();
    assert_eq!(stored, "alphabeta");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_then_delete_again() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    client.send_command("write a.txt x");

    let first = client.send_command("delete a.txt");
    assert!(first.contains("File 'a.txt' has been deleted."));
    assert!(!server.root.join("a.txt").exists());

    let second = client.send_command("delete a.txt");
    assert!(second.contains("File 'a.txt' does not exist on the server!"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_read_missing_file_keeps_session_open() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("read ghost.txt");
    assert!(response.contains("File 'ghost.txt' does not exist on the server!"));

    // The session survives the failure
    let response = client.send_command("help");
    assert!(response.contains("[ HELP ]"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_find_filters_and_counts() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    client.send_command("write a.txt x");
    client.send_command("write b.log x");

    let response = client.send_command("find txt");
    assert!(response.contains("Found 1 result for 'txt':"));
    assert!(response.contains("a.txt"));
    assert!(!response.contains("b.log"));

    let response = client.send_command("find nothing-here");
    assert!(response.contains("Found 0 results for 'nothing-here':"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_help_sends_instructions() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("help");
    assert!(response.contains("[ HELP ]"));
    assert!(response.contains("write file.txt hello world"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quit_is_server_side_no_op() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let response = client.send_command("quit");
    assert!(response.contains("QUIT is handled by your client"));

    // The connection is still usable afterwards
    let response = client.send_command("help");
    assert!(response.contains("[ HELP ]"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_responses_arrive_in_command_order() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    // Send both commands before reading any response
    client.send("write order.txt first");
    client.send("read order.txt");

    let write_response = client.read_until_prompt().join("\n");
    assert!(write_response.contains("Data written to file: 'order.txt'"));

    let read_response = client.read_until_prompt().join("\n");
    assert!(read_response.contains("first"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_over_long_line_drops_session() {
    let server = TestServer::start().await;
    let mut client = server.connect();

    let long_line = "x".repeat(8192);
    client.send(&long_line);

    // The server tears the session down rather than resynchronizing
    client.read_to_eof();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sessions_are_independent() {
    let server = TestServer::start().await;
    let mut first = server.connect();
    let mut second = server.connect();

    first.send_command("write shared.txt from-first");
    let response = second.send_command("read shared.txt");
    assert!(response.contains("from-first"));
}
