//! Interactive client for the filedock daemon.
//!
//! Run with: cargo run --example test_client [-- <addr>]
//!
//! Forwards stdin lines to the server and prints everything the server
//! sends back. The literal word `quit` is intercepted locally and closes
//! the connection without being transmitted.

use std::env;
use std::io::{self, BufRead, Read, Write};
use std::net::TcpStream;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| "localhost:3001".to_string());

    let stream = TcpStream::connect(&addr)?;

    // Print server output as it arrives
    let mut reader = stream.try_clone()?;
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => {
                    println!("> Server closed the connection.");
                    std::process::exit(0);
                }
                Ok(n) => {
                    print!("{}", String::from_utf8_lossy(&buf[..n]));
                    io::stdout().flush().ok();
                }
            }
        }
    });

    let mut writer = stream;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        // Client-local convention: `quit` is never transmitted
        if line.trim().eq_ignore_ascii_case("quit") {
            println!("> Disconnected from server.");
            return Ok(());
        }
        writeln!(writer, "{}", line)?;
    }

    Ok(())
}
