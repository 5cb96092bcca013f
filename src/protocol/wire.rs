//! Line framing over the byte stream.
//!
//! Commands arrive newline-delimited; the reader caps line length so a
//! peer cannot grow the buffer without bound. An over-long line is a
//! protocol error that tears the session down, since the stream cannot be
//! resynchronized mid-line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolErrorKind, ServerError};

/// Read one line from the reader, trimmed of surrounding whitespace.
///
/// Returns `ConnectionClosed` when the peer disconnects before sending
/// another line, and `LineTooLong` when the line exceeds `max_len` bytes.
pub async fn read_line<R>(reader: &mut R, max_len: usize) -> Result<String, ServerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line: Vec<u8> = Vec::new();

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            if line.is_empty() {
                return Err(ServerError::Protocol {
                    kind: ProtocolErrorKind::ConnectionClosed,
                });
            }
            // Peer closed after a final, unterminated line
            break;
        }

        let (consumed, found_newline) = match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                line.extend_from_slice(&buf[..pos]);
                (pos + 1, true)
            }
            None => {
                line.extend_from_slice(buf);
                (buf.len(), false)
            }
        };
        reader.consume(consumed);

        if line.len() > max_len {
            return Err(ServerError::Protocol {
                kind: ProtocolErrorKind::LineTooLong {
                    size: line.len(),
                    max: max_len,
                },
            });
        }

        if found_newline {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&line).trim().to_string())
}

/// Write a block of text followed by a newline, flushing the stream.
pub async fn write_line<W>(writer: &mut W, text: &str) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_read_single_line() {
        let mut reader = BufReader::new(Cursor::new(b"write a.txt hello\n".to_vec()));
        let line = read_line(&mut reader, 1024).await.unwrap();
        assert_eq!(line, "write a.txt hello");
    }

    #[tokio::test]
    async fn test_read_trims_carriage_return() {
        let mut reader = BufReader::new(Cursor::new(b"  read a.txt\r\n".to_vec()));
        let line = read_line(&mut reader, 1024).await.unwrap();
        assert_eq!(line, "read a.txt");
    }

    #[tokio::test]
    async fn test_read_sequential_lines() {
        let mut reader = BufReader::new(Cursor::new(b"first\nsecond\n".to_vec()));
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "first");
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_read_final_unterminated_line() {
        let mut reader = BufReader::new(Cursor::new(b"no newline".to_vec()));
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "no newline");
    }

    #[tokio::test]
    async fn test_eof_is_connection_closed() {
        let mut reader = BufReader::new(Cursor::new(Vec::new()));
        let result = read_line(&mut reader, 1024).await;
        assert!(matches!(
            result,
            Err(ServerError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed
            })
        ));
    }

    #[tokio::test]
    async fn test_line_too_long() {
        let mut data = vec![b'x'; 100];
        data.push(b'\n');
        let mut reader = BufReader::new(Cursor::new(data));
        let result = read_line(&mut reader, 10).await;
        assert!(matches!(
            result,
            Err(ServerError::Protocol {
                kind: ProtocolErrorKind::LineTooLong { .. }
            })
        ));
    }

    #[tokio::test]
    async fn test_write_line_appends_newline_and_flushes() {
        let mut buffer = Vec::new();
        write_line(&mut buffer, "> Enter a command").await.unwrap();
        assert_eq!(buffer, b"> Enter a command\n");
    }
}
