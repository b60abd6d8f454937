//! HTTP implementation of the note store.

use std::time::Duration;

use super::{NoteEnvelope, NoteRecord, NoteStore, SavePayload, StoreError};

/// Note store backed by a NoteSpace server.
///
/// Uses a blocking client; all calls happen on the remote worker thread, so
/// the UI thread never blocks on the network. Auth (session cookies etc.) is
/// whatever the client carries by default.
pub struct HttpNoteStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpNoteStore {
    /// Create a store for the given server base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/api/note/{id}", self.base_url)
    }
}

impl NoteStore for HttpNoteStore {
    fn fetch(&self, id: &str) -> Result<NoteRecord, StoreError> {
        let response = self.client.get(self.note_url(id)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        let body = response.text()?;
        let envelope: NoteEnvelope = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(StoreError::Rejected);
        }
        Ok(envelope.data.unwrap_or_default())
    }

    fn save(&self, id: &str, payload: &SavePayload) -> Result<(), StoreError> {
        let response = self.client.put(self.note_url(id)).json(payload).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        // Response body is ignored beyond the status line.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// One-shot HTTP fixture: accepts a single connection, captures the
    /// request, and answers with the canned response.
    fn one_shot_server(status_line: &str, body: &str) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture");
        let addr = listener.local_addr().expect("fixture addr");
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            // Read headers, then any body per Content-Length.
            let body_start = loop {
                let n = stream.read(&mut buf).expect("read request");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&raw[..body_start]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            while raw.len() < body_start + content_length {
                let n = stream.read(&mut buf).expect("read body");
                raw.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).expect("write response");
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_fetch_parses_success_envelope() {
        let (url, server) = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"success": true, "data": {"title": "Groceries", "content": "milk"}}"#,
        );
        let store = HttpNoteStore::new(&url).unwrap();

        let note = store.fetch("abc123").unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk");

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/note/abc123 "));
    }

    #[test]
    fn test_fetch_rejected_envelope_is_error() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK", r#"{"success": false}"#);
        let store = HttpNoteStore::new(&url).unwrap();

        let err = store.fetch("abc123").unwrap_err();
        assert!(matches!(err, StoreError::Rejected));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_http_error_status_is_error() {
        let (url, server) = one_shot_server("HTTP/1.1 404 Not Found", "{}");
        let store = HttpNoteStore::new(&url).unwrap();

        let err = store.fetch("missing").unwrap_err();
        assert!(matches!(err, StoreError::Status(404)));
        server.join().unwrap();
    }

    #[test]
    fn test_save_puts_camel_case_payload() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK", "{}");
        let store = HttpNoteStore::new(&url).unwrap();

        store
            .save(
                "abc123",
                &SavePayload {
                    content: "milk".to_string(),
                    title: "Groceries".to_string(),
                    logo_text: "NoteSpace".to_string(),
                },
            )
            .unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("PUT /api/note/abc123 "));
        assert!(request.contains(r#""logoText":"NoteSpace""#));
        assert!(request.contains(r#""content":"milk""#));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let store = HttpNoteStore::new("http://localhost:3000/").unwrap();
        assert_eq!(
            store.note_url("abc"),
            "http://localhost:3000/api/note/abc"
        );
    }
}
