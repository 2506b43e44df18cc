//! `HttpTransport` against a one-shot local HTTP server.

use railreport_api::{ApiError, HttpTransport, TestRailClient};
use railreport_config::Credentials;
use railreport_schema::testrail::ResultStatus;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Answer a single request with `status` and `body`; the handle yields the raw
/// request (head and body) as received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().unwrap();
            }
            let done = line == "\r\n";
            head.push_str(&line);
            if done {
                break;
            }
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();

        head + &String::from_utf8(payload).unwrap()
    });

    (base, handle)
}

fn credentials() -> Credentials {
    Credentials::new("qa@example.com", "secret-key").unwrap()
}

#[test]
fn get_sends_basic_auth_and_decodes_cases() {
    let (base, server) = serve_once("200 OK", r#"[{"id": 1104, "title": "Login"}]"#);
    let client = TestRailClient::new(&base, credentials()).unwrap();

    let cases = client.get_cases(3, 9).unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].title, "Login");

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /index.php?/api/v2/get_cases/3&suite_id=9 HTTP/1.1"));
    // base64("qa@example.com:secret-key")
    assert!(request.contains("cWFAZXhhbXBsZS5jb206c2VjcmV0LWtleQ=="));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
}

#[test]
fn rejected_post_becomes_status_error() {
    let (base, server) = serve_once(
        "400 Bad Request",
        r#"{"error": "Field :status_id is not a valid status."}"#,
    );
    let client = TestRailClient::new(&base, credentials()).unwrap();

    let err = client
        .create_result(70, "42", ResultStatus::Passed, "ok", "1s", None)
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    let text = err.to_string();
    assert!(text.starts_with("Error (400) during POST to endpoint: (add_result_for_case/70/42)"));
    assert!(text.contains("not a valid status"));

    let request = server.join().unwrap();
    assert!(request.contains(r#""status_id":1"#));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = HttpTransport::new(credentials(), None).unwrap();
    let client =
        TestRailClient::with_transport(&format!("http://127.0.0.1:{port}"), transport).unwrap();

    let err = client.get_cases(1, 1).unwrap_err();
    assert!(matches!(err, ApiError::Transport { method: "GET", .. }));
}
