// ABOUTME: Minimal WARC reader: locates the first `response` record's HTTP payload.
// ABOUTME: Used by the CLI's file-input mode; not part of the core extraction engine.

/// The HTTP response embedded in a WARC `response` record: its declared
/// content-type (if the HTTP headers carried one) and its body bytes.
pub struct WarcResponse {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Scan `data` for the first WARC record of type `response` and return its
/// embedded HTTP response. Returns `None` if `data` isn't a WARC container
/// or carries no `response` record.
pub fn first_response_record(data: &[u8]) -> Option<WarcResponse> {
    if !data.starts_with(b"WARC/") {
        return None;
    }

    let mut cursor = 0usize;
    while cursor < data.len() {
        let record_start = data[cursor..].windows(5).position(|w| w == b"WARC/")? + cursor;
        let header_end = find_blank_line(&data[record_start..])? + record_start;
        let header_text = String::from_utf8_lossy(&data[record_start..header_end]);

        let warc_type = header_field(&header_text, "WARC-Type");
        let content_length: usize = header_field(&header_text, "Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let block_start = header_end + 4; // past the blank-line CRLFCRLF
        let block_end = (block_start + content_length).min(data.len());
        let block = &data[block_start..block_end];

        if warc_type.as_deref() == Some("response") {
            return Some(parse_http_response(block));
        }

        cursor = block_end;
    }
    None
}

fn find_blank_line(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

fn header_field(header_text: &str, name: &str) -> Option<String> {
    header_text.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// Split the WARC record block (itself a raw HTTP/1.x response: status
/// line, headers, blank line, body) into a content-type and body.
fn parse_http_response(block: &[u8]) -> WarcResponse {
    match find_blank_line(block) {
        Some(header_end) => {
            let header_text = String::from_utf8_lossy(&block[..header_end]);
            let content_type = header_field(&header_text, "Content-Type");
            let body = block[header_end + 4..].to_vec();
            WarcResponse { content_type, body }
        }
        None => WarcResponse {
            content_type: None,
            body: block.to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_warc(warc_type: &str, http_body: &str) -> Vec<u8> {
        let http_response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{}",
            http_body
        );
        let record_header = format!(
            "WARC/1.0\r\nWARC-Type: {}\r\nContent-Length: {}\r\n\r\n",
            warc_type,
            http_response.len()
        );
        let mut out = record_header.into_bytes();
        out.extend_from_slice(http_response.as_bytes());
        out.extend_from_slice(b"\r\n\r\n");
        out
    }

    #[test]
    fn extracts_first_response_record() {
        let mut data = build_warc("warcinfo", "");
        data.extend(build_warc("response", "<html><body>hi</body></html>"));
        let found = first_response_record(&data).expect("should find response record");
        assert_eq!(found.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(found.body, b"<html><body>hi</body></html>");
    }

    #[test]
    fn non_warc_input_returns_none() {
        assert!(first_response_record(b"<html></html>").is_none());
    }
}
