//! Asset byte sources
//!
//! Fetches the raw bytes behind an asset URL. Supported shapes:
//! - `data:` URLs with base64 payloads (bundler-inlined assets)
//! - `file:` URLs and bare filesystem paths
//! - plain `http:` downloads (simple GET, no redirects)
//!
//! HTTPS would need a TLS stack this workspace does not carry; it is
//! rejected with a typed error instead of failing mid-handshake.

use base64::Engine as _;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use url::Url;

use crate::error::AssetError;

/// Fetch the raw bytes behind an asset URL
pub async fn fetch_asset_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    log::debug!("Fetching asset bytes from {}", display_url(url));

    if let Some(rest) = url.strip_prefix("data:") {
        return decode_data_url(rest);
    }

    match Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "file" => read_file(parsed.path()).await,
            "http" => fetch_http(&parsed, url).await,
            "https" => Err(AssetError::UnsupportedScheme("https".to_string())),
            // Windows drive letters parse as single-letter schemes
            scheme if scheme.len() == 1 => read_file(url).await,
            other => Err(AssetError::UnsupportedScheme(other.to_string())),
        },
        // Not a URL at all: treat as a filesystem path
        Err(_) => read_file(url).await,
    }
}

/// Shorten long URLs (data URLs in particular) for log output
pub fn display_url(url: &str) -> String {
    if url.len() > 64 {
        let head: String = url.chars().take(48).collect();
        format!("{}... ({} chars)", head, url.len())
    } else {
        url.to_string()
    }
}

fn decode_data_url(rest: &str) -> Result<Vec<u8>, AssetError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AssetError::InvalidDataUrl("missing ',' separator".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(AssetError::InvalidDataUrl(format!(
            "unsupported encoding in '{}'",
            meta
        )));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AssetError::InvalidDataUrl(e.to_string()))
}

async fn read_file(path: &str) -> Result<Vec<u8>, AssetError> {
    tokio::fs::read(path).await.map_err(|e| AssetError::Io {
        path: path.to_string(),
        source: e,
    })
}

async fn fetch_http(parsed: &Url, original: &str) -> Result<Vec<u8>, AssetError> {
    let host = parsed.host_str().ok_or_else(|| AssetError::InvalidUrl {
        url: original.to_string(),
        reason: "no host".to_string(),
    })?;
    let port = parsed.port().unwrap_or(80);
    let path = parsed.path();
    let query = parsed.query().map(|q| format!("?{}", q)).unwrap_or_default();

    let addr = format!("{}:{}", host, port);
    let mut stream =
        tokio::net::TcpStream::connect(&addr)
            .await
            .map_err(|e| AssetError::Http {
                url: original.to_string(),
                reason: format!("connection failed: {}", e),
            })?;

    let request = format!(
        "GET {}{} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, query, host
    );

    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| AssetError::Http {
            url: original.to_string(),
            reason: format!("write failed: {}", e),
        })?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(|e| AssetError::Http {
            url: original.to_string(),
            reason: format!("read failed: {}", e),
        })?;

    parse_http_response(&response, original)
}

/// Split a raw HTTP/1.1 response into status check + body
fn parse_http_response(response: &[u8], url: &str) -> Result<Vec<u8>, AssetError> {
    let header_end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| AssetError::Http {
            url: url.to_string(),
            reason: "malformed response".to_string(),
        })?;

    let head = String::from_utf8_lossy(&response[..header_end]);
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("");
    if status != "200" {
        return Err(AssetError::Http {
            url: url.to_string(),
            reason: format!(
                "status {}",
                if status.is_empty() { "unknown" } else { status }
            ),
        });
    }

    Ok(response[header_end + 4..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_data_url(bytes: &[u8]) -> String {
        format!(
            "data:application/octet-stream;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[tokio::test]
    async fn test_data_url_roundtrip() {
        let url = encode_data_url(b"mannequin bytes");
        let bytes = fetch_asset_bytes(&url).await.unwrap();
        assert_eq!(bytes, b"mannequin bytes");
    }

    #[tokio::test]
    async fn test_data_url_without_separator() {
        let err = fetch_asset_bytes("data:application/octet-stream").await;
        assert!(matches!(err, Err(AssetError::InvalidDataUrl(_))));
    }

    #[tokio::test]
    async fn test_data_url_without_base64_marker() {
        let err = fetch_asset_bytes("data:text/plain,hello").await;
        assert!(matches!(err, Err(AssetError::InvalidDataUrl(_))));
    }

    #[tokio::test]
    async fn test_https_rejected() {
        let err = fetch_asset_bytes("https://example.com/model.glb").await;
        assert!(matches!(err, Err(AssetError::UnsupportedScheme(s)) if s == "https"));
    }

    #[tokio::test]
    async fn test_read_plain_path_and_file_url() {
        let path = std::env::temp_dir().join(format!("effigy_asset_{}.bin", std::process::id()));
        std::fs::write(&path, b"file bytes").unwrap();

        let from_path = fetch_asset_bytes(path.to_str().unwrap()).await.unwrap();
        assert_eq!(from_path, b"file bytes");

        let file_url = Url::from_file_path(&path).unwrap();
        let from_url = fetch_asset_bytes(file_url.as_str()).await.unwrap();
        assert_eq!(from_url, b"file bytes");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let err = fetch_asset_bytes("/definitely/not/here.glb").await;
        match err {
            Err(AssetError::Io { path, .. }) => assert_eq!(path, "/definitely/not/here.glb"),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_line_parsing() {
        let ok = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi";
        assert_eq!(parse_http_response(ok, "http://x/").unwrap(), b"hi");

        let not_found = b"HTTP/1.1 404 Not Found\r\n\r\n";
        let err = parse_http_response(not_found, "http://x/").unwrap_err();
        assert!(matches!(err, AssetError::Http { reason, .. } if reason.contains("404")));
    }

    #[test]
    fn test_display_url_truncates() {
        let url = encode_data_url(&[0u8; 256]);
        let shown = display_url(&url);
        assert!(shown.len() < url.len());
        assert!(shown.contains("chars"));
    }
}
