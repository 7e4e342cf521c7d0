//! Read-only view over an inbound request.

use axum_extra::extract::CookieJar;
use http::HeaderMap;
use http::request::{Parts, Request};

/// What the strategies need to see of a request.
pub trait RequestView {
    fn path(&self) -> &str;

    /// Header value, when it is visible ASCII.
    fn header(&self, name: &str) -> Option<&str>;

    /// Header value as sent, whatever bytes it holds.
    fn header_bytes(&self, name: &str) -> Option<&[u8]>;

    fn cookie(&self, name: &str) -> Option<String>;
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_raw<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a [u8]> {
    headers.get(name).map(|v| v.as_bytes())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|c| c.value().to_string())
}

impl<B> RequestView for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_value(self.headers(), name)
    }

    fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        header_raw(self.headers(), name)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(self.headers(), name)
    }
}

impl RequestView for Parts {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        header_raw(&self.headers, name)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(&self.headers, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http::header::{AUTHORIZATION, COOKIE};

    #[test]
    fn test_request_view() {
        let request = Request::builder()
            .uri("/api/v1/users/me?x=1")
            .header(AUTHORIZATION, "Basic abc")
            .header(COOKIE, "theme=dark; _my_session_id=s3ss10n")
            .body(())
            .unwrap();

        assert_eq!(request.path(), "/api/v1/users/me");
        assert_eq!(request.header("Authorization"), Some("Basic abc"));
        assert_eq!(request.header("X-Missing"), None);
        assert_eq!(request.cookie("_my_session_id").as_deref(), Some("s3ss10n"));
        assert_eq!(request.cookie("other"), None);
    }

    #[test]
    fn test_parts_view() {
        let (parts, _) = Request::builder()
            .uri("/api/v1/status")
            .header(COOKIE, "sid=1")
            .body(())
            .unwrap()
            .into_parts();

        assert_eq!(parts.path(), "/api/v1/status");
        assert_eq!(parts.cookie("sid").as_deref(), Some("1"));
        assert_eq!(parts.header("authorization"), None);
        assert_eq!(parts.header_bytes("authorization"), None);
    }

    #[test]
    fn test_opaque_header_is_present_but_not_text() {
        let request = Request::builder()
            .header(AUTHORIZATION, HeaderValue::from_bytes(b"Basic \xff\xfe").unwrap())
            .body(())
            .unwrap();

        assert_eq!(request.header("authorization"), None);
        assert_eq!(
            request.header_bytes("authorization"),
            Some(&b"Basic \xff\xfe"[..])
        );
    }
}
