//! HTTP Basic credential decoding.
//!
//! Each step takes the previous step's output and returns `None` on any
//! failure, so malformed client input simply falls through to "no identity".

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Scheme prefix of a Basic `Authorization` header.
pub const BASIC_SCHEME_PREFIX: &str = "Basic ";

/// Return the token following `"Basic "`, if the header uses that scheme.
pub fn extract_basic_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix(BASIC_SCHEME_PREFIX)
}

/// Base64-decode a token into UTF-8 text.
pub fn decode_token(token: Option<&str>) -> Option<String> {
    let bytes = match STANDARD.decode(token?) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Rejected Basic token: invalid base64 ({})", e);
            return None;
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            debug!("Rejected Basic token: decoded bytes are not UTF-8");
            None
        }
    }
}

/// Split `user:password` on the first colon.
pub fn split_credentials(decoded: Option<&str>) -> Option<(String, String)> {
    let (user, password) = decoded?.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Run the whole chain on a raw `Authorization` header value.
pub fn credentials_from_header(header: Option<&str>) -> Option<(String, String)> {
    let decoded = decode_token(extract_basic_token(header))?;
    split_credentials(Some(&decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_token() {
        assert_eq!(
            extract_basic_token(Some("Basic QWxhZGRpbjpPcGVuU2VzYW1l")),
            Some("QWxhZGRpbjpPcGVuU2VzYW1l")
        );
        assert_eq!(extract_basic_token(Some("Bearer xyz")), None);
        assert_eq!(extract_basic_token(Some("basic QWxh")), None);
        assert_eq!(extract_basic_token(Some("Basic")), None);
        assert_eq!(extract_basic_token(None), None);
    }

    #[test]
    fn test_decode_token() {
        assert_eq!(
            decode_token(Some("QWxhZGRpbjpPcGVuU2VzYW1l")).as_deref(),
            Some("Aladdin:OpenSesame")
        );
        assert_eq!(decode_token(Some("not-base64!!")), None);
        assert_eq!(decode_token(None), None);
    }

    #[test]
    fn test_decode_token_rejects_invalid_utf8() {
        let token = STANDARD.encode([0xffu8, 0xfe, 0x3a, 0x61]);
        assert_eq!(decode_token(Some(&token)), None);
    }

    #[test]
    fn test_split_credentials() {
        assert_eq!(
            split_credentials(Some("Aladdin:OpenSesame")),
            Some(("Aladdin".to_string(), "OpenSesame".to_string()))
        );
        assert_eq!(
            split_credentials(Some("Aladdin:Open:Sesame")),
            Some(("Aladdin".to_string(), "Open:Sesame".to_string()))
        );
        assert_eq!(
            split_credentials(Some("Aladdin:")),
            Some(("Aladdin".to_string(), String::new()))
        );
        assert_eq!(split_credentials(Some("noColon")), None);
        assert_eq!(split_credentials(None), None);
    }

    #[test]
    fn test_credentials_from_header() {
        let header = format!("Basic {}", STANDARD.encode("bob@hbtn.io:H0lberton:School"));
        assert_eq!(
            credentials_from_header(Some(&header)),
            Some(("bob@hbtn.io".to_string(), "H0lberton:School".to_string()))
        );
        assert_eq!(credentials_from_header(Some("Basic %%%")), None);
        assert_eq!(credentials_from_header(Some("Token abc")), None);
    }

    #[test]
    fn test_round_trip_for_various_credentials() {
        let cases = [
            ("alice", "secret"),
            ("", "empty-user"),
            ("user@example.com", "p:a:s:s"),
            ("émile", "mot de passe"),
        ];
        for (user, password) in cases {
            let token = STANDARD.encode(format!("{user}:{password}"));
            let decoded = decode_token(Some(&token));
            assert_eq!(
                split_credentials(decoded.as_deref()),
                Some((user.to_string(), password.to_string()))
            );
        }
    }
}
