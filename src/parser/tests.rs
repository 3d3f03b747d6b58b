//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use tokio::io::BufReader;

    use crate::parser::{
        decode_component, parse_form, parse_pairs, read_request, Error, HttpVersion, Method,
    };

    async fn parse(bytes: &[u8]) -> Result<crate::parser::HttpRequest, Error> {
        let mut reader = BufReader::new(bytes);
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.target, "/index.html");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert!(result.body.is_empty());
    }

    #[tokio::test]
    async fn test_parse_request_with_multiple_headers() {
        let request =
            b"GET /index.html HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test\r\nAccept: */*\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert_eq!(result.headers.get("User-Agent").unwrap(), "test");
        assert_eq!(result.headers.get("Accept").unwrap(), "*/*");
    }

    #[tokio::test]
    async fn test_case_insensitive_header_lookup() {
        let request = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert!(result.has_header("host"));
        assert!(result.has_header("HOST"));
        assert!(result.has_header("Host"));
    }

    #[tokio::test]
    async fn test_two_token_request_line() {
        let request = b"GET /\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let result = parse(b"").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[tokio::test]
    async fn test_missing_host_header() {
        let request = b"GET /index.html HTTP/1.1\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::MissingHostHeader)));
    }

    #[tokio::test]
    async fn test_header_without_colon() {
        let request = b"GET / HTTP/1.1\r\nHost: example.com\r\nBrokenHeader\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::MalformedHeader(ref h)) if h == "BrokenHeader"));
    }

    #[tokio::test]
    async fn test_header_value_is_trimmed() {
        let request = b"GET / HTTP/1.1\r\nHost:    example.com   \r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
    }

    #[tokio::test]
    async fn test_unsupported_version() {
        let request = b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::UnsupportedVersion(ref v)) if v == "HTTP/1.0"));
    }

    #[tokio::test]
    async fn test_disallowed_method() {
        let request = b"DELETE /anything HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::MethodNotAllowed(ref m)) if m == "DELETE"));
    }

    #[tokio::test]
    async fn test_version_checked_before_method() {
        // A bad version on a disallowed method still reads as a version
        // problem, so the server answers 400 rather than 405.
        let request = b"DELETE / HTTP/0.9\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[tokio::test]
    async fn test_body_read_to_content_length() {
        let request =
            b"POST /app-add HTTP/1.1\r\nHost: example.com\r\nContent-Length: 21\r\n\r\nfirst=Mick&last=Jager";
        let result = parse(request).await.unwrap();
        assert_eq!(result.method, Method::POST);
        assert_eq!(result.body, b"first=Mick&last=Jager");
    }

    #[tokio::test]
    async fn test_non_integer_content_length() {
        let request = b"POST /app-add HTTP/1.1\r\nHost: example.com\r\nContent-Length: abc\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::InvalidContentLength(ref v)) if v == "abc"));
    }

    #[tokio::test]
    async fn test_oversized_content_length_rejected_before_allocation() {
        // An exabyte-scale declared length must fail as a bad header, not
        // reach the body buffer allocation.
        let request =
            b"POST /app-add HTTP/1.1\r\nHost: example.com\r\nContent-Length: 1152921504606846976\r\n\r\n";
        let result = parse(request).await;
        assert!(matches!(
            result,
            Err(Error::InvalidContentLength(ref v)) if v == "1152921504606846976"
        ));
    }

    #[tokio::test]
    async fn test_content_length_at_limit_is_accepted() {
        let mut request =
            b"POST /app-add HTTP/1.1\r\nHost: example.com\r\nContent-Length: 1048576\r\n\r\n".to_vec();
        request.extend(std::iter::repeat(b'x').take(1048576));
        let result = parse(&request).await.unwrap();
        assert_eq!(result.body.len(), 1048576);
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let request = b"POST /app-add HTTP/1.1\r\nHost: example.com\r\nContent-Length: 50\r\n\r\nshort";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_first_segment() {
        let request = b"GET /app-index?first=Mick&last= HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.first_segment(), "app-index?first=Mick&last=");

        let request = b"GET /css/style.css HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.first_segment(), "css");

        let request = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.first_segment(), "");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("Mick"), "Mick");
        assert_eq!(decode_component("Mick+Jagger"), "Mick Jagger");
        assert_eq!(decode_component("O%27Brien"), "O'Brien");
        // Invalid escapes pass through untouched
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
    }

    #[test]
    fn test_parse_pairs_drops_malformed() {
        let pairs = parse_pairs("first=Mick&broken&last=Jagger&a=b=c");
        assert_eq!(
            pairs,
            vec![
                ("first".to_string(), "Mick".to_string()),
                ("last".to_string(), "Jagger".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_form_both_orders() {
        let form = parse_form(b"first=Mick&last=Jagger").unwrap();
        assert_eq!(form.first, "Mick");
        assert_eq!(form.last, "Jagger");

        let form = parse_form(b"last=Jagger&first=Mick").unwrap();
        assert_eq!(form.first, "Mick");
        assert_eq!(form.last, "Jagger");
    }

    #[test]
    fn test_parse_form_decodes_values() {
        let form = parse_form(b"first=Mick+K&last=O%27Brien").unwrap();
        assert_eq!(form.first, "Mick K");
        assert_eq!(form.last, "O'Brien");
    }

    #[test]
    fn test_parse_form_rejects_bad_shapes() {
        assert!(matches!(parse_form(b"first=Mick"), Err(Error::MalformedForm(_))));
        assert!(matches!(
            parse_form(b"first=Mick&middle=X&last=Jagger"),
            Err(Error::MalformedForm(_))
        ));
        assert!(matches!(
            parse_form(b"first=Mick&middle=X"),
            Err(Error::MalformedForm(_))
        ));
        assert!(matches!(
            parse_form(b"first=Mick&first=Again"),
            Err(Error::MalformedForm(_))
        ));
        assert!(matches!(parse_form(b"garbage"), Err(Error::MalformedForm(_))));
        assert!(matches!(parse_form(b"\xff\xfe&a=b"), Err(Error::MalformedForm(_))));
    }
}
