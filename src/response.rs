//! Response builders shared by every handler

use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full, combinators::BoxBody};
use hyper::header::{CONTENT_TYPE, HeaderValue, LOCATION};
use hyper::{Method, Response, StatusCode};
use tracing::error;

/// Body type produced by all handlers
pub type Body = BoxBody<Bytes, hyper::Error>;

/// Create text response
pub fn text_response(status: StatusCode, body: &str) -> Response<Body> {
    let mut response = Response::new(full_body(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Generic 500 that never carries internal error detail
pub fn internal_error() -> Response<Body> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Create redirect response to `target`, resolved against the request path
///
/// GET requests also get a short HTML link to the target, and GET and HEAD
/// both get the html content type.
pub fn redirect_response(
    status: StatusCode,
    method: &Method,
    request_path: &str,
    target: &str,
) -> Response<Body> {
    let location = resolve_location(request_path, target);

    let value = match HeaderValue::from_str(&location) {
        Ok(v) => v,
        Err(e) => {
            error!("Cannot redirect to {:?}: {}", location, e);
            return internal_error();
        }
    };

    let body = if method == Method::GET {
        let reason = status.canonical_reason().unwrap_or("Redirect");
        full_body(Bytes::from(format!(
            "<a href=\"{}\">{}</a>.\n",
            html_escape(&location),
            reason
        )))
    } else {
        empty_body()
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(LOCATION, value);
    if method == Method::GET || method == Method::HEAD {
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    }
    response
}

/// Turn a mapping target into a `Location` value
///
/// Targets with a scheme or a `//host` pass through. Paths are cleaned of dot
/// segments; a relative one is first joined to the directory of the request path.
pub fn resolve_location(request_path: &str, target: &str) -> String {
    if target.starts_with("//") || has_scheme(target) {
        return target.to_string();
    }

    let (target_path, query) = match target.find(['?', '#']) {
        Some(i) => target.split_at(i),
        None => (target, ""),
    };

    let raw = if target_path.starts_with('/') {
        target_path.to_string()
    } else {
        let dir = match request_path.rfind('/') {
            Some(i) => &request_path[..=i],
            None => "/",
        };
        format!("{}{}", dir, target_path)
    };

    let mut joined = clean_path(&raw);
    if raw.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(query);
    joined
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(target: &str) -> bool {
    let Some(colon) = target.find(':') else {
        return false;
    };
    let scheme = &target[..colon];
    let mut chars = scheme.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Remove `.`/`..` segments and duplicate slashes
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Create full body
pub fn full_body(bytes: Bytes) -> Body {
    Full::new(bytes)
        .map_err(|never| match never {})
        .boxed()
}

/// Create empty body
pub fn empty_body() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve_location("/a/b", "https://go.dev/doc"),
            "https://go.dev/doc"
        );
    }

    #[test]
    fn test_resolve_keeps_any_schemed_target() {
        assert_eq!(
            resolve_location("/a/b", "http://localhost:99999/x"),
            "http://localhost:99999/x"
        );
        assert_eq!(resolve_location("/a/b", "mailto:ops@example.com"), "mailto:ops@example.com");
        assert_eq!(resolve_location("/a/b", "//cdn.example/x/../y"), "//cdn.example/x/../y");
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(resolve_location("/a/b", "/docs?x=1"), "/docs?x=1");
        assert_eq!(resolve_location("/a/b", "/x/../y"), "/y");
        assert_eq!(resolve_location("/a/b", "/x/./y/?q=../z"), "/x/y/?q=../z");
    }

    #[test]
    fn test_resolve_relative_target() {
        assert_eq!(resolve_location("/a/b", "docs"), "/a/docs");
        assert_eq!(resolve_location("/a/b/", "docs"), "/a/b/docs");
        assert_eq!(resolve_location("/a/b", "../up/"), "/up/");
        assert_eq!(resolve_location("/a/b", "./here?q=1"), "/a/here?q=1");
        assert_eq!(resolve_location("/a/b", "a/b:c"), "/a/a/b:c");
    }

    #[test]
    fn test_resolve_empty_target() {
        assert_eq!(resolve_location("/a/b", ""), "/a/");
    }

    #[tokio::test]
    async fn test_get_redirect_has_html_link() {
        let response = redirect_response(StatusCode::FOUND, &Method::GET, "/go", "https://go.dev/?a=1&b=<2>");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "https://go.dev/?a=1&b=<2>");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &body[..],
            b"<a href=\"https://go.dev/?a=1&amp;b=&lt;2&gt;\">Found</a>.\n"
        );
    }

    #[tokio::test]
    async fn test_head_and_post_redirects_have_no_body() {
        let head = redirect_response(StatusCode::MOVED_PERMANENTLY, &Method::HEAD, "/go", "https://go.dev");
        assert_eq!(head.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(head.into_body().collect().await.unwrap().to_bytes().is_empty());

        let post = redirect_response(StatusCode::FOUND, &Method::POST, "/go", "https://go.dev");
        assert_eq!(post.headers()[LOCATION], "https://go.dev");
        assert!(post.headers().get(CONTENT_TYPE).is_none());
        assert!(post.into_body().collect().await.unwrap().to_bytes().is_empty());
    }

    #[test]
    fn test_redirect_with_unencodable_target() {
        let response = redirect_response(StatusCode::FOUND, &Method::GET, "/x", "/bad\nheader");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
