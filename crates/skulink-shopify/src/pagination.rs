//! Cursor extraction from the Admin API's `Link` response header.
//!
//! Each page response carries URLs for adjacent pages in the `Link` header,
//! with the cursor encoded as a `page_info` query parameter:
//!
//! ```text
//! <https://acme.myshopify.com/admin/api/2024-07/products.json?limit=100&page_info=NEXT>; rel="next"
//! ```
//!
//! A combined header lists the `previous` and `next` directives separated by
//! a comma.

/// Extracts the `page_info` cursor for the next page from a `Link` header
/// value.
///
/// Returns `None` when the header is absent, when no `rel="next"` directive
/// exists (last page), or when the next URL carries no `page_info` parameter.
#[must_use]
pub fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    for directive in header.split(',') {
        let directive = directive.trim();
        if !directive.contains(r#"rel="next""#) {
            continue;
        }

        let (_, after_bracket) = directive.split_once('<')?;
        let (url, _) = after_bracket.split_once('>')?;
        return query_param(url, "page_info");
    }

    None
}

/// Pulls a named query parameter out of a URL string. Cursors are
/// base64url-encoded, so no percent-decoding is needed.
fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let needle = format!("{name}=");
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(needle.as_str()))
        .map(|value| value.split('#').next().unwrap_or(value))
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
