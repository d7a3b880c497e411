//! # HTML Page Rendering
//!
//! Minimal document shell used by every HTML response. Fragments are
//! pre-formatted HTML and pass through verbatim; callers are responsible
//! for escaping any data value (project names, filenames, paths) they
//! interpolate into a fragment, using [`escape_html`].

/// Assemble a minimal HTML document from body and head fragments.
///
/// Produces `<!DOCTYPE html><html>` + an optional `<head>` wrapping the
/// head fragments + `<body>` wrapping the body fragments + `</html>`.
/// Both slices may be empty; an empty `head` omits the `<head>` element
/// entirely.
pub fn render_page(body: &[String], head: &[String]) -> String {
    let mut html = String::from("<!DOCTYPE html><html>");
    if !head.is_empty() {
        html.push_str("<head>");
        for fragment in head {
            html.push_str(fragment);
        }
        html.push_str("</head>");
    }
    html.push_str("<body>");
    for fragment in body {
        html.push_str(fragment);
    }
    html.push_str("</body></html>");
    html
}

/// Escape a data value for safe interpolation into HTML text or an
/// attribute value.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_with_head() {
        let head = vec!["<title>Simple index</title>".to_string()];
        let body = vec!["<a href=\"/simple/foo/\">foo</a> ".to_string()];
        assert_eq!(
            render_page(&body, &head),
            "<!DOCTYPE html><html><head><title>Simple index</title></head>\
             <body><a href=\"/simple/foo/\">foo</a> </body></html>"
        );
    }

    #[test]
    fn test_render_page_without_head_omits_head_element() {
        let body = vec!["<h1>hello</h1>".to_string()];
        let html = render_page(&body, &[]);
        assert_eq!(html, "<!DOCTYPE html><html><body><h1>hello</h1></body></html>");
        assert!(!html.contains("<head>"));
    }

    #[test]
    fn test_render_page_empty_everything() {
        assert_eq!(render_page(&[], &[]), "<!DOCTYPE html><html><body></body></html>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain-name_1.0"), "plain-name_1.0");
        assert_eq!(
            escape_html("<script>\"x\"&'y'</script>"),
            "&lt;script&gt;&quot;x&quot;&amp;&#x27;y&#x27;&lt;/script&gt;"
        );
    }
}
