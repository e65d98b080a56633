//! Renders the HTML that replaces a marker.
//!
//! Scripts are loaded from the CDN with an `onerror` handler that records
//! the failure on a global object, keyed by the entry's ordinal. A second
//! inline script checks that key and, if set, writes a `<script>` tag for
//! the local copy into the document.
//!
//! Stylesheets are loaded from the CDN and checked right after the `<link>`
//! is parsed: when the last entry of `document.styleSheets` is missing, has
//! a different `href`, or has no parsed rules, a `<link>` to the local copy
//! is appended to `document.head`.
//!
//! A CDN stylesheet containing only at-rules (eg. `@viewport`) exposes no
//! parsed rules, so it is always treated as failed and the local copy is
//! loaded as well.

use std::borrow::Cow;

use crate::manifest::AssetEntry;

/// Name of the global object the generated scripts record failures on.
pub const FAILOVER_GLOBAL: &str = "cdnfailover";

/// Builds the `<script>` markup for `entry`.
///
/// `ordinal` must be unique among the entries of one build; it names the
/// failure flag (`_0`, `_1`, ...) so concurrently failing scripts do not
/// collide.
pub fn build_script_snippet(entry: &AssetEntry, ordinal: usize, local_only: bool) -> String {
    let local = attribute(&entry.local_path);
    if local_only {
        return format!("<script src=\"{local}\" ></script>");
    }
    let cdn = attribute(&entry.cdn_url);
    let optional = optional_attributes(entry);
    let global = FAILOVER_GLOBAL;
    let key = flag_key(ordinal);
    let fallback_tag = escape_js_string(&format!("<script src=\"{local}\"></script>"), '\'');
    format!(
        "<script src=\"{cdn}\" {optional}\
         onerror=\"(typeof {global}==='undefined')?{global}={{{key}:true}}:{global}.{key}=true\">\
         </script>\
         <script>(typeof {global}!== 'undefined')&&{global}.hasOwnProperty('{key}')\
         &&document.write('{fallback_tag}');</script>"
    )
}

/// Builds the `<link rel="stylesheet">` markup for `entry`.
pub fn build_style_snippet(entry: &AssetEntry, local_only: bool) -> String {
    if local_only {
        let local = attribute(&entry.local_path);
        return format!("<link rel=\"stylesheet\" href=\"{local}\">");
    }
    let cdn = attribute(&entry.cdn_url);
    let optional = optional_attributes(entry);
    let cdn_js = escape_js_string(&entry.cdn_url, '"');
    let local_js = escape_js_string(&entry.local_path, '"');
    format!(
        "<link rel=\"stylesheet\" href=\"{cdn}\" {optional}>\
         <script>var e=document.styleSheets[document.styleSheets.length-1];\
         if(typeof e===\"undefined\"||e.href!==\"{cdn_js}\"\
         ||((!e.cssRules||!e.cssRules.length)&&(!e.rules||!e.rules.length)))\
         (function(){{var e=document.createElement(\"link\");\
         e.rel=\"stylesheet\",e.href=\"{local_js}\",document.head.appendChild(e)}})();</script>"
    )
}

/// Key of the failure flag for the entry at `ordinal`.
pub fn flag_key(ordinal: usize) -> String {
    format!("_{ordinal}")
}

/// The optional CDN attributes, in output order. Each present attribute is
/// rendered as `name="value" ` (trailing space included).
fn optional_attributes(entry: &AssetEntry) -> String {
    [
        ("integrity", entry.integrity()),
        ("crossorigin", entry.cross_origin()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| format!("{name}=\"{}\" ", attribute(value))))
    .collect()
}

fn attribute(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Escape `s` for a JavaScript string literal delimited by `quote` that sits
/// inside an inline `<script>` element.
///
/// Any `</` is written as `<\/` so the literal cannot close the element.
pub fn escape_js_string(s: &str, quote: char) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            '<' if chars.peek() == Some(&'/') => result.push_str("<\\"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap_js() -> AssetEntry {
        AssetEntry::new(
            "bootstrap-min-js",
            "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/js/bootstrap.min.js",
            "js/bootstrap/dist/js/bootstrap.min.js",
        )
    }

    fn bootstrap_css() -> AssetEntry {
        AssetEntry::new(
            "bootstrap-min-css",
            "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css",
            "css/bootstrap/dist/css/bootstrap.min.css",
        )
    }

    #[test]
    fn script_snippet_full_output() {
        let entry = bootstrap_js()
            .with_integrity("sha384-Tc5IQib027qvyjSMfHjOMaLkfuWVxZxUPnCJA7l2mCWNIpG9mGCD8wGNIcPD7Txa")
            .with_cross_origin("anonymous");
        let expected = concat!(
            r#"<script src="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/js/bootstrap.min.js" "#,
            r#"integrity="sha384-Tc5IQib027qvyjSMfHjOMaLkfuWVxZxUPnCJA7l2mCWNIpG9mGCD8wGNIcPD7Txa" "#,
            r#"crossorigin="anonymous" "#,
            r#"onerror="(typeof cdnfailover==='undefined')?cdnfailover={_22:true}:cdnfailover._22=true">"#,
            r#"</script><script>(typeof cdnfailover!== 'undefined')&&cdnfailover.hasOwnProperty('_22')"#,
            r#"&&document.write('<script src="js/bootstrap/dist/js/bootstrap.min.js"><\/script>');</script>"#,
        );
        assert_eq!(build_script_snippet(&entry, 22, false), expected);
    }

    #[test]
    fn script_snippet_local_only() {
        assert_eq!(
            build_script_snippet(&bootstrap_js(), 3, true),
            r#"<script src="js/bootstrap/dist/js/bootstrap.min.js" ></script>"#,
        );
        let empty = AssetEntry::new("x", "https://x/a.js", "");
        assert_eq!(build_script_snippet(&empty, 0, true), r#"<script src="" ></script>"#);
    }

    #[test]
    fn script_snippet_without_optional_attributes() {
        let snippet = build_script_snippet(&bootstrap_js(), 0, false);
        assert!(snippet.starts_with(
            r#"<script src="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/js/bootstrap.min.js" onerror="#
        ));
        assert!(!snippet.contains("integrity"));
        assert!(!snippet.contains("crossorigin"));
    }

    #[test]
    fn script_snippet_flag_key_follows_ordinal() {
        let first = build_script_snippet(&bootstrap_js(), 0, false);
        let second = build_script_snippet(&bootstrap_js(), 1, false);
        assert!(first.contains("cdnfailover={_0:true}"));
        assert!(first.contains("hasOwnProperty('_0')"));
        assert!(second.contains("cdnfailover={_1:true}"));
        assert!(second.contains("hasOwnProperty('_1')"));
        assert!(!second.contains("_0"));
    }

    #[test]
    fn script_snippet_written_tag_is_not_closed_early() {
        let snippet = build_script_snippet(&bootstrap_js(), 0, false);
        // the CDN tag and the inline checker each close once
        assert_eq!(snippet.matches("</script>").count(), 2);
        assert!(snippet.contains(r#"<\/script>"#));
    }

    #[test]
    fn style_snippet_full_output() {
        let entry = bootstrap_css()
            .with_integrity("sha384-BVYiiSIFeK1dGmJRAkycuHAHRg32OmUcww7on3RYdg4Va+PmSTsz/K68vbdEjh4u")
            .with_cross_origin("anonymous");
        let expected = concat!(
            r#"<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css" "#,
            r#"integrity="sha384-BVYiiSIFeK1dGmJRAkycuHAHRg32OmUcww7on3RYdg4Va+PmSTsz/K68vbdEjh4u" "#,
            r#"crossorigin="anonymous" >"#,
            r#"<script>var e=document.styleSheets[document.styleSheets.length-1];"#,
            r#"if(typeof e==="undefined"||e.href!=="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css""#,
            r#"||((!e.cssRules||!e.cssRules.length)&&(!e.rules||!e.rules.length)))"#,
            r#"(function(){var e=document.createElement("link");"#,
            r#"e.rel="stylesheet",e.href="css/bootstrap/dist/css/bootstrap.min.css",document.head.appendChild(e)})();</script>"#,
        );
        assert_eq!(build_style_snippet(&entry, false), expected);
    }

    #[test]
    fn style_snippet_local_only() {
        assert_eq!(
            build_style_snippet(&bootstrap_css(), true),
            r#"<link rel="stylesheet" href="css/bootstrap/dist/css/bootstrap.min.css">"#,
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let entry = AssetEntry::new("q", "https://x/a.css", r#"css/"odd".css"#);
        let snippet = build_style_snippet(&entry, true);
        assert_eq!(snippet, r#"<link rel="stylesheet" href="css/&quot;odd&quot;.css">"#);
        let snippet = build_style_snippet(&entry, false);
        assert!(snippet.contains(r#"e.href="css/\"odd\".css""#));
    }

    #[test]
    fn js_string_escaping() {
        assert_eq!(escape_js_string(r"a\b", '"'), r"a\\b");
        assert_eq!(escape_js_string("it's", '\''), r"it\'s");
        assert_eq!(escape_js_string("it's", '"'), "it's");
        assert_eq!(escape_js_string("</script>", '\''), r"<\/script>");
        assert_eq!(escape_js_string("a<b", '\''), "a<b");
    }
}
