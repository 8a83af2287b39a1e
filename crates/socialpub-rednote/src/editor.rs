//! Content transforms and the page scripts that apply them.
//!
//! Scripts are JS function declarations run with `this` bound to the target
//! element. Text arguments are embedded as JSON string literals.

use serde_json::Value;

pub const CARET_TO_END_JS: &str = "function() { \
    const range = document.createRange(); \
    const selection = window.getSelection(); \
    range.selectNodeContents(this); \
    range.collapse(false); \
    selection.removeAllRanges(); \
    selection.addRange(range); \
    this.focus(); \
}";

pub const DISPATCH_INPUT_JS: &str =
    "function() { this.dispatchEvent(new Event('input', { bubbles: true })); }";

pub const DISPATCH_BLUR_JS: &str =
    "function() { this.dispatchEvent(new Event('blur', { bubbles: true })); }";

pub const SCROLL_INTO_VIEW_JS: &str = "function() { this.scrollIntoView({ block: 'center' }); }";

pub const CLICK_JS: &str = "function() { this.click(); }";

fn js_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// Set an input's value and let the page's reactive framework see it
pub fn set_value_js(value: &str) -> String {
    format!(
        "function() {{ this.value = {}; \
         this.dispatchEvent(new Event('input', {{ bubbles: true }})); }}",
        js_string(value)
    )
}

pub fn set_html_js(html: &str) -> String {
    format!("function() {{ this.innerHTML = {}; }}", js_string(html))
}

/// One paragraph per non-blank line, followed by an empty paragraph that
/// gives the caret somewhere to land for hashtags.
pub fn body_html(body: &str) -> String {
    let mut html: String = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect();
    html.push_str("<p><br></p>");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Hashtag text without surrounding whitespace or leading `#`; `None` if
/// nothing is left.
pub fn clean_hashtag(tag: &str) -> Option<&str> {
    let cleaned = tag.trim().trim_start_matches('#');
    (!cleaned.is_empty()).then_some(cleaned)
}
