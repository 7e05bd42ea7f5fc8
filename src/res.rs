use crate::session::Notice;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// HTML-escapes `text`. Braces are encoded too so a value can never form a
/// `{placeholder}` for a later `replace`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn notices_html(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            include_res!(str, "/pages/notice.html")
                .replace("{level}", notice.level.as_str())
                .replace("{text}", &escape(&notice.text))
        })
        .collect()
}
