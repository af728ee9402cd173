//! Shared fixtures for the pipeline integration tests

use mark_clipper::{Clip, ContentStrategy, PipelineConfig};

/// A fully populated clip with well-formed HTML
#[allow(dead_code)]
pub fn article_clip() -> Clip {
    Clip::new()
        .with_title("Rust ownership")
        .with_html(
            "<h1>Ownership</h1><p>Each value has <b>one</b> owner.</p>\
             <ul><li>Move</li><li>Borrow</li></ul>",
        )
        .with_text("Ownership\nEach value has one owner.\nMove\nBorrow")
        .with_category("reading")
}

/// HTML assembled from common XSS payloads
#[allow(dead_code)]
pub const HOSTILE_HTML: &str = concat!(
    r#"<p onclick="steal()">Intro</p>"#,
    r#"<script>document.cookie</script>"#,
    r#"<img src="x" onerror="alert(1)">"#,
    r#"<a href="javascript:alert(1)">click</a>"#,
    r#"<a href=" JaVaScRiPt:alert(1)">spaced</a>"#,
    r#"<iframe src="https://evil.example"></iframe>"#,
    r#"<svg onload="alert(1)"><circle/></svg>"#,
    r#"<style>body { display: none }</style>"#,
    r#"<object data="evil.swf"></object>"#,
    r#"<!-- <script>hidden()</script> -->"#,
    r#"<img src="data:image/svg+xml;base64,PHN2Zz4=">"#,
);

/// Strategy with a DOM or regex-only sanitizer
#[allow(dead_code)]
pub fn strategy(dom_parsing: bool) -> ContentStrategy {
    let config = PipelineConfig::builder()
        .dom_parsing(dom_parsing)
        .build()
        .expect("default config is valid");
    ContentStrategy::new(&config)
}

/// Assert that `html` carries no executable markup
#[allow(dead_code)]
pub fn assert_no_active_content(html: &str) {
    let lower = html.to_ascii_lowercase();
    for needle in [
        "<script",
        "<iframe",
        "<object",
        "<embed",
        "<style",
        "<svg",
        "javascript:",
        "data:",
        "<!--",
    ] {
        assert!(!lower.contains(needle), "found {needle:?} in {html}");
    }
    assert!(
        !regex::Regex::new(r"(?i)<[^>]*\son[a-z]+\s*=")
            .unwrap()
            .is_match(html),
        "event handler left in {html}"
    );
}
