//! End-to-end display behavior for the canonical clip shapes

use mark_clipper::{Clip, ContentOptions, ContentSource};

mod common;

#[test]
fn test_normal_content_flattens_heading() {
    let clip = Clip::new()
        .with_html("<h1>Title</h1><p>Body</p>")
        .with_text("Title\nBody");

    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.source, ContentSource::Processed);
        assert_eq!(display.content, "<h2>Title</h2><p>Body</p>");
        assert!(!display.content.contains("<h1"));
    }
}

#[test]
fn test_malformed_html_still_displays() {
    let clip = Clip::new()
        .with_html("<h2>Open<p>Unclosed<div>")
        .with_text("Open Unclosed");

    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert!(display.is_trusted_html());
        assert!(display.content.contains("Open"));
        assert!(display.content.contains("Unclosed"));
    }
}

#[test]
fn test_all_empty_clip_gets_placeholder() {
    let clip = Clip::new().with_html("").with_text("").with_title("");
    let display = common::strategy(true).get_display_content(&clip, &ContentOptions::default());
    assert_eq!(display.source, ContentSource::Placeholder);
    assert_eq!(display.content, "No content available");
}

#[test]
fn test_whitespace_only_fields_count_as_empty() {
    let clip = Clip::new().with_html(" \n ").with_text("\t").with_title("  ");
    let display = common::strategy(true).get_display_content(&clip, &ContentOptions::default());
    assert_eq!(display.source, ContentSource::Placeholder);
}

#[test]
fn test_malicious_content_is_stripped() {
    let clip = Clip::new().with_html("<script>alert(1)</script><p>Safe</p>");
    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert!(!display.content.contains("<script"));
        assert!(!display.content.contains("alert"));
        assert!(display.content.contains("Safe"));
    }
}

#[test]
fn test_custom_placeholder_from_config() {
    let config = mark_clipper::PipelineConfig::builder()
        .placeholder("Empty clip")
        .build()
        .unwrap();
    let strategy = mark_clipper::ContentStrategy::new(&config);
    let display = strategy.get_display_content(&Clip::new(), &ContentOptions::default());
    assert_eq!(display.content, "Empty clip");
}

#[test]
fn test_article_clip_across_intents() {
    let strategy = common::strategy(true);
    let clip = common::article_clip();
    let options = ContentOptions::default();

    let display = strategy.get_display_content(&clip, &options);
    assert_eq!(
        display.content,
        "<h2>Ownership</h2><p>Each value has <strong>one</strong> owner.</p>\
         <ul><li>Move</li><li>Borrow</li></ul>"
    );

    let edit = strategy.get_edit_content(&clip, &options);
    assert_eq!(edit.source, ContentSource::RawHtml);
    assert_eq!(Some(edit.content), clip.html_raw.clone());

    assert_eq!(
        strategy.get_searchable_content(&clip),
        "Ownership\nEach value has one owner.\nMove\nBorrow"
    );

    let quality = strategy.assess_content_quality(&clip);
    assert_eq!(quality.score, 100);
}

#[tokio::test]
async fn test_async_display_matches_sync() {
    let strategy = common::strategy(true);
    let clip = common::article_clip();
    let options = ContentOptions::uncached();

    let sync = strategy.get_display_content(&clip, &options);
    let async_result = strategy
        .get_display_content_async(clip.clone(), options.clone())
        .await;
    assert_eq!(sync, async_result);
}

#[test]
fn test_batch_matches_individual_calls() {
    let strategy = common::strategy(true);
    let clips = vec![
        common::article_clip(),
        Clip::new().with_text("just text"),
        Clip::new().with_title("just a title"),
        Clip::new(),
    ];
    let options = ContentOptions::uncached();

    let batch = strategy.get_display_content_batch(&clips, &options);
    let sources: Vec<ContentSource> = batch.iter().map(|d| d.source).collect();
    assert_eq!(
        sources,
        vec![
            ContentSource::Processed,
            ContentSource::PlainText,
            ContentSource::Title,
            ContentSource::Placeholder,
        ]
    );
}

#[test]
fn test_whitespace_only_inline_element_keeps_words_apart() {
    let clip = Clip::new().with_html("<p>hello<span> </span>world</p>");
    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.source, ContentSource::Processed);
        assert_eq!(display.content, "<p>hello world</p>");
    }
}

#[test]
fn test_markup_in_attribute_value_does_not_hide_content() {
    let clip = Clip::new().with_html(r#"<p title="<script>">Important</p><p>More text</p>"#);
    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.content, "<p>Important</p><p>More text</p>");
    }
}

#[test]
fn test_stray_closing_tags_are_not_displayed() {
    let clip = Clip::new().with_html("</div></div></li><p>x</p>");
    for dom in [true, false] {
        let display = common::strategy(dom).get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.content, "<p>x</p>");
    }
}
