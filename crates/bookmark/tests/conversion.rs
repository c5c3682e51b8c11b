use bookmark::widget::widget_label;
use bookmark::{
    downcast_data, downcast_editing, is_widget, upcast, BookmarkConfig, BookmarkModel, Upcast,
};
use view::{json, DowncastWriter, ElementKind, ViewDocument, ViewSerializer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn data_round_trip() {
    init_tracing();

    let mut doc = ViewDocument::new();
    let bookmark = BookmarkModel::new("foo").unwrap();
    let mut writer = DowncastWriter::new(&mut doc);
    let anchor = downcast_data(&mut writer, &bookmark).unwrap();

    let element = doc.element(anchor).unwrap();
    assert_eq!(element.name(), "a");
    assert_eq!(element.get_attribute("id").as_deref(), Some("foo"));
    assert!(!element.has_attribute("href", None));
    assert_eq!(element.child_count(), 0);
    assert_eq!(
        ViewSerializer::new().serialize(&doc, anchor).unwrap(),
        "<a id=\"foo\"></a>"
    );

    let config = BookmarkConfig::default();
    assert_eq!(
        upcast(&doc, anchor, &config).unwrap(),
        Some(Upcast::Bookmark(bookmark.clone()))
    );

    let parsed = json::parse_str(&mut doc, r#"{"name": "a", "attributes": {"id": "foo"}}"#).unwrap();
    assert_eq!(
        upcast(&doc, parsed, &config).unwrap(),
        Some(Upcast::Bookmark(bookmark))
    );
}

#[test]
fn anchors_with_href_are_not_bookmarks() {
    let mut doc = ViewDocument::new();
    let empty = json::parse_str(
        &mut doc,
        r#"{"name": "a", "attributes": {"id": "foo", "href": "https://example.com"}}"#,
    )
    .unwrap();
    let with_text = json::parse_str(
        &mut doc,
        r##"{"name": "a", "attributes": {"id": "foo", "href": "#x"}, "children": ["link"]}"##,
    )
    .unwrap();

    for config in [
        BookmarkConfig::default(),
        BookmarkConfig {
            enable_non_empty_anchor_conversion: false,
            ..Default::default()
        },
    ] {
        assert_eq!(upcast(&doc, empty, &config).unwrap(), None);
        assert_eq!(upcast(&doc, with_text, &config).unwrap(), None);
    }
}

#[test]
fn non_empty_anchor_conversion() {
    let mut doc = ViewDocument::new();
    let anchor = json::parse_str(
        &mut doc,
        r#"{"name": "a", "attributes": {"id": "intro"}, "children": ["Intro", {"name": "b", "kind": "attribute"}]}"#,
    )
    .unwrap();
    let children = doc.children(anchor).unwrap().to_vec();

    let converted = upcast(&doc, anchor, &BookmarkConfig::default()).unwrap();
    assert_eq!(
        converted,
        Some(Upcast::BookmarkBeforeContent {
            bookmark: BookmarkModel::new("intro").unwrap(),
            children,
        })
    );

    let disabled = BookmarkConfig {
        enable_non_empty_anchor_conversion: false,
        ..Default::default()
    };
    assert_eq!(upcast(&doc, anchor, &disabled).unwrap(), None);
}

#[test]
fn invalid_ids_and_other_nodes_are_skipped() {
    let mut doc = ViewDocument::new();
    let spaced = json::parse_str(&mut doc, r#"{"name": "a", "attributes": {"id": "a b"}}"#).unwrap();
    let span = json::parse_str(&mut doc, r#"{"name": "span", "attributes": {"id": "x"}}"#).unwrap();
    let text = json::parse_str(&mut doc, r#""plain""#).unwrap();

    let config = BookmarkConfig::default();
    assert_eq!(upcast(&doc, spaced, &config).unwrap(), None);
    assert_eq!(upcast(&doc, span, &config).unwrap(), None);
    assert_eq!(upcast(&doc, text, &config).unwrap(), None);
}

#[test]
fn editing_downcast_is_a_widget() {
    let mut doc = ViewDocument::new();
    let bookmark = BookmarkModel::new("foo").unwrap();
    let mut writer = DowncastWriter::new(&mut doc);
    let anchor = downcast_editing(&mut writer, &bookmark).unwrap();

    let element = doc.element(anchor).unwrap();
    assert!(element.has_class(&["ck-bookmark", "ck-widget"]));
    assert_eq!(element.get_attribute("contenteditable").as_deref(), Some("false"));
    assert!(is_widget(element));
    assert_eq!(widget_label(element), Some("foo bookmark widget"));
    assert_eq!(doc.filler_offset(anchor).unwrap(), None);

    let icon = doc.child(anchor, 0).unwrap().unwrap();
    let icon = doc.element(icon).unwrap();
    assert_eq!(*icon.kind(), ElementKind::Ui);
    assert!(icon.has_class(&["ck-bookmark__icon"]));

    assert_eq!(
        ViewSerializer::new().serialize(&doc, anchor).unwrap(),
        "<a class=\"ck-bookmark ck-widget\" id=\"foo\" contenteditable=\"false\"></a>"
    );
}
