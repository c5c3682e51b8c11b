use regex::Regex;
use view::{
    ChangeKind, ChangeLog, DowncastWriter, ElementOptions, ElementPattern, Pattern,
    PropertyKey, PropertyPattern, UpcastWriter, ViewDocument, NO_ATTRIBUTES,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn similar_elements_share_identity() {
    let mut doc = ViewDocument::new();
    let mut writer = DowncastWriter::new(&mut doc);

    let first = writer.create_container_element(
        "span",
        [("class", "b a"), ("style", "margin:1px"), ("title", "t"), ("data-x", "1")],
    );
    let second = writer.create_container_element(
        "span",
        [("data-x", "1"), ("title", "t"), ("class", "a b")],
    );
    writer
        .set_styles(
            second,
            &[
                ("margin-top", "1px"),
                ("margin-right", "1px"),
                ("margin-bottom", "1px"),
                ("margin-left", "1px"),
            ],
        )
        .unwrap();

    let first = doc.element(first).unwrap();
    let second = doc.element(second).unwrap();
    assert!(first.is_similar(second));
    assert_eq!(first.identity(), second.identity());
    assert_eq!(
        first.identity(),
        "span class=\"a,b\" style=\"margin:1px;\" data-x=\"1\" title=\"t\""
    );
}

#[test]
fn deep_clone_is_independent() {
    let mut doc = ViewDocument::new();
    let mut writer = DowncastWriter::new(&mut doc);

    let list = writer.create_container_element("ul", [("class", "list")]);
    let item = writer.create_container_element("li", [("style", "color:red")]);
    let bold = writer
        .create_attribute_element("b", NO_ATTRIBUTES, ElementOptions::default())
        .unwrap();
    writer.append(bold, vec!["x".into()]).unwrap();
    writer.append(item, vec![bold.into()]).unwrap();
    writer.append(list, vec![item.into()]).unwrap();
    writer.set_custom_property(list, "marker", 42u32).unwrap();

    let copy = writer.clone_element(list, true).unwrap();
    let copied_item = writer.document().child(copy, 0).unwrap().unwrap();
    let other = writer.create_container_element("div", NO_ATTRIBUTES);
    writer.append(other, vec![copied_item.into()]).unwrap();

    assert_ne!(copy, list);
    assert_eq!(
        doc.element(copy).unwrap().identity(),
        doc.element(list).unwrap().identity()
    );
    assert_eq!(doc.children(list).unwrap(), &[item]);
    assert!(doc.children(copy).unwrap().is_empty());
    assert_eq!(
        doc.element(copied_item).unwrap().identity(),
        doc.element(item).unwrap().identity()
    );
    assert_eq!(doc.text_content(copied_item).unwrap(), "x");
    assert_eq!(
        doc.element(copy)
            .unwrap()
            .custom_property_as::<u32>(&PropertyKey::from("marker")),
        Some(&42)
    );
}

#[test]
fn class_helpers_round_trip() {
    let mut doc = ViewDocument::new();
    let mut writer = UpcastWriter::new(&mut doc);
    let p = writer.create_element("p", NO_ATTRIBUTES, Vec::new()).unwrap();

    writer.set_attribute(p, "class", "a b").unwrap();
    assert_eq!(
        writer.document().element(p).unwrap().get_attribute("class").as_deref(),
        Some("a b")
    );

    writer.add_class(p, "c").unwrap();
    assert!(writer.document().element(p).unwrap().has_class(&["a", "b", "c"]));

    writer.remove_class(p, &["a"]).unwrap();
    let element = doc.element(p).unwrap();
    assert!(!element.has_attribute("class", Some("a")));
    assert!(element.has_attribute("class", Some("b")));
}

#[test]
fn insert_then_remove_round_trips() {
    let mut doc = ViewDocument::new();
    let mut writer = DowncastWriter::new(&mut doc);
    let div = writer.create_container_element("div", NO_ATTRIBUTES);
    let first = writer.create_text("first");
    let last = writer.create_text("last");
    writer.append(div, vec![first.into(), last.into()]).unwrap();

    let a = writer.create_container_element("p", NO_ATTRIBUTES);
    let b = writer.create_text("b");
    let inserted = writer.insert(div, 1, vec![a.into(), b.into()]).unwrap();
    assert_eq!(inserted, 2);

    let removed = writer.remove_children(div, 1, 2).unwrap();
    assert_eq!(removed, vec![a, b]);
    assert_eq!(doc.parent(a).unwrap(), None);
    assert_eq!(doc.parent(b).unwrap(), None);
    assert_eq!(doc.children(div).unwrap(), &[first, last]);
}

#[test]
fn regex_key_pattern_tolerates_missing_value() {
    let mut doc = ViewDocument::new();
    let mut writer = DowncastWriter::new(&mut doc);
    let a = writer.create_container_element("a", [("data-id", "7")]);
    let element = doc.element(a).unwrap();

    let exact = PropertyPattern::new("data-id", "8");
    assert_eq!(element.attributes_match(&[exact], &[]), None);

    let regex = PropertyPattern::new(Regex::new("^data-").unwrap(), "8");
    assert_eq!(
        element.attributes_match(&[regex], &[]),
        Some(vec![("data-id".to_string(), None)])
    );
}

#[test]
fn changes_are_reported_before_they_apply() {
    init_tracing();

    let mut doc = ViewDocument::new();
    let log = ChangeLog::new();
    doc.add_listener(Box::new(log.clone()));

    let mut writer = DowncastWriter::new(&mut doc);
    let p = writer.create_container_element("p", [("title", "old")]);
    writer.set_attribute(p, "title", "new").unwrap();
    writer.append(p, vec!["text".into()]).unwrap();
    writer.set_custom_property(p, "silent", true).unwrap();

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, ChangeKind::Attributes);
    assert_eq!(entries[0].before.as_deref(), Some("p title=\"old\""));
    assert_eq!(entries[1].kind, ChangeKind::Children);
    assert_eq!(entries[1].node, p);
}

#[test]
fn moving_a_node_notifies_both_parents() {
    let mut doc = ViewDocument::new();
    let log = ChangeLog::new();
    doc.add_listener(Box::new(log.clone()));

    let mut writer = DowncastWriter::new(&mut doc);
    let from = writer.create_container_element("p", NO_ATTRIBUTES);
    let to = writer.create_container_element("p", NO_ATTRIBUTES);
    let text = writer.create_text("x");
    writer.append(from, vec![text.into()]).unwrap();
    log.clear();

    writer.append(to, vec![text.into()]).unwrap();

    let nodes: Vec<_> = log.entries().iter().map(|change| change.node).collect();
    assert_eq!(nodes, vec![to, from]);
    assert_eq!(doc.parent(text).unwrap(), Some(to));
}

#[test]
fn find_ancestor_stops_at_fragment() {
    let mut doc = ViewDocument::new();
    let mut writer = UpcastWriter::new(&mut doc);

    let text = writer.create_text("x");
    let span = writer
        .create_element("span", [("class", "inner")], vec![text.into()])
        .unwrap();
    let section = writer
        .create_element("section", [("data-kind", "box")], vec![span.into()])
        .unwrap();
    let fragment = writer.create_document_fragment(vec![section.into()]).unwrap();

    assert_eq!(doc.find_ancestor(text, ["section"]).unwrap(), Some(section));
    assert_eq!(
        doc.find_ancestor(text, [ElementPattern::new().class("inner")])
            .unwrap(),
        Some(span)
    );
    assert_eq!(
        doc.find_ancestor(
            text,
            [Pattern::predicate(|element| element.has_attribute("data-kind", Some("box")))]
        )
        .unwrap(),
        Some(section)
    );
    assert_eq!(doc.find_ancestor(text, ["div"]).unwrap(), None);
    assert_eq!(doc.parent(section).unwrap(), Some(fragment));
    assert_eq!(doc.find_ancestor(section, ["section"]).unwrap(), None);
}
