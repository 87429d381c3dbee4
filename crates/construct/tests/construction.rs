use construct::SheetRuntime;
use dom::Document;

fn loaded_runtime() -> SheetRuntime {
    let _ = env_logger::builder().is_test(true).try_init();
    let document = Document::new();
    document.finish_loading();
    let runtime = SheetRuntime::new(document);
    runtime.install();
    runtime
}

#[test]
fn construction_registers_a_fresh_empty_record() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();

    let registry = runtime.registry();
    assert!(registry.has(&sheet));
    let record = registry.get(&sheet).unwrap();
    assert!(record.adopters.is_empty(), "adopters start empty");
    assert!(record.actions.is_empty(), "action log starts empty");
}

#[test]
fn constructions_never_share_a_record() {
    let runtime = loaded_runtime();
    let first = runtime.construct();
    let second = runtime.construct();

    assert_ne!(first.id(), second.id());
    assert_eq!(runtime.registry().len(), 2);

    first.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(runtime.action_log(&first).unwrap().len(), 1);
    assert_eq!(runtime.action_log(&second).unwrap().len(), 0);
}

#[test]
fn construction_before_load_stages_the_backing_element() {
    let document = Document::new();
    let runtime = SheetRuntime::new(document.clone());
    runtime.install();

    let sheet = runtime.construct();
    assert_eq!(document.head().len(), 1, "backing element staged in head");
    assert_eq!(document.deferred().len(), 1, "backing element queued");
    let head = document.head();
    assert!(head[0].disabled(), "staged element must be inert");

    document.finish_loading();
    assert_eq!(document.head().len(), 0);
    assert_eq!(document.frame_body().len(), 1);
    assert!(!document.frame_body()[0].disabled());

    // The registry key survived the migration.
    assert!(runtime.registry().has(&sheet));
    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(runtime.action_log(&sheet).unwrap().len(), 1);
}

#[test]
fn identity_predicate_covers_constructed_and_native_sheets() {
    let runtime = loaded_runtime();

    let constructed = runtime.construct();
    assert!(runtime.is_constructed_stylesheet(&constructed));

    // A document-native sheet passes through the environment's own check.
    let element = runtime.document().create_style_element();
    let native = runtime.document().append_to_frame_body(&element);
    assert!(!runtime.registry().has(&native));
    assert!(runtime.is_constructed_stylesheet(&native));

    // A sheet from an unrelated document passes neither check.
    let other = Document::new();
    other.finish_loading();
    let foreign_element = other.create_style_element();
    let foreign = other.append_to_frame_body(&foreign_element);
    assert!(!runtime.is_constructed_stylesheet(&foreign));
}

#[test]
fn repeated_install_does_not_double_wrap() {
    let runtime = loaded_runtime();
    runtime.install();

    let sheet = runtime.construct();
    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(
        runtime.action_log(&sheet).unwrap().len(),
        1,
        "a double-wrapped method would have logged twice"
    );
}
