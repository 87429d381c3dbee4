use construct::{CompatLocation, SheetRuntime};
use dom::{CssStyleSheet, Document, SheetOp, StyleElement};

fn loaded_runtime() -> SheetRuntime {
    let _ = env_logger::builder().is_test(true).try_init();
    let document = Document::new();
    document.finish_loading();
    let runtime = SheetRuntime::new(document);
    runtime.install();
    runtime
}

fn live_adopter(runtime: &SheetRuntime, sheet: &CssStyleSheet) -> StyleElement {
    let element = runtime.document().create_style_element();
    runtime.document().append_to_frame_body(&element);
    assert!(runtime.add_adopter(sheet, &element));
    element
}

#[test]
fn every_mutating_call_appends_exactly_one_log_entry() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();

    sheet.insert_rule("a{color:red}", 0).unwrap();
    assert_eq!(
        runtime.action_log(&sheet).unwrap(),
        vec![SheetOp::InsertRule {
            rule: "a{color:red}".into(),
            index: 0,
        }]
    );

    sheet.add_rule("p", "margin: 0", None).unwrap();
    sheet.delete_rule(0).unwrap();
    let log = runtime.action_log(&sheet).unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(
        log[1],
        SheetOp::AddRule {
            selector: "p".into(),
            block: "margin: 0".into(),
            index: None,
        }
    );
    assert_eq!(log[2], SheetOp::DeleteRule { index: 0 });
}

#[test]
fn mutations_fan_out_to_every_adopter() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();
    let first = live_adopter(&runtime, &sheet);
    let second = live_adopter(&runtime, &sheet);

    let at = sheet.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(at, 0, "propagation must not disturb the native result");

    for adopter in [&first, &second] {
        let target = adopter.sheet().unwrap();
        assert_eq!(
            target.rule_texts(),
            vec!["a { color: red }"],
            "adopter did not receive the replayed operation"
        );
    }
}

#[test]
fn unregistered_sheets_behave_exactly_natively() {
    let runtime = loaded_runtime();
    let element = runtime.document().create_style_element();
    let native = runtime.document().append_to_frame_body(&element);

    let at = native.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(at, 0);
    assert_eq!(native.rule_texts(), vec!["a { color: red }"]);
    assert!(runtime.registry().is_empty(), "no record may appear for native sheets");
}

#[test]
fn native_failure_propagates_with_no_replay_or_log() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();
    let adopter = live_adopter(&runtime, &sheet);

    let err = sheet.insert_rule("a { color: red }", 7).unwrap_err();
    assert!(err.to_string().contains("insertRule"), "got {err}");
    assert!(adopter.sheet().unwrap().rules().is_empty(), "adopter must stay untouched");
    assert!(runtime.action_log(&sheet).unwrap().is_empty(), "failed calls are not logged");
}

#[test]
fn adopters_without_a_live_sheet_are_skipped() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();

    // Never attached, so it has no native sheet.
    let detached = runtime.document().create_style_element();
    assert!(runtime.add_adopter(&sheet, &detached));
    let live = live_adopter(&runtime, &sheet);

    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert!(detached.sheet().is_none());
    assert_eq!(live.sheet().unwrap().rule_texts(), vec!["a { color: red }"]);
    assert_eq!(runtime.action_log(&sheet).unwrap().len(), 1);
}

#[test]
fn removed_adopters_no_longer_receive_replays() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();
    let removed = live_adopter(&runtime, &sheet);
    let remaining = live_adopter(&runtime, &sheet);

    assert!(runtime.remove_adopter(&sheet, &removed));
    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert!(
        removed.sheet().unwrap().rules().is_empty(),
        "removed adopter must stop receiving replays"
    );
    assert_eq!(remaining.sheet().unwrap().rule_texts(), vec!["a { color: red }"]);

    sheet.replace_sync("b { color: blue }").unwrap();
    assert_eq!(removed.css_text(), "", "removed adopter must stop receiving snapshots");
    assert_eq!(remaining.css_text(), "b { color: blue }");

    // Already gone, so a second removal reports nothing to do.
    assert!(!runtime.remove_adopter(&sheet, &removed));

    // Unregistered sheets have no record to remove from.
    let element = runtime.document().create_style_element();
    let native = runtime.document().append_to_frame_body(&element);
    assert!(!runtime.remove_adopter(&native, &remaining));
}

#[test]
fn compat_location_is_nudged_once_per_mutation() {
    let document = Document::new();
    document.finish_loading();
    document.enable_shady_css();
    let runtime = SheetRuntime::new(document);
    runtime.install();

    let sheet = runtime.construct();
    let location = CompatLocation::new();
    location.set_adopted_style_sheets(vec![sheet.clone()]);
    assert!(runtime.set_compat_location(&sheet, &location));

    let baseline = location.generation();
    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(location.generation(), baseline + 1);
    sheet.delete_rule(0).unwrap();
    assert_eq!(location.generation(), baseline + 2);
}

#[test]
fn compat_nudge_requires_the_legacy_layer_signal() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();
    let location = CompatLocation::new();
    assert!(runtime.set_compat_location(&sheet, &location));

    sheet.insert_rule("a { color: red }", 0).unwrap();
    assert_eq!(location.generation(), 0, "no nudge without the legacy layer");
}

#[test]
fn independent_runtimes_never_observe_each_other() {
    let first = loaded_runtime();
    let second = loaded_runtime();

    let sheet = first.construct();
    sheet.insert_rule("a { color: red }", 0).unwrap();

    assert!(second.registry().is_empty());
    assert!(!second.is_constructed_stylesheet(&sheet));
}

#[test]
fn action_log_serializes_for_external_replay() {
    let runtime = loaded_runtime();
    let sheet = runtime.construct();
    sheet.insert_rule("a{color:red}", 0).unwrap();
    sheet.remove_rule(0).unwrap();

    let json = serde_json::to_string(&runtime.action_log(&sheet).unwrap()).unwrap();
    assert!(json.contains("\"method\":\"insertRule\""), "got {json}");
    assert!(json.contains("\"method\":\"removeRule\""), "got {json}");
}
