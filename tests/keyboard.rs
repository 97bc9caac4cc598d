//! Keyboard dispatch: focus navigation and per-kind key handling.
//!
//! Run with: cargo test --test keyboard

mod common;

use std::time::Duration;

use common::{Event, RecordingHost};
use pretty_assertions::assert_eq;
use twidgets::{BufferPlatform, EngineConfig, EngineContext, FlattenedTree, Key, KeyCode, KeyMod, WidgetNode};

fn key(k: Key) -> KeyCode {
    KeyCode::key(k, KeyMod::NONE)
}

fn dialog() -> FlattenedTree {
    FlattenedTree::build(
        &WidgetNode::window(1, "Dialog").at(1, 1).size(60, 20).children([
            WidgetNode::panel(2, "Left").at(2, 2).size(20, 10).children([
                WidgetNode::label(5, "Name:").at(1, 1).size(10, 1),
                WidgetNode::edit(6).at(1, 2).size(10, 1),
            ]),
            WidgetNode::panel(3, "Right")
                .at(30, 2)
                .size(20, 10)
                .child(WidgetNode::check_box(7, "Opt").at(1, 1)),
            WidgetNode::button(4, "OK").at(2, 15),
        ]),
    )
    .unwrap()
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_tab_cycles_through_panels() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);

    assert!(ctx.focus_first());
    let mut seen = vec![ctx.host.focus.focused()];
    for _ in 0..3 {
        assert!(ctx.process_input(key(Key::Tab)));
        seen.push(ctx.host.focus.focused());
    }
    assert_eq!(seen, vec![6, 7, 4, 6]);

    ctx.process_input(KeyCode::key(Key::Tab, KeyMod::SHIFT));
    assert_eq!(ctx.host.focus.focused(), 4);
}

#[test]
fn test_focus_change_invalidates_both_widgets() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(6);
        ctx.host.take_invalidated();
        ctx.process_input(key(Key::Tab));
    }
    assert_eq!(host.invalidated, vec![6, 7]);
    // the checkbox places the cursor inside its brackets
    assert!(platform.output_str().ends_with("\x1b[4;33H\x1b[?25h"));
}

#[test]
fn test_disabled_widget_is_skipped() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    host.disabled.insert(7);
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(6);
    ctx.process_input(key(Key::Tab));
    assert_eq!(ctx.host.focus.focused(), 4);
}

#[test]
fn test_esc_moves_focus_to_parent() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(7);
    assert!(ctx.process_input(key(Key::Esc)));
    assert_eq!(ctx.host.focus.focused(), 3);
}

#[test]
fn test_focus_signal_tracks_changes() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let signal = host.focus.focused_signal();
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(4);
    assert_eq!(signal.get(), 4);
}

#[test]
fn test_unhandled_key_reaches_host() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(4);
        assert!(!ctx.process_input(KeyCode::char('q')));
    }
    assert_eq!(host.events, vec![Event::Unhandled("q".into())]);
}

// =============================================================================
// CheckBox / Radio / Button
// =============================================================================

#[test]
fn test_space_toggles_checkbox() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(7);
        ctx.process_input(KeyCode::char(' '));
        ctx.process_input(key(Key::Enter));
    }
    assert_eq!(host.events, vec![Event::Toggle(7), Event::Toggle(7)]);
    assert!(!host.checked.contains(&7));
}

#[test]
fn test_radio_invalidates_its_group_only() {
    let tree = FlattenedTree::build(&WidgetNode::window(1, "w").children([
        WidgetNode::panel(2, "p").children([
            WidgetNode::radio(3, "a", 1, 0),
            WidgetNode::radio(4, "b", 1, 1),
            WidgetNode::radio(5, "c", 2, 0),
        ]),
        WidgetNode::radio(6, "d", 1, 2),
    ]))
    .unwrap();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(3);
        ctx.host.take_invalidated();
        assert!(ctx.process_input(KeyCode::char(' ')));
    }
    assert_eq!(host.events, vec![Event::RadioSelect(3)]);
    assert_eq!(host.invalidated, vec![3, 4]);
}

#[test]
fn test_enter_presses_and_releases_button() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(4);
        ctx.process_input(key(Key::Enter));
        assert_eq!(ctx.host.focus.pressed(), None);
    }
    assert_eq!(host.events, vec![Event::ButtonDown(4), Event::ButtonUp(4)]);
    assert_eq!(platform.sleeps, vec![Duration::from_millis(70)]);
    // pressed state was drawn before the hold
    assert!(platform.output_str().contains("[ OK ]"));
}

#[test]
fn test_button_hold_comes_from_config() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    let config = EngineConfig::from_toml_str("button_hold_ms = 5").unwrap();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform).with_config(config);
        ctx.change_focus_to(4);
        ctx.process_input(key(Key::Enter));
    }
    assert_eq!(platform.sleeps, vec![Duration::from_millis(5)]);
}

// =============================================================================
// Edit
// =============================================================================

#[test]
fn test_edit_commit_and_cancel() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    host.edits.insert(6, "ab".into());
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(6);

        ctx.process_input(key(Key::Enter));
        assert_eq!(ctx.host.focus.edit().map(|e| e.buffer.as_str()), Some("ab"));
        ctx.process_input(KeyCode::char('c'));
        ctx.process_input(key(Key::Enter));
        assert!(ctx.host.focus.edit().is_none());

        ctx.process_input(key(Key::Enter));
        ctx.process_input(KeyCode::char('x'));
        ctx.process_input(key(Key::Esc));
        assert!(ctx.host.focus.edit().is_none());
        // Esc while editing only cancels; focus stays
        assert_eq!(ctx.host.focus.focused(), 6);
    }
    assert_eq!(host.events, vec![Event::EditChange(6, "abc".into())]);
    assert_eq!(host.edits[&6], "abc");
}

#[test]
fn test_host_refuses_edit_keys() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    host.digits_only.insert(6);
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(6);
        ctx.process_input(key(Key::Enter));

        assert!(ctx.process_input(KeyCode::char('a')));
        assert_eq!(ctx.host.focus.edit().map(|e| e.buffer.as_str()), Some(""));
        ctx.process_input(KeyCode::char('5'));
        assert_eq!(ctx.host.focus.edit().map(|e| e.buffer.as_str()), Some("5"));
        ctx.process_input(key(Key::Enter));
    }
    assert_eq!(host.events, vec![Event::EditChange(6, "5".into())]);
}

#[test]
fn test_tab_while_editing_inserts_spaces() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(6);
    ctx.process_input(key(Key::Enter));
    ctx.process_input(key(Key::Tab));
    assert_eq!(ctx.host.focus.edit().map(|e| e.buffer.clone()), Some("    ".to_string()));
    assert_eq!(ctx.host.focus.focused(), 6);
}

#[test]
fn test_focus_loss_discards_edit() {
    let tree = dialog();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(6);
        ctx.process_input(key(Key::Enter));
        ctx.process_input(KeyCode::char('z'));
        ctx.change_focus_to(4);
        assert!(ctx.host.focus.edit().is_none());
    }
    assert!(host.events.is_empty());
    assert!(!host.edits.contains_key(&6));
}

// =============================================================================
// PageCtrl
// =============================================================================

fn paged() -> FlattenedTree {
    FlattenedTree::build(
        &WidgetNode::window(1, "w").size(60, 20).child(
            WidgetNode::page_ctrl(2, 10).at(1, 1).size(50, 10).children([
                WidgetNode::page(3, "A").child(WidgetNode::button(5, "a")),
                WidgetNode::page(4, "B").child(WidgetNode::button(6, "b")),
                WidgetNode::page(7, "C"),
            ]),
        ),
    )
    .unwrap()
}

#[test]
fn test_page_keys_bubble_from_inside_page() {
    let tree = paged();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(5);
        assert!(ctx.process_input(key(Key::PgDown)));
        assert_eq!(ctx.host.focus.focused(), 6);

        // empty page: focus falls back to the control
        assert!(ctx.process_input(key(Key::F(12))));
        assert_eq!(ctx.host.focus.focused(), 2);

        // wraps around
        assert!(ctx.process_input(key(Key::PgDown)));
        assert_eq!(ctx.host.focus.focused(), 5);
    }
    assert_eq!(
        host.events,
        vec![Event::PageChange(2, 1), Event::PageChange(2, 2), Event::PageChange(2, 0)]
    );
}

#[test]
fn test_tab_stays_on_selected_page() {
    let tree = paged();
    let mut host = RecordingHost::new();
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(5);
    ctx.process_input(key(Key::Tab));
    assert_ne!(ctx.host.focus.focused(), 6);
}

// =============================================================================
// ListBox / ComboBox / TextBox
// =============================================================================

fn lists() -> FlattenedTree {
    FlattenedTree::build(&WidgetNode::window(1, "w").at(1, 1).size(60, 20).children([
        WidgetNode::list_box(3).at(2, 2).size(20, 6),
        WidgetNode::combo_box(4, 3).at(30, 2).size(12, 1),
        WidgetNode::text_box(5).at(2, 10).size(30, 5),
    ]))
    .unwrap()
}

#[test]
fn test_list_box_navigation_wraps() {
    let tree = lists();
    let items = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    let mut host = RecordingHost::new().with_list(3, &items);
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(3);
        ctx.process_input(key(Key::Down));
        ctx.process_input(key(Key::Up));
        ctx.process_input(key(Key::Up));
        ctx.process_input(key(Key::Enter));
        // Enter on the committed row does nothing new
        ctx.process_input(key(Key::Enter));
    }
    assert_eq!(
        host.events,
        vec![
            Event::ListSelect(3, 0),
            Event::ListChange(3, 0),
            Event::ListChange(3, 9),
            Event::ListChange(3, 8),
            Event::ListSelect(3, 8),
        ]
    );
}

#[test]
fn test_list_box_without_highlight_starts_at_an_end() {
    let tree = lists();
    let mut host = RecordingHost::new().with_list(3, &["a", "b", "c"]);
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(3);
    assert_eq!(ctx.host.list(3).item, None);
    ctx.process_input(key(Key::Down));
    assert_eq!(ctx.host.list(3).item, Some(0));

    if let Some(l) = ctx.host.lists.get_mut(&3) {
        l.0.item = None;
    }
    ctx.process_input(key(Key::Up));
    assert_eq!(ctx.host.list(3).item, Some(2));
}

#[test]
fn test_list_box_page_keys_move_by_inner_rows() {
    let tree = lists();
    let items: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    let items: Vec<&str> = items.iter().map(String::as_str).collect();
    let mut host = RecordingHost::new().with_list(3, &items);
    let mut platform = BufferPlatform::new();
    let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
    ctx.change_focus_to(3);
    ctx.process_input(key(Key::Down));
    ctx.process_input(key(Key::PgDown));
    assert_eq!(ctx.host.list(3).item, Some(4));
}

#[test]
fn test_combo_box_open_pick_close() {
    let tree = lists();
    let mut host = RecordingHost::new().with_combo(4, &["red", "green", "blue"]);
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(4);
        ctx.host.take_invalidated();

        ctx.process_input(KeyCode::char(' '));
        assert!(ctx.host.combo(4).drop_down);
        ctx.process_input(key(Key::Up));
        ctx.process_input(key(Key::Enter));
    }
    assert_eq!(
        host.events,
        vec![
            Event::ComboDrop(4, true),
            Event::ComboChange(4, 2),
            Event::ComboSelect(4, 2),
            Event::ComboDrop(4, false),
        ]
    );
    assert_eq!(host.combo(4).selected, 2);
    // closing repaints what the list covered
    assert!(host.invalidated.contains(&1));
}

#[test]
fn test_combo_space_twice_closes() {
    let tree = lists();
    let mut host = RecordingHost::new().with_combo(4, &["x", "y"]);
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(4);
        ctx.process_input(KeyCode::char(' '));
        ctx.process_input(KeyCode::char(' '));
        // arrows are ignored while closed
        assert!(!ctx.process_input(key(Key::Down)));
    }
    assert!(!host.combo(4).drop_down);
    assert_eq!(host.events[..2], [Event::ComboDrop(4, true), Event::ComboDrop(4, false)]);
}

#[test]
fn test_text_box_scroll_is_clamped() {
    let tree = lists();
    let mut host = RecordingHost::new().with_text_box(5, 10);
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(5);
        ctx.process_input(key(Key::Up));
        ctx.process_input(key(Key::PgDown));
        ctx.process_input(key(Key::PgDown));
        ctx.process_input(key(Key::PgDown));
    }
    // 3 visible rows of 10 lines: the last top line is 7
    assert_eq!(
        host.events,
        vec![Event::TextScroll(5, 3), Event::TextScroll(5, 6), Event::TextScroll(5, 7)]
    );
}

#[test]
fn test_changed_text_box_restarts_at_top() {
    let tree = lists();
    let mut host = RecordingHost::new().with_text_box(5, 10);
    if let Some(d) = host.text_boxes.get_mut(&5) {
        d.top_line = 5;
        d.changed = true;
    }
    let mut platform = BufferPlatform::new();
    {
        let mut ctx = EngineContext::new(&tree, &mut host, &mut platform);
        ctx.change_focus_to(5);
        ctx.process_input(key(Key::Down));
    }
    assert_eq!(host.events, vec![Event::TextScroll(5, 1)]);
}
