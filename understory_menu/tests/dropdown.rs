// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown trigger binding and dismissal.

mod common;

use common::*;
use understory_menu::{
    DROPDOWN_LAYER, Dropdown, ListenerKind, ListenerTarget, MenuEvent, MenuKey, MenuTree,
    PointerButton, SelectMode, SubmenuState,
};

const OUTSIDE: u32 = 500;

fn setup(mode: SelectMode) -> (MenuTree<u32>, Dropdown<u32>, Host) {
    let mut host = Host::default();
    let mut tree = three_levels(mode);
    let mut dropdown = Dropdown::new(ROOT, &mut tree).unwrap();
    dropdown.set_trigger(Some(TRIGGER), &mut tree, &mut host);
    (tree, dropdown, host)
}

fn open(tree: &mut MenuTree<u32>, dropdown: &mut Dropdown<u32>, host: &mut Host) {
    assert!(dropdown.on_trigger_pointer_down(TRIGGER, PointerButton::Primary, tree, host));
    let events = flush(tree, host);
    assert_eq!(events, vec![MenuEvent::Show { menu: ROOT }]);
}

fn document_listener(host: &Host) -> bool {
    host.has_listener(ListenerTarget::Document, ListenerKind::PointerDown)
}

fn blur_listener(host: &Host) -> bool {
    host.has_listener(ListenerTarget::Window, ListenerKind::Blur)
}

#[test]
fn trigger_listeners_follow_the_trigger() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    let on = |host: &Host, t| {
        host.has_listener(ListenerTarget::Element(t), ListenerKind::PointerDown)
            && host.has_listener(ListenerTarget::Element(t), ListenerKind::KeyDown)
    };
    assert!(on(&host, TRIGGER));

    dropdown.set_trigger(Some(200), &mut tree, &mut host);
    assert!(!on(&host, TRIGGER));
    assert!(on(&host, 200));
    assert_eq!(host.listeners.len(), 2);

    // The old trigger no longer toggles anything.
    assert!(!dropdown.on_trigger_pointer_down(TRIGGER, PointerButton::Primary, &mut tree, &mut host));
    assert!(!dropdown.is_open(&tree));

    dropdown.set_trigger(None, &mut tree, &mut host);
    assert!(host.listeners.is_empty());
}

#[test]
fn changing_trigger_while_open_hides() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);

    dropdown.set_trigger(Some(200), &mut tree, &mut host);

    assert!(!dropdown.is_open(&tree));
    assert!(!document_listener(&host));
    assert_eq!(flush(&mut tree, &mut host), vec![MenuEvent::Hide { menu: ROOT }]);
}

#[test]
fn primary_pointer_down_toggles() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    assert!(!dropdown.on_trigger_pointer_down(TRIGGER, PointerButton::Secondary, &mut tree, &mut host));
    assert!(!dropdown.is_open(&tree));

    open(&mut tree, &mut dropdown, &mut host);
    assert_eq!(tree.overlays().mounted(DROPDOWN_LAYER), &[ROOT]);
    assert!(document_listener(&host));
    assert!(blur_listener(&host));

    assert!(dropdown.on_trigger_pointer_down(TRIGGER, PointerButton::Primary, &mut tree, &mut host));
    assert_eq!(flush(&mut tree, &mut host), vec![MenuEvent::Hide { menu: ROOT }]);
    assert!(!document_listener(&host));
    assert!(!blur_listener(&host));
    assert!(tree.overlays().is_empty());
}

#[test]
fn showing_twice_keeps_one_tracker() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    assert!(dropdown.show(&mut tree, &mut host));
    assert!(dropdown.show(&mut tree, &mut host));

    assert_eq!(host.trackers_for(ROOT), 1);
    assert_eq!(host.frames.len(), 1);
    assert_eq!(
        host.listeners
            .values()
            .filter(|l| l.0 == ListenerTarget::Document)
            .count(),
        1
    );
    assert_eq!(flush(&mut tree, &mut host), vec![MenuEvent::Show { menu: ROOT }]);
}

#[test]
fn unresolvable_trigger_shows_nothing() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    host.missing.insert(TRIGGER);

    assert!(!dropdown.on_trigger_pointer_down(TRIGGER, PointerButton::Primary, &mut tree, &mut host));
    assert!(host.frames.is_empty());
    assert!(host.trackers.is_empty());
    assert!(!document_listener(&host));
}

#[test]
fn pointer_down_inside_menu_or_trigger_keeps_it_open() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();
    tree.pointer_enter(ITEM_1, &mut host, &mut out);
    flush(&mut tree, &mut host);

    for path in [
        vec![ITEM_2, ROOT, OUTSIDE],
        vec![TRIGGER, OUTSIDE],
        vec![SUB_1, SUB, OUTSIDE],
    ] {
        assert!(!dropdown.on_document_pointer_down(&path, &mut tree, &mut host));
        assert!(dropdown.is_open(&tree), "path {path:?}");
    }
    assert!(tree.is_open(SUB));
}

#[test]
fn pointer_down_outside_closes() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);

    assert!(dropdown.on_document_pointer_down(&[OUTSIDE, 501], &mut tree, &mut host));

    assert!(!dropdown.is_open(&tree));
    assert!(!document_listener(&host));
    assert!(!blur_listener(&host));
    assert_eq!(flush(&mut tree, &mut host), vec![MenuEvent::Hide { menu: ROOT }]);
}

#[test]
fn window_blur_closes_on_its_own() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);

    assert!(dropdown.on_window_blur(&mut tree, &mut host));

    assert!(!dropdown.is_open(&tree));
    assert!(!document_listener(&host));
    assert!(!dropdown.on_window_blur(&mut tree, &mut host));
}

#[test]
fn keyboard_scenario_open_enter_submenu_escape() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    let mut out = Vec::new();
    open(&mut tree, &mut dropdown, &mut host);

    assert!(dropdown.key_down(MenuKey::ArrowDown, 0, &mut tree, &mut host, &mut out));
    assert_eq!(host.focused, Some(ITEM_1));

    assert!(dropdown.key_down(MenuKey::ArrowRight, 0, &mut tree, &mut host, &mut out));
    out.extend(flush(&mut tree, &mut host));
    assert!(tree.is_open(SUB));
    assert_eq!(host.focused, Some(SUB_1));
    assert_eq!(host.trackers_for(SUB), 1);

    assert!(dropdown.key_down(MenuKey::Escape, 0, &mut tree, &mut host, &mut out));
    out.extend(flush(&mut tree, &mut host));
    assert!(!tree.is_open(SUB));
    assert!(tree.is_open(ROOT));
    assert_eq!(host.focused, Some(ITEM_1));
    assert_eq!(tree.submenu_state(ITEM_1), Some(SubmenuState::Idle));
    assert!(document_listener(&host));

    // The host echoes the focus move; it must not reopen the submenu.
    tree.focus_in(ITEM_1, 0, &mut host, &mut out);
    assert_eq!(tree.submenu_state(ITEM_1), Some(SubmenuState::Idle));

    assert_eq!(
        out,
        vec![
            MenuEvent::SubmenuOpen {
                item: ITEM_1,
                submenu: SUB
            },
            MenuEvent::Show { menu: SUB },
            MenuEvent::Hide { menu: SUB },
        ]
    );

    // A second Escape closes the dropdown and focuses the trigger.
    assert!(dropdown.key_down(MenuKey::Escape, 0, &mut tree, &mut host, &mut out));
    assert!(!dropdown.is_open(&tree));
    assert_eq!(host.focused, Some(TRIGGER));
    assert!(!document_listener(&host));
}

#[test]
fn trigger_keys_open_and_focus_first_enabled() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    tree.set_disabled(ITEM_1, true).unwrap();

    assert!(!dropdown.on_trigger_key_down(TRIGGER, MenuKey::ArrowUp, 0, &mut tree, &mut host));
    assert!(dropdown.on_trigger_key_down(TRIGGER, MenuKey::ArrowDown, 0, &mut tree, &mut host));
    assert!(dropdown.is_open(&tree));
    assert_eq!(host.focused, Some(ITEM_2));

    assert!(dropdown.on_trigger_key_down(TRIGGER, MenuKey::Escape, 0, &mut tree, &mut host));
    assert!(!dropdown.is_open(&tree));
    assert!(dropdown.on_trigger_key_down(TRIGGER, MenuKey::Enter, 0, &mut tree, &mut host));
    assert!(dropdown.is_open(&tree));
}

#[test]
fn select_closes_but_check_does_not() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::Multiple);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();

    tree.activate(ITEM_2, &mut host, &mut out);
    dropdown.on_menu_events(&out, &mut tree, &mut host);
    assert!(dropdown.is_open(&tree));

    tree.set_mode(ROOT, SelectMode::None).unwrap();
    out.clear();
    tree.activate(ITEM_2, &mut host, &mut out);
    dropdown.on_menu_events(&out, &mut tree, &mut host);
    assert!(!dropdown.is_open(&tree));
    assert!(!document_listener(&host));
}

#[test]
fn close_on_select_can_be_disabled() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    dropdown.set_close_on_select(false);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();

    // Selecting in a submenu closes the submenu but not the dropdown.
    tree.pointer_enter(ITEM_1, &mut host, &mut out);
    flush(&mut tree, &mut host);
    out.clear();
    tree.activate(SUB_1, &mut host, &mut out);
    dropdown.on_menu_events(&out, &mut tree, &mut host);
    flush(&mut tree, &mut host);

    assert!(dropdown.is_open(&tree));
    assert!(!tree.is_open(SUB));
}

#[test]
fn hide_from_elsewhere_releases_listeners() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);

    tree.close_menu(ROOT, &mut host, &mut Vec::new());
    let events = flush(&mut tree, &mut host);
    assert!(dropdown.is_listening_for_dismissal());
    dropdown.on_menu_events(&events, &mut tree, &mut host);

    assert!(!dropdown.is_listening_for_dismissal());
    assert!(!document_listener(&host));
}

#[test]
fn removing_a_shown_menu_releases_listeners() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();

    tree.remove_menu(ROOT, &mut host, &mut out).unwrap();
    assert_eq!(out, vec![MenuEvent::Hide { menu: ROOT }]);
    dropdown.on_menu_events(&out, &mut tree, &mut host);

    assert!(!dropdown.is_listening_for_dismissal());
    assert!(!document_listener(&host));
    assert!(!blur_listener(&host));
    assert!(host.frames.is_empty());
    assert!(tree.overlays().is_empty());
}

#[test]
fn removing_a_menu_before_its_frame_reports_the_cancelled_show() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    assert!(dropdown.show(&mut tree, &mut host));
    let mut out = Vec::new();

    tree.remove_menu(ROOT, &mut host, &mut out).unwrap();
    assert_eq!(out, vec![MenuEvent::ShowCancelled { menu: ROOT }]);
    dropdown.on_menu_events(&out, &mut tree, &mut host);

    assert!(!dropdown.is_listening_for_dismissal());
    assert!(host.frames.is_empty());
    assert!(host.trackers.is_empty());
}

#[test]
fn failed_placement_of_a_shown_menu_unmounts_it() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();
    tree.key_down(ROOT, MenuKey::ArrowDown, 0, &mut host, &mut out);
    assert_eq!(tree.focused(), Some(ITEM_1));

    host.rects
        .insert(TRIGGER, kurbo::Rect::new(f64::NAN, 0.0, 10.0, 10.0));
    assert!(!dropdown.show(&mut tree, &mut host));

    assert!(tree.overlays().mounted(DROPDOWN_LAYER).is_empty());
    assert_eq!(tree.focused(), None);
    assert!(!dropdown.is_listening_for_dismissal());
    assert!(!tree.is_showing(ROOT));
    assert_eq!(flush(&mut tree, &mut host), vec![MenuEvent::Hide { menu: ROOT }]);
}

#[test]
fn detach_removes_every_listener() {
    let (mut tree, mut dropdown, mut host) = setup(SelectMode::None);
    open(&mut tree, &mut dropdown, &mut host);
    let mut out = Vec::new();
    tree.pointer_enter(ITEM_1, &mut host, &mut out);

    dropdown.detach(&mut host);
    tree.detach(&mut host);

    assert!(host.listeners.is_empty());
    assert!(host.frames.is_empty());
    assert!(host.trackers.is_empty());
    assert!(tree.overlays().is_empty());
}
