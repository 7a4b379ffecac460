// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown basics: trigger, hover-intent submenu, keyboard and dismissal.
//!
//! Run:
//! - `cargo run -p understory_demos --example dropdown_basics`

use kurbo::{Rect, Size};
use understory_demos::headless::{HeadlessHost, Key, print_events};
use understory_menu::{
    DEFAULT_HOVER_CLOSE_DELAY_MS, Dropdown, MenuKey, MenuTree, PointerButton, SelectMode,
};

fn build() -> MenuTree<Key> {
    let mut tree = MenuTree::default();
    tree.add_menu("file", SelectMode::None).unwrap();
    tree.add_item("file", "new", "new").unwrap();
    tree.add_item("file", "open-recent", "open-recent").unwrap();
    tree.add_item("file", "quit", "quit").unwrap();
    tree.add_menu("recent", SelectMode::None).unwrap();
    tree.add_item("recent", "notes", "notes.txt").unwrap();
    tree.add_item("recent", "todo", "todo.md").unwrap();
    tree.set_submenu("open-recent", "recent").unwrap();
    tree
}

fn describe(tree: &MenuTree<Key>, menu: Key) {
    let Some(m) = tree.menu(menu) else {
        return;
    };
    match m.panel().position() {
        Some(p) if tree.is_open(menu) => println!(
            "  {menu}: open at ({:.0}, {:.0}) placement={:?}",
            p.x, p.y, p.placement
        ),
        _ => println!("  {menu}: closed"),
    }
}

fn main() {
    let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 640.0, 480.0));
    host.set_panel_size(Size::new(160.0, 96.0));
    host.place("file-button", Rect::new(16.0, 8.0, 96.0, 32.0));
    host.place("open-recent", Rect::new(16.0, 68.0, 176.0, 92.0));

    let mut tree = build();
    let mut dropdown = Dropdown::new("file", &mut tree).unwrap();
    dropdown.set_trigger(Some("file-button"), &mut tree, &mut host);
    println!("== Dropdown basics ==");
    println!("listeners after binding the trigger: {}", host.listener_count());

    println!("\n-- click the trigger --");
    dropdown.on_trigger_pointer_down("file-button", PointerButton::Primary, &mut tree, &mut host);
    print_events(&host.run_frames(&mut tree));
    describe(&tree, "file");

    println!("\n-- hover 'open-recent' --");
    let mut out = Vec::new();
    tree.pointer_enter("open-recent", &mut host, &mut out);
    out.extend(host.run_frames(&mut tree));
    print_events(&out);
    describe(&tree, "recent");
    println!("  trackers: {}", host.active_trackers());

    println!("\n-- leave towards 'quit', then come back within the delay --");
    tree.pointer_leave("open-recent", Some("quit"), host.now());
    println!("  state: {:?}", tree.submenu_state("open-recent"));
    host.advance(DEFAULT_HOVER_CLOSE_DELAY_MS / 2, &mut tree);
    out.clear();
    tree.pointer_enter("open-recent", &mut host, &mut out);
    println!("  state: {:?}", tree.submenu_state("open-recent"));

    println!("\n-- leave again and wait it out --");
    tree.pointer_leave("open-recent", Some("quit"), host.now());
    host.advance(DEFAULT_HOVER_CLOSE_DELAY_MS, &mut tree);
    print_events(&host.run_frames(&mut tree));
    describe(&tree, "recent");

    println!("\n-- keyboard: ArrowDown twice, ArrowRight, Enter --");
    out.clear();
    for key in [MenuKey::ArrowDown, MenuKey::ArrowDown, MenuKey::ArrowRight] {
        dropdown.key_down(key, host.now(), &mut tree, &mut host, &mut out);
        out.extend(host.run_frames(&mut tree));
        println!("  {key:?} -> focus {:?}", host.focused());
    }
    dropdown.key_down(MenuKey::Enter, host.now(), &mut tree, &mut host, &mut out);
    out.extend(host.run_frames(&mut tree));
    print_events(&out);
    describe(&tree, "file");
    println!("  listeners left: {}", host.listener_count());

    println!("\n-- reopen and click outside --");
    dropdown.on_trigger_pointer_down("file-button", PointerButton::Primary, &mut tree, &mut host);
    host.run_frames(&mut tree);
    let closed = dropdown.on_document_pointer_down(&["body"], &mut tree, &mut host);
    println!("  outside click closed the menu: {closed}");
    print_events(&host.run_frames(&mut tree));

    dropdown.detach(&mut host);
    tree.detach(&mut host);
    println!("\nafter detach: listeners={} trackers={}", host.listener_count(), host.active_trackers());
}
