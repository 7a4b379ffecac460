// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu basics: open at the pointer, corner flipping, replacement.
//!
//! Run:
//! - `cargo run -p understory_demos --example context_menu_basics`

use kurbo::{Point, Rect, Size};
use understory_demos::headless::{HeadlessHost, Key, print_events};
use understory_menu::{CONTEXT_MENU_LAYER, ContextMenu, MenuTree, SelectMode};

fn main() {
    let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    host.set_panel_size(Size::new(150.0, 90.0));

    let mut tree: MenuTree<Key> = MenuTree::default();
    tree.add_menu("edit", SelectMode::None).unwrap();
    for item in ["cut", "copy", "paste"] {
        tree.add_item("edit", item, item).unwrap();
    }
    tree.add_menu("view", SelectMode::Multiple).unwrap();
    for item in ["grid", "rulers"] {
        tree.add_item("view", item, item).unwrap();
    }

    let mut edit = ContextMenu::new("edit", &mut tree).unwrap();
    edit.set_trigger(Some("canvas"), &mut host);
    let mut view = ContextMenu::new("view", &mut tree).unwrap();
    view.set_trigger(Some("ruler-bar"), &mut host);
    println!("== Context menu basics ==");

    for at in [Point::new(120.0, 80.0), Point::new(790.0, 590.0)] {
        println!("\n-- right-click on the canvas at ({}, {}) --", at.x, at.y);
        let mut events = Vec::new();
        let prevent = edit.on_context_menu("canvas", at, &mut tree, &mut host, &mut events);
        println!("  prevent default: {prevent}");
        events.extend(host.run_frames(&mut tree));
        print_events(&events);
        if let Some(p) = tree.menu("edit").and_then(|m| m.panel().position()) {
            println!("  edit at ({:.0}, {:.0}) placement={:?}", p.x, p.y, p.placement);
        }
        println!("  trackers: {}", host.active_trackers());
    }

    println!("\n-- right-click the ruler bar --");
    let mut events = Vec::new();
    view.on_context_menu(
        "ruler-bar",
        Point::new(300.0, 20.0),
        &mut tree,
        &mut host,
        &mut events,
    );
    events.extend(host.run_frames(&mut tree));
    print_events(&events);
    edit.on_menu_events(&events, &mut tree, &mut host);
    view.on_menu_events(&events, &mut tree, &mut host);
    println!("  mounted: {:?}", tree.overlays().mounted(CONTEXT_MENU_LAYER));
    println!(
        "  edit listening={} view listening={}",
        edit.is_listening_for_dismissal(),
        view.is_listening_for_dismissal()
    );

    println!("\n-- toggle 'grid' --");
    let mut out = Vec::new();
    tree.activate("grid", &mut host, &mut out);
    view.on_menu_events(&out, &mut tree, &mut host);
    print_events(&out);
    println!("  view still open: {}", tree.is_open("view"));

    println!("\n-- window loses focus --");
    view.on_window_blur(&mut tree, &mut host);
    print_events(&host.run_frames(&mut tree));
    println!("  listeners left: {}", host.listener_count());
}
