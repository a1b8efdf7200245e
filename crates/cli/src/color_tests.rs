// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");
}

fn disable_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    disable_color();
    assert_eq!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    force_color();
    assert_ne!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    force_color();
    let result = header("spooler-reset");
    assert!(result.starts_with("\x1b[38;5;74m"), "expected ANSI header color");
    assert!(result.ends_with("\x1b[0m"), "expected ANSI reset");
}

#[test]
#[serial]
fn levels_are_colored() {
    force_color();
    for (lvl, prefix) in [
        (Level::Success, "\x1b[38;5;114m"),
        (Level::Warning, "\x1b[38;5;179m"),
        (Level::Error, "\x1b[38;5;167m"),
    ] {
        assert!(level(lvl, "line").starts_with(prefix), "{lvl}");
    }
}

#[test]
#[serial]
fn info_is_never_colored() {
    force_color();
    assert_eq!(level(Level::Info, "plain"), "plain");
}

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert_eq!(muted("x"), "x");
    assert_eq!(context("y"), "y");
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}
