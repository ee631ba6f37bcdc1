//! Quick-label catalog.
//!
//! The catalog is fixed at build time. Each option is bound to a single key
//! token so a running session can be labeled from the keyboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelOption {
    pub key: &'static str,
    pub emoji: &'static str,
    pub text: &'static str,
    /// Colour family the presentation layer uses for this option.
    pub hint: &'static str,
}

pub static CATALOG: [LabelOption; 4] = [
    LabelOption {
        key: "1",
        emoji: "😴",
        text: "ไม่มีอาการ",
        hint: "gray",
    },
    LabelOption {
        key: "2",
        emoji: "😊",
        text: "ปกติ",
        hint: "green",
    },
    LabelOption {
        key: "3",
        emoji: "😣",
        text: "เจ็บ",
        hint: "yellow",
    },
    LabelOption {
        key: "4",
        emoji: "😰",
        text: "เจ็บมาก",
        hint: "red",
    },
];

pub fn option_for_key(key: &str) -> Option<&'static LabelOption> {
    CATALOG.iter().find(|opt| opt.key == key)
}

/// Where keyboard input is going when a key token arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    /// Nothing editable has focus; digit keys are label shortcuts.
    Shortcut,
    /// A text field, textarea or select has focus; keys are ordinary typing.
    TextEntry,
}
