//! Keyboard keys understood by the runtime
//!
//! Backends translate their native key codes into `Key`; game scripts
//! refer to keys either directly or by name (`"space"`, `"left"`, `"a"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Whitespace / editing
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    // Modifiers
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Top-row digits
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
}

impl Key {
    pub const ARROWS: [Key; 4] = [Key::Left, Key::Right, Key::Up, Key::Down];

    pub const ALL: [Key; 49] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::Tab,
        Key::Backspace,
        Key::LeftShift,
        Key::RightShift,
        Key::LeftControl,
        Key::RightControl,
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];

    /// Canonical lowercase name of this key
    pub fn name(self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::Space => "space",
            Key::Enter => "return",
            Key::Escape => "escape",
            Key::Tab => "tab",
            Key::Backspace => "backspace",
            Key::LeftShift => "left shift",
            Key::RightShift => "right shift",
            Key::LeftControl => "left ctrl",
            Key::RightControl => "right ctrl",
            Key::A => "a",
            Key::B => "b",
            Key::C => "c",
            Key::D => "d",
            Key::E => "e",
            Key::F => "f",
            Key::G => "g",
            Key::H => "h",
            Key::I => "i",
            Key::J => "j",
            Key::K => "k",
            Key::L => "l",
            Key::M => "m",
            Key::N => "n",
            Key::O => "o",
            Key::P => "p",
            Key::Q => "q",
            Key::R => "r",
            Key::S => "s",
            Key::T => "t",
            Key::U => "u",
            Key::V => "v",
            Key::W => "w",
            Key::X => "x",
            Key::Y => "y",
            Key::Z => "z",
            Key::Num0 => "0",
            Key::Num1 => "1",
            Key::Num2 => "2",
            Key::Num3 => "3",
            Key::Num4 => "4",
            Key::Num5 => "5",
            Key::Num6 => "6",
            Key::Num7 => "7",
            Key::Num8 => "8",
            Key::Num9 => "9",
        }
    }

    /// Look up a key by name. Case-insensitive; accepts a few aliases
    /// ("enter" for "return", "esc", "lshift", ...).
    pub fn from_name(name: &str) -> Option<Key> {
        let lower = name.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "enter" => Some(Key::Enter),
            "esc" => Some(Key::Escape),
            "lshift" | "shift" => Some(Key::LeftShift),
            "rshift" => Some(Key::RightShift),
            "lctrl" | "ctrl" | "left control" => Some(Key::LeftControl),
            "rctrl" | "right control" => Some(Key::RightControl),
            " " => Some(Key::Space),
            _ => None,
        };
        alias.or_else(|| Key::ALL.iter().copied().find(|k| k.name() == lower))
    }

    /// Label used in on-screen prompts ("SPACE", "RETURN", "R")
    pub fn label(self) -> String {
        self.name().to_ascii_uppercase()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name: {:?}", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_name(s).ok_or_else(|| KeyParseError(s.to_string()))
    }
}
