//! Decoded input events.
//!
//! A [`KeyCode`] is one logical event produced by the decoder: UTF-8 text,
//! a named special key, or a mouse report, plus modifier flags. It is
//! ephemeral: produced per decode call and handed straight to the dispatcher.

use std::fmt;

use bitflags::bitflags;

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Keyboard modifiers.
    ///
    /// `SPECIAL` marks named keys and mouse reports, as opposed to text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMod: u8 {
        const NONE    = 0;
        const CTRL    = 1 << 0;
        const ALT     = 1 << 1;
        const SHIFT   = 1 << 2;
        const SPECIAL = 1 << 3;
    }
}

impl KeyMod {
    /// Decode an xterm modifier parameter (`1 + bits`, 2..=8).
    pub(crate) fn from_xterm_param(param: u8) -> Self {
        let bits = param.saturating_sub(1);
        let mut m = Self::NONE;
        if bits & 1 != 0 {
            m |= Self::SHIFT;
        }
        if bits & 2 != 0 {
            m |= Self::ALT;
        }
        if bits & 4 != 0 {
            m |= Self::CTRL;
        }
        m
    }
}

// =============================================================================
// Named keys
// =============================================================================

/// Named (non-text) keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Esc,
    Tab,
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Insert,
    Delete,
    Home,
    End,
    PgUp,
    PgDown,
    F(u8),
}

impl Key {
    pub fn name(self) -> &'static str {
        match self {
            Self::Esc => "Esc",
            Self::Tab => "Tab",
            Self::Enter => "Enter",
            Self::Backspace => "Backspace",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::Home => "Home",
            Self::End => "End",
            Self::PgUp => "PgUp",
            Self::PgDown => "PgDown",
            Self::F(1) => "F1",
            Self::F(2) => "F2",
            Self::F(3) => "F3",
            Self::F(4) => "F4",
            Self::F(5) => "F5",
            Self::F(6) => "F6",
            Self::F(7) => "F7",
            Self::F(8) => "F8",
            Self::F(9) => "F9",
            Self::F(10) => "F10",
            Self::F(11) => "F11",
            Self::F(12) => "F12",
            Self::F(_) => "F?",
        }
    }
}

// =============================================================================
// Mouse
// =============================================================================

/// Mouse button or wheel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    ButtonLeft,
    ButtonMid,
    ButtonRight,
    ButtonReleased,
    WheelUp,
    WheelDown,
    Move,
}

impl MouseBtn {
    /// Button presses (not release, wheel or motion).
    pub fn is_press(self) -> bool {
        matches!(self, Self::ButtonLeft | Self::ButtonMid | Self::ButtonRight)
    }

    pub fn is_wheel(self) -> bool {
        matches!(self, Self::WheelUp | Self::WheelDown)
    }
}

/// Mouse report with 1-based terminal column/row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvt {
    pub btn: MouseBtn,
    pub col: u16,
    pub row: u16,
}

// =============================================================================
// UTF-8 text
// =============================================================================

/// One UTF-8 sequence of up to 4 bytes, kept verbatim as received.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utf8Seq {
    bytes: [u8; 4],
    len: u8,
}

impl Utf8Seq {
    /// Copy up to the first 4 bytes.
    pub fn from_bytes(src: &[u8]) -> Self {
        let len = src.len().min(4);
        let mut bytes = [0u8; 4];
        bytes[..len].copy_from_slice(&src[..len]);
        Self { bytes, len: len as u8 }
    }

    pub fn from_char(c: char) -> Self {
        let mut bytes = [0u8; 4];
        let len = c.encode_utf8(&mut bytes).len() as u8;
        Self { bytes, len }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// The text, if the received bytes were valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn is_char(&self, c: char) -> bool {
        *self == Self::from_char(c)
    }
}

impl fmt::Debug for Utf8Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Utf8Seq({s:?})"),
            None => write!(f, "Utf8Seq({:02x?})", self.as_bytes()),
        }
    }
}

// =============================================================================
// KeyCode
// =============================================================================

/// What a decoded event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// Nothing decodable (yet).
    None,
    Text(Utf8Seq),
    Key(Key),
    Mouse(MouseEvt),
}

/// One decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode {
    pub input: Input,
    pub mods: KeyMod,
}

impl KeyCode {
    pub const fn none() -> Self {
        Self { input: Input::None, mods: KeyMod::NONE }
    }

    /// Named key; always carries `SPECIAL`.
    pub fn key(key: Key, mods: KeyMod) -> Self {
        Self { input: Input::Key(key), mods: mods | KeyMod::SPECIAL }
    }

    pub fn text(seq: Utf8Seq, mods: KeyMod) -> Self {
        Self { input: Input::Text(seq), mods }
    }

    pub fn char(c: char) -> Self {
        Self::text(Utf8Seq::from_char(c), KeyMod::NONE)
    }

    pub fn mouse(btn: MouseBtn, col: u16, row: u16, mods: KeyMod) -> Self {
        Self {
            input: Input::Mouse(MouseEvt { btn, col, row }),
            mods: mods | KeyMod::SPECIAL,
        }
    }

    pub fn is_none(&self) -> bool {
        self.input == Input::None
    }

    pub fn is_special(&self) -> bool {
        self.mods.contains(KeyMod::SPECIAL)
    }

    pub fn special(&self) -> Option<Key> {
        match self.input {
            Input::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Named key with no Ctrl/Alt/Shift held.
    pub fn is_plain(&self, key: Key) -> bool {
        self.special() == Some(key) && !self.has_modifiers()
    }

    pub fn text_seq(&self) -> Option<&Utf8Seq> {
        match &self.input {
            Input::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Unmodified text equal to `c`.
    pub fn is_char(&self, c: char) -> bool {
        self.text_seq().is_some_and(|t| t.is_char(c)) && !self.has_modifiers()
    }

    pub fn mouse_evt(&self) -> Option<MouseEvt> {
        match self.input {
            Input::Mouse(m) => Some(m),
            _ => None,
        }
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyMod::CTRL)
    }

    pub fn alt(&self) -> bool {
        self.mods.contains(KeyMod::ALT)
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyMod::SHIFT)
    }

    /// Any of Ctrl/Alt/Shift.
    pub fn has_modifiers(&self) -> bool {
        self.mods.intersects(KeyMod::CTRL | KeyMod::ALT | KeyMod::SHIFT)
    }
}

impl Default for KeyCode {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl() {
            f.write_str("Ctrl+")?;
        }
        if self.alt() {
            f.write_str("Alt+")?;
        }
        if self.shift() {
            f.write_str("Shift+")?;
        }
        match &self.input {
            Input::None => f.write_str("<?>"),
            Input::Text(t) => match t.as_str() {
                Some(s) => f.write_str(s),
                None => write!(f, "{:02x?}", t.as_bytes()),
            },
            Input::Key(k) => f.write_str(k.name()),
            Input::Mouse(m) => write!(f, "Mouse({:?} {},{})", m.btn, m.col, m.row),
        }
    }
}
