//! Escape sequence decoder for terminal input.
//!
//! Turns buffered raw bytes into one [`KeyCode`] per call, consuming only the
//! bytes of that one token:
//! - Control bytes (Backspace, Tab, Enter from CR or LF, Esc), then Ctrl+letter
//! - ESC sequences matched against a static table of named keys (xterm, rxvt
//!   and linux console flavours, crossed with Shift/Alt/Ctrl)
//! - X10 (`ESC [ M b x y`) and SGR (`ESC [ < b ; x ; y M`) mouse reports
//! - Alt+character (`ESC <printable>`), Alt+Backspace, Alt+Enter and Alt+Tab
//! - UTF-8 text, 1 to 4 bytes copied verbatim
//!
//! Nothing is consumed while a token is still incomplete; the caller retries
//! after more bytes arrive. CR and LF each decode to their own Enter. ESC in
//! front of any other control byte or a UTF-8 lead is a plain Esc key.
//! The decoder never fails: anything it cannot name comes out as
//! [`Input::None`].

use std::sync::OnceLock;

use super::keycode::{Input, Key, KeyCode, KeyMod, MouseBtn, Utf8Seq};

const ESC: u8 = 0x1B;

/// Pending bytes after which an undecodable prefix is dropped even without a
/// newer ESC byte.
pub const DEFAULT_MAX_PENDING: usize = 32;

// =============================================================================
// Decoder
// =============================================================================

/// Input decoder owning the pending-byte buffer.
#[derive(Debug, Clone)]
pub struct AnsiDecoder {
    buf: Vec<u8>,
    max_pending: usize,
}

impl AnsiDecoder {
    pub fn new() -> Self {
        Self::with_max_pending(DEFAULT_MAX_PENDING)
    }

    pub fn with_max_pending(max_pending: usize) -> Self {
        Self {
            buf: Vec::with_capacity(64),
            max_pending: max_pending.max(8),
        }
    }

    /// Append freshly read bytes.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Decode the next token. [`Input::None`] with bytes still pending means
    /// "wait for more input".
    pub fn decode(&mut self) -> KeyCode {
        decode_with_limit(&mut self.buf, self.max_pending)
    }

    /// Bytes not yet consumed.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for AnsiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode one token from the front of `buf`, removing exactly its bytes.
pub fn decode_input_seq(buf: &mut Vec<u8>) -> KeyCode {
    decode_with_limit(buf, DEFAULT_MAX_PENDING)
}

fn decode_with_limit(buf: &mut Vec<u8>, max_pending: usize) -> KeyCode {
    let Some(&first) = buf.first() else {
        return KeyCode::none();
    };

    let result = if first == ESC {
        parse_escape(buf)
    } else {
        parse_plain(buf)
    };

    match result {
        ParseResult::Event(kc, consumed) => {
            buf.drain(..consumed);
            tracing::trace!(key = %kc, consumed, "decoded");
            kc
        }
        ParseResult::Discard(n) => {
            tracing::debug!(bytes = ?&buf[..n], "discarding undecodable input");
            buf.drain(..n);
            KeyCode::none()
        }
        ParseResult::Incomplete if buf.len() >= max_pending => {
            let n = escape_run(buf);
            tracing::debug!(pending = buf.len(), dropped = n, "input buffer limit reached");
            buf.drain(..n);
            KeyCode::none()
        }
        ParseResult::Incomplete => KeyCode::none(),
    }
}

// =============================================================================
// Helpers
// =============================================================================

enum ParseResult {
    /// A token and the number of bytes it spans.
    Event(KeyCode, usize),
    /// Not enough bytes yet; consume nothing.
    Incomplete,
    /// Drop this many bytes without producing a key.
    Discard(usize),
}

fn next_esc(buf: &[u8], from: usize) -> Option<usize> {
    buf.iter()
        .skip(from)
        .position(|&b| b == ESC)
        .map(|p| p + from)
}

/// Length of the escape run at the front of `buf`: ESC, then for CSI the
/// `[` and its parameter bytes. Bytes after the run are left for decoding.
fn escape_run(buf: &[u8]) -> usize {
    if buf.first() != Some(&ESC) {
        return buf.len();
    }
    if buf.get(1) != Some(&b'[') {
        return 1;
    }
    2 + buf[2..]
        .iter()
        .take_while(|b| (0x20..=0x3F).contains(*b))
        .count()
}

fn special(key: Key, mods: KeyMod, consumed: usize) -> ParseResult {
    ParseResult::Event(KeyCode::key(key, mods), consumed)
}

// =============================================================================
// Single bytes and UTF-8
// =============================================================================

fn parse_plain(buf: &[u8]) -> ParseResult {
    let first = buf[0];

    // Fixed control table wins over the generic Ctrl+letter mapping.
    match first {
        0x08 | 0x7F => return special(Key::Backspace, KeyMod::NONE, 1),
        0x09 => return special(Key::Tab, KeyMod::NONE, 1),
        0x0A | 0x0D => return special(Key::Enter, KeyMod::NONE, 1),
        _ => {}
    }

    if (0x01..=0x1A).contains(&first) {
        let letter = b'A' + first - 1;
        return ParseResult::Event(
            KeyCode::text(Utf8Seq::from_bytes(&[letter]), KeyMod::CTRL),
            1,
        );
    }
    if first < 0x20 {
        return ParseResult::Discard(1);
    }

    let len = match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    };
    if buf.len() < len {
        return ParseResult::Incomplete;
    }
    ParseResult::Event(KeyCode::text(Utf8Seq::from_bytes(&buf[..len]), KeyMod::NONE), len)
}

// =============================================================================
// Escape sequences
// =============================================================================

fn parse_escape(buf: &[u8]) -> ParseResult {
    let rest = &buf[1..];
    let end = next_esc(rest, 0).unwrap_or(rest.len());
    let seq = &rest[..end];
    let newer_esc = end < rest.len();

    // Lone ESC, or ESC directly followed by another ESC.
    if seq.is_empty() {
        return special(Key::Esc, KeyMod::NONE, 1);
    }

    if seq.starts_with(b"[M") {
        return parse_x10_mouse(seq);
    }
    if seq.starts_with(b"[<") {
        if let Some(result) = parse_sgr_mouse(seq) {
            return result;
        }
    }

    if let Some(entry) = lookup(seq) {
        return special(entry.key, entry.mods, 1 + entry.seq.len());
    }
    if is_table_prefix(seq) {
        return ParseResult::Incomplete;
    }

    match seq[0] {
        b'[' => match csi_extent(seq) {
            CsiExtent::Complete(n) => ParseResult::Discard(1 + n),
            CsiExtent::Partial => ParseResult::Incomplete,
            CsiExtent::Invalid => undecodable(buf, newer_esc),
        },
        0x20..=0x7E => ParseResult::Event(
            KeyCode::text(Utf8Seq::from_bytes(&seq[..1]), KeyMod::ALT),
            2,
        ),
        0x08 | 0x7F => special(Key::Backspace, KeyMod::ALT, 2),
        0x0A | 0x0D => special(Key::Enter, KeyMod::ALT, 2),
        0x09 => special(Key::Tab, KeyMod::ALT, 2),
        _ => special(Key::Esc, KeyMod::NONE, 1),
    }
}

/// A broken CSI run is held until a newer ESC shows where the next token
/// starts, then only the run itself is dropped.
fn undecodable(buf: &[u8], newer_esc: bool) -> ParseResult {
    if newer_esc {
        ParseResult::Discard(escape_run(buf))
    } else {
        ParseResult::Incomplete
    }
}

enum CsiExtent {
    Complete(usize),
    Partial,
    Invalid,
}

/// Length of a `[ params intermediates final` run.
fn csi_extent(seq: &[u8]) -> CsiExtent {
    for (i, &b) in seq.iter().enumerate().skip(1) {
        match b {
            0x20..=0x3F => continue,
            0x40..=0x7E => return CsiExtent::Complete(i + 1),
            _ => return CsiExtent::Invalid,
        }
    }
    CsiExtent::Partial
}

fn mouse_mods(cb: u16) -> KeyMod {
    let mut m = KeyMod::NONE;
    if cb & 4 != 0 {
        m |= KeyMod::SHIFT;
    }
    if cb & 8 != 0 {
        m |= KeyMod::ALT;
    }
    if cb & 16 != 0 {
        m |= KeyMod::CTRL;
    }
    m
}

fn mouse_btn(cb: u16, released: bool) -> MouseBtn {
    if cb & 64 != 0 {
        return if cb & 1 == 0 { MouseBtn::WheelUp } else { MouseBtn::WheelDown };
    }
    if cb & 32 != 0 {
        return MouseBtn::Move;
    }
    if released {
        return MouseBtn::ButtonReleased;
    }
    match cb & 3 {
        0 => MouseBtn::ButtonLeft,
        1 => MouseBtn::ButtonMid,
        2 => MouseBtn::ButtonRight,
        _ => MouseBtn::ButtonReleased,
    }
}

/// `ESC [ M Cb Cx Cy`, each byte offset by 32.
fn parse_x10_mouse(seq: &[u8]) -> ParseResult {
    if seq.len() < 5 {
        return ParseResult::Incomplete;
    }
    let cb = seq[2].wrapping_sub(32) as u16;
    let col = seq[3].wrapping_sub(32) as u16;
    let row = seq[4].wrapping_sub(32) as u16;
    ParseResult::Event(
        KeyCode::mouse(mouse_btn(cb, false), col, row, mouse_mods(cb)),
        6,
    )
}

/// `ESC [ < Cb ; Cx ; Cy (M|m)`. `None` when the bytes are not SGR-shaped.
fn parse_sgr_mouse(seq: &[u8]) -> Option<ParseResult> {
    let body = &seq[2..];
    let Some(term) = body.iter().position(|&b| b == b'M' || b == b'm') else {
        let partial = body.iter().all(|&b| b.is_ascii_digit() || b == b';');
        return partial.then_some(ParseResult::Incomplete);
    };

    let consumed = 1 + 2 + term + 1;
    let params: Vec<u16> = std::str::from_utf8(&body[..term])
        .ok()?
        .split(';')
        .map(|s| s.parse::<u16>())
        .collect::<Result<_, _>>()
        .ok()?;
    let [cb, col, row] = params[..] else {
        return Some(ParseResult::Discard(consumed));
    };

    let released = body[term] == b'm';
    Some(ParseResult::Event(
        KeyCode::mouse(mouse_btn(cb, released), col, row, mouse_mods(cb)),
        consumed,
    ))
}

// =============================================================================
// Named sequence table
// =============================================================================

#[derive(Debug, Clone)]
struct SeqEntry {
    /// Bytes following ESC.
    seq: Vec<u8>,
    key: Key,
    mods: KeyMod,
}

/// Sorted by `seq`; no entry is a prefix of another.
fn table() -> &'static [SeqEntry] {
    static TABLE: OnceLock<Vec<SeqEntry>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn build_table() -> Vec<SeqEntry> {
    let mut t = Vec::with_capacity(256);
    let mut add = |seq: String, key: Key, mods: KeyMod| {
        t.push(SeqEntry { seq: seq.into_bytes(), key, mods });
    };

    // CSI/SS3 final letters
    let letters = [
        ('A', Key::Up),
        ('B', Key::Down),
        ('C', Key::Right),
        ('D', Key::Left),
        ('H', Key::Home),
        ('F', Key::End),
    ];
    for (ch, key) in letters {
        add(format!("[{ch}"), key, KeyMod::NONE);
        add(format!("O{ch}"), key, KeyMod::NONE);
        for m in 2..=8u8 {
            add(format!("[1;{m}{ch}"), key, KeyMod::from_xterm_param(m));
        }
    }

    // F1..F4 as SS3, modified as CSI 1;m
    for (ch, n) in [('P', 1u8), ('Q', 2), ('R', 3), ('S', 4)] {
        add(format!("O{ch}"), Key::F(n), KeyMod::NONE);
        for m in 2..=8u8 {
            add(format!("[1;{m}{ch}"), Key::F(n), KeyMod::from_xterm_param(m));
        }
    }

    // rxvt: shifted arrows as lowercase CSI, ctrl arrows as lowercase SS3
    for (ch, key) in [('a', Key::Up), ('b', Key::Down), ('c', Key::Right), ('d', Key::Left)] {
        add(format!("[{ch}"), key, KeyMod::SHIFT);
        add(format!("O{ch}"), key, KeyMod::CTRL);
    }

    // linux console F1..F5
    for (ch, n) in [('A', 1u8), ('B', 2), ('C', 3), ('D', 4), ('E', 5)] {
        add(format!("[[{ch}"), Key::F(n), KeyMod::NONE);
    }

    // `ESC [ n ~` family
    let tilde = [
        (1u8, Key::Home),
        (2, Key::Insert),
        (3, Key::Delete),
        (4, Key::End),
        (5, Key::PgUp),
        (6, Key::PgDown),
        (7, Key::Home),
        (8, Key::End),
        (11, Key::F(1)),
        (12, Key::F(2)),
        (13, Key::F(3)),
        (14, Key::F(4)),
        (15, Key::F(5)),
        (17, Key::F(6)),
        (18, Key::F(7)),
        (19, Key::F(8)),
        (20, Key::F(9)),
        (21, Key::F(10)),
        (23, Key::F(11)),
        (24, Key::F(12)),
    ];
    for (n, key) in tilde {
        add(format!("[{n}~"), key, KeyMod::NONE);
        add(format!("[{n}^"), key, KeyMod::CTRL);
        add(format!("[{n}$"), key, KeyMod::SHIFT);
        for m in 2..=8u8 {
            add(format!("[{n};{m}~"), key, KeyMod::from_xterm_param(m));
        }
    }

    add("[Z".to_string(), Key::Tab, KeyMod::SHIFT);

    t.sort_by(|a, b| a.seq.cmp(&b.seq));
    t
}

fn lookup(seq: &[u8]) -> Option<&'static SeqEntry> {
    let t = table();
    (1..=seq.len()).find_map(|len| {
        t.binary_search_by(|e| e.seq.as_slice().cmp(&seq[..len]))
            .ok()
            .map(|i| &t[i])
    })
}

fn is_table_prefix(seq: &[u8]) -> bool {
    let t = table();
    let idx = t.partition_point(|e| e.seq.as_slice() < seq);
    t.get(idx)
        .is_some_and(|e| e.seq.len() > seq.len() && e.seq.starts_with(seq))
}

// =============================================================================
// Tests
// =============================================================================
