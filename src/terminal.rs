use std::{
    collections::VecDeque,
    io::{self, stdout},
};

use anyhow::Context;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use log::{debug, error};

use crate::line_reader::Key;

/// Where keystrokes come from
///
/// The real implementation is [`TerminalKeys`], tests feed scripted keys.
pub trait KeySource {
    /// Switches to character-at-a-time mode until the guard is dropped
    fn raw_mode(&mut self) -> anyhow::Result<RawModeGuard>;

    /// Blocks until the next key is available
    fn next_key(&mut self) -> anyhow::Result<Key>;
}

/// Restores the terminal to normal (cooked) mode when dropped
#[derive(Debug)]
pub struct RawModeGuard {
    active: bool,
    bracketed_paste: bool,
}

impl RawModeGuard {
    pub fn acquire() -> anyhow::Result<Self> {
        Self::acquire_with(enable_raw_mode, || execute!(stdout(), EnableBracketedPaste))
    }

    /// Paste mode is only requested once raw mode is held, so a failure leaves nothing to undo
    fn acquire_with<R, P>(enable_raw: R, enable_paste: P) -> anyhow::Result<Self>
    where
        R: FnOnce() -> io::Result<()>,
        P: FnOnce() -> io::Result<()>,
    {
        enable_raw().context("Failed to switch terminal to raw mode. Is stdin a TTY?")?;
        // Not every terminal supports it, pasting still works key by key without it
        let bracketed_paste = enable_paste().is_ok();
        Ok(Self {
            active: true,
            bracketed_paste,
        })
    }

    /// A guard that owns nothing, for sources that aren't a terminal
    pub fn detached() -> Self {
        Self {
            active: false,
            bracketed_paste: false,
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if self.bracketed_paste {
            if let Err(e) = execute!(stdout(), DisableBracketedPaste) {
                debug!("Failed to disable bracketed paste: {e}");
            }
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to restore terminal mode: {e}");
        }
    }
}

/// Keystrokes read from the controlling terminal via crossterm
#[derive(Debug, Default)]
pub struct TerminalKeys {
    pending: VecDeque<Key>,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeys {
    fn raw_mode(&mut self) -> anyhow::Result<RawModeGuard> {
        RawModeGuard::acquire()
    }

    fn next_key(&mut self) -> anyhow::Result<Key> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(key);
            }
            let event = event::read().context("Failed to read terminal event")?;
            self.pending.extend(keys_from_event(event));
        }
    }
}

pub fn keys_from_event(event: Event) -> Vec<Key> {
    match event {
        Event::Key(key_event) => key_from_key_event(key_event).into_iter().collect(),
        Event::Paste(text) => keys_from_paste(&text),
        _ => vec![],
    }
}

fn key_from_key_event(key_event: KeyEvent) -> Option<Key> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = key_event;
    if kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('c') if ctrl => Some(Key::Interrupt),
        KeyCode::Char('j') if ctrl => Some(Key::Newline),
        KeyCode::Char('h') if ctrl => Some(Key::Backspace),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Tab => Some(Key::Char('\t')),
        KeyCode::Enter => Some(Key::Submit),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Pasted text is taken verbatim, any line ending (CR, LF or CRLF) becomes one line break
pub fn keys_from_paste(text: &str) -> Vec<Key> {
    let mut result = Vec::with_capacity(text.len());
    let mut after_cr = false;
    for c in text.chars() {
        match c {
            '\r' => {
                result.push(Key::Newline);
                after_cr = true;
                continue;
            }
            '\n' if after_cr => (),
            '\n' => result.push(Key::Newline),
            c => result.push(Key::Char(c)),
        }
        after_cr = false;
    }
    result
}

/// Replays a fixed list of keys, failing like a closed stdin once it runs out
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedKeys {
    keys: VecDeque<Key>,
    pub raw_mode_sessions: usize,
}

#[cfg(test)]
impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            raw_mode_sessions: 0,
        }
    }

    /// Types each line followed by Enter
    pub fn lines(lines: &[&str]) -> Self {
        Self::new(lines.iter().flat_map(|line| {
            line.chars()
                .map(|c| if c == '\n' { Key::Newline } else { Key::Char(c) })
                .chain(std::iter::once(Key::Submit))
                .collect::<Vec<_>>()
        }))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn raw_mode(&mut self) -> anyhow::Result<RawModeGuard> {
        self.raw_mode_sessions += 1;
        Ok(RawModeGuard::detached())
    }

    fn next_key(&mut self) -> anyhow::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("Input stream closed"))
    }
}
