use std::io::Write;

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::terminal::KeySource;

/// The user pressed Ctrl+C while a line was being collected
#[derive(Debug, thiserror::Error)]
#[error("input interrupted by user")]
pub struct InputInterrupted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Line break inside the buffer (Ctrl+J or pasted)
    Newline,
    Backspace,
    Submit,
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Collecting,
    Finalizing,
    Interrupted,
}

/// What has to change on screen after a key was applied
#[derive(Debug, PartialEq, Eq)]
pub enum Edit {
    Echo(char),
    /// The current visual line must be redrawn, after moving up first if a line break was removed
    Redraw { joined_previous_line: bool },
    Unchanged,
    Finalized,
    Interrupted,
}

/// Keystroke state machine for a single line of input
#[derive(Debug)]
pub struct LineEditor {
    buffer: String,
    state: LineState,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            state: LineState::Collecting,
        }
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Keys arriving after the line was finalized or interrupted are ignored
    pub fn apply(&mut self, key: Key) -> Edit {
        if self.state != LineState::Collecting {
            return Edit::Unchanged;
        }
        match key {
            Key::Interrupt => {
                self.state = LineState::Interrupted;
                Edit::Interrupted
            }
            Key::Submit | Key::Char('\r') | Key::Char('\n') => {
                self.state = LineState::Finalizing;
                Edit::Finalized
            }
            Key::Backspace => match self.buffer.pop() {
                Some(removed) => Edit::Redraw {
                    joined_previous_line: removed == '\n',
                },
                None => Edit::Unchanged,
            },
            Key::Newline => {
                self.buffer.push('\n');
                Edit::Echo('\n')
            }
            Key::Char(c) => {
                self.buffer.push(c);
                Edit::Echo(c)
            }
        }
    }

    /// The text on the line the cursor is on and whether that line also shows the prompt
    pub fn current_line(&self) -> (&str, bool) {
        match self.buffer.rfind('\n') {
            Some(idx) => (&self.buffer[idx + 1..], false),
            None => (&self.buffer, true),
        }
    }

    pub fn into_line(self) -> String {
        self.buffer
    }
}

/// Pairs a key source with the screen that echoes it
pub struct Console<K, W> {
    keys: K,
    out: W,
}

impl<K: KeySource, W: Write> Console<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        Self { keys, out }
    }

    /// Writes a line of text while the terminal is in normal mode
    pub fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Collects one line of input, returning [`InputInterrupted`] on Ctrl+C
    ///
    /// The returned text never contains the key that submitted it.
    pub fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let _raw_mode = self.keys.raw_mode()?;

        let mut editor = LineEditor::new();
        loop {
            let key = self.keys.next_key()?;
            match editor.apply(key) {
                Edit::Echo('\n') => queue!(self.out, Print("\r\n"))?,
                Edit::Echo(c) => queue!(self.out, Print(c))?,
                Edit::Redraw {
                    joined_previous_line,
                } => self.redraw(prompt, &editor, joined_previous_line)?,
                Edit::Unchanged => (),
                Edit::Finalized => {
                    queue!(self.out, Print("\r\n"))?;
                    self.out.flush()?;
                    return Ok(editor.into_line());
                }
                Edit::Interrupted => {
                    queue!(self.out, Print("\r\nExiting...\r\n"))?;
                    self.out.flush()?;
                    return Err(InputInterrupted.into());
                }
            }
            self.out.flush()?;
        }
    }

    fn redraw(
        &mut self,
        prompt: &str,
        editor: &LineEditor,
        joined_previous_line: bool,
    ) -> std::io::Result<()> {
        if joined_previous_line {
            queue!(self.out, MoveUp(1))?;
        }
        let (line, shows_prompt) = editor.current_line();
        queue!(self.out, Clear(ClearType::CurrentLine), MoveToColumn(0))?;
        if shows_prompt {
            queue!(self.out, Print(prompt))?;
        }
        queue!(self.out, Print(line))
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedKeys;

    fn typed(text: &str) -> Vec<Key> {
        text.chars().map(Key::Char).collect()
    }

    #[test]
    fn backspace_on_empty_buffer() {
        // Arrange
        let mut editor = LineEditor::new();

        // Act
        let actual = editor.apply(Key::Backspace);

        // Assert
        assert_eq!(actual, Edit::Unchanged);
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.state(), LineState::Collecting);
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut editor = LineEditor::new();
        for key in typed("abc") {
            editor.apply(key);
        }

        let actual = editor.apply(Key::Backspace);

        assert_eq!(
            actual,
            Edit::Redraw {
                joined_previous_line: false
            }
        );
        assert_eq!(editor.buffer(), "ab");
    }

    #[test]
    fn backspace_over_line_break() {
        let mut editor = LineEditor::new();
        editor.apply(Key::Char('a'));
        editor.apply(Key::Newline);
        assert_eq!(editor.current_line(), ("", false));

        let actual = editor.apply(Key::Backspace);

        assert_eq!(
            actual,
            Edit::Redraw {
                joined_previous_line: true
            }
        );
        assert_eq!(editor.current_line(), ("a", true));
    }

    #[test]
    fn keys_after_submit_are_ignored() {
        let mut editor = LineEditor::new();
        editor.apply(Key::Char('a'));
        assert_eq!(editor.apply(Key::Submit), Edit::Finalized);

        assert_eq!(editor.apply(Key::Char('b')), Edit::Unchanged);
        assert_eq!(editor.apply(Key::Interrupt), Edit::Unchanged);
        assert_eq!(editor.state(), LineState::Finalizing);
        assert_eq!(editor.into_line(), "a");
    }

    #[test]
    fn raw_line_endings_submit() {
        for terminator in ['\r', '\n'] {
            let mut editor = LineEditor::new();
            editor.apply(Key::Char('x'));

            assert_eq!(editor.apply(Key::Char(terminator)), Edit::Finalized);
            assert_eq!(editor.into_line(), "x");
        }
    }

    #[test]
    fn interrupt_moves_to_interrupted() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.apply(Key::Interrupt), Edit::Interrupted);
        assert_eq!(editor.state(), LineState::Interrupted);
    }

    #[test]
    fn read_line_excludes_terminator() {
        // Arrange
        let mut keys = typed("Hellp");
        keys.extend([Key::Backspace, Key::Char('o'), Key::Submit]);
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        // Act
        let actual = console.read_line("Subject: ").unwrap();

        // Assert
        assert_eq!(actual, "Hello");
        assert_eq!(console.keys().raw_mode_sessions, 1);
        let screen = String::from_utf8_lossy(console.output());
        assert!(screen.starts_with("Subject: Hellp"));
        assert!(screen.ends_with("o\r\n"));
    }

    #[test]
    fn backspace_redraws_prompt_and_buffer() {
        // Arrange
        let mut keys = typed("Hellp");
        keys.extend([Key::Backspace, Key::Submit]);
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        // Act
        console.read_line("Subject: ").unwrap();

        // Assert
        let screen = String::from_utf8_lossy(console.output());
        assert_eq!(screen, "Subject: Hellp\x1b[2K\x1b[1GSubject: Hell\r\n");
    }

    #[test]
    fn backspace_over_line_break_moves_up() {
        let keys = vec![Key::Char('a'), Key::Newline, Key::Backspace, Key::Submit];
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        let actual = console.read_line("> ").unwrap();

        assert_eq!(actual, "a");
        let screen = String::from_utf8_lossy(console.output());
        assert_eq!(screen, "> a\r\n\x1b[1A\x1b[2K\x1b[1G> a\r\n");
    }

    #[test]
    fn backspace_on_second_line_skips_prompt() {
        let keys = vec![
            Key::Char('a'),
            Key::Newline,
            Key::Char('b'),
            Key::Char('c'),
            Key::Backspace,
            Key::Submit,
        ];
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        let actual = console.read_line("> ").unwrap();

        assert_eq!(actual, "a\nb");
        let screen = String::from_utf8_lossy(console.output());
        assert_eq!(screen, "> a\r\nbc\x1b[2K\x1b[1Gb\r\n");
    }

    #[test]
    fn backspace_on_empty_line_draws_nothing() {
        let keys = vec![Key::Backspace, Key::Submit];
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        let actual = console.read_line("> ").unwrap();

        assert_eq!(actual, "");
        assert_eq!(String::from_utf8_lossy(console.output()), "> \r\n");
    }

    #[test]
    fn read_line_keeps_line_breaks() {
        let keys = vec![Key::Char('1'), Key::Newline, Key::Char('2'), Key::Submit];
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        let actual = console.read_line("> ").unwrap();

        assert_eq!(actual, "1\n2");
    }

    #[test]
    fn read_line_interrupted() {
        let keys = vec![Key::Char('a'), Key::Interrupt, Key::Submit];
        let mut console = Console::new(ScriptedKeys::new(keys), Vec::new());

        let actual = console.read_line("> ").unwrap_err();

        assert!(actual.downcast_ref::<InputInterrupted>().is_some());
        assert_eq!(console.keys().remaining(), 1);
        assert!(String::from_utf8_lossy(console.output()).contains("Exiting..."));
    }

    #[test]
    fn read_line_closed_input() {
        let mut console = Console::new(ScriptedKeys::new(typed("ab")), Vec::new());

        let actual = console.read_line("> ").unwrap_err();

        assert!(actual.downcast_ref::<InputInterrupted>().is_none());
    }
}
