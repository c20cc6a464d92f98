use std::borrow::Cow;

/// Keeps user supplied multi-line text on a single log line
pub fn make_single_line(s: &str) -> Cow<str> {
    if s.contains('\n') {
        Cow::Owned(s.replace('\n', "↵"))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_linefeed() {
        let s = "Hello\nWorld!".to_string();
        assert!(s.contains('\n'));
        assert!(!make_single_line(&s).contains('\n'));
    }

    #[test]
    fn single_line_is_borrowed() {
        assert!(matches!(make_single_line("Hello"), Cow::Borrowed("Hello")));
    }
}
