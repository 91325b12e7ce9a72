//! Terminal styling with `NO_COLOR` support.

/// Color output is on unless `NO_COLOR` is set.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

#[derive(Debug, Clone, Copy)]
pub struct Style {
    enabled: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

impl Style {
    pub fn new() -> Self {
        Self {
            enabled: color_enabled(),
        }
    }

    pub fn force_enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap("1", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.wrap("2", text)
    }

    pub fn red(&self, text: &str) -> String {
        self.wrap("31", text)
    }

    pub fn green(&self, text: &str) -> String {
        self.wrap("32", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.wrap("33", text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.wrap("36", text)
    }

    pub fn underline(&self, text: &str) -> String {
        self.wrap("4", text)
    }
}

/// Visible width of a string, ignoring ANSI escape sequences.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += char_width(c);
        }
    }
    width
}

/// Approximate terminal columns taken by one character.
fn char_width(c: char) -> usize {
    if c < ' ' {
        return 0;
    }
    if c.is_ascii() {
        return 1;
    }
    let cp = c as u32;
    // Variation selectors and zero-width joiners.
    if (0xFE00..=0xFE0F).contains(&cp) || cp == 0x200D {
        return 0;
    }
    if (0x1100..=0x115F).contains(&cp)
        || (0x2E80..=0x303E).contains(&cp)
        || (0x3040..=0x33BF).contains(&cp)
        || (0x4E00..=0x9FFF).contains(&cp)
        || (0xFF01..=0xFF60).contains(&cp)
        || (0x1F300..=0x1FAFF).contains(&cp)
        || cp == 0x2B50
    {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_style_is_plain() {
        let style = Style::disabled();
        assert_eq!(style.bold("Sam"), "Sam");
        assert_eq!(style.red("Error"), "Error");
    }

    #[test]
    fn enabled_style_wraps_in_escapes() {
        let style = Style::force_enabled();
        assert_eq!(style.dim("09:30"), "\x1b[2m09:30\x1b[0m");
        assert_eq!(style.cyan("[1]"), "\x1b[36m[1]\x1b[0m");
    }

    #[test]
    fn width_ignores_ansi() {
        assert_eq!(visible_width("\x1b[31mhello\x1b[0m"), 5);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn width_counts_wide_symbols() {
        assert_eq!(visible_width("JFK → FCO"), 9);
        assert_eq!(visible_width("⭐ 4.7"), 5);
        assert_eq!(visible_width("🔄 Transfer"), 11);
    }
}
