//! Terminal rendering of the transcript and preview panels.
//!
//! [`TranscriptPrinter`] turns the reducer's message list into terminal
//! output incrementally: call [`TranscriptPrinter::sync`] after every
//! applied event and print what it returns. Text that might be the start of
//! a markdown link is held back until the link is complete, so links are
//! always rendered whole.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::Local;
use lg_protocol::{Message, MessageKind};

use crate::links::{segments, Link, LinkTarget, Segment};
use crate::preview::{Block, Panel, ScheduleEntry};
use crate::style::{visible_width, Style};

pub struct TranscriptPrinter {
    style: Style,
    /// Render preview links as numbered buttons rather than plain labels.
    previews: bool,
    /// Echo the user's own messages.
    show_user: bool,
    /// Preview targets in the order their buttons were numbered.
    links: Vec<String>,
    /// Bytes of each started message already printed, by message id.
    printed: HashMap<String, usize>,
    /// Message whose header is printed but whose line is not yet ended.
    open: Option<String>,
}

impl TranscriptPrinter {
    pub fn new(style: Style, previews: bool) -> Self {
        Self {
            style,
            previews,
            show_user: false,
            links: Vec::new(),
            printed: HashMap::new(),
            open: None,
        }
    }

    pub fn with_user_messages(mut self) -> Self {
        self.show_user = true;
        self
    }

    pub fn set_previews(&mut self, enabled: bool) {
        self.previews = enabled;
    }

    /// Target of preview button `n` (1-based).
    pub fn link(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.links.get(i))
            .map(String::as_str)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Output for everything in `messages` not yet printed.
    ///
    /// `settled` means no more events are coming for this turn, so any
    /// held-back text is flushed as-is. Text appended to a message that was
    /// already closed is printed under a fresh header.
    pub fn sync(&mut self, messages: &[Message], settled: bool) -> String {
        let mut out = String::new();
        for (index, msg) in messages.iter().enumerate() {
            if msg.kind == MessageKind::User && !self.show_user {
                continue;
            }
            let closing = settled || index + 1 < messages.len();
            let is_open = self.open.as_deref() == Some(msg.id.as_str());
            let offset = match self.printed.get(&msg.id) {
                Some(&offset) if offset >= msg.content.len() && !(is_open && closing) => continue,
                Some(&offset) => offset,
                None => 0,
            };

            if !is_open {
                if self.open.take().is_some() {
                    out.push('\n');
                }
                out.push_str(&self.header(msg));
                self.open = Some(msg.id.clone());
            }
            let (text, end) = self.flush(msg, offset, closing);
            out.push_str(&text);
            self.printed.insert(msg.id.clone(), offset + end);
            if closing {
                out.push('\n');
                self.open = None;
            }
        }
        out
    }

    fn header(&self, msg: &Message) -> String {
        let time = msg.timestamp.with_timezone(&Local).format("%H:%M").to_string();
        let sender = match msg.kind {
            MessageKind::User => self.style.bold(msg.sender_label()),
            MessageKind::Agent if msg.agent.is_none() => self.style.red(msg.sender_label()),
            MessageKind::Agent => self.style.cyan(&self.style.bold(msg.sender_label())),
            MessageKind::Transfer => self.style.yellow(msg.sender_label()),
        };
        format!("\n{sender} {}\n", self.style.dim(&time))
    }

    fn flush(&mut self, msg: &Message, offset: usize, closing: bool) -> (String, usize) {
        let Some(pending) = msg.content.get(offset..) else {
            return (String::new(), 0);
        };
        let end = if closing {
            pending.len()
        } else {
            safe_end(pending)
        };
        (self.render_content(&pending[..end]), end)
    }

    fn render_content(&mut self, content: &str) -> String {
        let mut out = String::new();
        for segment in segments(content) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Link(link) => {
                    let rendered = self.render_link(link);
                    out.push_str(&rendered);
                }
            }
        }
        out
    }

    fn render_link(&mut self, link: Link) -> String {
        match link.target {
            LinkTarget::Preview(href) if self.previews => {
                self.links.push(href);
                let n = self.links.len();
                self.style.cyan(&format!("{} [{n}]", link.label))
            }
            LinkTarget::Preview(_) => self.style.bold(&link.label),
            LinkTarget::External(url) => {
                format!("{} ({})", self.style.underline(&link.label), self.style.dim(&url))
            }
        }
    }
}

/// Length of the prefix of `pending` that cannot be part of an unfinished
/// markdown link.
fn safe_end(pending: &str) -> usize {
    let Some(open) = pending.rfind('[') else {
        return pending.len();
    };
    let tail = &pending[open..];
    match segments(tail).first() {
        Some(Segment::Link(_)) => pending.len(),
        _ => open,
    }
}

/// The whole conversation, user messages included.
pub fn render_transcript(messages: &[Message], style: Style, previews: bool) -> String {
    TranscriptPrinter::new(style, previews)
        .with_user_messages()
        .sync(messages, true)
}

/// Lay a panel out as a bordered text block `width` columns wide.
pub fn render_panel(panel: &Panel, style: &Style, width: usize) -> String {
    let width = width.clamp(30, 80);
    let rule = "─".repeat(width);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", style.bold(&panel.title));
    if let Some(image) = panel.image {
        let _ = writeln!(out, "{}", style.dim(image));
    }
    let _ = writeln!(out, "{rule}");

    let label_width = panel
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Row { label, .. } => Some(visible_width(label)),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    for block in &panel.blocks {
        match block {
            Block::Row { label, value } => {
                let pad = " ".repeat(label_width - visible_width(label));
                let _ = writeln!(out, "{}{pad}  {value}", style.dim(label));
            }
            Block::Divider(title) => {
                let side = width.saturating_sub(visible_width(title) + 2) / 2;
                let _ = writeln!(out, "{} {} {}", "─".repeat(side), style.bold(title), "─".repeat(side));
            }
            Block::Tags { label, items } => {
                let _ = writeln!(out, "{}", style.dim(label));
                let _ = writeln!(out, "  {}", items.join(" · "));
            }
            Block::Schedule { title, groups } => {
                let _ = writeln!(out, "{}", style.bold(title));
                for group in groups {
                    let indent = if let Some(heading) = &group.heading {
                        let _ = writeln!(out, "  {}", style.underline(heading));
                        "    "
                    } else {
                        "  "
                    };
                    for entry in &group.entries {
                        match entry {
                            ScheduleEntry::Details { heading, fields } => {
                                let mut lines = fields.iter();
                                match heading {
                                    Some(h) => {
                                        let _ = writeln!(out, "{indent}• {}", style.bold(h));
                                    }
                                    None => {
                                        if let Some((k, v)) = lines.next() {
                                            let _ = writeln!(out, "{indent}• {}: {v}", style.dim(k));
                                        }
                                    }
                                }
                                for (k, v) in lines {
                                    let _ = writeln!(out, "{indent}  {}: {v}", style.dim(k));
                                }
                            }
                            ScheduleEntry::Text(text) => {
                                let _ = writeln!(out, "{indent}• {text}");
                            }
                        }
                    }
                }
            }
            Block::Raw(json) => {
                for line in json.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
    }
    let _ = writeln!(out, "{rule}");
    let _ = write!(out, "{}", style.dim("/close to dismiss"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::ScheduleGroup;
    use crate::reducer::ChatState;
    use chrono::{TimeZone, Utc};
    use lg_protocol::ChatEvent;

    const HREF: &str = "preview://flight/%7B%22flight_number%22%3A%22LG204%22%7D";

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap()
    }

    fn body(output: &str) -> Vec<&str> {
        output.lines().filter(|l| !l.is_empty()).skip(1).collect()
    }

    #[test]
    fn streams_text_as_it_arrives() {
        let mut state = ChatState::new("Sam");
        let mut printer = TranscriptPrinter::new(Style::disabled(), true);
        state.submit_user("hi", at());
        assert_eq!(printer.sync(&state.messages, false), "");

        state.apply(&ChatEvent::content("Hello "), at());
        let first = printer.sync(&state.messages, false);
        assert!(first.starts_with("\nSam "));
        assert!(first.ends_with("Hello "));

        state.apply(&ChatEvent::content("there"), at());
        assert_eq!(printer.sync(&state.messages, false), "there");
        state.apply(&ChatEvent::Done, at());
        assert_eq!(printer.sync(&state.messages, true), "\n");
    }

    #[test]
    fn holds_back_partial_links() {
        let mut state = ChatState::new("Jenny");
        let mut printer = TranscriptPrinter::new(Style::disabled(), true);
        state.submit_user("flights?", at());

        state.apply(&ChatEvent::content("Try [LG2"), at());
        let out = printer.sync(&state.messages, false);
        assert!(out.ends_with("Try "));

        state.apply(&ChatEvent::content(&format!("04]({HREF}) today.")), at());
        assert_eq!(printer.sync(&state.messages, false), "LG204 [1] today.");
        assert_eq!(printer.link(1), Some(HREF));
        assert_eq!(printer.link(0), None);
        assert_eq!(printer.link(2), None);
    }

    #[test]
    fn previews_without_capability_are_labels() {
        let mut state = ChatState::new("Jenny");
        let mut printer = TranscriptPrinter::new(Style::disabled(), false);
        state.apply(&ChatEvent::content(&format!("Book [LG204]({HREF}).")), at());
        let out = printer.sync(&state.messages, true);
        assert_eq!(body(&out), vec!["Book LG204."]);
        assert_eq!(printer.link_count(), 0);
    }

    #[test]
    fn settled_turn_flushes_unfinished_bracket() {
        let mut state = ChatState::new("Sam");
        let mut printer = TranscriptPrinter::new(Style::disabled(), true);
        state.apply(&ChatEvent::content("see [note"), at());
        assert!(printer.sync(&state.messages, false).ends_with("see "));
        assert_eq!(printer.sync(&state.messages, true), "[note\n");
    }

    #[test]
    fn text_after_error_resumes_earlier_message() {
        let mut state = ChatState::new("Sam");
        let mut printer = TranscriptPrinter::new(Style::disabled(), true);
        state.apply(&ChatEvent::content("Checking"), at());
        printer.sync(&state.messages, false);
        state.apply(&ChatEvent::error("Rate limited"), at());
        let out = printer.sync(&state.messages, false);
        assert!(out.ends_with("Error: Rate limited"));

        state.apply(&ChatEvent::content(" flights."), at());
        let out = printer.sync(&state.messages, true);
        assert_eq!(body(&out), vec![" flights."]);
        assert!(out.starts_with("\n\nSam "));
        assert_eq!(printer.sync(&state.messages, true), "");
    }

    #[test]
    fn transfer_closes_previous_message() {
        let mut state = ChatState::new("Sam");
        let mut printer = TranscriptPrinter::new(Style::disabled(), true);
        state.apply(&ChatEvent::content("One moment."), at());
        printer.sync(&state.messages, false);
        state.apply(&ChatEvent::transfer("Jenny", "Transferring you to Jenny"), at());
        let out = printer.sync(&state.messages, false);
        assert!(out.starts_with("\n\n🔄 Transfer "));
        assert!(out.ends_with("Transferring you to Jenny"));
    }

    #[test]
    fn transcript_includes_user_messages() {
        let mut state = ChatState::with_greeting("Sam", "Hi!", at());
        state.submit_user("Plan Rome", at());
        let out = render_transcript(&state.messages, Style::disabled(), true);
        assert!(out.contains("\nSam "));
        assert!(out.contains("\nYou "));
        assert!(out.contains("Plan Rome\n"));
    }

    #[test]
    fn panel_text_layout() {
        let panel = Panel {
            title: "Hotel Roma".to_string(),
            image: Some("/img/accomodations/hotel.png"),
            blocks: vec![
                Block::Row {
                    label: "ID".to_string(),
                    value: "h1".to_string(),
                },
                Block::Row {
                    label: "Price per Night".to_string(),
                    value: "$310".to_string(),
                },
                Block::Tags {
                    label: "Amenities".to_string(),
                    items: vec!["Spa".to_string(), "Gym".to_string()],
                },
                Block::Schedule {
                    title: "days".to_string(),
                    groups: vec![ScheduleGroup {
                        heading: Some("day 1".to_string()),
                        entries: vec![ScheduleEntry::Text("Colosseum".to_string())],
                    }],
                },
            ],
        };
        let out = render_panel(&panel, &Style::disabled(), 40);
        assert!(out.contains("Hotel Roma\n/img/accomodations/hotel.png\n"));
        assert!(out.contains("ID               h1\n"));
        assert!(out.contains("Price per Night  $310\n"));
        assert!(out.contains("  Spa · Gym\n"));
        assert!(out.contains("  day 1\n    • Colosseum\n"));
        assert!(out.ends_with("/close to dismiss"));
    }
}
