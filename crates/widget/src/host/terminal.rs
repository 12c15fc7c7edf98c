use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};

use crate::chat::{Message, RenderedMessage, Sender, WidgetView};

/// Line-oriented stand-in for the browser panel.
///
/// Commands and confirmations are read from the same source so the host never
/// competes with itself for stdin.
pub struct TerminalView<R, W> {
    input_source: RefCell<R>,
    output: RefCell<W>,
    pending_input: RefCell<String>,
    typing_label: String,
    panel_open: Cell<bool>,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input_source: R, output: W, typing_label: impl Into<String>) -> Self {
        Self {
            input_source: RefCell::new(input_source),
            output: RefCell::new(output),
            pending_input: RefCell::new(String::new()),
            typing_label: typing_label.into(),
            panel_open: Cell::new(false),
        }
    }

    /// Reads the next line; `None` at end of input.
    pub fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match self.input_source.borrow_mut().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(error) => {
                tracing::warn!("failed to read terminal input: {error}");
                None
            }
        }
    }

    /// Fills the simulated input field.
    pub fn set_input(&self, text: &str) {
        *self.pending_input.borrow_mut() = text.to_string();
    }

    pub fn print_line(&self, line: &str) {
        let mut output = self.output.borrow_mut();
        if let Err(error) = writeln!(output, "{line}").and_then(|()| output.flush()) {
            tracing::warn!("failed to write terminal output: {error}");
        }
    }

    pub fn print_history(&self, history: &[Message]) {
        if history.is_empty() {
            self.print_line("(no stored history)");
            return;
        }
        for (index, message) in history.iter().enumerate() {
            self.print_line(&format!(
                "{:>2}. {} {}",
                index + 1,
                sender_tag(message.sender),
                message.text
            ));
        }
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open.get()
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

fn sender_tag(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "[vous]",
        Sender::Bot => "[assistant]",
        Sender::System => "[système]",
    }
}

impl<R: BufRead, W: Write> WidgetView for TerminalView<R, W> {
    fn set_panel_open(&self, open: bool) {
        self.panel_open.set(open);
        self.print_line(if open {
            "-- panel open --"
        } else {
            "-- panel closed --"
        });
    }

    fn focus_input(&self) {}

    fn input_value(&self) -> String {
        self.pending_input.borrow().clone()
    }

    fn clear_input(&self) {
        self.pending_input.borrow_mut().clear();
    }

    fn set_typing_visible(&self, visible: bool) {
        if visible {
            self.print_line(&format!("... {}", self.typing_label));
        }
    }

    fn append_message(&self, message: &RenderedMessage) {
        let text = message.to_plain_text();
        let mut lines = text.lines();
        let first = lines.next().unwrap_or_default();
        self.print_line(&format!("{} {}", sender_tag(message.sender), first));
        for line in lines {
            self.print_line(&format!("    {line}"));
        }
    }

    fn clear_messages(&self) {
        self.print_line("----------------");
    }

    fn scroll_to_bottom(&self) {}

    fn confirm(&self, prompt: &str) -> bool {
        {
            let mut output = self.output.borrow_mut();
            if let Err(error) = write!(output, "{prompt} [o/N] ").and_then(|()| output.flush()) {
                tracing::warn!("failed to write terminal prompt: {error}");
            }
        }

        self.read_line()
            .map(|answer| {
                matches!(
                    answer.trim().to_ascii_lowercase().as_str(),
                    "o" | "oui" | "y" | "yes"
                )
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::chat::MessageRenderer;

    fn view(input: &str) -> TerminalView<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalView::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            "L'assistant réfléchit...",
        )
    }

    #[test]
    fn messages_print_as_tagged_plain_text() {
        let terminal = view("");
        let rendered =
            MessageRenderer::default().render(&Message::bot("Voici: https://a.test/x\nBonne journée"));

        terminal.append_message(&rendered);

        let output = String::from_utf8(terminal.into_output()).unwrap();
        assert_eq!(
            output,
            "[assistant] Voici: [Voir le document] <https://a.test/x>\n    Bonne journée\n"
        );
    }

    #[test]
    fn confirm_accepts_french_and_english_yes() {
        let terminal = view("oui\nn\ny\n");
        assert!(terminal.confirm("Effacer ?"));
        assert!(!terminal.confirm("Effacer ?"));
        assert!(terminal.confirm("Effacer ?"));
        assert!(!terminal.confirm("Effacer ?"));
    }

    #[test]
    fn input_field_is_simulated() {
        let terminal = view("");
        terminal.set_input("Bonjour");
        assert_eq!(terminal.input_value(), "Bonjour");
        terminal.clear_input();
        assert_eq!(terminal.input_value(), "");
    }
}
