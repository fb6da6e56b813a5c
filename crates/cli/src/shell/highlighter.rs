use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

pub struct SelectionHighlighter {
    commands: Vec<String>,
}

impl SelectionHighlighter {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }
}

impl Highlighter for SelectionHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();
        let mut first_word = true;

        for word in line.split_inclusive(char::is_whitespace) {
            let trimmed = word.trim();
            if trimmed.is_empty() {
                styled_text.push((Style::new(), word.to_string()));
                continue;
            }

            let style = if first_word {
                if self.commands.iter().any(|c| c == trimmed) {
                    Style::new().fg(Color::LightGreen).bold()
                } else {
                    Style::new().fg(Color::Red)
                }
            } else if trimmed.starts_with('-') {
                Style::new().fg(Color::Cyan)
            } else if trimmed
                .split(',')
                .all(|part| !part.is_empty() && part.parse::<i64>().is_ok())
            {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };

            first_word = false;
            styled_text.push((style, word.to_string()));
        }

        styled_text
    }
}
