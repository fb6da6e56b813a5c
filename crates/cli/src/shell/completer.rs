use super::command::ShellCommand;
use reedline::{Completer, Span, Suggestion};
use taxon_api::CategoryId;

pub struct SelectionCompleter {
    commands: Vec<String>,
    categories: Vec<(CategoryId, String)>,
}

impl SelectionCompleter {
    pub fn new(commands: Vec<String>, categories: Vec<(CategoryId, String)>) -> Self {
        Self {
            commands,
            categories,
        }
    }
}

fn suggestion(value: String, description: Option<String>, span: Span) -> Suggestion {
    Suggestion {
        value,
        description,
        style: None,
        extra: None,
        span,
        append_whitespace: true,
        match_indices: None,
    }
}

impl Completer for SelectionCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line = &line[..pos.min(line.len())];
        let trimmed = line.trim_start();

        // Command name at the start of the line
        if !trimmed.contains(' ') {
            let span = Span {
                start: pos - trimmed.len(),
                end: pos,
            };
            return self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(trimmed))
                .map(|cmd| suggestion(cmd.clone(), None, span))
                .collect();
        }

        // Category ids, matched by id prefix or name
        let command = trimmed.split_whitespace().next().unwrap_or_default();
        if !ShellCommand::takes_category(command) {
            return Vec::new();
        }

        let partial = if line.ends_with(' ') {
            ""
        } else {
            line.rsplit(' ').next().unwrap_or_default()
        };
        let span = Span {
            start: pos - partial.len(),
            end: pos,
        };
        let needle = partial.to_lowercase();

        self.categories
            .iter()
            .filter(|(id, name)| {
                id.to_string().starts_with(&needle) || name.to_lowercase().contains(&needle)
            })
            .map(|(id, name)| suggestion(id.to_string(), Some(name.clone()), span))
            .collect()
    }
}
