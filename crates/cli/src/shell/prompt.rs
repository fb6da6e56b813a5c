use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use std::borrow::Cow;

pub struct SelectionPrompt {
    editing: bool,
    selected: usize,
}

impl SelectionPrompt {
    pub fn new(editing: bool, selected: usize) -> Self {
        Self { editing, selected }
    }
}

impl Prompt for SelectionPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let prefix = Color::LightBlue.bold().paint("taxon");
        let count = Color::Yellow.paint(format!("[{}]", self.selected));
        if self.editing {
            let mode = Color::LightRed.paint("editing");
            Cow::Owned(format!("{} {} {} > ", prefix, count, mode))
        } else {
            Cow::Owned(format!("{} {} > ", prefix, count))
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(".. ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}
