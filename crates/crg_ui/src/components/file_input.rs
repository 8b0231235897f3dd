//! File input widget
//!
//! A label, a display-only path field, and a browse button. The field is
//! filled from the file chooser, never typed into.

use iced::widget::{button, row, text, text_input};
use iced::{Alignment, Element, Length};

/// File input component
pub struct FileInput<'a, M> {
    label: &'a str,
    value: String,
    on_browse: M,
    placeholder: &'a str,
}

impl<'a, M: Clone + 'a> FileInput<'a, M> {
    pub fn new(label: &'a str, value: impl Into<String>, on_browse: M) -> Self {
        Self {
            label,
            value: value.into(),
            on_browse,
            placeholder: "",
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn view(self) -> Element<'a, M> {
        row![
            text(self.label).width(Length::Fixed(150.0)),
            // no on_input: the field only displays the chooser's result
            text_input(self.placeholder, &self.value).width(Length::Fill),
            button(text("Select File…")).on_press(self.on_browse),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }
}
