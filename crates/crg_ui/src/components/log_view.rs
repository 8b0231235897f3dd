//! Log viewer widget
//!
//! A scrollable text area for displaying log messages; stays anchored to
//! the newest line as entries arrive.

use iced::widget::{container, scrollable, text};
use iced::{Element, Font, Length};

/// Log viewer component
pub struct LogViewer<'a> {
    content: &'a str,
}

impl<'a> LogViewer<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    pub fn view<M: Clone + 'a>(self) -> Element<'a, M> {
        container(
            scrollable(text(self.content).size(12).font(Font::MONOSPACE))
                .width(Length::Fill)
                .height(Length::Fill)
                .anchor_bottom(),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(4)
        .into()
    }
}
