//! Main application window.
//!
//! Layout, top to bottom:
//! - CANoe Configuration group (path display, Select File button)
//! - Measurement Control group (RUN / Stop Measurement / Close CANoe)
//! - Log output
//! - Status bar
//!
//! Buttons dispatch straight into the controller; each call is synchronous
//! and blocks the update loop for the duration of the external call. The
//! file dialog is the one asynchronous edge and resolves back into a
//! message.

use std::path::PathBuf;

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Task};

use crg_core::config::Settings;
use crg_core::controller::MeasurementController;
use crg_core::session::platform_connector;

use crate::components::{FileInput, LogViewer};
use crate::theme;

/// Messages produced by the window's widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// "Select File" button clicked.
    SelectConfiguration,
    /// File dialog resolved; `None` means cancelled.
    ConfigurationChosen(Option<PathBuf>),
    /// "RUN" clicked.
    Run,
    /// "Stop Measurement" clicked.
    Stop,
    /// "Close CANoe" clicked.
    CloseApplication,
}

/// Application state: the controller plus the dialog settings.
pub struct App {
    controller: MeasurementController,
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let connector = platform_connector(&settings.automation.prog_id);
        Self {
            controller: MeasurementController::new(connector),
            settings,
        }
    }

    pub fn title(&self) -> String {
        "CANoe Configuration Tool".to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectConfiguration => {
                let label = self.settings.dialog.filter_label.clone();
                let extension = self.settings.dialog.filter_extension.clone();
                return Task::perform(
                    async move {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select Configuration")
                            .add_filter(label, &[extension])
                            .pick_file()
                            .await
                            .map(|file| file.path().to_path_buf())
                    },
                    Message::ConfigurationChosen,
                );
            }

            Message::ConfigurationChosen(choice) => self.controller.select_configuration(choice),
            Message::Run => self.controller.run(),
            Message::Stop => self.controller.stop(),
            Message::CloseApplication => self.controller.close(),
        }

        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let controls = self.controller.controls();

        let config_display = self
            .controller
            .selected_configuration()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let config_group = group_box(
            "CANoe Configuration",
            FileInput::new(
                "Configuration:",
                config_display,
                Message::SelectConfiguration,
            )
            .placeholder("No configuration selected")
            .view(),
        );

        let control_group = group_box(
            "Measurement Control",
            row![
                button(text("RUN")).on_press_maybe(controls.run.then_some(Message::Run)),
                button(text("Stop Measurement"))
                    .on_press_maybe(controls.stop.then_some(Message::Stop)),
                button(text("Close CANoe"))
                    .on_press_maybe(controls.close.then_some(Message::CloseApplication)),
            ]
            .spacing(theme::spacing::SM),
        );

        // the log group takes whatever height the groups above leave over
        let log_group = column![
            text("Log").size(theme::font::MD),
            container(LogViewer::new(self.controller.log().rendered()).view())
                .padding(theme::spacing::MD)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(container::rounded_box),
        ]
        .spacing(theme::spacing::XS)
        .height(Length::Fill);

        let status_bar = row![
            text("Status:").size(theme::font::NORMAL),
            text(self.controller.status())
                .size(theme::font::NORMAL)
                .color_maybe(theme::status::for_status(self.controller.status()))
                .width(Length::Fill),
        ]
        .spacing(theme::spacing::SM)
        .align_y(Alignment::Center);

        column![config_group, control_group, log_group, status_bar]
            .spacing(theme::spacing::MD)
            .padding(theme::spacing::LG)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Titled framed section, the iced stand-in for a group box.
fn group_box<'a>(title: &'a str, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![
        text(title).size(theme::font::MD),
        container(content)
            .padding(theme::spacing::MD)
            .width(Length::Fill)
            .style(container::rounded_box),
    ]
    .spacing(theme::spacing::XS)
    .into()
}
