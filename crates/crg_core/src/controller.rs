//! The owning controller behind the window.
//!
//! Holds the only mutable state in the application: the session handle,
//! the selected configuration path, the running flag, the control
//! enablement, and the action log. Every operation is synchronous and runs
//! to completion, including the blocking external call. Failures are
//! logged once and the operation abandoned; flags are never rolled back on
//! partial failure.

use std::path::{Path, PathBuf};

use crate::action_log::ActionLog;
use crate::session::{AutomationSession, SessionConnector, SessionError, SessionResult};

/// Enablement of the three measurement controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub run: bool,
    pub stop: bool,
    pub close: bool,
}

/// Owns the automation session and the window-visible state.
pub struct MeasurementController {
    connector: Box<dyn SessionConnector>,
    session: Option<Box<dyn AutomationSession>>,
    selected_config: Option<PathBuf>,
    running: bool,
    controls: Controls,
    log: ActionLog,
    status: String,
}

impl MeasurementController {
    pub fn new(connector: Box<dyn SessionConnector>) -> Self {
        Self {
            connector,
            session: None,
            selected_config: None,
            running: false,
            controls: Controls::default(),
            log: ActionLog::new(),
            status: "Ready".to_string(),
        }
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected_configuration(&self) -> Option<&Path> {
        self.selected_config.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Record the file chooser result. `None` (dialog cancelled) changes
    /// nothing.
    pub fn select_configuration(&mut self, choice: Option<PathBuf>) {
        let Some(path) = choice else { return };

        self.log_action(format!("Selected configuration: {}", path.display()));
        self.selected_config = Some(path);
        self.controls.run = true;
    }

    /// Create the session, open the configuration, start the measurement.
    pub fn run(&mut self) {
        let Some(config) = self.selected_config.clone() else {
            self.log_action("Error: Please select a configuration");
            return;
        };

        match self.try_run(&config) {
            Ok(()) => {
                self.running = true;
                self.controls.run = false;
                self.controls.stop = true;
                self.controls.close = true;
                self.log_action("CANoe opened and measurement started");
                self.status = "Measurement Running".to_string();
                tracing::debug!(config = %config.display(), "measurement started");
            }
            Err(e) => {
                // No rollback: a handle created before the failure stays.
                tracing::warn!("run failed: {e}");
                self.log_action(format!("Error: Failed to open CANoe: {e}"));
            }
        }
    }

    fn try_run(&mut self, config: &Path) -> SessionResult<()> {
        self.session = Some(self.connector.connect()?);
        if let Some(session) = self.session.as_mut() {
            session.open(config)?;
            session.start_measurement()?;
        }
        Ok(())
    }

    /// Stop the measurement and save the configuration.
    pub fn stop(&mut self) {
        if !self.running {
            self.log_action("Info: No measurement is currently running");
            return;
        }

        match self.try_stop() {
            Ok(()) => {
                self.running = false;
                self.controls.run = true;
                self.controls.stop = false;
                self.controls.close = true;
                self.log_action("Measurement stopped");
                self.status = "Measurement Stopped".to_string();
                tracing::debug!("measurement stopped");
            }
            Err(e) => {
                // A failed stop leaves the running flag untouched; the UI
                // can now disagree with the external application.
                tracing::warn!("stop failed: {e}");
                self.log_action(format!("Error: Failed to stop CANoe measurement: {e}"));
            }
        }
    }

    fn try_stop(&mut self) -> SessionResult<()> {
        let session = self.session.as_mut().ok_or(SessionError::NotConnected)?;
        session.stop_measurement()?;
        session.save_configuration()?;
        Ok(())
    }

    /// Quit and close the external application.
    pub fn close(&mut self) {
        if self.session.is_none() {
            self.log_action("Info: CANoe is not running");
            return;
        }

        match self.try_close() {
            Ok(()) => {
                self.log_action("CANoe closed");
                self.session = None;
                self.controls.close = false;
                self.status = "CANoe Closed".to_string();
                tracing::debug!("application closed");
            }
            Err(e) => {
                tracing::warn!("close failed: {e}");
                self.log_action(format!("Error: Failed to close CANoe: {e}"));
            }
        }
    }

    fn try_close(&mut self) -> SessionResult<()> {
        let session = self.session.as_mut().ok_or(SessionError::NotConnected)?;
        session.quit()?;
        session.close()?;
        Ok(())
    }

    /// Append to the action log and mirror the message to the status line.
    fn log_action(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = message.clone();
        self.log.append(message);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type CallLog = Rc<RefCell<Vec<&'static str>>>;

    /// Which scripted calls should fail.
    #[derive(Debug, Clone, Copy, Default)]
    struct FailPlan {
        connect: bool,
        open: bool,
        start: bool,
        stop: bool,
        save: bool,
        quit: bool,
        close: bool,
    }

    struct MockSession {
        plan: FailPlan,
        calls: CallLog,
    }

    impl MockSession {
        fn attempt(&self, name: &'static str, fail: bool) -> SessionResult<()> {
            self.calls.borrow_mut().push(name);
            if fail {
                Err(SessionError::call(name, "scripted failure"))
            } else {
                Ok(())
            }
        }
    }

    impl AutomationSession for MockSession {
        fn open(&mut self, _configuration: &Path) -> SessionResult<()> {
            let fail = self.plan.open;
            self.attempt("open", fail)
        }

        fn start_measurement(&mut self) -> SessionResult<()> {
            let fail = self.plan.start;
            self.attempt("start", fail)
        }

        fn stop_measurement(&mut self) -> SessionResult<()> {
            let fail = self.plan.stop;
            self.attempt("stop", fail)
        }

        fn save_configuration(&mut self) -> SessionResult<()> {
            let fail = self.plan.save;
            self.attempt("save", fail)
        }

        fn quit(&mut self) -> SessionResult<()> {
            let fail = self.plan.quit;
            self.attempt("quit", fail)
        }

        fn close(&mut self) -> SessionResult<()> {
            let fail = self.plan.close;
            self.attempt("close", fail)
        }
    }

    struct MockConnector {
        plan: FailPlan,
        calls: CallLog,
    }

    impl SessionConnector for MockConnector {
        fn connect(&self) -> SessionResult<Box<dyn AutomationSession>> {
            self.calls.borrow_mut().push("connect");
            if self.plan.connect {
                return Err(SessionError::call("connect", "scripted failure"));
            }
            Ok(Box::new(MockSession {
                plan: self.plan,
                calls: self.calls.clone(),
            }))
        }
    }

    fn controller_with(plan: FailPlan) -> (MeasurementController, CallLog) {
        let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
        let connector = MockConnector {
            plan,
            calls: calls.clone(),
        };
        (MeasurementController::new(Box::new(connector)), calls)
    }

    /// Controller with a configuration already selected.
    fn ready_controller(plan: FailPlan) -> (MeasurementController, CallLog) {
        let (mut controller, calls) = controller_with(plan);
        controller.select_configuration(Some(PathBuf::from("demo.cfg")));
        calls.borrow_mut().clear();
        (controller, calls)
    }

    #[test]
    fn selecting_a_file_enables_run_and_logs_once() {
        let (mut controller, _) = controller_with(FailPlan::default());
        controller.select_configuration(Some(PathBuf::from("night_run.cfg")));

        assert_eq!(
            controller.controls(),
            Controls {
                run: true,
                stop: false,
                close: false
            }
        );
        assert_eq!(controller.log().len(), 1);
        assert_eq!(
            controller.log().latest(),
            Some("Selected configuration: night_run.cfg")
        );
        assert_eq!(
            controller.selected_configuration(),
            Some(Path::new("night_run.cfg"))
        );
    }

    #[test]
    fn cancelled_selection_changes_nothing() {
        let (mut controller, _) = controller_with(FailPlan::default());
        controller.select_configuration(None);

        assert!(controller.log().is_empty());
        assert_eq!(controller.controls(), Controls::default());
        assert_eq!(controller.selected_configuration(), None);
        assert_eq!(controller.status(), "Ready");
    }

    #[test]
    fn run_without_selection_logs_error_and_calls_nothing() {
        let (mut controller, calls) = controller_with(FailPlan::default());
        controller.run();

        assert!(calls.borrow().is_empty());
        assert_eq!(controller.log().len(), 1);
        assert_eq!(
            controller.log().latest(),
            Some("Error: Please select a configuration")
        );
        assert!(!controller.has_session());
    }

    #[test]
    fn successful_run_enables_stop_and_close() {
        let (mut controller, calls) = ready_controller(FailPlan::default());
        controller.run();

        assert_eq!(*calls.borrow(), vec!["connect", "open", "start"]);
        assert_eq!(
            controller.controls(),
            Controls {
                run: false,
                stop: true,
                close: true
            }
        );
        assert!(controller.is_running());
        assert!(controller.has_session());
        assert_eq!(
            controller.log().latest(),
            Some("CANoe opened and measurement started")
        );
        assert_eq!(controller.status(), "Measurement Running");
    }

    #[test]
    fn failed_open_leaves_flags_and_keeps_partial_handle() {
        let (mut controller, calls) = ready_controller(FailPlan {
            open: true,
            ..FailPlan::default()
        });
        controller.run();

        // start is never attempted after open fails
        assert_eq!(*calls.borrow(), vec!["connect", "open"]);
        assert_eq!(
            controller.controls(),
            Controls {
                run: true,
                stop: false,
                close: false
            }
        );
        assert!(!controller.is_running());
        // handle created before the failure is still there (no rollback)
        assert!(controller.has_session());
        assert_eq!(
            controller.log().latest().map(|m| m.starts_with(
                "Error: Failed to open CANoe:"
            )),
            Some(true)
        );
    }

    #[test]
    fn failed_connect_leaves_no_session() {
        let (mut controller, calls) = ready_controller(FailPlan {
            connect: true,
            ..FailPlan::default()
        });
        controller.run();

        assert_eq!(*calls.borrow(), vec!["connect"]);
        assert!(!controller.has_session());
        assert!(!controller.is_running());
        assert_eq!(
            controller.log().latest().map(|m| m.starts_with(
                "Error: Failed to open CANoe:"
            )),
            Some(true)
        );
    }

    #[test]
    fn successful_stop_reenables_run_and_saves() {
        let (mut controller, calls) = ready_controller(FailPlan::default());
        controller.run();
        calls.borrow_mut().clear();

        controller.stop();

        assert_eq!(*calls.borrow(), vec!["stop", "save"]);
        assert_eq!(
            controller.controls(),
            Controls {
                run: true,
                stop: false,
                close: true
            }
        );
        assert!(!controller.is_running());
        assert_eq!(controller.log().latest(), Some("Measurement stopped"));
        assert_eq!(controller.status(), "Measurement Stopped");
    }

    #[test]
    fn failed_stop_leaves_running_flag_set() {
        let (mut controller, _) = ready_controller(FailPlan {
            stop: true,
            ..FailPlan::default()
        });
        controller.run();
        controller.stop();

        // the acknowledged stuck state: flags and controls unchanged
        assert!(controller.is_running());
        assert_eq!(
            controller.controls(),
            Controls {
                run: false,
                stop: true,
                close: true
            }
        );
        assert_eq!(
            controller.log().latest().map(|m| m.starts_with(
                "Error: Failed to stop CANoe measurement:"
            )),
            Some(true)
        );
    }

    #[test]
    fn stop_without_running_measurement_only_logs() {
        let (mut controller, calls) = controller_with(FailPlan::default());
        controller.stop();

        assert!(calls.borrow().is_empty());
        assert_eq!(
            controller.log().latest(),
            Some("Info: No measurement is currently running")
        );
    }

    #[test]
    fn close_without_session_only_logs() {
        let (mut controller, calls) = controller_with(FailPlan::default());
        controller.close();

        assert!(calls.borrow().is_empty());
        assert_eq!(controller.log().latest(), Some("Info: CANoe is not running"));
    }

    #[test]
    fn close_quits_then_closes_and_disables_close() {
        let (mut controller, calls) = ready_controller(FailPlan::default());
        controller.run();
        controller.stop();
        calls.borrow_mut().clear();

        controller.close();

        assert_eq!(*calls.borrow(), vec!["quit", "close"]);
        assert!(!controller.has_session());
        assert!(!controller.controls().close);
        assert_eq!(controller.log().latest(), Some("CANoe closed"));
        assert_eq!(controller.status(), "CANoe Closed");
    }

    #[test]
    fn close_while_running_leaves_stop_enabled() {
        let (mut controller, _) = ready_controller(FailPlan::default());
        controller.run();
        controller.close();

        // close never touches the running flag or the stop control
        assert!(controller.is_running());
        assert!(controller.controls().stop);
        assert!(!controller.controls().close);
    }

    #[test]
    fn failed_close_keeps_session_and_control() {
        let (mut controller, _) = ready_controller(FailPlan {
            quit: true,
            ..FailPlan::default()
        });
        controller.run();
        controller.close();

        assert!(controller.has_session());
        assert!(controller.controls().close);
        assert_eq!(
            controller.log().latest().map(|m| m.starts_with(
                "Error: Failed to close CANoe:"
            )),
            Some(true)
        );
    }

    #[test]
    fn status_mirrors_latest_log_line() {
        let (mut controller, _) = controller_with(FailPlan::default());
        controller.select_configuration(Some(PathBuf::from("demo.cfg")));

        assert_eq!(controller.status(), "Selected configuration: demo.cfg");
    }
}
