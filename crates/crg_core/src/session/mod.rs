//! Automation session abstraction.
//!
//! The external simulation tool is driven through an opaque handle: the
//! controller issues calls and reads success or failure, nothing else.
//! [`AutomationSession`] is the seam between the controller and the
//! application's automation object; [`SessionConnector`] is how the run
//! action creates the handle in the first place.

use std::path::Path;

use thiserror::Error;

#[cfg(windows)]
mod com;

#[cfg(windows)]
pub use com::ComConnector;

/// Errors surfaced by the automation interface.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A call into the external application failed.
    #[error("{operation} failed: {message}")]
    Call { operation: String, message: String },

    /// No automation backend exists for this platform.
    #[error("the CANoe automation interface is only available on Windows")]
    Unsupported,

    /// An operation required a live session but none exists.
    #[error("no active automation session")]
    NotConnected,
}

impl SessionError {
    /// Create a call error with operation context.
    pub fn call(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Call {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A live connection to the external application.
///
/// Methods map 1:1 onto the automation object's operations. Implementations
/// never inspect return payloads beyond success/failure.
pub trait AutomationSession {
    /// Open a configuration file in the external application.
    fn open(&mut self, configuration: &Path) -> SessionResult<()>;

    /// Start the measurement.
    fn start_measurement(&mut self) -> SessionResult<()>;

    /// Stop the measurement.
    fn stop_measurement(&mut self) -> SessionResult<()>;

    /// Save the currently loaded configuration.
    fn save_configuration(&mut self) -> SessionResult<()>;

    /// Ask the application to quit.
    fn quit(&mut self) -> SessionResult<()>;

    /// Close the application instance.
    fn close(&mut self) -> SessionResult<()>;
}

/// Creates automation sessions on demand.
pub trait SessionConnector {
    /// Attach to (or launch) the external application.
    fn connect(&self) -> SessionResult<Box<dyn AutomationSession>>;
}

/// Connector used on platforms without a COM automation backend.
///
/// `connect()` always fails; the failure travels the same path as any other
/// external-call failure, so the window still comes up and logs it.
pub struct UnsupportedConnector;

impl SessionConnector for UnsupportedConnector {
    fn connect(&self) -> SessionResult<Box<dyn AutomationSession>> {
        Err(SessionError::Unsupported)
    }
}

/// Connector for the current platform.
#[cfg(windows)]
pub fn platform_connector(prog_id: &str) -> Box<dyn SessionConnector> {
    Box::new(ComConnector::new(prog_id))
}

/// Connector for the current platform.
#[cfg(not(windows))]
pub fn platform_connector(_prog_id: &str) -> Box<dyn SessionConnector> {
    Box::new(UnsupportedConnector)
}
