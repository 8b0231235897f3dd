//! Late-bound COM automation backend.
//!
//! Resolves the registered prog id, creates the application object, and
//! invokes its members by name through `IDispatch`. `Measurement` and
//! `Configuration` are reached via property get on the application object.

use std::path::Path;

use windows::core::{BSTR, GUID, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD, DISPATCH_PROPERTYGET, DISPPARAMS,
    EXCEPINFO,
};

use super::{AutomationSession, SessionConnector, SessionError, SessionResult};

/// LCID passed to `GetIDsOfNames`/`Invoke` (LOCALE_USER_DEFAULT).
const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// Connector that creates COM-backed sessions for one prog id.
pub struct ComConnector {
    prog_id: String,
}

impl ComConnector {
    pub fn new(prog_id: impl Into<String>) -> Self {
        Self {
            prog_id: prog_id.into(),
        }
    }
}

impl SessionConnector for ComConnector {
    fn connect(&self) -> SessionResult<Box<dyn AutomationSession>> {
        Ok(Box::new(ComSession::connect(&self.prog_id)?))
    }
}

/// COM apartment guard: one initialization per session, balanced on drop.
///
/// S_FALSE (apartment already initialized on this thread) still requires
/// the balancing `CoUninitialize`, so both success codes take the guard.
struct ComApartment;

impl ComApartment {
    fn enter() -> SessionResult<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_err() {
            return Err(SessionError::call("CoInitializeEx", hr.message()));
        }
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// A live application object plus its apartment guard.
///
/// Field order matters: the dispatch interface must be released before the
/// guard uninitializes COM.
pub struct ComSession {
    application: IDispatch,
    _apartment: ComApartment,
}

impl ComSession {
    fn connect(prog_id: &str) -> SessionResult<Self> {
        let apartment = ComApartment::enter()?;

        let wide = to_wide(prog_id);
        let clsid = unsafe { CLSIDFromProgID(PCWSTR(wide.as_ptr())) }
            .map_err(|e| SessionError::call(format!("CLSIDFromProgID({prog_id})"), e.message()))?;

        let application: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_ALL) }
            .map_err(|e| SessionError::call(format!("CoCreateInstance({prog_id})"), e.message()))?;

        Ok(Self {
            application,
            _apartment: apartment,
        })
    }

    /// Look up a member's dispid by name.
    fn dispid(dispatch: &IDispatch, name: &str) -> SessionResult<i32> {
        let wide = to_wide(name);
        let names = [PCWSTR(wide.as_ptr())];
        let mut dispid = 0i32;
        unsafe {
            dispatch.GetIDsOfNames(
                &GUID::zeroed(),
                names.as_ptr(),
                1,
                LOCALE_USER_DEFAULT,
                &mut dispid,
            )
        }
        .map_err(|e| SessionError::call(name, e.message()))?;
        Ok(dispid)
    }

    /// Invoke a member, surfacing `EXCEPINFO` descriptions as the message.
    fn invoke(
        dispatch: &IDispatch,
        name: &str,
        flags: DISPATCH_FLAGS,
        args: &mut [VARIANT],
    ) -> SessionResult<VARIANT> {
        let dispid = Self::dispid(dispatch, name)?;

        // Invoke expects arguments in reverse order.
        args.reverse();
        let params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                std::ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: std::ptr::null_mut(),
            cArgs: args.len() as u32,
            cNamedArgs: 0,
        };

        let mut result = VARIANT::default();
        let mut excep = EXCEPINFO::default();
        unsafe {
            dispatch.Invoke(
                dispid,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result),
                Some(&mut excep),
                None,
            )
        }
        .map_err(|e| {
            let description = excep.bstrDescription.to_string();
            let message = if description.is_empty() {
                e.message()
            } else {
                description
            };
            SessionError::call(name, message)
        })?;

        Ok(result)
    }

    /// Fetch a child automation object (e.g. `Measurement`).
    fn child(&self, name: &str) -> SessionResult<IDispatch> {
        let value = Self::invoke(&self.application, name, DISPATCH_PROPERTYGET, &mut [])?;
        IDispatch::try_from(&value).map_err(|e| SessionError::call(name, e.message()))
    }

    /// Call a method on the application object itself.
    fn call_application(&self, name: &str, args: &mut [VARIANT]) -> SessionResult<()> {
        Self::invoke(&self.application, name, DISPATCH_METHOD, args).map(|_| ())
    }

    /// Call a method on a child object.
    fn call_child(&self, child: &str, method: &str) -> SessionResult<()> {
        let target = self.child(child)?;
        Self::invoke(&target, method, DISPATCH_METHOD, &mut []).map(|_| ())
    }
}

impl AutomationSession for ComSession {
    fn open(&mut self, configuration: &Path) -> SessionResult<()> {
        let path = BSTR::from(configuration.to_string_lossy().as_ref());
        self.call_application("Open", &mut [VARIANT::from(path)])
    }

    fn start_measurement(&mut self) -> SessionResult<()> {
        self.call_child("Measurement", "Start")
    }

    fn stop_measurement(&mut self) -> SessionResult<()> {
        self.call_child("Measurement", "Stop")
    }

    fn save_configuration(&mut self) -> SessionResult<()> {
        self.call_child("Configuration", "Save")
    }

    fn quit(&mut self) -> SessionResult<()> {
        self.call_application("Quit", &mut [])
    }

    fn close(&mut self) -> SessionResult<()> {
        self.call_application("Close", &mut [])
    }
}

/// Null-terminated UTF-16 for Win32 string parameters.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
