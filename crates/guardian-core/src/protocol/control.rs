//! Control codes and request types accepted on the control channel.
//!
//! Both requests use buffered I/O and require write access on the control
//! device.  Their codes are built the same way the device stack builds every
//! I/O control code:
//!
//! ```text
//! [device_type:16][access:2][function:12][method:2]
//! ```

use crate::domain::gamepad::OverrideRecord;
use crate::domain::ids::UnitIndex;

/// Path a controller opens to reach the control channel.
pub const CONTROL_DEVICE_PATH: &str = r"\\.\XnaGuardian";

/// Device type of the custom control codes.
pub const XINPUT_EXT_TYPE: u32 = 0x8001;
/// Function number of the first custom control code.
pub const XINPUT_EXT_CODE: u32 = 0x801;

/// Input and output travel through a system buffer.
pub const METHOD_BUFFERED: u32 = 0;
/// Caller must hold write access to the control device.
pub const FILE_WRITE_DATA: u32 = 0x0002;

/// Packs the four parts of an I/O control code.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

/// Hides a gamepad unit from non-exempt processes.
pub const IOCTL_XINPUT_EXT_HIDE_GAMEPAD: u32 =
    ctl_code(XINPUT_EXT_TYPE, XINPUT_EXT_CODE, METHOD_BUFFERED, FILE_WRITE_DATA);

/// Installs an override record for a gamepad unit.
pub const IOCTL_XINPUT_EXT_OVERRIDE_GAMEPAD_STATE: u32 =
    ctl_code(XINPUT_EXT_TYPE, XINPUT_EXT_CODE + 1, METHOD_BUFFERED, FILE_WRITE_DATA);

/// Size in bytes of an encoded [`HideGamepadRequest`].
///
/// ```text
/// [size:4][unit:1][pad:3]
/// ```
pub const HIDE_REQUEST_SIZE: usize = 8;

/// Size in bytes of an encoded [`OverrideGamepadRequest`].
///
/// ```text
/// [size:4][unit:1][pad:3][fields:4][buttons:2][lt:1][rt:1][lx:2][ly:2][rx:2][ry:2]
/// ```
pub const OVERRIDE_REQUEST_SIZE: usize = 24;

/// The control codes this filter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    HideGamepad,
    OverrideGamepadState,
}

impl ControlCode {
    /// The raw I/O control code.
    pub fn code(self) -> u32 {
        match self {
            ControlCode::HideGamepad => IOCTL_XINPUT_EXT_HIDE_GAMEPAD,
            ControlCode::OverrideGamepadState => IOCTL_XINPUT_EXT_OVERRIDE_GAMEPAD_STATE,
        }
    }

    /// Size of the request structure this code carries.
    pub fn request_size(self) -> usize {
        match self {
            ControlCode::HideGamepad => HIDE_REQUEST_SIZE,
            ControlCode::OverrideGamepadState => OVERRIDE_REQUEST_SIZE,
        }
    }
}

impl TryFrom<u32> for ControlCode {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            IOCTL_XINPUT_EXT_HIDE_GAMEPAD => Ok(ControlCode::HideGamepad),
            IOCTL_XINPUT_EXT_OVERRIDE_GAMEPAD_STATE => Ok(ControlCode::OverrideGamepadState),
            _ => Err(()),
        }
    }
}

/// Hide request: marks one unit as hidden from non-exempt processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideGamepadRequest {
    pub unit: UnitIndex,
}

/// Override request: replaces the override record of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideGamepadRequest {
    pub unit: UnitIndex,
    pub record: OverrideRecord,
}

/// A decoded control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Hide(HideGamepadRequest),
    Override(OverrideGamepadRequest),
}

impl ControlRequest {
    /// The control code that carries this request.
    pub fn code(&self) -> ControlCode {
        match self {
            ControlRequest::Hide(_) => ControlCode::HideGamepad,
            ControlRequest::Override(_) => ControlCode::OverrideGamepadState,
        }
    }

    /// The unit the request addresses.
    pub fn unit(&self) -> UnitIndex {
        match self {
            ControlRequest::Hide(r) => r.unit,
            ControlRequest::Override(r) => r.unit,
        }
    }
}
