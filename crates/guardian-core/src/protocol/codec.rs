//! Binary codec for control-channel requests.
//!
//! Requests are plain structures copied into a system buffer, so the layout
//! follows natural alignment and all multi-byte integers are little-endian.
//! Every request starts with a `size:u32` field that must equal the size of
//! the structure the control code expects; this is how a controller built
//! against a different structure version is turned away.
//!
//! Decoding validates in a fixed order (buffer length, declared size, unit
//! index) and never produces a partially-filled request.

use thiserror::Error;

use crate::domain::gamepad::{GamepadState, OverrideRecord};
use crate::domain::ids::{UnitIndex, MAX_UNITS};
use crate::domain::status::RequestStatus;
use crate::protocol::control::{
    ControlCode, ControlRequest, HideGamepadRequest, OverrideGamepadRequest,
    HIDE_REQUEST_SIZE, OVERRIDE_REQUEST_SIZE,
};

/// Errors that can occur while decoding a control request.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The input buffer is shorter than the request structure.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The request's declared size does not match the expected structure size.
    #[error("request size mismatch: expected {expected}, declared {declared}")]
    SizeMismatch { expected: usize, declared: u32 },

    /// The unit index is not below [`MAX_UNITS`].
    #[error("unit index {0} out of range (max {MAX_UNITS})")]
    UnitOutOfRange(u8),

    /// The I/O control code is not one this filter handles.
    #[error("unknown control code: 0x{0:08X}")]
    UnknownControlCode(u32),
}

impl ProtocolError {
    /// The status a request failing with this error is completed with.
    pub fn status(&self) -> RequestStatus {
        match self {
            ProtocolError::UnknownControlCode(_) => RequestStatus::InvalidDeviceRequest,
            _ => RequestStatus::InvalidParameter,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes the input buffer of a control request issued with `code`.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the code is unknown, the buffer is too short,
/// the declared size is wrong, or the unit index is out of range.
///
/// # Examples
///
/// ```rust
/// use guardian_core::protocol::{decode_control_request, encode_override_request};
/// use guardian_core::protocol::control::{ControlRequest, OverrideGamepadRequest};
/// use guardian_core::{OverrideRecord, UnitIndex};
///
/// let request = OverrideGamepadRequest {
///     unit: UnitIndex::new(1).unwrap(),
///     record: OverrideRecord::CLEARED,
/// };
/// let bytes = encode_override_request(&request);
/// let code = guardian_core::ControlCode::OverrideGamepadState.code();
/// assert_eq!(
///     decode_control_request(code, &bytes).unwrap(),
///     ControlRequest::Override(request)
/// );
/// ```
pub fn decode_control_request(code: u32, input: &[u8]) -> Result<ControlRequest, ProtocolError> {
    let control = ControlCode::try_from(code).map_err(|_| ProtocolError::UnknownControlCode(code))?;

    let expected = control.request_size();
    require_len(input, expected)?;

    let declared = read_u32(input, 0);
    if declared as usize != expected {
        return Err(ProtocolError::SizeMismatch { expected, declared });
    }

    let raw_unit = input[4];
    let unit = UnitIndex::new(raw_unit).ok_or(ProtocolError::UnitOutOfRange(raw_unit))?;

    match control {
        ControlCode::HideGamepad => Ok(ControlRequest::Hide(HideGamepadRequest { unit })),
        ControlCode::OverrideGamepadState => {
            let fields = read_u32(input, 8);
            let values = GamepadState {
                buttons: read_u16(input, 12),
                left_trigger: input[14],
                right_trigger: input[15],
                thumb_lx: read_i16(input, 16),
                thumb_ly: read_i16(input, 18),
                thumb_rx: read_i16(input, 20),
                thumb_ry: read_i16(input, 22),
            };
            Ok(ControlRequest::Override(OverrideGamepadRequest {
                unit,
                record: OverrideRecord::new(fields, values),
            }))
        }
    }
}

/// Encodes a hide request exactly as a controller submits it.
pub fn encode_hide_request(request: &HideGamepadRequest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HIDE_REQUEST_SIZE);
    write_header(&mut buf, HIDE_REQUEST_SIZE, request.unit);
    buf
}

/// Encodes an override request exactly as a controller submits it.
pub fn encode_override_request(request: &OverrideGamepadRequest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(OVERRIDE_REQUEST_SIZE);
    write_header(&mut buf, OVERRIDE_REQUEST_SIZE, request.unit);

    let values = &request.record.values;
    buf.extend_from_slice(&request.record.fields.0.to_le_bytes());
    buf.extend_from_slice(&values.buttons.to_le_bytes());
    buf.push(values.left_trigger);
    buf.push(values.right_trigger);
    buf.extend_from_slice(&values.thumb_lx.to_le_bytes());
    buf.extend_from_slice(&values.thumb_ly.to_le_bytes());
    buf.extend_from_slice(&values.thumb_rx.to_le_bytes());
    buf.extend_from_slice(&values.thumb_ry.to_le_bytes());
    buf
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn write_header(buf: &mut Vec<u8>, size: usize, unit: UnitIndex) {
    buf.extend_from_slice(&(size as u32).to_le_bytes());
    buf.push(unit.raw());
    buf.extend_from_slice(&[0u8; 3]); // alignment padding
}

fn require_len(input: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if input.len() < needed {
        Err(ProtocolError::InsufficientData {
            needed,
            available: input.len(),
        })
    } else {
        Ok(())
    }
}

// Callers check the length first, so these index within bounds.
fn read_u32(input: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        input[offset],
        input[offset + 1],
        input[offset + 2],
        input[offset + 3],
    ])
}

fn read_u16(input: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([input[offset], input[offset + 1]])
}

fn read_i16(input: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([input[offset], input[offset + 1]])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
