//! Control-channel protocol: I/O control codes, request types and the codec.

pub mod codec;
pub mod control;

pub use codec::{
    decode_control_request, encode_hide_request, encode_override_request, ProtocolError,
};
pub use control::*;
