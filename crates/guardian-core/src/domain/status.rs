/// Outcome a device-open or control request is completed with.
///
/// Mirrors the small set of completion codes the device stack understands;
/// hosts map these onto their native status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// The request finished successfully.
    Success,
    /// The request was handed to the lower stack, which completes it later.
    Pending,
    /// The requesting process is not allowed to open the device.
    AccessDenied,
    /// The request buffer was malformed (wrong size, out-of-range unit).
    InvalidParameter,
    /// The control code is not one this filter understands.
    InvalidDeviceRequest,
    /// The control channel does not currently exist.
    DeviceNotReady,
    /// The device is not one this filter intercepts.
    NotSupported,
    /// Memory could not be allocated for the request.
    InsufficientResources,
    /// A collaborator failed while handling the request.
    Unsuccessful,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RequestStatus::Success => "success",
            RequestStatus::Pending => "pending",
            RequestStatus::AccessDenied => "access denied",
            RequestStatus::InvalidParameter => "invalid parameter",
            RequestStatus::InvalidDeviceRequest => "invalid device request",
            RequestStatus::DeviceNotReady => "device not ready",
            RequestStatus::NotSupported => "not supported",
            RequestStatus::InsufficientResources => "insufficient resources",
            RequestStatus::Unsuccessful => "unsuccessful",
        };
        f.write_str(text)
    }
}
