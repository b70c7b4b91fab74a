//! Recording device stack for integration tests.

use std::sync::Mutex;

use guardian_core::RequestStatus;

use super::{DeviceStack, OpenRequest, SendError};

/// A [`DeviceStack`] that records every forwarded request.
///
/// Sends succeed unless a refusal status has been set with
/// [`RecordingDeviceStack::refuse_with`].
#[derive(Default)]
pub struct RecordingDeviceStack {
    sent: Mutex<Vec<OpenRequest>>,
    refusal: Mutex<Option<RequestStatus>>,
}

impl RecordingDeviceStack {
    /// Creates a stack that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail with `status`; `None` accepts again.
    pub fn refuse_with(&self, status: Option<RequestStatus>) {
        *self.refusal.lock().expect("lock poisoned") = status;
    }

    /// Requests handed to the stack so far, including refused ones.
    pub fn sent(&self) -> Vec<OpenRequest> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

impl DeviceStack for RecordingDeviceStack {
    fn send_open(&self, request: &OpenRequest) -> Result<(), SendError> {
        self.sent.lock().expect("lock poisoned").push(*request);
        match *self.refusal.lock().expect("lock poisoned") {
            Some(status) => Err(SendError { status }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::{InstanceId, ProcessId};

    #[test]
    fn test_recording_stack_records_and_refuses_on_demand() {
        // Arrange
        let stack = RecordingDeviceStack::new();
        let request = OpenRequest {
            instance: InstanceId::new(),
            requestor: ProcessId(9),
        };

        // Act
        let accepted = stack.send_open(&request);
        stack.refuse_with(Some(RequestStatus::DeviceNotReady));
        let refused = stack.send_open(&request);

        // Assert
        assert!(accepted.is_ok());
        assert_eq!(
            refused,
            Err(SendError {
                status: RequestStatus::DeviceNotReady
            })
        );
        assert_eq!(stack.sent().len(), 2);
    }
}
