//! Gamepad state snapshot and the override patch applied to it.
//!
//! # How an override works
//!
//! The device reports a [`GamepadState`] for each logical unit.  A controller
//! can install an [`OverrideRecord`] for a unit: a bitmask naming the fields to
//! replace ([`OverrideFields`]) plus a full `GamepadState` carrying the
//! replacement values.  When state is read, [`OverrideRecord::apply`] copies the
//! named fields from the record and keeps every other field from the device.
//!
//! Buttons are addressed one bit at a time, so overriding `A` leaves `B`
//! reporting whatever the hardware says.

/// Button bits of [`GamepadState::buttons`], laid out as on the wire.
pub mod buttons {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// One report of a gamepad's inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GamepadState {
    /// Pressed buttons, see [`buttons`].
    pub buttons: u16,
    /// Left trigger travel (0 = released).
    pub left_trigger: u8,
    /// Right trigger travel (0 = released).
    pub right_trigger: u8,
    /// Left stick horizontal axis.
    pub thumb_lx: i16,
    /// Left stick vertical axis.
    pub thumb_ly: i16,
    /// Right stick horizontal axis.
    pub thumb_rx: i16,
    /// Right stick vertical axis.
    pub thumb_ry: i16,
}

/// Bitmask naming which [`GamepadState`] fields an override replaces.
///
/// Bits 0–13 select single buttons, bits 14–19 select the triggers and the
/// four stick axes.  Bits above 19 carry no meaning and are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OverrideFields(pub u32);

impl OverrideFields {
    pub const DPAD_UP: u32 = 1 << 0;
    pub const DPAD_DOWN: u32 = 1 << 1;
    pub const DPAD_LEFT: u32 = 1 << 2;
    pub const DPAD_RIGHT: u32 = 1 << 3;
    pub const START: u32 = 1 << 4;
    pub const BACK: u32 = 1 << 5;
    pub const LEFT_THUMB: u32 = 1 << 6;
    pub const RIGHT_THUMB: u32 = 1 << 7;
    pub const LEFT_SHOULDER: u32 = 1 << 8;
    pub const RIGHT_SHOULDER: u32 = 1 << 9;
    pub const A: u32 = 1 << 10;
    pub const B: u32 = 1 << 11;
    pub const X: u32 = 1 << 12;
    pub const Y: u32 = 1 << 13;
    pub const LEFT_TRIGGER: u32 = 1 << 14;
    pub const RIGHT_TRIGGER: u32 = 1 << 15;
    pub const LEFT_THUMB_X: u32 = 1 << 16;
    pub const LEFT_THUMB_Y: u32 = 1 << 17;
    pub const RIGHT_THUMB_X: u32 = 1 << 18;
    pub const RIGHT_THUMB_Y: u32 = 1 << 19;

    /// Every defined field.
    pub const ALL: u32 = (1 << 20) - 1;

    /// Fields that select the d-pad through right-shoulder buttons, which share
    /// their bit positions with [`buttons`].
    const LOW_BUTTONS: u32 = 0x03FF;
    /// Fields that select A/B/X/Y, two bit positions below their button bits.
    const FACE_BUTTONS: u32 = 0x3C00;

    /// Builds a mask from raw bits, dropping undefined ones.
    pub fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    /// Returns `true` when no field is selected.
    pub fn is_empty(self) -> bool {
        self.0 & Self::ALL == 0
    }

    /// Returns `true` when every bit of `field` is selected.
    pub fn contains(self, field: u32) -> bool {
        self.0 & field == field
    }

    /// Translates the selected button fields into a [`GamepadState::buttons`]
    /// mask.
    pub fn button_mask(self) -> u16 {
        let low = self.0 & Self::LOW_BUTTONS;
        let face = (self.0 & Self::FACE_BUTTONS) << 2;
        (low | face) as u16
    }
}

/// Per-unit patch: which fields to replace and the values to replace them with.
///
/// A record with an empty mask is inactive and leaves the device state
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OverrideRecord {
    pub fields: OverrideFields,
    pub values: GamepadState,
}

impl OverrideRecord {
    /// The record that overrides nothing.
    pub const CLEARED: OverrideRecord = OverrideRecord {
        fields: OverrideFields(0),
        values: GamepadState {
            buttons: 0,
            left_trigger: 0,
            right_trigger: 0,
            thumb_lx: 0,
            thumb_ly: 0,
            thumb_rx: 0,
            thumb_ry: 0,
        },
    };

    /// Creates a record, discarding undefined mask bits.
    pub fn new(fields: u32, values: GamepadState) -> Self {
        Self {
            fields: OverrideFields::from_bits_truncate(fields),
            values,
        }
    }

    /// Returns `true` when at least one field is overridden.
    pub fn is_active(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Merges this record into `real`, replacing only the selected fields.
    pub fn apply(&self, real: GamepadState) -> GamepadState {
        if !self.is_active() {
            return real;
        }

        let fields = self.fields;
        let button_mask = fields.button_mask();
        let v = self.values;

        GamepadState {
            buttons: (real.buttons & !button_mask) | (v.buttons & button_mask),
            left_trigger: pick(
                fields,
                OverrideFields::LEFT_TRIGGER,
                v.left_trigger,
                real.left_trigger,
            ),
            right_trigger: pick(
                fields,
                OverrideFields::RIGHT_TRIGGER,
                v.right_trigger,
                real.right_trigger,
            ),
            thumb_lx: pick(fields, OverrideFields::LEFT_THUMB_X, v.thumb_lx, real.thumb_lx),
            thumb_ly: pick(fields, OverrideFields::LEFT_THUMB_Y, v.thumb_ly, real.thumb_ly),
            thumb_rx: pick(fields, OverrideFields::RIGHT_THUMB_X, v.thumb_rx, real.thumb_rx),
            thumb_ry: pick(fields, OverrideFields::RIGHT_THUMB_Y, v.thumb_ry, real.thumb_ry),
        }
    }
}

fn pick<T>(fields: OverrideFields, field: u32, overridden: T, real: T) -> T {
    if fields.contains(field) {
        overridden
    } else {
        real
    }
}
