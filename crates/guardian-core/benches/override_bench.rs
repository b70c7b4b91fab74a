//! Criterion benchmarks for the override merge and request decoding.
//!
//! `OverrideRecord::apply` runs once per state report per unit, so it sits on
//! the hottest path of the filter.  Decoding runs once per control request.
//!
//! Run with:
//! ```bash
//! cargo bench --package guardian-core --bench override_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use guardian_core::protocol::control::IOCTL_XINPUT_EXT_OVERRIDE_GAMEPAD_STATE;
use guardian_core::{
    buttons, decode_control_request, encode_override_request, GamepadState, OverrideFields,
    OverrideGamepadRequest, OverrideRecord, UnitIndex,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn real_state() -> GamepadState {
    GamepadState {
        buttons: buttons::B | buttons::DPAD_UP,
        left_trigger: 12,
        right_trigger: 250,
        thumb_lx: -4000,
        thumb_ly: 12000,
        thumb_rx: 0,
        thumb_ry: -1,
    }
}

fn records() -> Vec<(&'static str, OverrideRecord)> {
    vec![
        ("cleared", OverrideRecord::CLEARED),
        (
            "single_button",
            OverrideRecord::new(
                OverrideFields::A,
                GamepadState {
                    buttons: buttons::A,
                    ..GamepadState::default()
                },
            ),
        ),
        (
            "all_fields",
            OverrideRecord::new(
                OverrideFields::ALL,
                GamepadState {
                    buttons: 0xF3FF,
                    left_trigger: 255,
                    right_trigger: 255,
                    thumb_lx: i16::MAX,
                    thumb_ly: i16::MIN,
                    thumb_rx: 1,
                    thumb_ry: -1,
                },
            ),
        ),
    ]
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_override");
    let real = real_state();
    for (name, record) in records() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &record, |b, record| {
            b.iter(|| black_box(record).apply(black_box(real)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let unit = UnitIndex::new(0).expect("unit 0 is valid");
    let bytes = encode_override_request(&OverrideGamepadRequest {
        unit,
        record: records()[2].1,
    });
    c.bench_function("decode_override_request", |b| {
        b.iter(|| {
            decode_control_request(
                black_box(IOCTL_XINPUT_EXT_OVERRIDE_GAMEPAD_STATE),
                black_box(&bytes),
            )
        })
    });
}

criterion_group!(benches, bench_apply, bench_decode);
criterion_main!(benches);
