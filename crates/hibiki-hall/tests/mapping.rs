//! Macro mapping and parameter round trips through a full hall.

use hibiki_hall::{
    HALL_TABLES, HallReverb, HighLevelMapper, HighLevelSettings, PARAM_COUNT, PARAMETERS,
    ParamIndex, Step,
};
use proptest::prelude::*;

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

#[test]
fn presence_sets_mix_levels() {
    let t = &HALL_TABLES;
    for step in Step::ALL {
        let mut hall = HallReverb::new(48000.0);
        hall.set_parameter_value(ParamIndex::Presence.index(), step.value());
        let gains = hall.gains();
        let i = step.index();
        assert!((gains.dry - t.dry_by_presence[i] / 100.0).abs() < 1e-6);
        assert!((gains.early - t.early_by_presence[i] / 100.0).abs() < 1e-6);
        assert!((gains.late - t.late_by_presence[i] / 100.0).abs() < 1e-6);
    }
}

#[test]
fn early_size_follows_size_and_shape() {
    let t = &HALL_TABLES;
    let mut hall = HallReverb::new(48000.0);
    for shape in Step::ALL {
        hall.set_parameter_value(ParamIndex::Shape.index(), shape.value());
        for size in Step::ALL {
            hall.set_parameter_value(ParamIndex::Size.index(), size.value());
            let expected =
                t.early_size_by_size[size.index()] * t.early_size_shape_mul[shape.index()];
            let got = hall.get_parameter_value(ParamIndex::EarlySize.index());
            assert!(
                close(got, expected, 1e-5),
                "size {size:?} shape {shape:?}: {got} != {expected}"
            );
        }
    }
}

#[test]
fn repeated_macro_write_is_idempotent() {
    let mut once = HallReverb::new(48000.0);
    once.set_parameter_value(ParamIndex::Tonality.index(), 1.0);

    let mut twice = HallReverb::new(48000.0);
    twice.set_parameter_value(ParamIndex::Tonality.index(), 1.0);
    twice.set_parameter_value(ParamIndex::Tonality.index(), 1.0);

    assert_eq!(once.parameter_values(), twice.parameter_values());
}

#[test]
fn macro_write_rewrites_manual_edits() {
    let mut hall = HallReverb::new(48000.0);
    hall.set_parameter_value(ParamIndex::Spin.index(), 4.4);
    hall.set_parameter_value(ParamIndex::LateLowPass.index(), 12000.0);
    hall.set_parameter_value(ParamIndex::Size.index(), 2.0);

    let fresh = HallReverb::new(48000.0);
    assert_eq!(hall.parameter_values(), fresh.parameter_values());
}

#[test]
fn every_macro_combination_reads_back_its_derivation() {
    let mapper = HighLevelMapper::hall();
    let mut hall = HallReverb::new(48000.0);
    for size in Step::ALL {
        for shape in Step::ALL {
            for tonality in Step::ALL {
                for presence in Step::ALL {
                    let settings = HighLevelSettings {
                        size,
                        shape,
                        tonality,
                        presence,
                    };
                    hall.apply_settings(settings);
                    assert_eq!(hall.settings(), settings);
                    for (param, expected) in mapper.derive(&settings).entries() {
                        let got = hall.get_parameter_value(param.index());
                        assert!(
                            close(got, expected, 1e-5),
                            "{settings:?} {param:?}: {got} != {expected}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn full_presence_removes_predelay_and_early_level() {
    let mut hall = HallReverb::new(48000.0);
    hall.set_parameter_value(ParamIndex::Presence.index(), 4.0);
    let gains = hall.gains();
    assert!((gains.dry - 0.30).abs() < 1e-6);
    assert!(gains.early.abs() < 1e-6);
    assert!((gains.late - 0.60).abs() < 1e-6);
    assert_eq!(hall.get_parameter_value(ParamIndex::LatePredelay.index()), 0.0);

    for size in Step::ALL {
        hall.set_parameter_value(ParamIndex::Size.index(), size.value());
        assert_eq!(hall.get_parameter_value(ParamIndex::LatePredelay.index()), 0.0);
    }
}

#[test]
fn default_late_width_is_linear_in_shape() {
    let hall = HallReverb::new(48000.0);
    let width = hall.get_parameter_value(ParamIndex::LateWidth.index());
    assert!((width - 20.8).abs() < 1e-4, "{width}");
}

#[test]
fn macros_read_back_as_steps() {
    let mut hall = HallReverb::new(48000.0);
    for (value, step) in [(0.2, 0.0), (1.5, 2.0), (3.49, 3.0), (4.0, 4.0)] {
        hall.set_parameter_value(ParamIndex::Shape.index(), value);
        assert_eq!(hall.get_parameter_value(ParamIndex::Shape.index()), step);
    }
}

#[test]
fn out_of_range_index_is_safe() {
    let mut hall = HallReverb::new(48000.0);
    let before = hall.parameter_values();
    hall.set_parameter_value(PARAM_COUNT, 1.0);
    hall.set_parameter_value(usize::MAX, 1.0);
    assert_eq!(hall.get_parameter_value(PARAM_COUNT), 0.0);
    assert_eq!(hall.parameter_values(), before);
}

proptest! {
    /// Every detailed parameter reads back what was written, in host units.
    #[test]
    fn detail_parameters_round_trip(index in 4usize..PARAM_COUNT, t in 0.0f32..=1.0) {
        let desc = &PARAMETERS[index];
        let value = desc.min + (desc.max - desc.min) * t;

        let mut hall = HallReverb::new(48000.0);
        hall.set_parameter_value(index, value);
        let got = hall.get_parameter_value(index);
        prop_assert!(close(got, value, 1e-5), "{}: wrote {value}, read {got}", desc.name);
    }

    /// Detailed writes never disturb the macro steps or other parameters.
    #[test]
    fn detail_write_touches_only_its_parameter(index in 4usize..PARAM_COUNT, t in 0.0f32..=1.0) {
        let desc = &PARAMETERS[index];
        let mut hall = HallReverb::new(48000.0);
        let before = hall.parameter_values();
        hall.set_parameter_value(index, desc.min + (desc.max - desc.min) * t);
        let after = hall.parameter_values();
        for i in (0..PARAM_COUNT).filter(|&i| i != index) {
            prop_assert_eq!(before[i], after[i], "index {}", i);
        }
    }
}
