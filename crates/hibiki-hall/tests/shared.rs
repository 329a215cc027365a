//! The control→audio parameter bridge under real threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use hibiki_hall::{HallProcessor, HallReverb, HallShared, PARAM_COUNT, ParamIndex};

#[test]
fn changes_from_another_thread_apply_in_order() {
    let shared = HallShared::new(256);
    let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());

    let control = {
        let shared = shared.clone();
        thread::spawn(move || {
            for step in 0..200u16 {
                let wander = f32::from(step % 30);
                while !shared.set_parameter_value(ParamIndex::Wander.index(), wander) {
                    thread::yield_now();
                }
            }
            shared.dropped_changes()
        })
    };

    let input = vec![0.0f32; 512];
    let (mut l, mut r) = (vec![0.0f32; 512], vec![0.0f32; 512]);
    while !control.is_finished() || shared.pending() > 0 {
        processor.run([&input, &input], [&mut l, &mut r], 512);
        for i in 0..PARAM_COUNT {
            assert!(shared.get_parameter_value(i).is_finite());
        }
    }
    let dropped = control.join().unwrap();

    processor.drain();
    assert_eq!(shared.get_parameter_value(ParamIndex::Wander.index()), f32::from(199u16 % 30));
    // Retried sends count as drops; none of them were lost.
    assert_eq!(dropped, shared.dropped_changes());
}

#[test]
fn snapshot_readers_never_block_the_audio_thread() {
    let shared = HallShared::new(8);
    let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());

    let reader = {
        let shared = shared.clone();
        thread::spawn(move || {
            let mut reads = 0u32;
            for _ in 0..10_000 {
                let size = shared.get_parameter_value(ParamIndex::Size.index());
                assert!((0.0..=4.0).contains(&size));
                reads += 1;
            }
            reads
        })
    };

    let input = vec![0.1f32; 256];
    let (mut l, mut r) = (vec![0.0f32; 256], vec![0.0f32; 256]);
    for step in 0..50 {
        shared.set_parameter_value(ParamIndex::Size.index(), (step % 5) as f32);
        processor.run([&input, &input], [&mut l, &mut r], 256);
    }
    assert_eq!(reader.join().unwrap(), 10_000);
    assert!(l.iter().chain(&r).all(|s| s.is_finite()));
}

#[test]
fn processor_applies_changes_at_sub_block_boundaries() {
    let shared = HallShared::new(4);
    let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
    shared.set_parameter_value(ParamIndex::DryLevel.index(), 0.0);
    shared.set_parameter_value(ParamIndex::EarlyLevel.index(), 0.0);
    shared.set_parameter_value(ParamIndex::LateLevel.index(), 0.0);

    let input = vec![1.0f32; 600];
    let (mut l, mut r) = (vec![9.0f32; 600], vec![9.0f32; 600]);
    processor.run([&input, &input], [&mut l, &mut r], 600);
    assert!(l.iter().chain(&r).all(|&s| s == 0.0));
    assert_eq!(shared.pending(), 0);

    let hall = processor.into_inner();
    assert_eq!(hall.gains().dry, 0.0);
}

#[test]
fn one_drain_applies_at_most_a_queue_of_changes() {
    let shared = HallShared::new(4);
    let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
    let stop = Arc::new(AtomicBool::new(false));

    let flood = {
        let shared = shared.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut step = 0u16;
            while !stop.load(Ordering::Relaxed) {
                shared.set_parameter_value(ParamIndex::Wander.index(), f32::from(step % 30));
                step = step.wrapping_add(1);
            }
        })
    };

    for _ in 0..2000 {
        assert!(processor.drain() <= shared.capacity());
    }
    stop.store(true, Ordering::Relaxed);
    flood.join().unwrap();

    while shared.pending() > 0 {
        assert!(processor.drain() <= 4);
    }
    assert_eq!(processor.drain(), 0);
}
