//! Integration tests for InputMonitor

mod common;
use common::*;

use std::panic::{AssertUnwindSafe, catch_unwind};

use quad_sequencer::{InputConfig, InputMonitor, Levels, Press, Settings};

fn new_monitor(store: &mut MemoryStore, config: InputConfig) -> InputMonitor<&mut MemoryStore, PanicRestart> {
    InputMonitor::new(config, Settings::load(store), PanicRestart)
}

#[test]
fn released_button_costs_one_conversion() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());

    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Released);
    assert_eq!(adc.button_reads(), 1);
    assert_eq!(clock.nanos(), CONVERSION_NS);
    assert!(leds.frames().is_empty());
}

#[test]
fn short_press_reports_tap_after_debounce() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..250);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());

    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Tapped);
    assert_eq!(adc.button_reads(), 2);
    assert!((300.0..301.0).contains(&clock.millis_f()));
}

#[test]
fn press_released_exactly_at_debounce_is_a_tap() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..300);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());

    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Tapped);
}

#[test]
fn press_outlasting_debounce_reports_hold() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..1500);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());

    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Held);
    assert_eq!(adc.button_reads(), 3);
    assert!((3300.0..3301.0).contains(&clock.millis_f()));
    assert!(Press::Held.is_pressed());
}

#[test]
fn hold_window_boundary_separates_hold_from_restart() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..3300);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());
    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Held);

    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..3301);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    let mut monitor = new_monitor(&mut store, InputConfig::default());
    let result = catch_unwind(AssertUnwindSafe(|| {
        monitor.check(&mut adc, &mut delay, &mut leds);
    }));
    assert!(result.is_err());
}

#[test]
fn threshold_is_configurable() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..250);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(0);
    // The simulated press reads 900, which no longer counts as down.
    let config = InputConfig::default().with_threshold(PRESSED_LEVEL);
    let mut monitor = new_monitor(&mut store, config);

    assert_eq!(monitor.check(&mut adc, &mut delay, &mut leds), Press::Released);
}

#[test]
fn long_press_blinks_saves_and_restarts() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..10_000);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(3);

    {
        let mut monitor = new_monitor(&mut store, InputConfig::default());
        monitor.settings_mut().set_sequence(7);

        let result = catch_unwind(AssertUnwindSafe(|| {
            monitor.check(&mut adc, &mut delay, &mut leds);
        }));
        assert!(result.is_err());
    }

    assert_eq!(store.value, 7);
    assert_eq!(store.saves, 1);

    let frames = leds.frames();
    assert_eq!(frames.len(), 20);
    for (i, &(at, levels)) in frames.iter().enumerate() {
        let expected = if i % 2 == 0 { Levels::FULL } else { Levels::OFF };
        assert_eq!(levels, expected);
        let offset = at - frames[0].0;
        assert!((offset - 50.0 * i as f64).abs() < 0.001);
    }

    // Ten flashes of 100 ms, then the settle pause.
    let restarted_at = clock.millis_f() - frames[0].0;
    assert!((restarted_at - 3000.0).abs() < 0.001);
}

#[test]
fn long_press_skips_write_when_unchanged() {
    let clock = SimClock::new();
    let mut adc = SimAdc::new(&clock).press(0..10_000);
    let mut delay = SimDelay::new(&clock);
    let mut leds = RecordingLeds::new(&clock);
    let mut store = MemoryStore::new(5);

    {
        let mut monitor = new_monitor(&mut store, InputConfig::default().with_blink(2, 10));
        let result = catch_unwind(AssertUnwindSafe(|| {
            monitor.check(&mut adc, &mut delay, &mut leds);
        }));
        assert!(result.is_err());
    }

    assert_eq!(store.value, 5);
    assert_eq!(store.saves, 0);
    assert_eq!(leds.frames().len(), 4);
}
