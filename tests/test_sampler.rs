mod support;

use proptest::prelude::*;
use support::{jd, StubEphemeris, SUNRISE, SUNSET};
use vsquery::{
    EquatorialCoordinate, JulianInstant, NightSampler, NightWindow, ObserverPosition, TimeAxis,
    VsqueryError,
};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn window(start: f64, end: f64) -> NightWindow {
    NightWindow {
        start: jd(start),
        end: jd(end),
    }
}

fn observer() -> ObserverPosition {
    ObserverPosition::new(50.146146, 8.498569).unwrap()
}

fn object() -> EquatorialCoordinate {
    EquatorialCoordinate {
        right_ascension: 250.0,
        declination: 36.0,
    }
}

fn night() -> NightWindow {
    window(SUNSET, SUNRISE)
}

// ── TimeAxis ──

#[test]
fn test_axis_count_is_ceiling() {
    let cases: &[(f64, f64, usize)] = &[
        (0.45, 0.1, 5),
        (0.3125, 0.01, 32),
        (0.25, 0.07, 4),
        (1.0, 0.3, 4),
    ];
    for &(length, step, expected) in cases {
        let count = TimeAxis::new(window(100.0, 100.0 + length), step).count();
        assert_eq!(count, expected, "length {} step {}", length, step);
    }
}

#[test]
fn test_axis_values_are_multiples_of_step() {
    let instants: Vec<JulianInstant> = TimeAxis::new(window(10.0, 10.45), 0.1).collect();
    assert_eq!(instants.first(), Some(&jd(10.0)));
    for (i, instant) in instants.iter().enumerate() {
        assert_approx!(instant.value(), 10.0 + i as f64 * 0.1, 1e-9);
        assert!(instant.value() < 10.45);
    }
}

#[test]
fn test_axis_non_positive_step_is_empty() {
    for step in [0.0, -0.01, f64::NAN, f64::INFINITY] {
        assert_eq!(TimeAxis::new(night(), step).count(), 0, "step {}", step);
    }
}

#[test]
fn test_axis_empty_window() {
    assert_eq!(TimeAxis::new(window(5.0, 5.0), 0.01).count(), 0);
    assert_eq!(TimeAxis::new(window(5.0, 4.0), 0.01).count(), 0);
}

// ── NightSampler ──

#[test]
fn test_only_samples_above_horizon() {
    let ephemeris = StubEphemeris::default();
    let samples: Vec<_> = NightSampler::new(&ephemeris, object(), observer(), night(), 0.01, 750.0)
        .collect::<Result<_, _>>()
        .unwrap();

    // 32 raw instants, the first 15 at +35°
    assert_eq!(ephemeris.horizontal_calls.get(), 32);
    assert_eq!(samples.len(), 15);
    for sample in &samples {
        assert!(sample.altitude > 0.0);
        assert!(sample.instant >= jd(SUNSET) && sample.instant < jd(SUNRISE));
    }
}

#[test]
fn test_sample_fields() {
    let ephemeris = StubEphemeris::default();
    let first = NightSampler::new(&ephemeris, object(), observer(), night(), 0.01, 750.0)
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(first.instant, jd(SUNSET));
    assert_approx!(first.azimuth, 180.0, 0.0);
    assert_approx!(first.altitude, 35.0, 0.0);
    assert_approx!(first.airmass, vsquery::airmass(35.0, 750.0), 1e-12);
    assert_approx!(
        first.lunar_separation,
        vsquery::angular_separation(&object(), &ephemeris.moon_position),
        1e-12
    );
}

#[test]
fn test_horizon_itself_is_not_visible() {
    let ephemeris = StubEphemeris {
        altitude: |_| 0.0,
        ..StubEphemeris::default()
    };
    let count = NightSampler::new(&ephemeris, object(), observer(), night(), 0.01, 750.0).count();
    assert_eq!(count, 0);
}

#[test]
fn test_non_positive_step_samples_nothing() {
    let ephemeris = StubEphemeris::default();
    let count = NightSampler::new(&ephemeris, object(), observer(), night(), 0.0, 750.0).count();
    assert_eq!(count, 0);
    assert_eq!(ephemeris.horizontal_calls.get(), 0);
}

#[test]
fn test_failure_is_yielded_once_and_ends() {
    let ephemeris = StubEphemeris {
        fail_from: Some(SUNSET + 0.045),
        ..StubEphemeris::default()
    };
    let results: Vec<_> =
        NightSampler::new(&ephemeris, object(), observer(), night(), 0.01, 750.0).collect();

    // 5 samples before the failure
    assert_eq!(results.len(), 6);
    assert!(results[..5].iter().all(|r| r.is_ok()));
    assert!(matches!(
        results[5],
        Err(VsqueryError::EphemerisUnavailable { .. })
    ));
}

#[test]
fn test_sampler_is_lazy() {
    let ephemeris = StubEphemeris::default();
    let mut sampler = NightSampler::new(&ephemeris, object(), observer(), night(), 0.01, 750.0);
    sampler.next();
    sampler.next();
    assert_eq!(ephemeris.horizontal_calls.get(), 2);
}

// ── Properties ──

fn swell(jd: JulianInstant) -> f64 {
    40.0 * (jd.value() * 37.0).sin()
}

proptest! {
    #[test]
    fn prop_axis_count_is_ceiling(length in 0.0..1.0f64, step in 0.001..0.1f64) {
        let span = window(SUNSET, SUNSET + length);
        let ratio = (span.end - span.start) / step;
        // too close to a whole number of steps to call
        prop_assume!((ratio - ratio.round()).abs() > 1e-4);
        prop_assert_eq!(TimeAxis::new(span, step).count(), ratio.ceil() as usize);
    }

    #[test]
    fn prop_axis_instants_stay_in_window(length in 0.0..1.0f64, step in 0.001..0.1f64) {
        let instants: Vec<JulianInstant> =
            TimeAxis::new(window(SUNSET, SUNSET + length), step).collect();
        for (i, instant) in instants.iter().enumerate() {
            prop_assert!(instant.value() >= SUNSET && instant.value() < SUNSET + length);
            prop_assert!((instant.value() - (SUNSET + i as f64 * step)).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_non_positive_step_is_empty(step in -1.0..=0.0f64) {
        prop_assert_eq!(TimeAxis::new(night(), step).count(), 0);
    }

    #[test]
    fn prop_samples_are_the_visible_instants(step in 0.002..0.05f64) {
        let ephemeris = StubEphemeris {
            altitude: swell,
            ..StubEphemeris::default()
        };
        let samples: Vec<_> =
            NightSampler::new(&ephemeris, object(), observer(), night(), step, 750.0)
                .collect::<Result<_, _>>()
                .unwrap();
        let visible: Vec<JulianInstant> = TimeAxis::new(night(), step)
            .filter(|&instant| swell(instant) > 0.0)
            .collect();

        for sample in &samples {
            prop_assert!(sample.altitude > 0.0);
        }
        let instants: Vec<JulianInstant> = samples.iter().map(|s| s.instant).collect();
        prop_assert_eq!(instants, visible);
    }
}
