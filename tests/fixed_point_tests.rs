use framebench::core::clock::Clock;
use framebench::core::fixed::{from_fixed, to_fixed, ONE};
use framebench::core::samples::sample_table;

// Half an encoding step: the bound rounding guarantees
const MAX_ROUND_TRIP_ERROR: f32 = 1.0 / (1 << 17) as f32;

#[test]
fn whole_table_round_trips_within_precision() {
    for &value in sample_table() {
        let round_tripped = from_fixed(to_fixed(value));
        let error = (round_tripped - value).abs();
        assert!(
            error <= MAX_ROUND_TRIP_ERROR,
            "value {} round-tripped to {} (error {})",
            value,
            round_tripped,
            error
        );
    }
}

#[test]
fn conversion_is_monotonic_over_a_dense_sweep() {
    let mut previous_encoded = i32::MIN;
    let mut previous_decoded = f32::MIN;

    for step in -2000..=2000 {
        let value = step as f32 / 1000.0;
        let encoded = to_fixed(value);
        assert!(encoded >= previous_encoded);

        let decoded = from_fixed(encoded);
        assert!(decoded >= previous_decoded);

        previous_encoded = encoded;
        previous_decoded = decoded;
    }
}

#[test]
fn unit_interval_maps_onto_one() {
    assert_eq!(to_fixed(0.0), 0);
    assert_eq!(to_fixed(1.0), ONE);
    assert_eq!(from_fixed(ONE), 1.0);
}

#[test]
fn timestamp_deltas_are_antisymmetric() {
    let clock = Clock::start();
    let earlier = clock.now();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let later = clock.now();

    assert!(later.delta_ns(earlier) > 0);
    assert_eq!(later.delta_ns(earlier), -earlier.delta_ns(later));
    assert_eq!(earlier.delta_ns(earlier), 0);
}
