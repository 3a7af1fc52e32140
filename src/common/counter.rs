use crate::E2EStatus;

/// Profile 11 uses a 4-bit counter running 0..=15.
pub const COUNTER_MODULO: u8 = 16;
pub const COUNTER_MAX: u8 = COUNTER_MODULO - 1;
/// Largest gap that can still be told apart from a repetition.
pub const MAX_DELTA_COUNTER: u8 = COUNTER_MAX - 1;

pub fn increment_counter(current: u8) -> u8 {
    (current + 1) % COUNTER_MODULO
}

pub fn decrement_counter(current: u8) -> u8 {
    (current + COUNTER_MAX) % COUNTER_MODULO
}

/// Distance from `last` to `received`, with wrap-around.
pub fn counter_delta(last: u8, received: u8) -> u8 {
    if received >= last {
        received - last
    } else {
        // Handle wrap-around
        COUNTER_MODULO + received - last
    }
}

pub fn classify_delta(delta: u8, max_delta: u8) -> E2EStatus {
    if delta == 0 {
        E2EStatus::Repeated
    } else if delta == 1 {
        E2EStatus::Ok
    } else if delta <= max_delta {
        E2EStatus::OkSomeLost
    } else {
        E2EStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_wraps_after_15() {
        assert_eq!(increment_counter(0), 1);
        assert_eq!(increment_counter(14), 15);
        assert_eq!(increment_counter(15), 0);

        let mut counter = 0;
        for _ in 0..COUNTER_MODULO {
            counter = increment_counter(counter);
        }
        assert_eq!(counter, 0);
    }

    #[test]
    fn test_decrement_is_inverse() {
        for value in 0..COUNTER_MODULO {
            assert_eq!(decrement_counter(increment_counter(value)), value);
        }
        assert_eq!(decrement_counter(0), 15);
    }

    #[test]
    fn test_counter_delta() {
        assert_eq!(counter_delta(3, 3), 0);
        assert_eq!(counter_delta(3, 4), 1);
        assert_eq!(counter_delta(15, 0), 1);
        assert_eq!(counter_delta(14, 2), 4);
        assert_eq!(counter_delta(4, 3), 15);
    }

    #[test]
    fn test_classify_delta() {
        assert_eq!(classify_delta(0, 3), E2EStatus::Repeated);
        assert_eq!(classify_delta(1, 3), E2EStatus::Ok);
        assert_eq!(classify_delta(2, 3), E2EStatus::OkSomeLost);
        assert_eq!(classify_delta(3, 3), E2EStatus::OkSomeLost);
        assert_eq!(classify_delta(4, 3), E2EStatus::Error);
        assert_eq!(classify_delta(2, 1), E2EStatus::Error);
        assert_eq!(classify_delta(1, 0), E2EStatus::Ok);
        assert_eq!(classify_delta(15, MAX_DELTA_COUNTER), E2EStatus::Error);
    }
}
