//! Fatal contract violations.
//!
//! A variant with no defined handling, or a query issued against data that
//! breaks its preconditions, is a programming error rather than a runtime
//! condition. Both helpers log the failure and then panic.

/// Abort because `what` has no implementation for the value it was given.
#[track_caller]
pub fn not_implemented(what: &str) -> ! {
    let location = std::panic::Location::caller();
    log::error!("{what} not implemented at {location}");
    panic!("{what} not implemented at {location}");
}

/// Abort with `msg` unless `check` holds.
#[track_caller]
pub fn precondition(check: bool, msg: &str) {
    if !check {
        violated(msg);
    }
}

/// Abort with `msg`; for contract checks that also unwrap a value.
#[track_caller]
pub fn violated(msg: &str) -> ! {
    let location = std::panic::Location::caller();
    log::error!("{msg} at {location}");
    panic!("{msg} at {location}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_holds() {
        precondition(true, "never fires");
    }

    #[test]
    #[should_panic(expected = "bad input")]
    fn test_precondition_fails() {
        precondition(false, "bad input");
    }

    #[test]
    #[should_panic(expected = "missing cache")]
    fn test_violated() {
        let cache: Option<u32> = None;
        let Some(_) = cache else { violated("missing cache") };
    }

    #[test]
    #[should_panic(expected = "sampling line sets not implemented")]
    fn test_not_implemented() {
        not_implemented("sampling line sets");
    }
}
