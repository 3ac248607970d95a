use super::*;

#[test]
fn test_enter_leave_tracks_depth() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1), RecursionResult::Entered);
    assert_eq!(guard.enter(2), RecursionResult::Entered);
    assert_eq!(guard.depth(), 2);
    assert!(guard.is_visiting(&1));

    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert_eq!(guard.iterations(), 2);
}

#[test]
fn test_cycle_detected_on_current_path_only() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(1).is_cycle());
    guard.leave(1);

    // Siblings may revisit a key once it has been left.
    assert!(guard.enter(1).is_entered());
    guard.leave(1);
    assert!(!guard.is_exceeded());
}

#[test]
fn test_depth_limit_is_sticky() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(2, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    let denied = guard.enter(3);
    assert_eq!(denied, RecursionResult::DepthExceeded);
    assert!(denied.is_exceeded());
    guard.leave(2);
    guard.leave(1);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_limit() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 3);
    for key in 0..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(9), RecursionResult::IterationExceeded);
}

#[test]
fn test_profiles_use_shared_limits() {
    let walk = RecursionProfile::GeneralizationWalk;
    assert_eq!(walk.max_depth(), limits::MAX_GENERALIZATION_DEPTH);
    assert_eq!(walk.max_iterations(), limits::MAX_GENERALIZATION_VISITS);
    assert_eq!(
        RecursionProfile::Linearization.max_depth(),
        limits::MAX_LINEARIZATION_DEPTH
    );
    let custom = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 7,
    };
    let guard: RecursionGuard<u32> = RecursionGuard::with_profile(custom);
    assert_eq!(guard.max_depth(), 3);
}
