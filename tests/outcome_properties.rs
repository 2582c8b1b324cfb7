//! Property-based tests for the Outcome laws

use breakwater::ops::{self, curried, Pipe};
use breakwater::testing::expect_panic;
use breakwater::Outcome;
use proptest::prelude::*;

fn outcome() -> impl Strategy<Value = Outcome<i32, String>> {
    prop_oneof![
        any::<i32>().prop_map(Outcome::ok),
        "[a-z]{1,8}".prop_map(Outcome::err),
    ]
}

fn double(x: i32) -> i32 {
    x.wrapping_mul(2)
}

fn describe(x: i32) -> String {
    format!("n={}", x)
}

fn halve(x: i32) -> Outcome<i32, String> {
    if x % 2 == 0 {
        Outcome::ok(x / 2)
    } else {
        Outcome::err(format!("{} is odd", x))
    }
}

fn shrink(x: i32) -> Outcome<i32, String> {
    if x > 0 {
        Outcome::ok(x - 1)
    } else {
        Outcome::err("non-positive".to_string())
    }
}

proptest! {
    #[test]
    fn prop_map_identity(r in outcome()) {
        prop_assert_eq!(r.clone().map(|x| x), r);
    }

    #[test]
    fn prop_map_composition(r in outcome()) {
        let chained = r.clone().map(double).map(describe);
        let composed = r.map(|x| describe(double(x)));
        prop_assert_eq!(chained, composed);
    }

    #[test]
    fn prop_and_then_left_identity(a in any::<i32>()) {
        prop_assert_eq!(Outcome::<i32, String>::ok(a).and_then(halve), halve(a));
    }

    #[test]
    fn prop_and_then_right_identity(r in outcome()) {
        prop_assert_eq!(r.clone().and_then(Outcome::ok), r);
    }

    #[test]
    fn prop_and_then_associativity(r in outcome()) {
        let left = r.clone().and_then(halve).and_then(shrink);
        let right = r.and_then(|x| halve(x).and_then(shrink));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_err_short_circuits(e in "[a-z]{1,8}") {
        let r: Outcome<i32, String> = Outcome::err(e.clone());
        prop_assert_eq!(r.clone().map(double), Outcome::err(e.clone()));
        prop_assert_eq!(r.clone().and_then(halve), Outcome::err(e.clone()));
        prop_assert_eq!(r.tap(|_| panic!("tap must not run on Err")), Outcome::err(e));
    }

    #[test]
    fn prop_standalone_forms_agree_with_methods(r in outcome()) {
        prop_assert_eq!(ops::map(r.clone(), double), r.clone().map(double));
        prop_assert_eq!(r.clone().pipe(curried::map(double)), r.clone().map(double));
        prop_assert_eq!(
            r.clone().pipe(curried::and_then(halve)),
            ops::and_then(r, halve)
        );
    }

    #[test]
    fn prop_fold_invokes_exactly_one_handler(r in outcome()) {
        let expected = r.is_ok();
        prop_assert_eq!(r.fold(|_| true, |_| false), expected);
    }

    #[test]
    fn prop_unwrap_or_never_raises(r in outcome(), fallback in any::<i32>()) {
        let value = r.clone().unwrap_or(fallback);
        match r {
            Outcome::Ok(v) => prop_assert_eq!(value, v),
            Outcome::Err(_) => prop_assert_eq!(value, fallback),
        }
    }

    #[test]
    fn prop_unwrap_err_attaches_payload(e in "[a-z]{1,8}") {
        let defect = expect_panic(|| Outcome::<i32, String>::err(e.clone()).unwrap());
        prop_assert_eq!(defect.cause().unwrap().downcast_value::<String>(), Some(&e));
    }

    #[test]
    fn prop_panicking_mapper_always_raises_panic(a in any::<i32>()) {
        let defect = expect_panic(|| Outcome::<i32, String>::ok(a).map(|_| -> i32 { panic!("mapper bug") }));
        prop_assert_eq!(defect.message(), "map failed");
    }
}
