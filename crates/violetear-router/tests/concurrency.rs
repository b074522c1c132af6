//! Lookups racing registrations on a shared router.

use std::sync::Arc;
use std::thread;

use http::Method;
use violetear_router::{Outcome, Router};

#[test]
fn test_readers_race_writer() {
    let router: Arc<Router<usize>> = Arc::new(Router::new());
    router.add_pattern("num", "[0-9]+").unwrap();
    router.add_route("/stable/:num", 0, "GET").unwrap();

    let writer = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            for i in 1..=200 {
                router
                    .add_route(&format!("/dyn/{i}/:num"), i, "GET")
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for i in 0..500 {
                    // always present
                    let outcome = router.match_route(&Method::GET, &format!("/stable/{i}"));
                    assert_eq!(outcome.into_match().map(|m| m.handler), Some(0));

                    // present or not yet, but never anything else
                    let n = i % 200 + 1;
                    match router.match_route(&Method::GET, &format!("/dyn/{n}/7")) {
                        Outcome::Matched(m) => assert_eq!(m.handler, n),
                        Outcome::NotFound => {}
                        other @ Outcome::MethodNotAllowed { .. } => {
                            panic!("unexpected outcome {other:?}")
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(router.len(), 201);
    for i in 1..=200 {
        assert!(router
            .match_route(&Method::GET, &format!("/dyn/{i}/42"))
            .is_matched());
    }
}

#[test]
fn test_pattern_registration_races_lookups() {
    let router: Arc<Router<&'static str>> = Arc::new(Router::new());
    router.add_route("/item/:sku", "item", "GET").unwrap();

    let reader = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            for _ in 0..1000 {
                // digits match before and after `sku` is registered
                assert!(router.match_route(&Method::GET, "/item/123").is_matched());
            }
        })
    };

    router.add_pattern("sku", "[0-9]+").unwrap();
    reader.join().unwrap();

    assert_eq!(router.match_route(&Method::GET, "/item/abc"), Outcome::NotFound);
}
