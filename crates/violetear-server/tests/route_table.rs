//! Replays the mixed route table through the dispatch boundary.
//!
//! Same routes and expectations as the router-level replay, but every
//! request goes through `Mux::dispatch`, and every response must carry
//! the default header regardless of outcome.

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use violetear_server::handler::text;
use violetear_server::{HttpResponse, Mux};

const UUID: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const IP: &str = r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";

struct Case {
    pattern: &'static str,
    methods: &'static str,
    requests: &'static [(&'static str, &'static str, u16)],
}

const CASES: &[Case] = &[
    Case {
        pattern: "/",
        methods: "",
        requests: &[("/", "GET", 200)],
    },
    Case {
        pattern: "*",
        methods: "GET",
        requests: &[("/a", "GET", 200), ("/a", "HEAD", 405), ("/a", "POST", 405)],
    },
    Case {
        pattern: "/:uuid",
        methods: "GET, HEAD",
        requests: &[
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25", "GET", 200),
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25", "HEAD", 200),
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25", "POST", 405),
        ],
    },
    Case {
        pattern: "/:uuid/1/",
        methods: "PUT",
        requests: &[
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25/1", "PUT", 200),
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25/2", "GET", 404),
            ("/3B96853C-EF0B-44BC-8820-A982A5756E25/not_found/44", "GET", 404),
            ("/D0ABD486-B05A-436B-BBD1-E320CDC87916/1", "PUT", 200),
        ],
    },
    Case {
        pattern: "/root",
        methods: "GET,HEAD",
        requests: &[
            ("/root", "GET", 200),
            ("/root", "HEAD", 200),
            ("/root", "OPTIONS", 405),
            ("/root", "POST", 405),
            ("/root", "PUT", 405),
        ],
    },
    Case {
        pattern: "/root/:ip/",
        methods: "GET",
        requests: &[
            ("/root/10.0.0.0", "GET", 200),
            ("/root/172.16.0.0", "GET", 200),
            ("/root/192.168.0.1", "GET", 200),
            ("/root/300.0.0.0", "GET", 404),
        ],
    },
    Case {
        pattern: "/root/:ip/aaa/",
        methods: "GET",
        requests: &[],
    },
    Case {
        pattern: "/root/:ip/aaa/:uuid",
        methods: "GET",
        requests: &[],
    },
    // Same dynamic node as `/root/:ip/`, now bound to `uuid`. It keeps the
    // GET registered through `:ip` and gains PATCH.
    Case {
        pattern: "/root/:uuid/",
        methods: "PATCH",
        requests: &[
            ("/root/3B96853C-EF0B-44BC-8820-A982A5756E25", "GET", 200),
            ("/root/3B96853C-EF0B-44BC-8820-A982A5756E25", "DELETE", 405),
            ("/root/10.0.0.1", "GET", 404),
            ("/root/3B96853C-EF0B-44BC-8820-A982A5756E25", "PATCH", 200),
        ],
    },
    Case {
        pattern: "/root/:uuid/-/:uuid",
        methods: "GET",
        requests: &[
            (
                "/root/22314BF-4A90-46C8-948D-5507379BD0DD/-/4293C253-6C7E-4B01-90F2-18203FAB2AEC",
                "GET",
                404,
            ),
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/-/4293C253-6C7E-4B01-90F2-18203FAB2AE",
                "GET",
                404,
            ),
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/-/4293C253-6C7E-4B01-90F2-18203FAB2AEF",
                "GET",
                200,
            ),
            (
                "/root/E22314BF-4A90-46C8-948D-5507379BD0DD/-/4293C253-6C7E-4B01-90F2-18203FAB2AEC",
                "GET",
                200,
            ),
        ],
    },
    Case {
        pattern: "/root/:uuid/:uuid",
        methods: "",
        requests: &[
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AE",
                "GET",
                404,
            ),
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF",
                "GET",
                200,
            ),
        ],
    },
    Case {
        pattern: "/root/:uuid/:uuid/end",
        methods: "GET",
        requests: &[
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/end",
                "GET",
                200,
            ),
            (
                "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/end-not-found",
                "GET",
                404,
            ),
        ],
    },
    Case {
        pattern: "/toor/",
        methods: "GET",
        requests: &[("/toor", "GET", 200)],
    },
    Case {
        pattern: "/toor/aaa",
        methods: "GET",
        requests: &[("/toor/aaa", "GET", 200), ("/toor/abc", "GET", 404)],
    },
    Case {
        pattern: "/toor/*",
        methods: "GET",
        requests: &[
            ("/toor/abc", "GET", 200),
            ("/toor/epazote", "GET", 200),
            ("/toor/naranjas", "GET", 200),
        ],
    },
    Case {
        pattern: "/toor/1/2",
        methods: "GET",
        requests: &[("/toor/1/2", "GET", 200)],
    },
    Case {
        pattern: "/toor/1/*",
        methods: "GET",
        requests: &[
            ("/toor/1/catch-me", "GET", 200),
            ("/toor/1/catch-me/too", "GET", 200),
            ("/toor/1/catch-me/too/foo/bar", "GET", 200),
        ],
    },
    Case {
        pattern: "/toor/1/2/3",
        methods: "GET",
        requests: &[("/toor/1/2/3", "GET", 200)],
    },
    Case {
        pattern: "/not-found",
        methods: "GET",
        requests: &[("/toor/1/2/3/4", "GET", 404), ("catch_me", "GET", 200)],
    },
    Case {
        pattern: "/root/:uuid/:uuid/:ip/catch-me",
        methods: "GET",
        requests: &[],
    },
    Case {
        pattern: "/root/:uuid/:uuid/:ip/catch-me/*",
        methods: "GET",
        requests: &[],
    },
    Case {
        pattern: "/root/:uuid/:uuid/:ip/dont-wcatch-me",
        methods: "GET",
        requests: &[],
    },
    Case {
        pattern: "/root/:uuid/:uuid/:ip/dont-wcatch-me",
        methods: "GET",
        requests: &[],
    },
    Case {
        pattern: "/root/:uuid/:uuid/:ip/",
        methods: "GET",
        requests: &[
            ("/root/122314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8", "GET", 200),
            ("/root/122314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8/catch-me", "GET", 200),
            ("/root/122314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8/catch-me/also", "GET", 200),
            ("/root/122314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8/catch-me/also/a/b/c", "GET", 200),
            ("/root/122314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8/dont-catch-me", "GET", 404),
            ("/root/A22314BF-4A90-46C8-948D-5507379BD0DD/4293C253-6C7E-4B01-90F2-18203FAB2AEF/8.8.8.8", "GET", 200),
        ],
    },
    Case {
        pattern: "/violetear/:ip/:uuid",
        methods: "GET",
        requests: &[
            ("/violetear/", "GET", 404),
            ("/violetear/127.0.0.1/", "GET", 404),
            ("/violetear/127.0.0.1/A22314BF-4A90-46C8-948D-5507379BD0DD/", "GET", 200),
            ("/violetear/127.0.0.1/A22314BF-4A90-46C8-948D-5507379BD0DD/not-found", "GET", 404),
        ],
    },
];

async fn body_string(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_mux_route_table_replay() {
    let mut mux = Mux::new();
    mux.set_header("X-app-epazote", "1.1").unwrap();
    mux.add_pattern(":uuid", UUID).unwrap();
    mux.add_pattern(":ip", IP).unwrap();

    for case in CASES {
        let pattern = case.pattern;
        mux.handle_fn(
            pattern,
            move |_req| async move { text(StatusCode::OK, pattern) },
            case.methods,
        )
        .unwrap_or_else(|e| panic!("registering {pattern}: {e}"));

        for &(path, method, expected) in case.requests {
            let method = Method::from_bytes(method.as_bytes()).unwrap();
            let uri = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
            let req = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Bytes::new())
                .unwrap();

            let response = mux.dispatch(req).await;
            assert_eq!(
                response.status().as_u16(),
                expected,
                "[{method} {path}] after registering {pattern}"
            );
            assert_eq!(
                response.headers()["X-app-epazote"], "1.1",
                "[{method} {path}] missing default header"
            );
            if expected == 405 {
                assert!(response.headers().contains_key(http::header::ALLOW));
            }
        }
    }

    assert_eq!(mux.router().len(), CASES.len());
}

#[tokio::test]
async fn test_mux_hands_matched_pattern_to_handler() {
    let mux = Mux::new();
    mux.add_pattern(":uuid", UUID).unwrap();
    mux.handle_fn(
        "/root/:uuid/-/:uuid",
        |_req| async { text(StatusCode::OK, "pair") },
        "GET",
    )
    .unwrap();
    mux.handle_fn("*", |_req| async { text(StatusCode::OK, "catch-all") }, "GET")
        .unwrap();

    let req = Request::get(
        "/root/A22314BF-4A90-46C8-948D-5507379BD0DD/-/4293C253-6C7E-4B01-90F2-18203FAB2AEF",
    )
    .body(Bytes::new())
    .unwrap();
    assert_eq!(body_string(mux.dispatch(req).await).await, "pair");

    let req = Request::get("/anything/else").body(Bytes::new()).unwrap();
    assert_eq!(body_string(mux.dispatch(req).await).await, "catch-all");
}
