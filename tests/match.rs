use pathmatcher::PathMatcher;

#[allow(clippy::type_complexity)]
struct MatchTest {
    routes: Vec<&'static str>,
    matches: Vec<(&'static str, Option<(&'static str, &'static [(&'static str, &'static str)])>)>,
}

impl MatchTest {
    fn run(self) {
        let mut matcher = PathMatcher::new();
        for route in &self.routes {
            // The registered value is deliberately distinct from the route
            // string itself, so a test can't pass by conflating `value`
            // with the separately-reported `template`.
            assert_eq!(matcher.register(route, route.len()), Ok(()), "{route}");
        }

        for (path, expected) in self.matches {
            match (matcher.lookup(path), expected) {
                (Ok(m), Some((route, params))) => {
                    assert_eq!(*m.value, route.len(), "{path}");
                    assert_eq!(m.template, route, "{path}: template");
                    for (k, v) in params {
                        assert_eq!(m.params.get(k), *v, "{path}: param {k}");
                    }
                    assert_eq!(m.params.len(), params.len(), "{path}: param count");
                }
                (Err(_), None) => {}
                (got, expected) => panic!("{path}: expected {expected:?}, got {got:?}"),
            }
        }
    }
}

#[test]
fn hello_world_and_named_param() {
    MatchTest {
        routes: vec!["/hello", "/foo/:bar"],
        matches: vec![
            ("/hello", Some(("/hello", &[]))),
            ("/foo/lala", Some(("/foo/:bar", &[("bar", "lala")]))),
            ("/none", None),
        ],
    }
    .run();
}

#[test]
fn static_param_and_catch_all_resolve() {
    MatchTest {
        routes: vec![
            "/",
            "/cmd/:tool/:sub",
            "/cmd/:tool/",
            "/cmd/whoami",
            "/cmd/whoami/root",
            "/src/*filepath",
            "/search/",
            "/search/:query",
            "/user_:name",
            "/user_:name/about",
            "/files/:dir/*filepath",
            "/doc/",
            "/doc/rust_faq.html",
        ],
        matches: vec![
            ("/", Some(("/", &[]))),
            ("/cmd/test/3", Some(("/cmd/:tool/:sub", &[("tool", "test"), ("sub", "3")]))),
            ("/cmd/whoami", Some(("/cmd/whoami", &[]))),
            ("/cmd/whoami/root", Some(("/cmd/whoami/root", &[]))),
            ("/src/some/file.png", Some(("/src/*filepath", &[("filepath", "/some/file.png")]))),
            ("/search/rustacean", Some(("/search/:query", &[("query", "rustacean")]))),
            ("/user_gordon", Some(("/user_:name", &[("name", "gordon")]))),
            ("/user_gordon/about", Some(("/user_:name/about", &[("name", "gordon")]))),
            (
                "/files/js/inc/framework.js",
                Some(("/files/:dir/*filepath", &[("dir", "js"), ("filepath", "/inc/framework.js")])),
            ),
            ("/doc/rust_faq.html", Some(("/doc/rust_faq.html", &[]))),
            ("/cmd/vet", None),
        ],
    }
    .run();
}

#[test]
fn catch_all_captures_leading_slash() {
    MatchTest {
        routes: vec!["/src/*filepath"],
        matches: vec![("/src/", Some(("/src/*filepath", &[("filepath", "/")])))],
    }
    .run();
}

#[test]
fn trailing_slash_redirect_hint_set_on_miss() {
    let mut matcher = PathMatcher::new();
    matcher.register("/hi", "hi").unwrap();
    matcher.register("/b/", "b").unwrap();
    matcher.register("/search/:query", "search").unwrap();
    matcher.register("/cmd/:tool/", "cmd").unwrap();

    assert!(matcher.lookup("/hi/").unwrap_err().tsr);
    assert!(matcher.lookup("/b").unwrap_err().tsr);
    assert!(matcher.lookup("/search/rustacean/").unwrap_err().tsr);
    assert!(matcher.lookup("/cmd/vet").unwrap_err().tsr);
}

#[test]
fn trailing_slash_redirect_hint_unset_when_neither_form_matches() {
    let mut matcher = PathMatcher::new();
    matcher.register("/hi", "hi").unwrap();

    assert!(!matcher.lookup("/nope").unwrap_err().tsr);
    assert!(!matcher.lookup("/nope/").unwrap_err().tsr);
}

#[test]
fn root_trailing_slash_redirect() {
    let mut matcher = PathMatcher::new();
    matcher.register("/foo", "foo").unwrap();
    matcher.register("/bar", "bar").unwrap();
    matcher.register("/:baz", "baz").unwrap();

    // "/" isn't registered and "" isn't a valid toggle target (stripping the
    // slash would leave an empty path), so no redirect is offered.
    assert!(!matcher.lookup("/").unwrap_err().tsr);
}

#[test]
fn case_insensitive_lookup_returns_registered_casing() {
    let mut matcher = PathMatcher::new();
    matcher.register("/CMD/:tool/", "cmd").unwrap();
    matcher.register("/search/:query", "search").unwrap();

    let (path, m) = matcher.lookup_case_insensitive("/cmd/VET/", false).unwrap();
    assert_eq!(path, "/CMD/VET/");
    assert_eq!(*m.value, "cmd");
    assert_eq!(m.template, "/CMD/:tool/");
    assert_eq!(m.params.get("tool"), "VET");

    assert!(matcher.lookup_case_insensitive("/nonexistent", false).is_none());
}

#[test]
fn case_insensitive_lookup_fixes_trailing_slash_mismatch() {
    let mut matcher = PathMatcher::new();
    matcher.register("/hi", "hi").unwrap();
    matcher.register("/b/", "b").unwrap();
    matcher.register("/ABC/", "abc").unwrap();
    matcher.register("/search/:query", "search").unwrap();
    matcher.register("/Π", "pi").unwrap();
    matcher.register("/u/äpfêl/", "apfel").unwrap();

    let (path, m) = matcher.lookup_case_insensitive("/HI", true).unwrap();
    assert_eq!(path, "/hi");
    assert_eq!(*m.value, "hi");

    let (path, m) = matcher.lookup_case_insensitive("/B", true).unwrap();
    assert_eq!(path, "/b/");
    assert_eq!(*m.value, "b");

    let (path, m) = matcher.lookup_case_insensitive("/abc", true).unwrap();
    assert_eq!(path, "/ABC/");
    assert_eq!(*m.value, "abc");

    let (path, m) = matcher.lookup_case_insensitive("/SEARCH/QUERY", true).unwrap();
    assert_eq!(path, "/search/QUERY");
    assert_eq!(*m.value, "search");
    assert_eq!(m.params.get("query"), "QUERY");

    let (path, m) = matcher.lookup_case_insensitive("/π/", true).unwrap();
    assert_eq!(path, "/Π");
    assert_eq!(*m.value, "pi");

    let (path, m) = matcher.lookup_case_insensitive("/u/ÄPFÊL", true).unwrap();
    assert_eq!(path, "/u/äpfêl/");
    assert_eq!(*m.value, "apfel");
}

#[test]
fn case_insensitive_lookup_without_fix_rejects_trailing_slash_mismatch() {
    let mut matcher = PathMatcher::new();
    matcher.register("/b/", "b").unwrap();

    assert!(matcher.lookup_case_insensitive("/B", false).is_none());
}

#[test]
fn param_values_are_not_url_decoded_or_trimmed() {
    let mut matcher = PathMatcher::new();
    matcher.register("/search/:query", "search").unwrap();

    let m = matcher.lookup("/search/someth!ng+in+unicode").unwrap();
    assert_eq!(m.params.get("query"), "someth!ng+in+unicode");
}

#[test]
fn empty_param_segment_rejected_but_bare_catch_all_slash_accepted() {
    let mut matcher = PathMatcher::new();
    matcher.register("/y/:foo", "y").unwrap();
    matcher.register("/z/*foo", "z").unwrap();

    assert!(matcher.lookup("/y/").is_err());
    assert_eq!(matcher.lookup("/z/").unwrap().params.get("foo"), "/");
}
