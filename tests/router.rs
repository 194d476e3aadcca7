use resource_router::{LinkError, Pattern, TemplateError};

fn pairs<'a>(pattern: &'a Pattern, path: &'a str) -> Option<Vec<(&'a str, String)>> {
    let caps = pattern.find(path)?;
    Some(caps.iter().map(|(k, v)| (*k, v.to_string())).collect())
}

#[test]
fn pattern_common() {
    let cases: &[(&str, &str, Option<&[(&str, &str)]>)] = &[
        ("/", "/", Some(&[])),
        ("/", "/foo", None),
        ("/products/:name", "/about", None),
        ("/products/:name", "/products/", None),
        ("/products/:name", "/products/a", Some(&[("name", "a")])),
        ("/a-b/:name", "/a-b/a", Some(&[("name", "a")])),
        ("/a/*", "/a/foo/bar", Some(&[("rest", "foo/bar")])),
        ("/a/*", "/a/", Some(&[("rest", "")])),
        ("/a/*", "/a", None),
        ("/a(/*)", "/a", Some(&[])),
        ("/a(/*)", "/a/x/y", Some(&[("rest", "x/y")])),
        (
            "/:foo/:bar/:baz",
            "/one/two/three",
            Some(&[("foo", "one"), ("bar", "two"), ("baz", "three")]),
        ),
        ("/:controller(/:action(/:id))", "/one", Some(&[("controller", "one")])),
        (
            "/:controller(/:action(/:id))",
            "/one/two",
            Some(&[("controller", "one"), ("action", "two")]),
        ),
        (
            "/:controller(/:action(/:id))",
            "/one/two/3",
            Some(&[("controller", "one"), ("action", "two"), ("id", "3")]),
        ),
        ("/:controller(/:action(/:id))", "/one/two/3/4", None),
        ("/:file(.:format)", "/one", Some(&[("file", "one")])),
        (
            "/:file(.:format)",
            "/one.xml",
            Some(&[("file", "one"), ("format", "xml")]),
        ),
        (
            "/:controller(/:action(/:id(.:format)))",
            "/one/two/3.xml",
            Some(&[
                ("controller", "one"),
                ("action", "two"),
                ("id", "3"),
                ("format", "xml"),
            ]),
        ),
        ("/:controller(/:action(/:id(.:format)))", "/one/two/3/4", None),
        (
            "/:name.:extension",
            "/a.png",
            Some(&[("name", "a"), ("extension", "png")]),
        ),
        ("/users/:id", "/users/j%C3%BCrgen", Some(&[("id", "jürgen")])),
        ("/Users", "/users", None),
    ];

    for &(template, path, expected) in cases {
        let pattern = Pattern::compile(template).unwrap();
        let expected: Option<Vec<(&str, String)>> =
            expected.map(|e| e.iter().map(|&(k, v)| (k, v.to_owned())).collect());
        assert_eq!(pairs(&pattern, path), expected, "{} against {}", template, path);
        assert_eq!(pattern.is_match(path), expected.is_some());
    }
}

#[test]
fn pattern_literals_are_exact() {
    for template in &["/about", "/a.b", "/a+b", "/x/y/z", "/[a]"] {
        let pattern = Pattern::compile(template).unwrap();
        assert!(pattern.is_match(template));
        assert!(!pattern.is_match(&format!("{}/", template)));
        assert!(!pattern.is_match(&template[1..]));
    }
    let dot = Pattern::compile("/a.b").unwrap();
    assert!(!dot.is_match("/axb"));
}

#[test]
fn pattern_placeholder_stops_at_separators() {
    let pattern = Pattern::compile("/:name").unwrap();
    for path in &["/a/b", "/a.b", "/", "//"] {
        assert!(pattern.find(path).is_none(), "{}", path);
    }
    let caps = pattern.find("/a%2Fb").unwrap();
    assert_eq!(caps.get("name"), Some("a/b"));
}

#[test]
fn pattern_names_and_equality() {
    let pattern: Pattern = "/:controller(/:action(/*))".parse().unwrap();
    assert_eq!(
        pattern.names().collect::<Vec<_>>(),
        ["controller", "action", "rest"]
    );
    assert_eq!(pattern.to_string(), "/:controller(/:action(/*))");
    assert_eq!(pattern, Pattern::compile("/:controller(/:action(/*))").unwrap());
    assert_ne!(pattern, Pattern::compile("/:controller(/:action)").unwrap());
}

#[test]
fn pattern_errors() {
    assert!(matches!(
        Pattern::compile("/a(/b"),
        Err(TemplateError::UnbalancedGroup { .. })
    ));
    assert!(matches!(
        Pattern::compile("/a)/b"),
        Err(TemplateError::UnbalancedGroup { .. })
    ));
    assert!(matches!(
        Pattern::compile("/:id/:id"),
        Err(TemplateError::DuplicatePlaceholder { .. })
    ));
    assert!(matches!(
        Pattern::compile("/*/*"),
        Err(TemplateError::DuplicatePlaceholder { .. })
    ));
}

#[test]
fn pattern_with_base() {
    let pattern = Pattern::with_base("/admin/", "/users/:id").unwrap();
    assert_eq!(pattern.as_str(), "/admin/users/:id");
    assert!(pattern.is_match("/admin/users/1"));
}

#[test]
fn link_round_trip() {
    let cases: &[(&str, &[&str])] = &[
        ("/", &[]),
        ("/products/:name", &["chair"]),
        ("/:controller(/:action(/:id(.:format)))", &["one"]),
        ("/:controller(/:action(/:id(.:format)))", &["one", "two", "3", "xml"]),
        ("/:name.:extension", &["a b", "tar.gz"]),
        ("/files/*", &["docs/readme.md"]),
        ("/users/:id", &["jürgen"]),
        ("/q/:term", &["50%?#"]),
        ("/files/*(.:format)", &["a.b"]),
        ("/files/*(.:format)", &["a.b/c", "xml"]),
        ("/files/*(/:id)", &["a/b"]),
        ("/files/*(/:id)", &["a/b", "7"]),
    ];

    for &(template, values) in cases {
        let pattern = Pattern::compile(template).unwrap();
        let link = pattern.link(values).unwrap();
        let caps = pattern
            .find(&link)
            .unwrap_or_else(|| panic!("{} does not match {}", link, template));
        let got: Vec<(&str, &str)> = caps.iter().map(|(k, v)| (*k, &**v)).collect();
        let expected: Vec<(&str, &str)> = pattern.names().zip(values.iter().cloned()).collect();
        assert_eq!(got, expected, "{}", link);
    }
}

#[test]
fn link_errors() {
    let pattern = Pattern::compile("/:a/:b").unwrap();
    assert_eq!(
        pattern.link(&["x"]),
        Err(LinkError::Incomplete("/x/:b".into()))
    );
    assert_eq!(
        pattern.link(&["x", "y", "z"]),
        Err(LinkError::NoPlaceholder("z".into()))
    );
    assert_eq!(pattern.link(&[1, 2]).unwrap(), "/1/2");

    let pattern = Pattern::compile("/x(/:a/:b)").unwrap();
    assert_eq!(
        pattern.link(&["1"]),
        Err(LinkError::Incomplete("/x/1/:b".into()))
    );
    assert_eq!(pattern.link(Vec::<String>::new()).unwrap(), "/x");
}
