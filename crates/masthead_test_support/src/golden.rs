//! Golden declaration-list fixtures with their expected server markup.

use crate::props;
use masthead::HeadProps;

pub struct GoldenCase {
    pub name: &'static str,
    pub props: Vec<HeadProps>,
    pub expected_title: &'static str,
    pub expected_meta: &'static str,
    pub expected_link: &'static str,
}

pub fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "empty",
            props: vec![],
            expected_title: "<title data-masthead></title>",
            expected_meta: "",
            expected_link: "",
        },
        GoldenCase {
            name: "templated title",
            props: vec![
                props()
                    .title_template("%s | Example")
                    .meta(&[("name", "description"), ("content", "outer")])
                    .build(),
                props().title("Docs").build(),
            ],
            expected_title: "<title data-masthead>Docs | Example</title>",
            expected_meta: "<meta data-masthead name=\"description\" content=\"outer\">",
            expected_link: "",
        },
        GoldenCase {
            name: "inner description wins",
            props: vec![
                props()
                    .title("Site")
                    .meta(&[("name", "description"), ("content", "outer")])
                    .build(),
                props()
                    .meta(&[("name", "description"), ("content", "inner")])
                    .build(),
            ],
            expected_title: "<title data-masthead>Site</title>",
            expected_meta: "<meta data-masthead name=\"description\" content=\"inner\">",
            expected_link: "",
        },
        GoldenCase {
            name: "escaped title and attribute values",
            props: vec![
                props()
                    .title("Fish & Chips")
                    .meta(&[("name", "description"), ("content", "cheap & \"cheerful\"")])
                    .build(),
            ],
            expected_title: "<title data-masthead>Fish &amp; Chips</title>",
            expected_meta:
                "<meta data-masthead name=\"description\" content=\"cheap &amp; &quot;cheerful&quot;\">",
            expected_link: "",
        },
        GoldenCase {
            name: "stylesheets coexist, canonical collapses",
            props: vec![
                props()
                    .link(&[("rel", "stylesheet"), ("href", "a.css")])
                    .link(&[("rel", "canonical"), ("href", "http://outer.test")])
                    .build(),
                props()
                    .link(&[("rel", "stylesheet"), ("href", "b.css")])
                    .link(&[("rel", "canonical"), ("href", "http://inner.test")])
                    .build(),
            ],
            expected_title: "<title data-masthead></title>",
            expected_meta: "",
            expected_link: concat!(
                "<link data-masthead rel=\"stylesheet\" href=\"a.css\">",
                "<link data-masthead rel=\"stylesheet\" href=\"b.css\">",
                "<link data-masthead rel=\"canonical\" href=\"http://inner.test\">",
            ),
        },
    ]
}
