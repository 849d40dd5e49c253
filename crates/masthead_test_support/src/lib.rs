//! Fixture builders shared by masthead's integration tests.

mod golden;

pub use golden::{GoldenCase, golden_cases};

use masthead::{AttrList, ChangeCallback, HeadProps};

/// Attribute list with every value present.
pub fn attrs(pairs: &[(&str, &str)]) -> AttrList {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

/// Attribute list allowing valueless (boolean) attributes.
pub fn attrs_opt(pairs: &[(&str, Option<&str>)]) -> AttrList {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

pub fn props() -> PropsBuilder {
    PropsBuilder::default()
}

/// Fluent builder for one instance's declaration.
#[derive(Default)]
pub struct PropsBuilder {
    props: HeadProps,
}

impl PropsBuilder {
    pub fn html_attributes(mut self, pairs: &[(&str, Option<&str>)]) -> Self {
        self.props.html_attributes = attrs_opt(pairs);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.props.title = Some(title.to_string());
        self
    }

    pub fn title_template(mut self, template: &str) -> Self {
        self.props.title_template = Some(template.to_string());
        self
    }

    pub fn default_title(mut self, title: &str) -> Self {
        self.props.default_title = Some(title.to_string());
        self
    }

    pub fn title_attributes(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.title_attributes = attrs(pairs);
        self
    }

    pub fn base(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.base = Some(attrs(pairs));
        self
    }

    pub fn meta(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.meta.push(attrs(pairs));
        self
    }

    pub fn link(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.link.push(attrs(pairs));
        self
    }

    pub fn script(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.script.push(attrs(pairs));
        self
    }

    pub fn noscript(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.noscript.push(attrs(pairs));
        self
    }

    pub fn style(mut self, pairs: &[(&str, &str)]) -> Self {
        self.props.style.push(attrs(pairs));
        self
    }

    pub fn on_change(mut self, callback: ChangeCallback) -> Self {
        self.props.on_change_client_state = Some(callback);
        self
    }

    pub fn build(self) -> HeadProps {
        self.props
    }
}
