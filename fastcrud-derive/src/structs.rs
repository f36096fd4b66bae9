use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};

/// Struct-level configuration from `#[schema(...)]` and `#[serde(...)]`
#[derive(Default)]
pub(crate) struct ContainerMeta {
    /// `#[schema(name = "...")]`
    pub(crate) name: Option<String>,
    /// `#[serde(rename_all = "...")]`
    pub(crate) rename_all: Option<RenameRule>,
}

/// Field-level configuration from `#[schema(...)]`, `#[serde(...)]` and doc comments
#[derive(Default)]
pub(crate) struct FieldMeta {
    pub(crate) skip: bool,
    pub(crate) flatten: bool,
    pub(crate) required: bool,
    pub(crate) rename: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) example: Option<syn::Expr>,
}

impl FieldMeta {
    /// Explicit description, else the doc comment
    pub(crate) fn description(&self) -> Option<&str> {
        self.description.as_deref().or(self.doc.as_deref())
    }
}

/// The serde `rename_all` rules, applied to snake_case Rust field names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    pub(crate) fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => Self::LowerCase,
            "UPPERCASE" => Self::UpperCase,
            "PascalCase" => Self::PascalCase,
            "camelCase" => Self::CamelCase,
            "snake_case" => Self::SnakeCase,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnakeCase,
            "kebab-case" => Self::KebabCase,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebabCase,
            _ => return None,
        })
    }

    pub(crate) fn apply(self, field: &str) -> String {
        match self {
            Self::LowerCase => field.to_ascii_lowercase(),
            Self::UpperCase => field.to_ascii_uppercase(),
            Self::PascalCase => field.to_upper_camel_case(),
            Self::CamelCase => field.to_lower_camel_case(),
            Self::SnakeCase => field.to_snake_case(),
            Self::ScreamingSnakeCase => field.to_shouty_snake_case(),
            Self::KebabCase => field.to_kebab_case(),
            Self::ScreamingKebabCase => field.to_shouty_kebab_case(),
        }
    }
}
