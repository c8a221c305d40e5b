//! Build target labels
//!
//! A label is either fully qualified (`//pkg:name`, `@repo//pkg:name`) or a
//! bare name that belongs to the package of the smoke test referring to it.

use std::fmt;

use crate::common::{Error, Result};

/// A resolved build target label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    /// External repository prefix without the `@`, empty for the main repo
    repo: String,
    /// Package path, `/` separated, empty for the root package
    package: String,
    /// Target name within the package
    name: String,
}

impl Label {
    /// Resolve a target reference relative to `package`
    ///
    /// Qualified references keep their own package; `foo` and `:foo` become
    /// `//<package>:foo`.
    pub fn resolve(package: &str, target: &str) -> Result<Self> {
        if target.starts_with("//") || target.starts_with('@') {
            return Self::parse(target);
        }

        let name = target.strip_prefix(':').unwrap_or(target);
        if name.is_empty() {
            return Err(Error::invalid_label(target, "empty target name"));
        }
        if name.contains(':') {
            return Err(Error::invalid_label(target, "bare target name contains ':'"));
        }

        Ok(Self {
            repo: String::new(),
            package: package.trim_matches('/').to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a fully qualified label
    pub fn parse(label: &str) -> Result<Self> {
        let (repo, rest) = match label.strip_prefix('@') {
            Some(stripped) => {
                let idx = stripped
                    .find("//")
                    .ok_or_else(|| Error::invalid_label(label, "missing '//' after repository"))?;
                (&stripped[..idx], &stripped[idx..])
            }
            None => ("", label),
        };

        let rest = rest
            .strip_prefix("//")
            .ok_or_else(|| Error::invalid_label(label, "qualified labels start with '//'"))?;

        let (package, name) = match rest.split_once(':') {
            Some((package, name)) => (package, name),
            // `//a/b` is shorthand for `//a/b:b`
            None => (rest, rest.rsplit('/').next().unwrap_or(rest)),
        };

        if name.is_empty() {
            return Err(Error::invalid_label(label, "empty target name"));
        }
        if name.contains(':') {
            return Err(Error::invalid_label(label, "more than one ':'"));
        }

        Ok(Self {
            repo: repo.to_string(),
            package: package.to_string(),
            name: name.to_string(),
        })
    }

    /// External repository name, empty for the main repository
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Package path of this label
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Target name of this label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sibling label whose name has `suffix` appended (e.g. `foo` → `foo.jar`)
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            repo: self.repo.clone(),
            package: self.package.clone(),
            name: format!("{}{}", self.name, suffix),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.repo.is_empty() {
            write!(f, "@{}", self.repo)?;
        }
        write!(f, "//{}:{}", self.package, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_uses_package() {
        let label = Label::resolve("a/b", "foo").unwrap();
        assert_eq!(label.to_string(), "//a/b:foo");
        assert_eq!(label.package(), "a/b");
        assert_eq!(label.name(), "foo");
    }

    #[test]
    fn test_qualified_name_unchanged() {
        let label = Label::resolve("a/b", "//x:foo").unwrap();
        assert_eq!(label.to_string(), "//x:foo");
        assert_eq!(label.package(), "x");
    }

    #[test]
    fn test_colon_prefixed_name_is_bare() {
        let label = Label::resolve("tests/smoke", ":helloworld").unwrap();
        assert_eq!(label.to_string(), "//tests/smoke:helloworld");
    }

    #[test]
    fn test_external_repository_label() {
        let label = Label::resolve("a", "@rules_kotlin//kotlin:jvm").unwrap();
        assert_eq!(label.to_string(), "@rules_kotlin//kotlin:jvm");
        assert_eq!(label.package(), "kotlin");
        assert_eq!(label.repo(), "rules_kotlin");
        assert_eq!(Label::resolve("a", "//x:foo").unwrap().repo(), "");
    }

    #[test]
    fn test_package_shorthand() {
        let label = Label::parse("//tests/smoke").unwrap();
        assert_eq!(label.to_string(), "//tests/smoke:smoke");
    }

    #[test]
    fn test_root_package() {
        let label = Label::resolve("", "foo").unwrap();
        assert_eq!(label.to_string(), "//:foo");
        assert_eq!(label.package(), "");
    }

    #[test]
    fn test_with_suffix() {
        let label = Label::resolve("a/b", "foo").unwrap().with_suffix(".jar");
        assert_eq!(label.to_string(), "//a/b:foo.jar");
    }

    #[test]
    fn test_invalid_labels() {
        assert!(Label::resolve("a", "").is_err());
        assert!(Label::resolve("a", ":").is_err());
        assert!(Label::resolve("a", "foo:bar").is_err());
        assert!(Label::parse("//a:").is_err());
        assert!(Label::parse("//a:b:c").is_err());
        assert!(Label::parse("@repo").is_err());
    }
}
