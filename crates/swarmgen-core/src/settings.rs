//! Project identifiers (Maven coordinates and Java package) for a generated project.

// Internal imports (std, crate)
use crate::{
    error::{Error, Result},
    model::GenerationModel,
    naming::{is_java_package, package_segment, split_words, to_kebab_case},
};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Artifact id used when the title yields no usable word
pub const FALLBACK_ARTIFACT_ID: &str = "generated-api";
/// Package (and group id) used when the title yields no usable word
pub const FALLBACK_PACKAGE: &str = "org.example.api";

/// Caller-supplied identifiers; anything left out is derived from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettingsOverrides {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub base_package: Option<String>,
}

/// Fully resolved identifiers, read-only once rendering starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub group_id: String,
    pub artifact_id: String,
    pub base_package: String,
}

impl ProjectSettings {
    /// Package of the generated JAX-RS resources
    pub fn rest_package(&self) -> String {
        format!("{}.rest", self.base_package)
    }

    /// Package of the generated model classes
    pub fn model_package(&self) -> String {
        format!("{}.model", self.base_package)
    }

    /// Check the identifiers are usable.
    ///
    /// Maven coordinates only need to be non-blank; the base package must be
    /// a dotted Java identifier path since it becomes source directories.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("groupId", &self.group_id), ("artifactId", &self.artifact_id)] {
            if value.trim().is_empty() {
                return Err(Error::settings(field, value.clone(), "must not be empty"));
            }
        }
        if !is_java_package(&self.base_package) {
            return Err(Error::settings(
                "basePackage",
                self.base_package.clone(),
                "not a dotted Java identifier path",
            ));
        }
        Ok(())
    }
}

fn supplied(field: &'static str, value: &Option<String>) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(Error::settings(field, v.clone(), "must not be empty")),
        Some(v) => Ok(Some(v.clone())),
        None => Ok(None),
    }
}

/// Derive the default Java package from an API title.
///
/// With an organization the package is `<organization>.<compacttitle>`,
/// otherwise the title words are reversed into domain labels
/// (`Beer API` -> `api.beer`).
pub fn derive_package(title: &str, organization: Option<&str>) -> String {
    let organization = organization.map(str::trim).filter(|o| !o.is_empty());
    let candidate = match organization {
        Some(org) => {
            let segment = package_segment(title);
            if segment.is_empty() {
                org.to_string()
            } else {
                format!("{}.{}", org, segment)
            }
        }
        None => split_words(title)
            .iter()
            .rev()
            .map(|w| package_segment(w))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("."),
    };
    if is_java_package(&candidate) {
        candidate
    } else {
        FALLBACK_PACKAGE.to_string()
    }
}

/// Derive the default Maven group id.
pub fn derive_group_id(title: &str, organization: Option<&str>) -> String {
    match organization.map(str::trim).filter(|o| !o.is_empty()) {
        Some(org) => org.to_string(),
        None => derive_package(title, None),
    }
}

/// Derive the default Maven artifact id (`Beer API` -> `beer-api`).
pub fn derive_artifact_id(title: &str) -> String {
    let kebab = to_kebab_case(title);
    if kebab.is_empty() {
        FALLBACK_ARTIFACT_ID.to_string()
    } else {
        kebab
    }
}

/// Resolve the identifiers for a run.
///
/// Supplied non-empty values are used verbatim; missing ones are derived from
/// the project title. The result is validated before it is returned.
pub fn resolve(
    overrides: Option<&ProjectSettingsOverrides>,
    model: &GenerationModel,
    organization: Option<&str>,
) -> Result<ProjectSettings> {
    let empty = ProjectSettingsOverrides::default();
    let overrides = overrides.unwrap_or(&empty);
    let title = model.project.title.as_str();

    let group_id = supplied("groupId", &overrides.group_id)?;
    let artifact_id = supplied("artifactId", &overrides.artifact_id)?;
    let base_package = supplied("basePackage", &overrides.base_package)?;

    let settings = ProjectSettings {
        group_id: group_id.unwrap_or_else(|| derive_group_id(title, organization)),
        artifact_id: artifact_id.unwrap_or_else(|| derive_artifact_id(title)),
        base_package: base_package.unwrap_or_else(|| derive_package(title, organization)),
    };
    settings.validate()?;
    log::debug!(
        "Resolved project settings {}:{} ({})",
        settings.group_id,
        settings.artifact_id,
        settings.base_package
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;

    fn model(title: &str) -> GenerationModel {
        GenerationModel {
            project: Project {
                name: to_kebab_case(title),
                title: title.to_string(),
                version: "1.0.0".to_string(),
                description: None,
                package: derive_package(title, None),
                base_path: "/".to_string(),
            },
            resources: vec![],
            data_types: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_derived_from_title() {
        let settings = resolve(None, &model("Beer API"), None).unwrap();
        assert_eq!(settings.artifact_id, "beer-api");
        assert_eq!(settings.base_package, "api.beer");
        assert_eq!(settings.group_id, "api.beer");
        assert_eq!(settings.model_package(), "api.beer.model");
    }

    #[test]
    fn test_organization_default() {
        let settings = resolve(None, &model("Beer API"), Some("com.acme")).unwrap();
        assert_eq!(settings.group_id, "com.acme");
        assert_eq!(settings.base_package, "com.acme.beerapi");
    }

    #[test]
    fn test_explicit_values_are_verbatim() {
        let overrides = ProjectSettingsOverrides {
            group_id: Some("io.openapi".into()),
            artifact_id: Some("simple".into()),
            base_package: Some("io.openapi.simple".into()),
        };
        let settings = resolve(Some(&overrides), &model("Beer API"), Some("com.acme")).unwrap();
        assert_eq!(settings.group_id, "io.openapi");
        assert_eq!(settings.artifact_id, "simple");
        assert_eq!(settings.base_package, "io.openapi.simple");
    }

    #[test]
    fn test_explicit_coordinates_are_not_reformatted() {
        let overrides = ProjectSettingsOverrides {
            group_id: Some("io.openapi simple".into()),
            artifact_id: Some(" simple api".into()),
            base_package: Some("io.openapi.simple".into()),
        };
        let settings = resolve(Some(&overrides), &model("Beer API"), None).unwrap();
        assert_eq!(settings.group_id, "io.openapi simple");
        assert_eq!(settings.artifact_id, " simple api");
    }

    #[test]
    fn test_partial_overrides() {
        let overrides = ProjectSettingsOverrides {
            artifact_id: Some("brewery".into()),
            ..Default::default()
        };
        let settings = resolve(Some(&overrides), &model("Beer API"), None).unwrap();
        assert_eq!(settings.artifact_id, "brewery");
        assert_eq!(settings.base_package, "api.beer");
    }

    #[test]
    fn test_empty_override_is_rejected() {
        let overrides = ProjectSettingsOverrides {
            base_package: Some("  ".into()),
            ..Default::default()
        };
        let err = resolve(Some(&overrides), &model("Beer API"), None).unwrap_err();
        assert!(matches!(err, Error::SettingsInvalid { field: "basePackage", .. }));
    }

    #[test]
    fn test_bad_package_is_rejected() {
        let overrides = ProjectSettingsOverrides {
            base_package: Some("io.class.simple".into()),
            ..Default::default()
        };
        assert!(resolve(Some(&overrides), &model("Beer API"), None).is_err());
    }

    #[test]
    fn test_unusable_title_falls_back() {
        let settings = resolve(None, &model("***"), None).unwrap();
        assert_eq!(settings.artifact_id, FALLBACK_ARTIFACT_ID);
        assert_eq!(settings.base_package, FALLBACK_PACKAGE);
    }

    #[test]
    fn test_keyword_and_digit_words_are_guarded() {
        assert_eq!(derive_package("Public 2nd API", None), "api._2nd.public_");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let m = model("Gateway Service v2");
        let first = resolve(None, &m, None).unwrap();
        let overrides = ProjectSettingsOverrides {
            group_id: Some(first.group_id.clone()),
            artifact_id: Some(first.artifact_id.clone()),
            base_package: Some(first.base_package.clone()),
        };
        assert_eq!(resolve(Some(&overrides), &m, None).unwrap(), first);
        assert_eq!(resolve(None, &m, None).unwrap(), first);
    }
}
