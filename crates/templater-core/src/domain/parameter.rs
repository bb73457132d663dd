//! Parameter descriptors and the merged, ordered set a run works from.

use serde::{Deserialize, Serialize};

use super::{DomainError, ParameterKind, ParameterValue};

/// One declared parameter, as it appears in a `template.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
    #[serde(default = "yes")]
    pub mandatory: bool,
    #[serde(default = "yes")]
    pub always_ask: bool,
}

fn yes() -> bool {
    true
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            default_value: None,
            possible_values: None,
            mandatory: true,
            always_ask: true,
        }
    }

    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    pub fn never_ask(mut self) -> Self {
        self.always_ask = false;
        self
    }

    pub fn with_possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// The default to use without asking, if any.
    pub fn silent_default(&self) -> Option<&ParameterValue> {
        if self.always_ask {
            None
        } else {
            self.default_value.as_ref()
        }
    }

    /// Check a field-level constraint that serde cannot express.
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("parameter name is empty".into());
        }
        if let Some(default) = &self.default_value {
            if default.kind() != self.kind {
                return Err(format!(
                    "parameter '{}' is {} but its defaultValue is {}",
                    self.name,
                    self.kind,
                    default.kind()
                ));
            }
        }
        Ok(())
    }

    /// Ensure `value` has this descriptor's kind and an allowed value.
    pub fn validate(&self, value: &ParameterValue) -> Result<(), DomainError> {
        if value.kind() != self.kind {
            return Err(DomainError::ParameterKindMismatch {
                name: self.name.clone(),
                requested: self.kind.to_string(),
                actual: value.kind().to_string(),
            });
        }
        if let (Some(allowed), ParameterValue::String(s)) = (&self.possible_values, value) {
            if !allowed.iter().any(|a| a == s) {
                return Err(DomainError::InvalidParameterValue {
                    name: self.name.clone(),
                    value: s.clone(),
                    allowed: allowed.join(", "),
                });
            }
        }
        Ok(())
    }

    /// Convert a raw command-line string into a value of this kind.
    pub fn coerce(&self, raw: &str) -> Result<ParameterValue, DomainError> {
        let value = match self.kind {
            ParameterKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => ParameterValue::Bool(true),
                "false" | "f" | "no" | "n" | "0" => ParameterValue::Bool(false),
                _ => {
                    return Err(DomainError::InvalidParameterValue {
                        name: self.name.clone(),
                        value: raw.to_owned(),
                        allowed: "true, false".into(),
                    });
                }
            },
            ParameterKind::String => ParameterValue::String(raw.to_owned()),
            ParameterKind::StringList => ParameterValue::StringList(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect(),
            ),
        };
        self.validate(&value)?;
        Ok(value)
    }
}

/// Ordered, merged parameter descriptors for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    descriptors: Vec<ParameterDescriptor>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parameters every run knows about, before any template is read.
    pub fn builtin() -> Self {
        use ParameterKind::*;

        let descriptors = vec![
            ParameterDescriptor::new("template", String, "Template being processed").optional(),
            ParameterDescriptor::new("name", String, "Name of the generated item"),
            ParameterDescriptor::new("projectName", String, "Project name"),
            ParameterDescriptor::new("author", String, "Author written into file headers")
                .with_default("")
                .never_ask(),
            ParameterDescriptor::new("copyright", String, "Copyright line for file headers")
                .with_default("")
                .never_ask(),
            ParameterDescriptor::new("projectPath", String, "Root folder of the project")
                .with_default(".")
                .never_ask(),
            ParameterDescriptor::new("sourcesPath", String, "Sources root of the project")
                .optional(),
            ParameterDescriptor::new("testsPath", String, "Tests root of the project").optional(),
            ParameterDescriptor::new("locationPath", String, "Custom output location").optional(),
            ParameterDescriptor::new("fileName", String, "Name of the file being rendered")
                .optional(),
            ParameterDescriptor::new("date", String, "Generation date (dd/MM/yyyy)").optional(),
            ParameterDescriptor::new(
                "deriveFromTemplate",
                String,
                "Template whose descriptor a prepared template inherits",
            )
            .optional(),
            ParameterDescriptor::new("projectFiles", StringList, "Files to prepare a template from")
                .optional(),
        ];

        Self { descriptors }
    }

    /// Merge later descriptors over earlier ones.
    ///
    /// A redeclared name replaces the earlier descriptor in place; changing
    /// its kind fails with [`DomainError::DefaultParameterOverride`].
    pub fn merge<'a, I>(&mut self, descriptors: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = &'a ParameterDescriptor>,
    {
        for incoming in descriptors {
            match self.descriptors.iter_mut().find(|d| d.name == incoming.name) {
                Some(existing) if existing.kind != incoming.kind => {
                    return Err(DomainError::DefaultParameterOverride {
                        name: incoming.name.clone(),
                        original: existing.kind.to_string(),
                        redeclared: incoming.kind.to_string(),
                    });
                }
                Some(existing) => *existing = incoming.clone(),
                None => self.descriptors.push(incoming.clone()),
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&ParameterDescriptor, DomainError> {
        self.get(name).ok_or_else(|| DomainError::ParameterUnknown {
            name: name.to_owned(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Coerce a raw `name=value` override using the declared kind.
    pub fn coerce(&self, name: &str, raw: &str) -> Result<ParameterValue, DomainError> {
        self.require(name)?.coerce(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults_mandatory_and_always_ask() {
        let d: ParameterDescriptor = serde_json::from_str(
            r#"{"name": "useCoordinator", "type": "bool", "description": "Coordinator?"}"#,
        )
        .unwrap();
        assert_eq!(d.kind, ParameterKind::Bool);
        assert!(d.mandatory);
        assert!(d.always_ask);
        assert!(d.silent_default().is_none());
    }

    #[test]
    fn descriptor_without_description_is_rejected() {
        let parsed: Result<ParameterDescriptor, _> =
            serde_json::from_str(r#"{"name": "x", "type": "string"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn check_catches_default_of_wrong_kind() {
        let d = ParameterDescriptor::new("flag", ParameterKind::Bool, "flag").with_default("yes");
        assert!(d.check().is_err());
    }

    #[test]
    fn merge_replaces_same_kind() {
        let mut set = ParameterSet::builtin();
        let before = set.len();
        let override_name =
            ParameterDescriptor::new("name", ParameterKind::String, "Screen name")
                .with_default("Main")
                .never_ask();
        set.merge([&override_name]).unwrap();

        assert_eq!(set.len(), before);
        assert_eq!(set.get("name").unwrap().description, "Screen name");
    }

    #[test]
    fn merge_rejects_kind_change() {
        let mut set = ParameterSet::builtin();
        let bad = ParameterDescriptor::new("name", ParameterKind::Bool, "oops");
        assert!(matches!(
            set.merge([&bad]),
            Err(DomainError::DefaultParameterOverride { .. })
        ));
    }

    #[test]
    fn coerce_by_kind() {
        let mut set = ParameterSet::builtin();
        let flag = ParameterDescriptor::new("useRx", ParameterKind::Bool, "rx");
        set.merge([&flag]).unwrap();

        assert_eq!(set.coerce("useRx", "YES").unwrap(), ParameterValue::Bool(true));
        assert!(set.coerce("useRx", "maybe").is_err());
        assert_eq!(
            set.coerce("projectFiles", "a.swift, b.swift").unwrap(),
            ParameterValue::StringList(vec!["a.swift".into(), "b.swift".into()])
        );
        assert!(matches!(
            set.coerce("nope", "1"),
            Err(DomainError::ParameterUnknown { .. })
        ));
    }

    #[test]
    fn possible_values_are_enforced() {
        let d = ParameterDescriptor::new("style", ParameterKind::String, "style")
            .with_possible_values(["mvvm", "mvc"]);
        assert!(d.coerce("mvvm").is_ok());
        assert!(matches!(
            d.coerce("viper"),
            Err(DomainError::InvalidParameterValue { .. })
        ));
    }
}
