//! # Check Records
//!
//! A [`Check`] is one QA test instance: what it is ([`Info`]), what it was
//! given ([`Inputs`]) and what it produced ([`Outputs`]). The remaining
//! types here are the leaves those three are built from.

use serde_json::{Map, Number, Value};

use crate::error::ModelError;
use crate::execution::Execution;
use crate::record::{list_json, record_serde, Dict, Fields, Record};

/// A file consumed or generated by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    /// Free-form type tag, e.g. `"Raw Files"` or `"Survey DTMs"`.
    pub file_type: String,
    pub description: Option<String>,
}

impl File {
    pub fn new(path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
            description: None,
        }
    }
}

impl Record for File {
    const NAME: &'static str = "File";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            path: f.string("path")?,
            file_type: f.string("file_type")?,
            description: f.opt_string("description")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("path", self.path.clone())
            .field("file_type", self.file_type.clone())
            .optional("description", self.description.clone())
            .build()
    }
}

/// Grouping a check type belongs to, e.g. "Data Integrity".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Record for Group {
    const NAME: &'static str = "Group";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            id: f.string("id")?,
            name: f.opt_string("name")?,
            description: f.opt_string("description")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("id", self.id.clone())
            .optional("name", self.name.clone())
            .optional("description", self.description.clone())
            .build()
    }
}

/// A named check parameter.
///
/// `options` lists the values a UI may offer for `value`; it is not
/// enforced here.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: Value,
    pub options: Option<Vec<Value>>,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options: None,
        }
    }
}

impl Record for Param {
    const NAME: &'static str = "Param";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            name: f.string("name")?,
            value: f.value("value")?.clone(),
            options: f.opt_values("options")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("name", self.name.clone())
            .field("value", self.value.clone())
            .optional("options", self.options.clone())
            .build()
    }
}

/// Identifies what a check is. `id` is normally the UUID of the check
/// type, shared by every document that runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub group: Option<Group>,
}

impl Info {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            version: None,
            group: None,
        }
    }
}

impl Record for Info {
    const NAME: &'static str = "Info";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            id: f.string("id")?,
            name: f.opt_string("name")?,
            description: f.opt_string("description")?,
            version: f.opt_string("version")?,
            group: f.opt_record("group")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("id", self.id.clone())
            .optional("name", self.name.clone())
            .optional("description", self.description.clone())
            .optional("version", self.version.clone())
            .optional("group", self.group.as_ref().map(Record::to_json))
            .build()
    }
}

/// Files and parameters a check runs against. Both lists are always
/// present; an absent list in the input reads as empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inputs {
    pub files: Vec<File>,
    pub params: Vec<Param>,
}

impl Inputs {
    /// First parameter named `name`.
    pub fn get_param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// First file with the given path.
    pub fn get_file(&self, path: &str) -> Option<&File> {
        self.files.iter().find(|f| f.path == path)
    }
}

impl Record for Inputs {
    const NAME: &'static str = "Inputs";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            files: f.list("files")?,
            params: f.list("params")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("files", list_json(&self.files))
            .field("params", list_json(&self.params))
            .build()
    }
}

/// Results a check produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    pub execution: Execution,
    pub files: Option<Vec<File>>,
    /// Integer, kept in the form it was written (`3` or `3.0`).
    pub count: Option<Number>,
    /// Kept in the form it was written (`50` or `50.0`).
    pub percentage: Option<Number>,
    pub messages: Option<Vec<String>>,
    /// Check-specific payload, opaque to this crate.
    pub data: Option<Map<String, Value>>,
    /// Outcome such as `"pass"`, `"warning"` or `"fail"`. Open set.
    pub check_state: Option<String>,
}

impl Outputs {
    /// Outputs holding only `execution`.
    pub fn new(execution: Execution) -> Self {
        Self {
            execution,
            files: None,
            count: None,
            percentage: None,
            messages: None,
            data: None,
            check_state: None,
        }
    }

    /// `count` as an `i64`, if it is set and fits.
    pub fn count_i64(&self) -> Option<i64> {
        let n = self.count.as_ref()?;
        n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn set_count(&mut self, count: i64) {
        self.count = Some(Number::from(count));
    }

    /// `percentage` as an `f64`, if it is set.
    pub fn percentage_f64(&self) -> Option<f64> {
        self.percentage.as_ref().and_then(Number::as_f64)
    }

    /// Set `percentage`. Leaves the field untouched if `value` is NaN or
    /// infinite, neither of which JSON can represent.
    ///
    /// # Errors
    ///
    /// [`ModelError::NonFiniteNumber`] for NaN or an infinity.
    pub fn set_percentage(&mut self, value: f64) -> Result<(), ModelError> {
        let n = Number::from_f64(value).ok_or_else(|| ModelError::NonFiniteNumber {
            record: Self::NAME,
            field: "percentage".to_string(),
        })?;
        self.percentage = Some(n);
        Ok(())
    }
}

impl Record for Outputs {
    const NAME: &'static str = "Outputs";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            execution: f.record("execution")?,
            files: f.opt_list("files")?,
            count: f.opt_integer("count")?,
            percentage: f.opt_number("percentage")?,
            messages: f.opt_strings("messages")?,
            data: f.opt_object("data")?,
            check_state: f.opt_string("check_state")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("execution", self.execution.to_json())
            .optional("files", self.files.as_deref().map(list_json))
            .optional("count", self.count.clone())
            .optional("percentage", self.percentage.clone())
            .optional("messages", self.messages.clone())
            .optional("data", self.data.clone())
            .optional("check_state", self.check_state.clone())
            .build()
    }
}

/// A single QA check instance and its results.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub info: Info,
    pub inputs: Option<Inputs>,
    pub outputs: Option<Outputs>,
}

impl Check {
    pub fn new(info: Info) -> Self {
        Self {
            info,
            inputs: None,
            outputs: None,
        }
    }

    /// Return the inputs, creating empty ones first if absent.
    pub fn get_or_add_inputs(&mut self) -> &mut Inputs {
        self.inputs.get_or_insert_with(Inputs::default)
    }
}

impl Record for Check {
    const NAME: &'static str = "Check";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            info: f.record("info")?,
            inputs: f.opt_record("inputs")?,
            outputs: f.opt_record("outputs")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("info", self.info.to_json())
            .optional("inputs", self.inputs.as_ref().map(Record::to_json))
            .optional("outputs", self.outputs.as_ref().map(Record::to_json))
            .build()
    }
}

record_serde!(File, Group, Param, Info, Inputs, Outputs, Check);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_check() -> Value {
        json!({
            "info": {
                "id": "7761e08b-1380-46fa-a7eb-f1f41db38541",
                "name": "File Checker",
                "description": "Checks filename is appropriately formatted",
                "version": "1",
                "group": {
                    "id": "ef03a6a5-5a5d-4a3a-9e3f-59ef3b3d7cb5",
                    "name": "Data Integrity",
                    "description": "Integrity of raw survey data"
                }
            },
            "inputs": {
                "files": [
                    {"path": "a/0001.all", "file_type": "Raw Files", "description": "line 1"},
                    {"path": "a/0002.all", "file_type": "Raw Files"}
                ],
                "params": [
                    {"name": "threshold", "value": 0.5, "options": [0.25, 0.5, 1.0]},
                    {"name": "label", "value": null}
                ]
            },
            "outputs": {
                "execution": {"status": "completed", "start": "2020-03-02T04:00:00Z"},
                "files": [{"path": "out/report.txt", "file_type": "Report"}],
                "count": 2,
                "percentage": 12.5,
                "messages": ["first", "second"],
                "data": {"failed_lines": [3, 9]},
                "check_state": "fail"
            }
        })
    }

    #[test]
    fn test_check_round_trip() {
        let d = full_check();
        let check = Check::from_json(&d).unwrap();
        assert_eq!(check.to_json(), d);
    }

    #[test]
    fn test_from_json_does_not_touch_input() {
        let d = full_check();
        let before = d.clone();
        let _ = Check::from_json(&d).unwrap();
        assert_eq!(d, before);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let d = json!({"path": "x.all", "file_type": "Raw Files", "size": 12});
        let file = File::from_json(&d).unwrap();
        assert_eq!(file.to_json(), json!({"path": "x.all", "file_type": "Raw Files"}));
    }

    #[test]
    fn test_info_minimal_omits_optionals() {
        let info = Info::new("abc");
        assert_eq!(info.to_json(), json!({"id": "abc"}));
    }

    #[test]
    fn test_outputs_minimal_omits_optionals() {
        let outputs = Outputs::new(Execution::new("queued"));
        assert_eq!(outputs.to_json(), json!({"execution": {"status": "queued"}}));
    }

    #[test]
    fn test_file_requires_file_type() {
        let err = File::from_json(&json!({"path": "x.all"})).unwrap_err();
        assert_eq!(err.field(), Some("file_type"));
    }

    #[test]
    fn test_param_requires_value_key_but_allows_null() {
        let err = Param::from_json(&json!({"name": "p"})).unwrap_err();
        assert!(matches!(err, ModelError::MissingField { ref field, .. } if field == "value"));

        let param = Param::from_json(&json!({"name": "p", "value": null})).unwrap();
        assert_eq!(param.value, Value::Null);
        assert_eq!(param.to_json(), json!({"name": "p", "value": null}));
    }

    #[test]
    fn test_outputs_requires_execution() {
        let err = Outputs::from_json(&json!({"count": 1})).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingField {
                record: "Outputs",
                field: "execution".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_missing_field_reports_inner_record() {
        let err = Check::from_json(&json!({"info": {"name": "no id"}})).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingField {
                record: "Info",
                field: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_type_count() {
        let d = json!({"execution": {"status": "completed"}, "count": "3"});
        let err = Outputs::from_json(&d).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidType {
                record: "Outputs",
                field: "count".to_string(),
                expected: "integer",
                found: "string",
            }
        );
    }

    #[test]
    fn test_inputs_missing_lists_default_empty() {
        let inputs = Inputs::from_json(&json!({})).unwrap();
        assert!(inputs.files.is_empty());
        assert!(inputs.params.is_empty());
        assert_eq!(inputs.to_json(), json!({"files": [], "params": []}));
    }

    #[test]
    fn test_get_or_add_inputs_is_idempotent() {
        let mut check = Check::new(Info::new("abc"));
        check
            .get_or_add_inputs()
            .params
            .push(Param::new("threshold", 2));
        let inputs = check.get_or_add_inputs();
        assert_eq!(inputs.params.len(), 1);
        assert_eq!(inputs.get_param("threshold").map(|p| &p.value), Some(&json!(2)));
        assert!(inputs.get_param("missing").is_none());
    }

    #[test]
    fn test_existing_inputs_are_kept() {
        let mut check = Check::from_json(&full_check()).unwrap();
        let inputs = check.get_or_add_inputs();
        assert_eq!(inputs.files.len(), 2);
        assert_eq!(
            inputs.get_file("a/0002.all").map(|f| f.file_type.as_str()),
            Some("Raw Files")
        );
    }

    #[test]
    fn test_serde_delegates_to_record() {
        let check: Check = serde_json::from_value(full_check()).unwrap();
        assert_eq!(serde_json::to_value(&check).unwrap(), full_check());

        let err = serde_json::from_value::<Check>(json!({"inputs": {}})).unwrap_err();
        assert!(err.to_string().contains("missing required field 'info'"));
    }

    #[test]
    fn test_whole_number_percentage_round_trips() {
        for d in [
            json!({"execution": {"status": "completed"}, "percentage": 50}),
            json!({"execution": {"status": "completed"}, "percentage": 50.0}),
            json!({"execution": {"status": "completed"}, "count": 3.0}),
            json!({"execution": {"status": "completed"}, "count": u64::MAX}),
        ] {
            assert_eq!(Outputs::from_json(&d).unwrap().to_json(), d);
        }
    }

    #[test]
    fn test_numeric_accessors() {
        let outputs = Outputs::from_json(&json!({
            "execution": {"status": "completed"},
            "count": 3.0,
            "percentage": 50
        }))
        .unwrap();
        assert_eq!(outputs.count_i64(), Some(3));
        assert_eq!(outputs.percentage_f64(), Some(50.0));

        let big = Outputs::from_json(&json!({"execution": {"status": "completed"}, "count": u64::MAX}))
            .unwrap();
        assert_eq!(big.count_i64(), None);
    }

    #[test]
    fn test_non_finite_percentage_rejected() {
        let mut outputs = Outputs::new(Execution::new("completed"));
        outputs.set_count(7);
        outputs.set_percentage(12.5).unwrap();
        assert_eq!(
            outputs.to_json(),
            json!({"execution": {"status": "completed"}, "count": 7, "percentage": 12.5})
        );

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = outputs.set_percentage(bad).unwrap_err();
            assert_eq!(err.field(), Some("percentage"));
        }
        assert_eq!(outputs.percentage_f64(), Some(12.5));
        assert_eq!(outputs.to_json()["percentage"], json!(12.5));
    }

    #[test]
    fn test_key_order_is_canonical() {
        let outputs = Outputs::from_json(&json!({
            "check_state": "pass",
            "count": 0,
            "execution": {"status": "completed"}
        }))
        .unwrap();
        let text = serde_json::to_string(&outputs.to_json()).unwrap();
        assert!(text.starts_with(r#"{"execution":"#));
    }
}
