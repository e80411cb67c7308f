//! # Document Records
//!
//! The upper half of the tree: [`Root`] holds one [`Qa`], which holds the
//! three processing-stage [`DataLevel`]s, each an ordered list of checks.
//!
//! Data levels are addressed by [`DataLevelName`] so check engines can
//! pick a stage at runtime without reflecting on field names.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::check::Check;
use crate::error::ModelError;
use crate::record::{list_json, record_serde, Dict, Fields, Record};

/// The checks run at one processing stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataLevel {
    pub checks: Vec<Check>,
}

impl DataLevel {
    /// First check whose `info.id` equals `id`.
    ///
    /// Ids are not required to be unique; with duplicates the earliest
    /// check wins.
    pub fn get_check(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.info.id == id)
    }

    /// Mutable form of [`DataLevel::get_check`].
    pub fn get_check_mut(&mut self, id: &str) -> Option<&mut Check> {
        self.checks.iter_mut().find(|c| c.info.id == id)
    }

    /// Append a check and return it for further population.
    pub fn add_check(&mut self, check: Check) -> &mut Check {
        self.checks.push(check);
        let last = self.checks.len() - 1;
        &mut self.checks[last]
    }
}

impl Record for DataLevel {
    const NAME: &'static str = "DataLevel";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            checks: f.list("checks")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new().field("checks", list_json(&self.checks)).build()
    }
}

/// One of the three data level slots of [`Qa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataLevelName {
    RawData,
    SurveyProducts,
    ChartAdequacy,
}

impl DataLevelName {
    /// All slots in document order.
    pub const ALL: [DataLevelName; 3] = [
        DataLevelName::RawData,
        DataLevelName::SurveyProducts,
        DataLevelName::ChartAdequacy,
    ];

    /// The JSON key of this slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawData => "raw_data",
            Self::SurveyProducts => "survey_products",
            Self::ChartAdequacy => "chart_adequacy",
        }
    }
}

impl fmt::Display for DataLevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataLevelName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ModelError::UnknownDataLevel(s.to_string()))
    }
}

/// Document metadata and the data levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Qa {
    /// Schema version the document conforms to, without a `v` prefix.
    pub version: String,
    pub raw_data: DataLevel,
    pub survey_products: DataLevel,
    pub chart_adequacy: Option<DataLevel>,
}

impl Qa {
    /// A `Qa` with empty mandatory data levels and no chart adequacy.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            raw_data: DataLevel::default(),
            survey_products: DataLevel::default(),
            chart_adequacy: None,
        }
    }

    pub fn get_data_level(&self, name: DataLevelName) -> Option<&DataLevel> {
        match name {
            DataLevelName::RawData => Some(&self.raw_data),
            DataLevelName::SurveyProducts => Some(&self.survey_products),
            DataLevelName::ChartAdequacy => self.chart_adequacy.as_ref(),
        }
    }

    pub fn get_data_level_mut(&mut self, name: DataLevelName) -> Option<&mut DataLevel> {
        match name {
            DataLevelName::RawData => Some(&mut self.raw_data),
            DataLevelName::SurveyProducts => Some(&mut self.survey_products),
            DataLevelName::ChartAdequacy => self.chart_adequacy.as_mut(),
        }
    }

    /// Return the named data level, binding an empty one into the slot
    /// first if it is absent. Repeated calls return the same slot.
    pub fn get_or_add_data_level(&mut self, name: DataLevelName) -> &mut DataLevel {
        match name {
            DataLevelName::RawData => &mut self.raw_data,
            DataLevelName::SurveyProducts => &mut self.survey_products,
            DataLevelName::ChartAdequacy => self.chart_adequacy.get_or_insert_with(DataLevel::default),
        }
    }

    /// Present data levels in document order.
    pub fn data_levels(&self) -> impl Iterator<Item = (DataLevelName, &DataLevel)> + '_ {
        DataLevelName::ALL
            .into_iter()
            .filter_map(move |name| self.get_data_level(name).map(|level| (name, level)))
    }
}

impl Record for Qa {
    const NAME: &'static str = "Qa";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            version: f.string("version")?,
            raw_data: f.record("raw_data")?,
            survey_products: f.record("survey_products")?,
            chart_adequacy: f.opt_record("chart_adequacy")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("version", self.version.clone())
            .field("raw_data", self.raw_data.to_json())
            .field("survey_products", self.survey_products.to_json())
            .optional("chart_adequacy", self.chart_adequacy.as_ref().map(Record::to_json))
            .build()
    }
}

/// Root of a QAJSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub qa: Qa,
}

impl Root {
    /// The smallest valid document for `version`: empty `raw_data` and
    /// `survey_products`, no `chart_adequacy`.
    pub fn minimal(version: impl Into<String>) -> Self {
        Self {
            qa: Qa::new(version),
        }
    }

    /// Pretty-printed JSON text of the document.
    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_json())
    }
}

impl Record for Root {
    const NAME: &'static str = "Root";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            qa: f.record("qa")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new().field("qa", self.qa.to_json()).build()
    }
}

record_serde!(DataLevel, Qa, Root);
