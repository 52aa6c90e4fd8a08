use std::fmt;

use serde::Serialize;

use crate::errors::CheckError;
use crate::tables::Dataset;

/// Which dataset of a [`Context`] a check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Train,
    Test,
}

impl DatasetKind {
    /// Suffix appended to check headers when both datasets are checked.
    pub fn header_suffix(&self) -> &'static str {
        match self {
            DatasetKind::Train => " - Train Dataset",
            DatasetKind::Test => " - Test Dataset",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Train => write!(f, "train"),
            DatasetKind::Test => write!(f, "test"),
        }
    }
}

/// Datasets a suite runs against.
#[derive(Debug, Clone)]
pub struct Context {
    train: Dataset,
    test: Option<Dataset>,
    with_display: bool,
}

impl Context {
    pub fn new(train: Dataset) -> Self {
        Self {
            train,
            test: None,
            with_display: true,
        }
    }

    pub fn with_test(self, test: Dataset) -> Self {
        Self {
            test: Some(test),
            ..self
        }
    }

    /// Turn rich display generation on or off for every check.
    pub fn with_display(self, with_display: bool) -> Self {
        Self {
            with_display,
            ..self
        }
    }

    pub fn train(&self) -> &Dataset {
        &self.train
    }

    pub fn test(&self) -> Option<&Dataset> {
        self.test.as_ref()
    }

    pub fn has_test(&self) -> bool {
        self.test.is_some()
    }

    pub fn display_enabled(&self) -> bool {
        self.with_display
    }

    /// Kinds available in this context, train first.
    pub fn kinds(&self) -> Vec<DatasetKind> {
        if self.has_test() {
            vec![DatasetKind::Train, DatasetKind::Test]
        } else {
            vec![DatasetKind::Train]
        }
    }

    /// Dataset of the given kind, with the context display flag applied.
    pub fn get_data_by_kind(&self, kind: DatasetKind) -> Result<Dataset, CheckError> {
        let dataset = match kind {
            DatasetKind::Train => &self.train,
            DatasetKind::Test => self.test.as_ref().ok_or_else(|| {
                CheckError::DatasetValidation(
                    "Check is irrelevant if not supplied with test dataset".to_string(),
                )
            })?,
        };
        Ok(dataset.clone().with_display(self.with_display))
    }
}
