// Copyright 2018 The Google AI Language Team Authors and The HuggingFace Inc. team.
// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::common::error::PTuneError;
use crate::ptune::processors::{LabelColumn, TaskProfile};
use std::path::Path;

/// # Labeled text pair example
///
/// A single training/test example for sequence classification, parsed from one row of
/// a task data file. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputExample {
    /// Unique id for the example, `"{split}-{first column value}"`
    pub guid: String,
    /// Untokenized text of the first sequence
    pub text_a: String,
    /// Untokenized text of the second sequence, for sequence pair tasks
    pub text_b: Option<String>,
    /// Label of the example
    pub label: String,
}

/// Reads a tab separated task data file into examples using the column mapping of the
/// given task profile. The header row is skipped and quoting is disabled; a UTF-8 byte
/// order mark at the start of the file is ignored.
///
/// Fails with `FormatError` (carrying the file path and 1-based row number) on the
/// first row with fewer columns than the profile requires.
pub fn read_examples<P: AsRef<Path>>(
    path: P,
    profile: &TaskProfile,
    split: &str,
) -> Result<Vec<InputExample>, PTuneError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_path(path)?;

    let mut examples = Vec::new();
    for (record_index, record) in reader.into_records().enumerate() {
        let record = record?;
        if record.len() < profile.min_columns {
            return Err(PTuneError::FormatError {
                path: path.display().to_string(),
                // physical file row, the header being row 1
                row: record_index + 2,
                expected: profile.min_columns,
                found: record.len(),
            });
        }
        let label_index = match profile.label_column {
            LabelColumn::Index(index) => index,
            LabelColumn::Last => record.len() - 1,
        };
        examples.push(InputExample {
            guid: format!("{}-{}", split, &record[0]),
            text_a: record[profile.text_a_column].to_owned(),
            text_b: Some(record[profile.text_b_column].to_owned()),
            label: record[label_index].to_owned(),
        });
    }
    Ok(examples)
}
