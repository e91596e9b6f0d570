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
use crate::ptune::tokenizer::PTuneTokenizer;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// # Virtual token template
///
/// Number of pseudo (virtual prompt) token positions inserted to the left and right of
/// the tokenized query. The pseudo token embeddings are optimized during P-Tuning in
/// place of natural language prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Number of pseudo tokens prepended to the query
    pub left: usize,
    /// Number of pseudo tokens appended to the query
    pub right: usize,
}

impl PromptTemplate {
    pub fn new(left: usize, right: usize) -> PromptTemplate {
        PromptTemplate { left, right }
    }

    pub fn total(&self) -> usize {
        self.left + self.right
    }
}

/// Position of the label column in a task data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelColumn {
    Index(usize),
    Last,
}

/// # Task profile
///
/// Describes how a task's raw data file maps to examples and how examples are turned
/// into prompted queries: column selection, label vocabulary, prompt formatting and
/// the per-task behavior switches of the feature conversion. Profiles are plain data
/// registered under the task name; supporting a new task means registering an entry.
#[derive(Debug)]
pub struct TaskProfile {
    /// Task name the profile is registered under
    pub task_name: &'static str,
    /// Column holding the first text field
    pub text_a_column: usize,
    /// Column holding the second text field
    pub text_b_column: usize,
    /// Column holding the example label
    pub label_column: LabelColumn,
    /// Minimum number of columns a data row must have
    pub min_columns: usize,
    /// Closed label vocabulary for the task
    pub labels: &'static [&'static str],
    /// Whether feature conversion applies an additional right-truncation of the
    /// encoder query to the maximum encoder length
    pub encoder_hard_cap: bool,
    /// Whether features carry the language tag extracted from the example identifier
    pub tags_language: bool,
    prompt: fn(&str, &str) -> String,
    label_to_string: fn(&str) -> String,
}

impl TaskProfile {
    /// Formats the natural language prompt embedding both text fields.
    pub fn prompted_query(&self, text_a: &str, text_b: &str) -> String {
        (self.prompt)(text_a, text_b)
    }

    /// Maps a label to the text form decoded by the model.
    pub fn label_to_string(&self, label: &str) -> String {
        (self.label_to_string)(label)
    }

    /// Builds the P-Tune encoder query for a pair of text fields.
    ///
    /// The prompted query is tokenized, then flanked by `template.left` and
    /// `template.right` copies of `pseudo_token_id`. If the tokenized text plus the
    /// template exceeds `max_seq_len`, the earliest text tokens are dropped by the
    /// overflow amount before the pseudo tokens are attached: the rightmost context
    /// and the pseudo tokens themselves are always preserved.
    ///
    /// Returns the query together with the number of tokens cut off, so that the
    /// caller can report the truncation.
    pub fn build_ptune_query<T>(
        &self,
        text_a: &str,
        text_b: &str,
        pseudo_token_id: i64,
        max_seq_len: usize,
        template: &PromptTemplate,
        tokenizer: &T,
    ) -> (Vec<i64>, usize)
    where
        T: PTuneTokenizer + ?Sized,
    {
        let input_token_ids = tokenizer.text_to_ids(&self.prompted_query(text_a, text_b));
        let cut = (input_token_ids.len() + template.total()).saturating_sub(max_seq_len);
        // A template larger than the budget leaves no room for text at all
        let kept_ids = input_token_ids.get(cut..).unwrap_or(&[]);
        let mut query = Vec::with_capacity(template.total() + kept_ids.len());
        query.resize(template.left, pseudo_token_id);
        query.extend_from_slice(kept_ids);
        query.extend(std::iter::repeat(pseudo_token_id).take(template.right));
        (query, cut)
    }
}

fn nli_prompt(text_a: &str, text_b: &str) -> String {
    format!("mnli hypothesis: {} premise: {}", text_a, text_b)
}

fn identity_label(label: &str) -> String {
    label.to_owned()
}

static NLI_LABELS: [&str; 3] = ["contradiction", "entailment", "neutral"];

lazy_static! {
    static ref TASK_PROFILES: HashMap<&'static str, TaskProfile> = {
        let mut profiles = HashMap::new();
        profiles.insert(
            "mnli",
            TaskProfile {
                task_name: "mnli",
                text_a_column: 8,
                text_b_column: 9,
                label_column: LabelColumn::Last,
                min_columns: 10,
                labels: &NLI_LABELS,
                encoder_hard_cap: true,
                tags_language: false,
                prompt: nli_prompt,
                label_to_string: identity_label,
            },
        );
        profiles.insert(
            "xnli",
            TaskProfile {
                task_name: "xnli",
                text_a_column: 6,
                text_b_column: 7,
                label_column: LabelColumn::Index(1),
                min_columns: 8,
                labels: &NLI_LABELS,
                encoder_hard_cap: false,
                tags_language: true,
                prompt: nli_prompt,
                label_to_string: identity_label,
            },
        );
        profiles
    };
}

/// Looks up a task profile by name, returning `UnsupportedTaskError` listing the
/// registered tasks if the name is unknown.
pub fn task_profile(task_name: &str) -> Result<&'static TaskProfile, PTuneError> {
    TASK_PROFILES.get(task_name).ok_or_else(|| {
        PTuneError::UnsupportedTaskError(task_name.to_owned(), registered_tasks())
    })
}

/// Names of the registered task profiles, sorted.
pub fn registered_tasks() -> Vec<&'static str> {
    let mut tasks = TASK_PROFILES.keys().copied().collect::<Vec<_>>();
    tasks.sort_unstable();
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WordIndexTokenizer;

    impl PTuneTokenizer for WordIndexTokenizer {
        fn text_to_ids(&self, text: &str) -> Vec<i64> {
            text.split_whitespace()
                .enumerate()
                .map(|(position, _)| 100 + position as i64)
                .collect()
        }

        fn pad_id(&self) -> i64 {
            0
        }

        fn bos_id(&self) -> i64 {
            1
        }

        fn eos_id(&self) -> i64 {
            2
        }
    }

    #[test]
    fn query_fits_without_truncation() {
        let profile = task_profile("mnli").unwrap();
        let template = PromptTemplate::new(2, 3);
        // prompt "mnli hypothesis: a premise: b" has 5 whitespace separated tokens
        let (query, cut) =
            profile.build_ptune_query("a", "b", 9, 20, &template, &WordIndexTokenizer);
        assert_eq!(cut, 0);
        assert_eq!(query.len(), 10);
        assert_eq!(&query[..2], &[9, 9]);
        assert_eq!(&query[2..7], &[100, 101, 102, 103, 104]);
        assert_eq!(&query[7..], &[9, 9, 9]);
    }

    #[test]
    fn query_truncates_earliest_tokens() {
        let profile = task_profile("mnli").unwrap();
        let template = PromptTemplate::new(2, 3);
        // 5 text tokens + 5 template positions against a budget of 8 cuts 2 tokens
        let (query, cut) =
            profile.build_ptune_query("a", "b", 9, 8, &template, &WordIndexTokenizer);
        assert_eq!(cut, 2);
        assert_eq!(query.len(), 8);
        assert_eq!(&query[..2], &[9, 9]);
        assert_eq!(&query[2..5], &[102, 103, 104]);
        assert_eq!(&query[5..], &[9, 9, 9]);
    }

    #[test]
    fn template_larger_than_budget_keeps_no_text() {
        let profile = task_profile("mnli").unwrap();
        let template = PromptTemplate::new(4, 4);
        let (query, cut) =
            profile.build_ptune_query("a", "b", 9, 5, &template, &WordIndexTokenizer);
        assert_eq!(cut, 8);
        assert_eq!(query, vec![9; 8]);
    }

    #[test]
    fn unknown_task_lists_registered_names() {
        let error = task_profile("sst-2").unwrap_err();
        match error {
            PTuneError::UnsupportedTaskError(task, available) => {
                assert_eq!(task, "sst-2");
                assert_eq!(available, vec!["mnli", "xnli"]);
            }
            _ => panic!("expected UnsupportedTaskError"),
        }
    }
}
