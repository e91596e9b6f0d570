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

use crate::common::config::Config;
use crate::common::error::PTuneError;
use crate::ptune::collate::{collate, PTuneBatch};
use crate::ptune::example::{read_examples, InputExample};
use crate::ptune::features::{convert_examples_to_features, PTuneFeature, TruncationObserver};
use crate::ptune::processors::{task_profile, PromptTemplate, TaskProfile};
use crate::ptune::tokenizer::PTuneTokenizer;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_max_seq_length_decoder() -> usize {
    128
}

/// # Configuration for a `TextToTextPTuneDataset`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PTuneDatasetConfig {
    /// Registered task profile name
    pub task_name: String,
    /// Data partition name (train/dev/test), used to build example identifiers
    pub data_split: String,
    /// Virtual token template
    pub template: PromptTemplate,
    /// Id of the pseudo (virtual prompt) token
    pub pseudo_token_id: i64,
    /// Maximum encoder sequence length
    pub max_seq_length: usize,
    /// Maximum decoder sequence length
    #[serde(default = "default_max_seq_length_decoder")]
    pub max_seq_length_decoder: usize,
}

impl Config<PTuneDatasetConfig> for PTuneDatasetConfig {}

/// # Text-to-text P-Tune dataset
///
/// Parses a task data file and converts every example to a `PTuneFeature` at
/// construction time. The dataset is read-only afterwards: indexed access from
/// concurrent readers needs no synchronization, and the batching layer that owns
/// shuffling and prefetching only ever reads.
#[derive(Debug)]
pub struct TextToTextPTuneDataset {
    profile: &'static TaskProfile,
    examples: Vec<InputExample>,
    features: Vec<PTuneFeature>,
    pad_id: i64,
}

impl TextToTextPTuneDataset {
    /// Builds a dataset from a tab separated task data file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the data file.
    /// * `task_name` - Registered task profile name.
    /// * `split` - Data partition name (train/dev/test).
    /// * `tokenizer` - Tokenizer backing text to ids conversion.
    /// * `template` - Virtual token template.
    /// * `pseudo_token_id` - Id of the pseudo token.
    /// * `max_seq_length` - Encoder length budget.
    /// * `max_seq_length_decoder` - Decoder length budget.
    /// * `observer` - Receiver for non-fatal truncation events.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_ptune::ptune::dataset::TextToTextPTuneDataset;
    /// use rust_ptune::ptune::processors::PromptTemplate;
    /// use rust_ptune::ptune::tokenizer::T5PTuneTokenizer;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let tokenizer = T5PTuneTokenizer::from_file("spiece.model", true)?;
    /// let dataset = TextToTextPTuneDataset::new(
    ///     "train.tsv",
    ///     "mnli",
    ///     "train",
    ///     &tokenizer,
    ///     PromptTemplate::new(3, 3),
    ///     32099,
    ///     512,
    ///     128,
    ///     &mut (),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new<P, T>(
        file_path: P,
        task_name: &str,
        split: &str,
        tokenizer: &T,
        template: PromptTemplate,
        pseudo_token_id: i64,
        max_seq_length: usize,
        max_seq_length_decoder: usize,
        observer: &mut dyn TruncationObserver,
    ) -> Result<TextToTextPTuneDataset, PTuneError>
    where
        P: AsRef<Path>,
        T: PTuneTokenizer + ?Sized,
    {
        let profile = task_profile(task_name)?;
        let examples = read_examples(file_path, profile, split)?;
        let features = convert_examples_to_features(
            &examples,
            profile,
            &template,
            pseudo_token_id,
            max_seq_length,
            max_seq_length_decoder,
            tokenizer,
            observer,
        );
        Ok(TextToTextPTuneDataset {
            profile,
            examples,
            features,
            pad_id: tokenizer.pad_id(),
        })
    }

    /// Builds a dataset from a `PTuneDatasetConfig`.
    pub fn from_config<P, T>(
        config: &PTuneDatasetConfig,
        file_path: P,
        tokenizer: &T,
        observer: &mut dyn TruncationObserver,
    ) -> Result<TextToTextPTuneDataset, PTuneError>
    where
        P: AsRef<Path>,
        T: PTuneTokenizer + ?Sized,
    {
        TextToTextPTuneDataset::new(
            file_path,
            &config.task_name,
            &config.data_split,
            tokenizer,
            config.template,
            config.pseudo_token_id,
            config.max_seq_length,
            config.max_seq_length_decoder,
            observer,
        )
    }

    /// Number of features in the dataset.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature at the given position.
    pub fn get(&self, index: usize) -> Option<&PTuneFeature> {
        self.features.get(index)
    }

    /// All features, in file order.
    pub fn features(&self) -> &[PTuneFeature] {
        self.features.as_slice()
    }

    /// Parsed examples, in file order.
    pub fn examples(&self) -> &[InputExample] {
        self.examples.as_slice()
    }

    /// Label vocabulary of the task profile.
    pub fn labels(&self) -> &'static [&'static str] {
        self.profile.labels
    }

    /// Padding id used for collation.
    pub fn pad_id(&self) -> i64 {
        self.pad_id
    }

    /// Collates the features at the given positions into a batch.
    ///
    /// Panics if a position is out of bounds.
    pub fn collate_batch(&self, indices: &[usize]) -> PTuneBatch {
        let selected = indices
            .iter()
            .map(|&index| self.features[index].clone())
            .collect::<Vec<_>>();
        collate(&selected, self.pad_id)
    }
}
