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

//! # Text-to-text P-Tuning dataset pipeline
//!
//! Turns tab separated task files into batches ready for an encoder-decoder model:
//!
//! - `example`: parses raw rows into uniform labeled text pair examples.
//! - `processors`: task profiles (column mapping, label vocabulary, prompt formatting)
//!   and the P-Tune query builder attaching the virtual token template.
//! - `features`: per-example conversion into encoder/decoder/label id triples.
//! - `collate`: batch collation into rectangular tensors with attention, history and
//!   loss masks.
//! - `dataset`: the indexed, read-only dataset wrapper tying the stages together.
//! - `tokenizer`: the tokenizer interface the pipeline is generic over, with a T5
//!   adapter.

pub mod collate;
pub mod dataset;
pub mod example;
pub mod features;
pub mod processors;
pub mod tokenizer;

pub use collate::{collate, make_attention_mask_3d, make_history_mask_3d, PTuneBatch};
pub use dataset::{PTuneDatasetConfig, TextToTextPTuneDataset};
pub use example::{read_examples, InputExample};
pub use features::{
    convert_examples_to_features, PTuneFeature, TruncationEvent, TruncationLog,
    TruncationObserver, TruncationSite,
};
pub use processors::{registered_tasks, task_profile, LabelColumn, PromptTemplate, TaskProfile};
pub use tokenizer::{PTuneTokenizer, T5PTuneTokenizer};
