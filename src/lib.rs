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

//! Ready-to-use dataset pipelines for P-Tuning text-to-text models.
//!
//! This crate prepares batches for prompt-tuned encoder-decoder training: it parses
//! tab separated task files into labeled text pair examples, builds prompted encoder
//! queries flanked by virtual token placeholders, converts examples into shifted
//! decoder input/label pairs, and collates features into padded tensors with the
//! attention, history and loss masks an encoder-decoder transformer expects. The
//! model, trainer and data loading layers are external: the dataset only exposes
//! indexed, read-only access plus a stateless collation function.
//!
//! ```no_run
//! use rust_ptune::ptune::collate::collate;
//! use rust_ptune::ptune::dataset::TextToTextPTuneDataset;
//! use rust_ptune::ptune::features::TruncationLog;
//! use rust_ptune::ptune::processors::PromptTemplate;
//! use rust_ptune::ptune::tokenizer::T5PTuneTokenizer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let tokenizer = T5PTuneTokenizer::from_file("spiece.model", true)?;
//! let mut truncation_log = TruncationLog::new();
//! let dataset = TextToTextPTuneDataset::new(
//!     "MNLI/train.tsv",
//!     "mnli",
//!     "train",
//!     &tokenizer,
//!     PromptTemplate::new(3, 3),
//!     32099,
//!     512,
//!     128,
//!     &mut truncation_log,
//! )?;
//! let batch = collate(&dataset.features()[..8], dataset.pad_id());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod ptune;

pub use common::error::PTuneError;
pub use common::Config;
