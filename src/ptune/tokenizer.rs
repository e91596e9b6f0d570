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
use rust_tokenizers::tokenizer::{T5Tokenizer, Tokenizer};
use rust_tokenizers::vocab::{T5Vocab, Vocab};

/// # Tokenizer interface for P-Tuning datasets
///
/// The dataset pipeline only needs a text to ids mapping and the identity of the
/// padding, beginning-of-sequence and end-of-sequence tokens. Any tokenizer exposing
/// these can back a `TextToTextPTuneDataset`.
pub trait PTuneTokenizer {
    /// Tokenizes a text and converts it to a sequence of vocabulary ids.
    fn text_to_ids(&self, text: &str) -> Vec<i64>;

    /// Id of the padding token.
    fn pad_id(&self) -> i64;

    /// Id used as the decoder start token.
    fn bos_id(&self) -> i64;

    /// Id of the end-of-sequence token.
    fn eos_id(&self) -> i64;
}

/// # T5 tokenizer adapter
///
/// Wraps a SentencePiece-based `T5Tokenizer`. T5 vocabularies do not carry a dedicated
/// beginning-of-sequence token: the padding token doubles as the decoder start token.
pub struct T5PTuneTokenizer {
    tokenizer: T5Tokenizer,
    pad_id: i64,
    eos_id: i64,
}

impl T5PTuneTokenizer {
    /// Creates a `T5PTuneTokenizer` from a SentencePiece model file.
    ///
    /// # Arguments
    ///
    /// * `vocab_path` - Path to the SentencePiece model file.
    /// * `lower_case` - Flag indicating if the text should be lower-cased as part of the tokenization.
    pub fn from_file(vocab_path: &str, lower_case: bool) -> Result<T5PTuneTokenizer, PTuneError> {
        let tokenizer = T5Tokenizer::from_file(vocab_path, lower_case)?;
        let vocab = Tokenizer::vocab(&tokenizer);
        let pad_id = vocab.token_to_id(T5Vocab::pad_value());
        let eos_id = vocab.token_to_id(T5Vocab::eos_value());
        Ok(T5PTuneTokenizer {
            tokenizer,
            pad_id,
            eos_id,
        })
    }
}

impl PTuneTokenizer for T5PTuneTokenizer {
    fn text_to_ids(&self, text: &str) -> Vec<i64> {
        let tokens = self.tokenizer.tokenize(text);
        self.tokenizer.convert_tokens_to_ids(&tokens)
    }

    fn pad_id(&self) -> i64 {
        self.pad_id
    }

    fn bos_id(&self) -> i64 {
        self.pad_id
    }

    fn eos_id(&self) -> i64 {
        self.eos_id
    }
}
