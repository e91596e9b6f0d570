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

use crate::ptune::example::InputExample;
use crate::ptune::processors::{PromptTemplate, TaskProfile};
use crate::ptune::tokenizer::PTuneTokenizer;

/// # Text-to-text P-Tune feature
///
/// Token id triple for one example: encoder query, decoder input and decoder target
/// labels. `dec_input` and `labels` are the shifted-by-one halves of the same decoder
/// query and always have equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PTuneFeature {
    /// Encoder input ids, pseudo tokens included
    pub enc_query: Vec<i64>,
    /// Decoder input ids, starting with the decoder start token
    pub dec_input: Vec<i64>,
    /// Decoder target ids, ending with the end-of-sequence token
    pub labels: Vec<i64>,
    /// Language tag carried by language-tagged task profiles
    pub lang: Option<String>,
}

/// Location of a truncation in the feature conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationSite {
    /// Left truncation of the tokenized text while building the encoder query
    EncoderQuery,
    /// Right truncation of the finished encoder query to the encoder length budget
    EncoderHardCap,
    /// Right truncation of the tokenized label content to the decoder length budget
    DecoderContent,
}

/// A non-fatal truncation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationEvent {
    pub example_index: usize,
    pub removed_tokens: usize,
    pub site: TruncationSite,
}

/// # Truncation reporting port
///
/// Receives truncation notifications during feature conversion. Conversion never fails
/// on truncation; observers decide whether to log, count or ignore the events.
pub trait TruncationObserver {
    fn on_truncation(&mut self, event: TruncationEvent);
}

impl TruncationObserver for () {
    fn on_truncation(&mut self, _event: TruncationEvent) {}
}

/// Observer collecting all truncation events.
#[derive(Debug, Default)]
pub struct TruncationLog {
    pub events: Vec<TruncationEvent>,
}

impl TruncationLog {
    pub fn new() -> TruncationLog {
        TruncationLog { events: Vec::new() }
    }
}

impl TruncationObserver for TruncationLog {
    fn on_truncation(&mut self, event: TruncationEvent) {
        self.events.push(event);
    }
}

/// Converts examples into text-to-text features to be used with a model like T5.
/// Inputs are prefixed with a text prompt that indicates the task to perform, then
/// flanked with the pseudo tokens of the P-Tune template.
///
/// For task profiles with `encoder_hard_cap`, an encoder query still longer than
/// `max_seq_length` after the query builder's own left truncation is cut from the
/// right. The decoder query is `bos + label content + eos`, with the label content
/// right-truncated so the whole query fits `max_seq_length_decoder`; the markers are
/// never dropped, so an empty label tokenization yields a marker-only query.
pub fn convert_examples_to_features<T>(
    examples: &[InputExample],
    profile: &TaskProfile,
    template: &PromptTemplate,
    pseudo_token_id: i64,
    max_seq_length: usize,
    max_seq_length_decoder: usize,
    tokenizer: &T,
    observer: &mut dyn TruncationObserver,
) -> Vec<PTuneFeature>
where
    T: PTuneTokenizer + ?Sized,
{
    let mut features = Vec::with_capacity(examples.len());
    for (example_index, example) in examples.iter().enumerate() {
        let (mut enc_query, cut) = profile.build_ptune_query(
            &example.text_a,
            example.text_b.as_deref().unwrap_or_default(),
            pseudo_token_id,
            max_seq_length,
            template,
            tokenizer,
        );
        if cut > 0 {
            observer.on_truncation(TruncationEvent {
                example_index,
                removed_tokens: cut,
                site: TruncationSite::EncoderQuery,
            });
        }
        if profile.encoder_hard_cap && enc_query.len() > max_seq_length {
            let removed_tokens = enc_query.len() - max_seq_length;
            enc_query.truncate(max_seq_length);
            observer.on_truncation(TruncationEvent {
                example_index,
                removed_tokens,
                site: TruncationSite::EncoderHardCap,
            });
        }

        let dec_content_ids = tokenizer.text_to_ids(&profile.label_to_string(&example.label));
        let cut = (dec_content_ids.len() + 2).saturating_sub(max_seq_length_decoder);
        if cut > 0 {
            observer.on_truncation(TruncationEvent {
                example_index,
                removed_tokens: cut,
                site: TruncationSite::DecoderContent,
            });
        }
        let kept_content = dec_content_ids.len().saturating_sub(cut);
        let mut dec_query = Vec::with_capacity(kept_content + 2);
        dec_query.push(tokenizer.bos_id());
        dec_query.extend_from_slice(&dec_content_ids[..kept_content]);
        dec_query.push(tokenizer.eos_id());

        let dec_input = dec_query[..dec_query.len() - 1].to_vec();
        let labels = dec_query[1..].to_vec();

        let lang = if profile.tags_language {
            example.guid.splitn(2, '-').nth(1).map(|lang| lang.to_owned())
        } else {
            None
        };

        features.push(PTuneFeature {
            enc_query,
            dec_input,
            labels,
            lang,
        });
    }
    features
}
