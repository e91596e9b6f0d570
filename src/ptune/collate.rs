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

use crate::ptune::features::PTuneFeature;
use tch::{Device, Kind, Tensor};

/// # Collated P-Tune batch
///
/// Rectangular tensors built by right-padding a list of features to the batch maxima
/// along the encoder, decoder and label axes independently. All masks are per batch
/// row (batch size x query position x key position). Language tags, when present, are
/// passed through unpadded as a parallel list.
#[derive(Debug)]
pub struct PTuneBatch {
    /// Encoder input ids, (batch size, max encoder length)
    pub text_enc: Tensor,
    /// Decoder input ids, (batch size, max decoder length)
    pub text_dec: Tensor,
    /// Decoder target ids, (batch size, max label length)
    pub labels: Tensor,
    /// 1 for real label positions, 0 for padding, (batch size, max label length)
    pub loss_mask: Tensor,
    /// Encoder self-attention mask
    pub enc_mask: Tensor,
    /// Decoder self-attention mask, causal
    pub dec_mask: Tensor,
    /// Decoder to encoder cross-attention mask
    pub enc_dec_mask: Tensor,
    /// Language tags, present when every feature in the batch carries one
    pub lang: Option<Vec<String>>,
}

/// Pairwise attention mask: position `(p, q)` is 1 iff source position `p` and target
/// position `q` are both non-padding. Output shape is
/// (batch size, source length, target length).
pub fn make_attention_mask_3d(source: &Tensor, target: &Tensor, pad_id: i64) -> Tensor {
    let source_valid = source.ne(pad_id).to_kind(Kind::Int64).unsqueeze(-1);
    let target_valid = target.ne(pad_id).to_kind(Kind::Int64).unsqueeze(1);
    source_valid * target_valid
}

/// Lower triangular causal mask restricting each position to already emitted
/// positions, broadcast over the batch. Output shape is
/// (batch size, sequence length, sequence length).
pub fn make_history_mask_3d(input: &Tensor) -> Tensor {
    let input_size = input.size();
    let (batch_size, length) = (input_size[0], input_size[1]);
    Tensor::ones(&[length, length], (Kind::Int64, input.device()))
        .tril(0)
        .unsqueeze(0)
        .expand(&[batch_size, length, length], true)
}

fn pad_and_stack<'a>(
    rows: impl Iterator<Item = &'a Vec<i64>>,
    max_length: usize,
    pad_id: i64,
) -> Tensor {
    let padded = rows
        .map(|ids| {
            let mut row = ids.clone();
            row.resize(max_length, pad_id);
            Tensor::of_slice(&row)
        })
        .collect::<Vec<_>>();
    Tensor::stack(&padded, 0)
}

/// Collates features into a rectangular `PTuneBatch`, right-padding with `pad_id`.
///
/// The three length maxima (encoder, decoder, labels) are computed independently over
/// the batch. Features holding zero-length sequences produce all-zero mask rows rather
/// than an error. Collation is stateless: calls over disjoint feature slices are
/// independent and safe to run in parallel.
pub fn collate(features: &[PTuneFeature], pad_id: i64) -> PTuneBatch {
    if features.is_empty() {
        return PTuneBatch {
            text_enc: Tensor::zeros(&[0, 0], (Kind::Int64, Device::Cpu)),
            text_dec: Tensor::zeros(&[0, 0], (Kind::Int64, Device::Cpu)),
            labels: Tensor::zeros(&[0, 0], (Kind::Int64, Device::Cpu)),
            loss_mask: Tensor::zeros(&[0, 0], (Kind::Int64, Device::Cpu)),
            enc_mask: Tensor::zeros(&[0, 0, 0], (Kind::Int64, Device::Cpu)),
            dec_mask: Tensor::zeros(&[0, 0, 0], (Kind::Int64, Device::Cpu)),
            enc_dec_mask: Tensor::zeros(&[0, 0, 0], (Kind::Int64, Device::Cpu)),
            lang: None,
        };
    }

    let max_enc_length = features.iter().map(|f| f.enc_query.len()).max().unwrap_or(0);
    let max_dec_length = features.iter().map(|f| f.dec_input.len()).max().unwrap_or(0);
    let max_label_length = features.iter().map(|f| f.labels.len()).max().unwrap_or(0);

    let loss_mask_rows = features
        .iter()
        .map(|feature| {
            let mut row = vec![1i64; feature.labels.len()];
            row.resize(max_label_length, 0);
            Tensor::of_slice(&row)
        })
        .collect::<Vec<_>>();
    let loss_mask = Tensor::stack(&loss_mask_rows, 0);

    let text_enc = pad_and_stack(
        features.iter().map(|f| &f.enc_query),
        max_enc_length,
        pad_id,
    );
    let text_dec = pad_and_stack(
        features.iter().map(|f| &f.dec_input),
        max_dec_length,
        pad_id,
    );
    let labels = pad_and_stack(features.iter().map(|f| &f.labels), max_label_length, pad_id);

    let enc_mask = make_attention_mask_3d(&text_enc, &text_enc, pad_id);
    let dec_mask = make_attention_mask_3d(&text_dec, &text_dec, pad_id) * make_history_mask_3d(&text_dec);
    let enc_dec_mask = make_attention_mask_3d(&text_dec, &text_enc, pad_id);

    let lang = features
        .iter()
        .map(|feature| feature.lang.clone())
        .collect::<Option<Vec<String>>>();

    PTuneBatch {
        text_enc,
        text_dec,
        labels,
        loss_mask,
        enc_mask,
        dec_mask,
        enc_dec_mask,
        lang,
    }
}
