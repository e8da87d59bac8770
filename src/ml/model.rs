use std::fmt;

use burn::{
    nn::{
        gru::{Gru, GruConfig},
        lstm::{Lstm, LstmConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::ml::rnn::{ElmanRnn, ElmanRnnConfig};

/// Which recurrent cell sits between the embedding and the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecurrentKind {
    Lstm,
    Gru,
    Rnn,
}

impl fmt::Display for RecurrentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecurrentKind::Lstm => "LSTM",
            RecurrentKind::Gru  => "GRU",
            RecurrentKind::Rnn  => "RNN",
        };
        f.write_str(name)
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LanguageModelConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_dim:    usize,
    pub kind:          RecurrentKind,
}

impl LanguageModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LanguageModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let output    = LinearConfig::new(self.hidden_dim, self.vocab_size).init(device);

        let (mut lstm, mut gru, mut rnn) = (None, None, None);
        match self.kind {
            RecurrentKind::Lstm => {
                lstm = Some(LstmConfig::new(self.embedding_dim, self.hidden_dim, true).init(device));
            }
            RecurrentKind::Gru => {
                gru = Some(GruConfig::new(self.embedding_dim, self.hidden_dim, true).init(device));
            }
            RecurrentKind::Rnn => {
                rnn = Some(ElmanRnnConfig::new(self.embedding_dim, self.hidden_dim).init(device));
            }
        }

        LanguageModel {
            embedding, lstm, gru, rnn, output,
            vocab_size: self.vocab_size,
            hidden_dim: self.hidden_dim,
        }
    }
}

/// Embedding → one recurrent layer → projection onto the vocabulary.
/// Exactly one of `lstm`, `gru`, `rnn` is populated.
#[derive(Module, Debug)]
pub struct LanguageModel<B: Backend> {
    pub embedding:  Embedding<B>,
    pub lstm:       Option<Lstm<B>>,
    pub gru:        Option<Gru<B>>,
    pub rnn:        Option<ElmanRnn<B>>,
    pub output:     Linear<B>,
    pub vocab_size: usize,
    pub hidden_dim: usize,
}

impl<B: Backend> LanguageModel<B> {
    /// inputs: [batch, seq_len] → logits: [batch * seq_len, vocab_size]
    ///
    /// Rows are ordered sample-major, matching `targets.reshape([batch * seq_len])`.
    pub fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, seq_len] = inputs.dims();

        let embeds = self.embedding.forward(inputs); // [batch, seq_len, embedding_dim]
        let hidden = self.recurrent(embeds);         // [batch, seq_len, hidden_dim]

        self.output
            .forward(hidden.reshape([batch_size * seq_len, self.hidden_dim]))
    }

    fn recurrent(&self, embeds: Tensor<B, 3>) -> Tensor<B, 3> {
        match (&self.lstm, &self.gru, &self.rnn) {
            (Some(lstm), _, _) => lstm.forward(embeds, None).0,
            (_, Some(gru), _)  => gru.forward(embeds, None),
            (_, _, Some(rnn))  => rnn.forward(embeds),
            _ => unreachable!("LanguageModelConfig::init always builds a recurrent layer"),
        }
    }

    /// Every named parameter with its shape, in forward order.
    pub fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut rows = vec![("embedding.weight".to_string(), self.embedding.weight.val().dims().to_vec())];

        if let Some(lstm) = &self.lstm {
            for (gate, ctl) in [
                ("input_gate",  &lstm.input_gate),
                ("forget_gate", &lstm.forget_gate),
                ("output_gate", &lstm.output_gate),
                ("cell_gate",   &lstm.cell_gate),
            ] {
                linear_shapes(&mut rows, &format!("lstm.{gate}.input_transform"),  &ctl.input_transform);
                linear_shapes(&mut rows, &format!("lstm.{gate}.hidden_transform"), &ctl.hidden_transform);
            }
        }
        if let Some(gru) = &self.gru {
            for (gate, ctl) in [
                ("update_gate", &gru.update_gate),
                ("reset_gate",  &gru.reset_gate),
                ("new_gate",    &gru.new_gate),
            ] {
                linear_shapes(&mut rows, &format!("gru.{gate}.input_transform"),  &ctl.input_transform);
                linear_shapes(&mut rows, &format!("gru.{gate}.hidden_transform"), &ctl.hidden_transform);
            }
        }
        if let Some(rnn) = &self.rnn {
            linear_shapes(&mut rows, "rnn.input_proj",  &rnn.input_proj);
            linear_shapes(&mut rows, "rnn.hidden_proj", &rnn.hidden_proj);
        }

        linear_shapes(&mut rows, "output", &self.output);
        rows
    }

    /// Parameter count per top-level component, in forward order.
    pub fn parameter_summary(&self) -> Vec<(&'static str, usize)> {
        let mut rows = vec![("embedding", self.embedding.num_params())];
        if let Some(lstm) = &self.lstm { rows.push(("lstm", lstm.num_params())); }
        if let Some(gru)  = &self.gru  { rows.push(("gru",  gru.num_params()));  }
        if let Some(rnn)  = &self.rnn  { rows.push(("rnn",  rnn.num_params()));  }
        rows.push(("output", self.output.num_params()));
        rows
    }
}

fn linear_shapes<B: Backend>(rows: &mut Vec<(String, Vec<usize>)>, prefix: &str, linear: &Linear<B>) {
    rows.push((format!("{prefix}.weight"), linear.weight.val().dims().to_vec()));
    if let Some(bias) = &linear.bias {
        rows.push((format!("{prefix}.bias"), bias.val().dims().to_vec()));
    }
}
