use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::tanh,
};

/// Single-layer Elman RNN, batch-first.
///
/// h_t = tanh(W_x · x_t + b + W_h · h_(t-1)),  h_0 = 0
#[derive(Config, Debug)]
pub struct ElmanRnnConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
}

impl ElmanRnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ElmanRnn<B> {
        ElmanRnn {
            input_proj:  LinearConfig::new(self.d_input, self.d_hidden).init(device),
            hidden_proj: LinearConfig::new(self.d_hidden, self.d_hidden)
                .with_bias(false)
                .init(device),
            d_hidden:    self.d_hidden,
        }
    }
}

#[derive(Module, Debug)]
pub struct ElmanRnn<B: Backend> {
    pub input_proj:  Linear<B>,
    pub hidden_proj: Linear<B>,
    pub d_hidden:    usize,
}

impl<B: Backend> ElmanRnn<B> {
    /// x: [batch, seq_len, d_input] → hidden states [batch, seq_len, d_hidden]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch_size, seq_len, _] = x.dims();

        // The input projection does not depend on h, so run it over all steps at once.
        let projected = self.input_proj.forward(x);

        let mut hidden  = Tensor::<B, 2>::zeros([batch_size, self.d_hidden], &projected.device());
        let mut outputs = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let x_t = projected
                .clone()
                .slice([0..batch_size, t..t + 1, 0..self.d_hidden])
                .reshape([batch_size, self.d_hidden]);
            hidden = tanh(x_t + self.hidden_proj.forward(hidden));
            outputs.push(hidden.clone());
        }

        Tensor::stack::<3>(outputs, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let rnn = ElmanRnnConfig::new(4, 6).init::<NdArray>(&device);
        let x   = Tensor::<NdArray, 3>::ones([2, 5, 4], &device);
        assert_eq!(rnn.forward(x).dims(), [2, 5, 6]);
    }

    #[test]
    fn test_states_are_bounded_by_tanh() {
        let device = Default::default();
        let rnn = ElmanRnnConfig::new(3, 3).init::<NdArray>(&device);
        let x   = Tensor::<NdArray, 3>::ones([1, 4, 3], &device) * 100.0;
        let max = rnn.forward(x).abs().max().into_scalar().elem::<f32>();
        assert!(max <= 1.0);
    }

    #[test]
    fn test_first_step_ignores_hidden_projection() {
        // With h_0 = 0, step 0 only sees the input projection.
        let device = Default::default();
        let rnn = ElmanRnnConfig::new(2, 3).init::<NdArray>(&device);
        let x   = Tensor::<NdArray, 3>::ones([1, 2, 2], &device);

        let expected = tanh(rnn.input_proj.forward(x.clone()))
            .slice([0..1, 0..1, 0..3]);
        let actual = rnn.forward(x).slice([0..1, 0..1, 0..3]);

        let diff = (expected - actual).abs().max().into_scalar().elem::<f32>();
        assert!(diff < 1e-6);
    }
}
