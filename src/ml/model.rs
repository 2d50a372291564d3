use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

/// Anything that maps a batch of images to a batch of images of the same shape.
///
/// images: [batch, channels, height, width] → [batch, channels, height, width]
pub trait ImageModel<B: Backend>: Module<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct AutoencoderConfig {
    #[config(default = 1)]
    pub channels: usize,
    #[config(default = 28)]
    pub height:   usize,
    #[config(default = 28)]
    pub width:    usize,
    #[config(default = 128)]
    pub hidden:   usize,
    #[config(default = 32)]
    pub latent:   usize,
    #[config(default = 0.2)]
    pub dropout:  f64,
}

impl AutoencoderConfig {
    pub fn pixels(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Autoencoder<B> {
        let pixels = self.pixels();
        Autoencoder {
            encoder_hidden: LinearConfig::new(pixels, self.hidden).init(device),
            encoder_latent: LinearConfig::new(self.hidden, self.latent).init(device),
            decoder_hidden: LinearConfig::new(self.latent, self.hidden).init(device),
            decoder_output: LinearConfig::new(self.hidden, pixels).init(device),
            dropout:        DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// Fully connected autoencoder: pixels → hidden → latent → hidden → pixels.
#[derive(Module, Debug)]
pub struct Autoencoder<B: Backend> {
    pub encoder_hidden: Linear<B>,
    pub encoder_latent: Linear<B>,
    pub decoder_hidden: Linear<B>,
    pub decoder_output: Linear<B>,
    pub dropout:        Dropout,
}

impl<B: Backend> ImageModel<B> for Autoencoder<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let [batch, channels, height, width] = images.dims();

        let x = images.reshape([batch, channels * height * width]);
        let x = self.dropout.forward(relu(self.encoder_hidden.forward(x)));
        let latent = relu(self.encoder_latent.forward(x));

        let x = self.dropout.forward(relu(self.decoder_hidden.forward(latent)));
        // Sigmoid keeps reconstructed intensities in [0, 1] like the inputs.
        let x = sigmoid(self.decoder_output.forward(x));

        x.reshape([batch, channels, height, width])
    }
}
