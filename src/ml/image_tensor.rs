use anyhow::Result;
use burn::prelude::*;

use crate::domain::image::ImageSample;

/// Build a [channels, height, width] tensor from an image.
pub fn to_tensor<B: Backend>(sample: &ImageSample, device: &B::Device) -> Tensor<B, 3> {
    let data = TensorData::new(sample.pixels.clone(), sample.dims());
    Tensor::from_data(data, device)
}

/// Read a [channels, height, width] tensor back into an image.
pub fn from_tensor<B: Backend>(tensor: Tensor<B, 3>) -> Result<ImageSample> {
    let [channels, height, width] = tensor.dims();
    let pixels = tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("Cannot read tensor data: {e:?}"))?;
    ImageSample::new(channels, height, width, pixels)
}
