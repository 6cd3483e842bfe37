//! ResNet-18 for plant disease classification.
//!
//! Architecture:
//! - Input: 3x224x224
//! - Conv1: 7x7, stride 2
//! - MaxPool: 3x3, stride 2
//! - 4 residual layers (2 basic blocks each; 64, 128, 256, 512 channels)
//! - Global average pooling
//! - FC layer sized to the class count
//!
//! The module tree mirrors the torchvision parameter layout (`conv1`, `bn1`,
//! `layer1..layer4`, `fc`) so a fine-tuned torchvision checkpoint maps onto
//! it with only mechanical key renames (see [`crate::model::weights`]).
//! Convolutions carry no bias; a batch norm follows each of them.

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// ResNet-18 with a configurable classification head.
///
/// Run on a non-autodiff backend for inference: batch norm then uses the
/// running statistics stored in the checkpoint and no gradient state is kept.
#[derive(Module, Debug)]
pub struct ResNet18<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    maxpool: MaxPool2d,

    layer1: LayerBlock<B>,
    layer2: LayerBlock<B>,
    layer3: LayerBlock<B>,
    layer4: LayerBlock<B>,

    avgpool: AdaptiveAvgPool2d,
    fc: Linear<B>,

    activation: Relu,
}

impl<B: Backend> ResNet18<B> {
    /// Create a new ResNet-18 with randomly initialized parameters
    pub fn new(num_classes: usize, device: &B::Device) -> Self {
        // Stem: 3 -> 64
        let conv1 = Conv2dConfig::new([3, 64], [7, 7])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(3, 3))
            .with_bias(false)
            .init(device);
        let bn1 = BatchNormConfig::new(64).init(device);
        let maxpool = MaxPool2dConfig::new([3, 3])
            .with_strides([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init();

        let layer1 = LayerBlock::new(64, 64, 1, device);
        let layer2 = LayerBlock::new(64, 128, 2, device);
        let layer3 = LayerBlock::new(128, 256, 2, device);
        let layer4 = LayerBlock::new(256, 512, 2, device);

        let avgpool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let fc = LinearConfig::new(512, num_classes).init(device);

        let activation = Relu::new();

        Self {
            conv1,
            bn1,
            maxpool,
            layer1,
            layer2,
            layer3,
            layer4,
            avgpool,
            fc,
            activation,
        }
    }

    /// Forward pass producing raw class scores
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = self.conv1.forward(input);
        x = self.bn1.forward(x);
        x = self.activation.forward(x);
        x = self.maxpool.forward(x);

        x = self.layer1.forward(x);
        x = self.layer2.forward(x);
        x = self.layer3.forward(x);
        x = self.layer4.forward(x);

        let x = self.avgpool.forward(x);

        // Flatten [batch, channels, 1, 1] -> [batch, channels]
        let [batch, channels, _, _] = x.dims();
        let x = x.reshape([batch, channels]);

        self.fc.forward(x)
    }
}

/// One residual layer: a sequence of basic blocks sharing a channel width
#[derive(Module, Debug)]
pub struct LayerBlock<B: Backend> {
    blocks: Vec<BasicBlock<B>>,
}

impl<B: Backend> LayerBlock<B> {
    /// Two basic blocks; the first carries the stride and channel change
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let blocks = vec![
            BasicBlock::new(in_channels, out_channels, stride, device),
            BasicBlock::new(out_channels, out_channels, 1, device),
        ];

        Self { blocks }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = input;
        for block in &self.blocks {
            x = block.forward(x);
        }
        x
    }
}

/// Basic residual block: two 3x3 convolutions plus a skip connection
#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    downsample: Option<Downsample<B>>,
    activation: Relu,
}

impl<B: Backend> BasicBlock<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let bn1 = BatchNormConfig::new(out_channels).init(device);
        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let bn2 = BatchNormConfig::new(out_channels).init(device);

        // The skip connection needs a projection whenever the block changes
        // resolution or channel width.
        let downsample = if stride != 1 || in_channels != out_channels {
            Some(Downsample::new(in_channels, out_channels, stride, device))
        } else {
            None
        };

        Self {
            conv1,
            bn1,
            conv2,
            bn2,
            downsample,
            activation: Relu::new(),
        }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match &self.downsample {
            Some(projection) => projection.forward(input.clone()),
            None => input.clone(),
        };

        let x = self.conv1.forward(input);
        let x = self.bn1.forward(x);
        let x = self.activation.forward(x);
        let x = self.conv2.forward(x);
        let x = self.bn2.forward(x);

        self.activation.forward(x.add(identity))
    }
}

/// 1x1 projection on the skip path of a shape-changing block
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [1, 1])
            .with_stride([stride, stride])
            .with_bias(false)
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);

        Self { conv, bn }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = crate::backend::DefaultBackend;

    #[test]
    fn test_resnet_creation() {
        let device = Default::default();
        let _model = ResNet18::<TestBackend>::new(16, &device);
    }

    #[test]
    fn test_forward_output_shape() {
        let device = Default::default();
        let model = ResNet18::<TestBackend>::new(16, &device);

        // Adaptive pooling makes the spatial size flexible; a small input
        // keeps the test fast.
        let input = Tensor::<TestBackend, 4>::zeros([1, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, 16]);
    }

    #[test]
    fn test_forward_batched() {
        let device = Default::default();
        let model = ResNet18::<TestBackend>::new(16, &device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 16]);
    }

    #[test]
    fn test_head_size_follows_class_count() {
        let device = Default::default();
        let model = ResNet18::<TestBackend>::new(7, &device);

        let input = Tensor::<TestBackend, 4>::zeros([1, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, 7]);
    }

    #[test]
    fn test_projection_only_on_shape_changing_blocks() {
        let device = Default::default();
        let model = ResNet18::<TestBackend>::new(16, &device);

        assert!(model.layer1.blocks[0].downsample.is_none());
        assert!(model.layer1.blocks[1].downsample.is_none());
        for layer in [&model.layer2, &model.layer3, &model.layer4] {
            assert!(layer.blocks[0].downsample.is_some());
            assert!(layer.blocks[1].downsample.is_none());
        }
    }
}
