//! Feed-forward classifier over the clinical features
//!
//! Architecture: Input(10) → Hidden(64) → ReLU → Dropout
//!                         → Hidden(32) → ReLU → Dropout
//!                         → class_head(5)

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::activation::{relu, softmax};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::FeatureVector;
use crate::{ClassLabel, ClassifierError, ModelConfig, Result};

/// Configuration for the classifier network
#[derive(Debug, Clone)]
pub struct ClassifierNetConfig {
    /// Input dimension (clinical features)
    pub input_dim: usize,
    /// Hidden layer dimensions, one block per entry
    pub hidden_dims: Vec<usize>,
    /// Number of output classes
    pub num_classes: usize,
    /// Dropout rate (inert at inference time)
    pub dropout: f64,
}

impl Default for ClassifierNetConfig {
    fn default() -> Self {
        ClassifierNetConfig {
            input_dim: FeatureVector::DIM,
            hidden_dims: vec![64, 32],
            num_classes: ClassLabel::COUNT,
            dropout: 0.1,
        }
    }
}

impl ClassifierNetConfig {
    pub fn from_model_config(config: &ModelConfig) -> Self {
        ClassifierNetConfig {
            input_dim: FeatureVector::DIM,
            hidden_dims: config.hidden_dims.clone(),
            num_classes: config.num_classes,
            dropout: config.dropout,
        }
    }
}

/// A single hidden layer block: Linear → ReLU → Dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize, dropout: f64) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear.forward(x);
        let x = relu(x);
        self.dropout.forward(x)
    }
}

/// Multi-layer perceptron producing one logit per class
#[derive(Module, Debug)]
pub struct ClassifierNet<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    class_head: Linear<B>,
}

impl<B: Backend> ClassifierNet<B> {
    /// Create a new, untrained network
    pub fn new(device: &B::Device, config: ClassifierNetConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;
        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim, config.dropout));
            in_dim = out_dim;
        }

        ClassifierNet {
            hidden,
            class_head: LinearConfig::new(in_dim, config.num_classes).init(device),
        }
    }

    /// Output width of the class head
    pub fn num_classes(&self) -> usize {
        self.class_head.weight.val().dims()[1]
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Feature batch [batch, input_dim]
    ///
    /// # Returns
    /// Class logits [batch, num_classes]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(x, |acc, block| block.forward(acc));
        self.class_head.forward(x)
    }

    /// Forward pass returning class probabilities
    pub fn forward_probs(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(x), 1)
    }

    /// Save model to file
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| ClassifierError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file
    ///
    /// Hidden layers must match `config`. The class count is taken from the
    /// artifact, so a head wider than `config.num_classes` still loads.
    pub fn load(device: &B::Device, path: &str, config: ClassifierNetConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| ClassifierError::Load {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let num_classes = check_record(&record, &config).map_err(|message| {
            ClassifierError::Load {
                path: path.to_string(),
                message,
            }
        })?;
        if num_classes != config.num_classes {
            log::warn!(
                "Model at {} has {} classes, config expects {}",
                path,
                num_classes,
                config.num_classes
            );
        }

        let model = Self::new(
            device,
            ClassifierNetConfig {
                num_classes,
                ..config
            },
        );
        Ok(model.load_record(record))
    }
}

/// Compare stored layer shapes against `config`; returns the class count
fn check_record<B: Backend>(
    record: &ClassifierNetRecord<B>,
    config: &ClassifierNetConfig,
) -> std::result::Result<usize, String> {
    if record.hidden.len() != config.hidden_dims.len() {
        return Err(format!(
            "artifact has {} hidden layers, config expects {}",
            record.hidden.len(),
            config.hidden_dims.len()
        ));
    }

    let mut in_dim = config.input_dim;
    for (i, (block, &out_dim)) in record.hidden.iter().zip(&config.hidden_dims).enumerate() {
        let [rows, cols] = block.linear.weight.val().dims();
        if rows != in_dim || cols != out_dim {
            return Err(format!(
                "hidden layer {} is {}x{}, config expects {}x{}",
                i, rows, cols, in_dim, out_dim
            ));
        }
        in_dim = out_dim;
    }

    let [head_in, num_classes] = record.class_head.weight.val().dims();
    if head_in != in_dim {
        return Err(format!(
            "class head takes {} inputs, last hidden layer gives {}",
            head_in, in_dim
        ));
    }
    if num_classes == 0 {
        return Err("class head has no outputs".to_string());
    }
    Ok(num_classes)
}

#[cfg(test)]
impl<B: Backend> ClassifierNet<B> {
    /// Zero the class head weights so every input scores exactly `logits`
    pub(crate) fn with_fixed_logits(mut self, logits: &[f32]) -> Self {
        use burn::module::Param;

        let weight = self.class_head.weight.val();
        let device = weight.device();
        let [in_dim, _] = weight.dims();
        self.class_head.weight = Param::from_tensor(Tensor::zeros([in_dim, logits.len()], &device));
        self.class_head.bias = Some(Param::from_tensor(Tensor::from_floats(logits, &device)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn temp_model_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "disease-class-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("model").to_string_lossy().into_owned()
    }

    #[test]
    fn test_classifier_net_shapes() {
        let device = Default::default();
        let model = ClassifierNet::<TestBackend>::new(&device, ClassifierNetConfig::default());

        let x = Tensor::random(
            [4, FeatureVector::DIM],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let logits = model.forward(x);
        assert_eq!(logits.dims(), [4, ClassLabel::COUNT]);
        assert_eq!(model.num_classes(), ClassLabel::COUNT);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = Default::default();
        let model = ClassifierNet::<TestBackend>::new(&device, ClassifierNetConfig::default());

        let x = Tensor::random(
            [3, FeatureVector::DIM],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let probs = model.forward_probs(x).to_data();
        let vals = probs.as_slice::<f32>().unwrap();

        for row in vals.chunks(ClassLabel::COUNT) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "row sums to {}", sum);
            assert!(row.iter().all(|p| *p >= 0.0 && *p <= 1.0));
        }
    }

    #[test]
    fn test_no_hidden_layers() {
        let device = Default::default();
        let config = ClassifierNetConfig {
            hidden_dims: vec![],
            num_classes: 6,
            ..ClassifierNetConfig::default()
        };
        let model = ClassifierNet::<TestBackend>::new(&device, config);

        let x = Tensor::zeros([2, FeatureVector::DIM], &device);
        assert_eq!(model.forward(x).dims(), [2, 6]);
    }

    #[test]
    fn test_save_load_preserves_outputs() {
        let device = Default::default();
        let config = ClassifierNetConfig {
            hidden_dims: vec![16],
            ..ClassifierNetConfig::default()
        };
        let model = ClassifierNet::<TestBackend>::new(&device, config.clone());
        let path = temp_model_path("roundtrip");
        model.save(&path).unwrap();

        let loaded = ClassifierNet::<TestBackend>::load(&device, &path, config).unwrap();

        let x = Tensor::<TestBackend, 1>::from_floats([1.0f32; FeatureVector::DIM], &device)
            .reshape([1, FeatureVector::DIM]);
        let before = model.forward_probs(x.clone()).to_data();
        let after = loaded.forward_probs(x).to_data();
        let before = before.as_slice::<f32>().unwrap();
        let after = after.as_slice::<f32>().unwrap();

        for (a, b) in before.iter().zip(after) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let device = Default::default();
        let result = ClassifierNet::<TestBackend>::load(
            &device,
            "/nonexistent/disease-class/model",
            ClassifierNetConfig::default(),
        );
        assert!(matches!(result, Err(ClassifierError::Load { .. })));
    }

    #[test]
    fn test_load_takes_class_count_from_artifact() {
        let device = Default::default();
        let config = ClassifierNetConfig {
            hidden_dims: vec![8],
            num_classes: 6,
            ..ClassifierNetConfig::default()
        };
        let path = temp_model_path("six-class");
        ClassifierNet::<TestBackend>::new(&device, config.clone())
            .save(&path)
            .unwrap();

        let loaded = ClassifierNet::<TestBackend>::load(
            &device,
            &path,
            ClassifierNetConfig {
                num_classes: ClassLabel::COUNT,
                ..config
            },
        )
        .unwrap();
        assert_eq!(loaded.num_classes(), 6);

        let x = Tensor::zeros([3, FeatureVector::DIM], &device);
        assert_eq!(loaded.forward_probs(x).dims(), [3, 6]);
    }

    #[test]
    fn test_load_rejects_hidden_layer_count_mismatch() {
        let device = Default::default();
        let path = temp_model_path("layer-count");
        let saved = ClassifierNetConfig {
            hidden_dims: vec![8],
            ..ClassifierNetConfig::default()
        };
        ClassifierNet::<TestBackend>::new(&device, saved)
            .save(&path)
            .unwrap();

        let result = ClassifierNet::<TestBackend>::load(
            &device,
            &path,
            ClassifierNetConfig {
                hidden_dims: vec![64, 32],
                ..ClassifierNetConfig::default()
            },
        );
        match result {
            Err(ClassifierError::Load { message, .. }) => {
                assert!(message.contains("hidden layers"), "{}", message)
            }
            other => panic!("expected load error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_rejects_hidden_width_mismatch() {
        let device = Default::default();
        let path = temp_model_path("layer-width");
        let saved = ClassifierNetConfig {
            hidden_dims: vec![16],
            ..ClassifierNetConfig::default()
        };
        ClassifierNet::<TestBackend>::new(&device, saved)
            .save(&path)
            .unwrap();

        let result = ClassifierNet::<TestBackend>::load(
            &device,
            &path,
            ClassifierNetConfig {
                hidden_dims: vec![8],
                ..ClassifierNetConfig::default()
            },
        );
        assert!(matches!(result, Err(ClassifierError::Load { .. })));
    }

    #[test]
    fn test_fixed_logits_ignore_input() {
        let device = Default::default();
        let model = ClassifierNet::<TestBackend>::new(&device, ClassifierNetConfig::default())
            .with_fixed_logits(&[0.0, 0.0, 3.0]);
        assert_eq!(model.num_classes(), 3);

        let x = Tensor::random(
            [2, FeatureVector::DIM],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let logits = model.forward(x).to_data();
        assert_eq!(logits.as_slice::<f32>().unwrap(), &[0.0, 0.0, 3.0, 0.0, 0.0, 3.0]);
    }
}
