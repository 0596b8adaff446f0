//! Model inference for predictions

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::{FeatureScaling, FeatureVector};
use crate::model::{ClassifierNet, ClassifierNetConfig};
use crate::{ClassLabel, ClassifierError, ModelConfig, Prediction, Result};

/// The only capability the classifier needs from a model: a batch of feature
/// vectors in, one per-class score row out for each of them.
///
/// Implementations must not mutate shared state during `predict`.
pub trait ScoreModel {
    /// Width of each score row
    fn num_classes(&self) -> usize;

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>>;
}

/// A trained network loaded from disk
pub struct BurnScoreModel<B: Backend> {
    net: ClassifierNet<B>,
    device: B::Device,
    scaling: Option<FeatureScaling>,
}

impl<B: Backend> BurnScoreModel<B>
where
    B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
    B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new(net: ClassifierNet<B>, device: B::Device, scaling: Option<FeatureScaling>) -> Self {
        BurnScoreModel {
            net,
            device,
            scaling,
        }
    }

    /// Load the model artifact described by `config`
    pub fn load(config: &ModelConfig, device: B::Device) -> Result<Self> {
        let artifact = config.artifact_file();

        if let Some(scaling) = &config.scaling {
            scaling.validate().map_err(|e| ClassifierError::Load {
                path: artifact.clone(),
                message: e.to_string(),
            })?;
        }

        if !std::path::Path::new(&artifact).exists() {
            return Err(ClassifierError::Load {
                path: artifact,
                message: "model artifact not found (run `disease-class model init` or copy a trained model)"
                    .to_string(),
            });
        }

        let net_config = ClassifierNetConfig::from_model_config(config);
        let net = ClassifierNet::load(&device, &config.path, net_config)?;
        log::info!(
            "Loaded model from {} ({} classes{})",
            artifact,
            net.num_classes(),
            if config.scaling.is_some() { ", scaled inputs" } else { "" }
        );

        Ok(Self::new(net, device, config.scaling.clone()))
    }
}

impl<B: Backend> ScoreModel for BurnScoreModel<B> {
    fn num_classes(&self) -> usize {
        self.net.num_classes()
    }

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let data: Vec<f32> = batch.iter().flat_map(|v| v.to_f32()).collect();
        let x = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device)
            .reshape([batch.len(), FeatureVector::DIM]);
        let x = match &self.scaling {
            Some(scaling) => scaling.normalize(x),
            None => x,
        };

        let probs = self.net.forward_probs(x);
        let [_, width] = probs.dims();
        if width == 0 {
            return Err(ClassifierError::Inference("model has no output classes".to_string()));
        }

        let probs = probs.into_data().convert::<f32>();
        let values = probs
            .as_slice::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("unreadable model output: {:?}", e)))?;

        Ok(values.chunks(width).map(|row| row.to_vec()).collect())
    }
}

/// Index of the first maximum score
///
/// A NaN score counts as the maximum, so the first NaN wins. `None` only for
/// an empty row.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    if let Some(i) = scores.iter().position(|s| s.is_nan()) {
        return Some(i);
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Classifier adapter: one submission in, one class index out
pub struct Classifier<M: ScoreModel> {
    model: M,
}

impl<M: ScoreModel> Classifier<M> {
    pub fn new(model: M) -> Self {
        Classifier { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the model on a single-row batch and keep the full score row
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let mut rows = self.model.predict(std::slice::from_ref(features))?;
        if rows.len() != 1 {
            return Err(ClassifierError::Inference(format!(
                "model returned {} score rows for a single input",
                rows.len()
            )));
        }
        let scores = rows.remove(0);

        let class_index = argmax(&scores).ok_or_else(|| {
            ClassifierError::Inference("model returned an empty score row".to_string())
        })?;

        if scores.len() != ClassLabel::COUNT {
            log::warn!(
                "Model produced {} class scores, description table covers {}",
                scores.len(),
                ClassLabel::COUNT
            );
        }
        log::debug!("Classified [{}] as class {}", features, class_index);

        Ok(Prediction {
            class_index,
            probability: scores[class_index],
            scores,
        })
    }

    /// Predicted class index for one submission
    pub fn classify(&self, features: &FeatureVector) -> Result<usize> {
        self.predict(features).map(|p| p.class_index)
    }

    /// Validate raw values at the request boundary, then classify
    pub fn classify_values(&self, values: &[f64]) -> Result<usize> {
        let features = FeatureVector::from_values(values)?;
        self.classify(&features)
    }
}
