//! ONNX classifier loaded once at startup and shared read-only across workers.

use std::path::{Path, PathBuf};

use ndarray::Array4;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::preprocess::TensorLayout;

type Plan = TypedRunnableModel<TypedModel>;

/// Immutable handle to the optimized model plan.
///
/// Running a plan takes `&self`, so one handle behind an `Arc` serves
/// concurrent requests without locking.
pub struct ModelWrapper {
    plan: Plan,
    layout: TensorLayout,
    path: PathBuf,
}

impl ModelWrapper {
    /// Load and optimize the artifact at `path`.
    ///
    /// The input fact is pinned to a batch of one 224x224 RGB image in the
    /// given layout so tract can fully type the graph.
    pub fn load(path: &Path, layout: TensorLayout) -> Result<Self, ModelError> {
        if !path.is_file() {
            return Err(ModelError::ArtifactMissing(path.to_path_buf()));
        }
        let load_err = |e: TractError| ModelError::Load {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        };

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(0, f32::fact(layout.shape()).into())
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        let wrapper = Self {
            plan,
            layout,
            path: path.to_path_buf(),
        };
        info!(model = %wrapper.path().display(), ?layout, "loaded classifier");
        Ok(wrapper)
    }

    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one forward pass and return the single scalar of the final layer.
    pub fn classify(&self, input: Array4<f32>) -> Result<f32, ModelError> {
        let outputs = self
            .plan
            .run(tvec!(Tensor::from(input).into()))
            .map_err(|e| ModelError::Inference(format!("{e:#}")))?;

        let output = outputs.first().ok_or(ModelError::EmptyOutput)?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Inference(format!("{e:#}")))?;
        let score = view.iter().next().copied().ok_or(ModelError::EmptyOutput)?;

        debug!(score, "model output");
        Ok(score)
    }
}
