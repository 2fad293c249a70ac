//! The "classify an upload" seam. The page only talks to [`Classifier`];
//! which backend sits behind it is decided once at startup.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use crate::decision;
use crate::error::ClassifyError;
use crate::model::ModelWrapper;
use crate::models::ClassificationResult;
use crate::preprocess;
use crate::remote::InferenceClient;

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify raw uploaded image bytes.
    async fn classify(&self, image: Vec<u8>) -> Result<ClassificationResult, ClassifyError>;
}

/// Runs the in-process model on the blocking thread pool.
pub struct LocalClassifier {
    model: Arc<ModelWrapper>,
}

impl LocalClassifier {
    pub fn new(model: Arc<ModelWrapper>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Classifier for LocalClassifier {
    async fn classify(&self, image: Vec<u8>) -> Result<ClassificationResult, ClassifyError> {
        let model = Arc::clone(&self.model);
        let score = web::block(move || -> Result<f32, ClassifyError> {
            let tensor = preprocess::to_tensor(&image, model.layout())?;
            Ok(model.classify(tensor)?)
        })
        .await
        .map_err(|e| ClassifyError::Blocking(e.to_string()))??;

        Ok(decision::classify_probability(score as f64)?)
    }
}

/// Delegates to the remote inference service.
pub struct RemoteClassifier {
    client: InferenceClient,
}

impl RemoteClassifier {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, image: Vec<u8>) -> Result<ClassificationResult, ClassifyError> {
        let prediction = self.client.predict(image).await?;
        Ok(decision::from_remote(&prediction.result, prediction.confidence)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Label, RiskTier};
    use crate::preprocess::TensorLayout;
    use image::{ImageOutputFormat, Rgb, RgbImage};
    use prost::Message;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use tract_onnx::pb::{
        attribute_proto, tensor_proto, tensor_shape_proto, type_proto, AttributeProto, GraphProto,
        ModelProto, NodeProto, OperatorSetIdProto, TensorShapeProto, TypeProto, ValueInfoProto,
    };

    fn float_value(name: &str, dims: &[i64]) -> ValueInfoProto {
        let dim = dims
            .iter()
            .map(|&d| tensor_shape_proto::Dimension {
                value: Some(tensor_shape_proto::dimension::Value::DimValue(d)),
                ..Default::default()
            })
            .collect();
        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: tensor_proto::DataType::Float as i32,
                    shape: Some(TensorShapeProto { dim }),
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// A graph whose "score" is the mean of every input value.
    fn write_mean_model(dir: &Path) -> PathBuf {
        let node = NodeProto {
            input: vec!["input".into()],
            output: vec!["score".into()],
            name: "mean".into(),
            op_type: "ReduceMean".into(),
            attribute: vec![AttributeProto {
                name: "keepdims".into(),
                r#type: attribute_proto::AttributeType::Int as i32,
                i: 0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let model = ModelProto {
            ir_version: 7,
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(GraphProto {
                name: "mean".into(),
                node: vec![node],
                input: vec![float_value("input", &[1, 224, 224, 3])],
                output: vec![float_value("score", &[])],
                ..Default::default()
            }),
            ..Default::default()
        };

        let path = dir.join("pneumonia_model.onnx");
        std::fs::write(&path, model.encode_to_vec()).unwrap();
        path
    }

    fn uniform_png(value: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(300, 200, Rgb([value; 3]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    fn local_classifier(dir: &Path) -> LocalClassifier {
        let model = ModelWrapper::load(&write_mean_model(dir), TensorLayout::Nhwc).unwrap();
        LocalClassifier::new(Arc::new(model))
    }

    #[test]
    fn model_returns_final_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let model = ModelWrapper::load(&write_mean_model(dir.path()), TensorLayout::Nhwc).unwrap();
        let tensor = preprocess::to_tensor(&uniform_png(51), TensorLayout::Nhwc).unwrap();
        let score = model.classify(tensor).unwrap();
        assert!((score - 0.2).abs() < 1e-3);
    }

    #[actix_web::test]
    async fn local_pneumonia_medium_risk() {
        let dir = tempfile::tempdir().unwrap();
        let result = local_classifier(dir.path())
            .classify(uniform_png(204))
            .await
            .unwrap();
        assert_eq!(result.label(), Label::Pneumonia);
        assert_eq!(result.confidence_display(), "80.00");
        assert_eq!(result.risk(), RiskTier::Medium);
    }

    #[actix_web::test]
    async fn local_normal_scan() {
        let dir = tempfile::tempdir().unwrap();
        let result = local_classifier(dir.path())
            .classify(uniform_png(26))
            .await
            .unwrap();
        assert_eq!(result.label(), Label::Normal);
        assert!((result.confidence() - 10.196).abs() < 0.05);
        assert_eq!(result.risk(), RiskTier::None);
    }

    #[actix_web::test]
    async fn local_garbage_is_a_preprocess_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = local_classifier(dir.path())
            .classify(b"not an x-ray".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Preprocess(_)));
    }
}
