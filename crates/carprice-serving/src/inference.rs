//! Candle-backed regression models for price inference.
//!
//! Training happens elsewhere; the exported artifact is a small JSON spec
//! (`model_spec.json`) describing the network plus a dense parameter file
//! (`dense/params.json`) mapping parameter names to flat `f64` arrays.
//!
//! Supported families:
//! - `linear`: ordinary least squares, `linear.weight[input_dim]` and `linear.bias[1]`.
//! - `mlp`: feed-forward regressor, `mlp.layers.{i}.weight[out, in]` and
//!   `mlp.layers.{i}.bias[out]`, with a single output unit.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::{ServingError, ServingResult};

/// Dense parameters keyed by name.
pub type DenseParams = HashMap<String, Vec<f64>>;

/// Model specification stored next to the dense params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Linear regression.
    Linear(LinearSpec),
    /// Simple feed-forward network.
    Mlp(MlpSpec),
}

impl ModelSpec {
    pub fn input_dim(&self) -> usize {
        match self {
            ModelSpec::Linear(s) => s.input_dim,
            ModelSpec::Mlp(s) => s.input_dim,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ModelSpec::Linear(_) => "linear",
            ModelSpec::Mlp(_) => "mlp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSpec {
    pub input_dim: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpSpec {
    pub input_dim: usize,
    pub hidden_dims: Vec<usize>,
    #[serde(default = "default_output_dim")]
    pub output_dim: usize,
    #[serde(default)]
    pub activation: Activation,
}

fn default_output_dim() -> usize {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Sigmoid,
    None,
}

impl Activation {
    fn apply(&self, t: Tensor) -> candle_core::Result<Tensor> {
        match self {
            Activation::Relu => t.relu(),
            Activation::Tanh => t.tanh(),
            Activation::Sigmoid => candle_nn::ops::sigmoid(&t),
            Activation::None => Ok(t),
        }
    }
}

/// Inference model interface (one row per call).
pub trait InferenceModel: Send + Sync {
    /// Number of features the model expects.
    fn input_dim(&self) -> usize;

    /// Predict the target for a single feature row.
    fn predict(&self, row: &[f64]) -> ServingResult<f64>;
}

/// Build a candle model from a spec and its dense params.
pub fn build_model(
    spec: &ModelSpec,
    params: &DenseParams,
    device: &Device,
) -> ServingResult<Box<dyn InferenceModel>> {
    match spec {
        ModelSpec::Linear(s) => Ok(Box::new(LinearModel::from_params(s, params, device)?)),
        ModelSpec::Mlp(s) => Ok(Box::new(MlpModel::from_params(s, params, device)?)),
    }
}

/// Read a model spec and its dense params from disk and build the model.
pub fn load_model(
    spec_path: impl AsRef<Path>,
    params_path: impl AsRef<Path>,
    device: &Device,
) -> ServingResult<Box<dyn InferenceModel>> {
    let spec: ModelSpec = read_json(spec_path.as_ref())?;
    let params: DenseParams = read_json(params_path.as_ref())?;
    build_model(&spec, &params, device)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ServingResult<T> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ServingError::model_load(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| ServingError::model_load(format!("invalid {}: {e}", path.display())))
}

fn tensor_from_vec(
    params: &DenseParams,
    name: &str,
    shape: &[usize],
    device: &Device,
) -> ServingResult<Tensor> {
    let data = params
        .get(name)
        .ok_or_else(|| ServingError::ModelLoadError(format!("Missing dense param {:?}", name)))?;
    let numel: usize = shape.iter().product();
    if data.len() != numel {
        return Err(ServingError::ModelLoadError(format!(
            "Param {:?} has len {}, expected {} for shape {:?}",
            name,
            data.len(),
            numel,
            shape
        )));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(ServingError::ModelLoadError(format!(
            "Param {:?} contains non-finite values",
            name
        )));
    }
    Tensor::from_slice(data.as_slice(), shape, device)
        .map_err(|e| ServingError::ModelLoadError(format!("Candle tensor init failed: {e}")))
}

fn linear(x: &Tensor, w: &Tensor, b: Option<&Tensor>) -> ServingResult<Tensor> {
    // x: [1, in], w: [out, in]
    let wt = w
        .t()
        .map_err(|e| ServingError::PredictionError(format!("transpose failed: {e}")))?;
    let y = x
        .matmul(&wt)
        .map_err(|e| ServingError::PredictionError(format!("matmul failed: {e}")))?;
    let y = match b {
        Some(b) => y
            .broadcast_add(b)
            .map_err(|e| ServingError::PredictionError(format!("bias add failed: {e}")))?,
        None => y,
    };
    Ok(y)
}

fn input_tensor(row: &[f64], input_dim: usize, device: &Device) -> ServingResult<Tensor> {
    if row.len() != input_dim {
        return Err(ServingError::PredictionError(format!(
            "row has {} features, model expects {}",
            row.len(),
            input_dim
        )));
    }
    Tensor::from_slice(row, (1, input_dim), device)
        .map_err(|e| ServingError::PredictionError(format!("input tensor init failed: {e}")))
}

fn scalar_output(y: &Tensor) -> ServingResult<f64> {
    let values = y.flatten_all()?.to_vec1::<f64>()?;
    match values.as_slice() {
        [v] => Ok(*v),
        other => Err(ServingError::PredictionError(format!(
            "expected a single output, got {}",
            other.len()
        ))),
    }
}

#[derive(Debug)]
struct LinearModel {
    spec: LinearSpec,
    weight: Tensor,
    bias: Tensor,
    device: Device,
}

impl LinearModel {
    fn from_params(spec: &LinearSpec, params: &DenseParams, device: &Device) -> ServingResult<Self> {
        if spec.input_dim == 0 {
            return Err(ServingError::model_load("linear model has input_dim 0"));
        }
        let weight = tensor_from_vec(params, "linear.weight", &[1, spec.input_dim], device)?;
        let bias = tensor_from_vec(params, "linear.bias", &[1], device)?;
        Ok(Self {
            spec: spec.clone(),
            weight,
            bias,
            device: device.clone(),
        })
    }
}

impl InferenceModel for LinearModel {
    fn input_dim(&self) -> usize {
        self.spec.input_dim
    }

    fn predict(&self, row: &[f64]) -> ServingResult<f64> {
        let x = input_tensor(row, self.spec.input_dim, &self.device)?;
        let y = linear(&x, &self.weight, Some(&self.bias))?;
        scalar_output(&y)
    }
}

#[derive(Debug)]
struct MlpModel {
    spec: MlpSpec,
    // layers: (w, b)
    weights: Vec<(Tensor, Tensor)>,
    device: Device,
}

impl MlpModel {
    fn from_params(spec: &MlpSpec, params: &DenseParams, device: &Device) -> ServingResult<Self> {
        if spec.output_dim != 1 {
            return Err(ServingError::model_load(format!(
                "price model must have one output, spec has {}",
                spec.output_dim
            )));
        }

        let mut weights: Vec<(Tensor, Tensor)> = Vec::new();
        let mut in_dim = spec.input_dim;

        let mut all_layers: Vec<usize> = spec.hidden_dims.clone();
        all_layers.push(spec.output_dim);

        for (i, &out_dim) in all_layers.iter().enumerate() {
            let w_name = format!("mlp.layers.{i}.weight");
            let b_name = format!("mlp.layers.{i}.bias");
            let w = tensor_from_vec(params, &w_name, &[out_dim, in_dim], device)?;
            let b = tensor_from_vec(params, &b_name, &[out_dim], device)?;
            weights.push((w, b));
            in_dim = out_dim;
        }

        Ok(Self {
            spec: spec.clone(),
            weights,
            device: device.clone(),
        })
    }
}

impl InferenceModel for MlpModel {
    fn input_dim(&self) -> usize {
        self.spec.input_dim
    }

    fn predict(&self, row: &[f64]) -> ServingResult<f64> {
        let mut x = input_tensor(row, self.spec.input_dim, &self.device)?;
        for (i, (w, b)) in self.weights.iter().enumerate() {
            x = linear(&x, w, Some(b))?;
            let is_last = i + 1 == self.weights.len();
            if !is_last {
                x = self.spec.activation.apply(x).map_err(|e| {
                    ServingError::PredictionError(format!("activation failed: {e}"))
                })?;
            }
        }
        scalar_output(&x)
    }
}
