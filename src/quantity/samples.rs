use nalgebra::{
    DMatrix,
    DVector
};

use crate::quantity::quantityerror::{
    Axis,
    ShapeError
};

/// Dense n-dimensional array of samples, kept in row-major order.
///
/// Every input of `Quantity::new` passes through this type so that the rank
/// check is the same regardless of where the numbers come from.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArray {
    shape: Vec<usize>,
    data: Vec<f64>
}

impl SampleArray {
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Reads nested JSON arrays of numbers. The nesting depth becomes the rank.
    pub fn from_json(json_value: &serde_json::Value) -> Result<SampleArray, ShapeError> {
        match json_value {
            serde_json::Value::Number(number) => {
                let value = number
                    .as_f64()
                    .ok_or_else(|| ShapeError::NonNumeric(number.to_string()))?;
                Ok(SampleArray { shape: Vec::new(), data: vec![value] })
            },
            serde_json::Value::Array(elems) => {
                let children = elems
                    .iter()
                    .map(SampleArray::from_json)
                    .collect::<Result<Vec<SampleArray>, ShapeError>>()?;
                let inner_shape = match children.first() {
                    Some(first) => first.shape.clone(),
                    None => Vec::new()
                };
                if children.iter().any(|child| child.shape != inner_shape) {
                    return Err(ShapeError::Ragged);
                }
                let mut shape = Vec::with_capacity(inner_shape.len() + 1);
                shape.push(children.len());
                shape.extend(inner_shape);
                let data = children.into_iter().flat_map(|child| child.data).collect();
                Ok(SampleArray { shape, data })
            },
            other => Err(ShapeError::NonNumeric(json_type_name(other).to_owned()))
        }
    }

    pub fn into_vector(self, axis: Axis) -> Result<Vec<f64>, ShapeError> {
        if self.rank() != 1 {
            return Err(ShapeError::NotOneDimensional { axis, shape: self.shape });
        }
        Ok(self.data)
    }
}

fn json_type_name(json_value: &serde_json::Value) -> &'static str {
    match json_value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object"
    }
}

impl From<f64> for SampleArray {
    fn from(value: f64) -> Self {
        SampleArray { shape: Vec::new(), data: vec![value] }
    }
}

impl From<Vec<f64>> for SampleArray {
    fn from(values: Vec<f64>) -> Self {
        SampleArray { shape: vec![values.len()], data: values }
    }
}

impl From<&[f64]> for SampleArray {
    fn from(values: &[f64]) -> Self {
        SampleArray::from(values.to_vec())
    }
}

impl From<&Vec<f64>> for SampleArray {
    fn from(values: &Vec<f64>) -> Self {
        SampleArray::from(values.as_slice())
    }
}

impl<const N: usize> From<[f64; N]> for SampleArray {
    fn from(values: [f64; N]) -> Self {
        SampleArray::from(values.to_vec())
    }
}

impl From<DVector<f64>> for SampleArray {
    fn from(values: DVector<f64>) -> Self {
        SampleArray::from(values.as_slice().to_vec())
    }
}

impl From<&DVector<f64>> for SampleArray {
    fn from(values: &DVector<f64>) -> Self {
        SampleArray::from(values.as_slice())
    }
}

impl From<DMatrix<f64>> for SampleArray {
    fn from(matrix: DMatrix<f64>) -> Self {
        let shape = vec![matrix.nrows(), matrix.ncols()];
        // nalgebra stores columns contiguously
        let data = matrix.transpose().as_slice().to_vec();
        SampleArray { shape, data }
    }
}
