use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::math::curve::nonparametriccurve::piecewisepolynomial::InterpolationKind;
use crate::quantity::quantity::Quantity;

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    interpolation: InterpolationKind,
    quantities: Vec<serde_json::Value>
}

fn quantity_from_json(json_value: serde_json::Value) -> Result<Arc<Quantity>, ManagerError> {
    let quantity: Quantity = serde_json::from_value(json_value)?;
    Ok(Arc::new(quantity))
}

/// Named quantities plus the interpolation kind used to evaluate them.
///
/// ```json
/// {
///     "interpolation": "linear",
///     "quantities": [ { "name": "flux", "x": [0, 1, 2], "y": [0, 10, 20] } ]
/// }
/// ```
pub struct Configuration {
    interpolation: InterpolationKind,
    quantity_manager: Manager<Arc<Quantity>>
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            interpolation: InterpolationKind::default(),
            quantity_manager: Manager::new(quantity_from_json)
        }
    }

    pub fn interpolation(&self) -> InterpolationKind {
        self.interpolation
    }

    pub fn quantity_manager(&self) -> &Manager<Arc<Quantity>> {
        &self.quantity_manager
    }

    pub fn from_reader<P: AsRef<Path>>(&mut self, file_path: P) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        self.apply(json_prop)
    }

    pub fn from_json(&mut self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_value(json_value)?;
        self.apply(json_prop)
    }

    fn apply(&mut self, json_prop: ConfigurationJsonProp) -> Result<(), ManagerError> {
        self.quantity_manager.insert_obj_from_json_vec(&json_prop.quantities)?;
        self.interpolation = json_prop.interpolation;
        tracing::info!(
            quantities = json_prop.quantities.len(),
            interpolation = %self.interpolation,
            "configuration loaded"
        );
        Ok(())
    }

    /// Value of the named quantity at `x`, using the configured interpolation.
    pub fn value(&self, name: &str, x: f64) -> Result<f64, ManagerError> {
        let quantity = self.quantity_manager.get(name)?;
        Ok(quantity.value_with_kind(x, self.interpolation)?)
    }
}
