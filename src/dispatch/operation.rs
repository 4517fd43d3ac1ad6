//! # Dispatchable Operations
//!
//! Closed set of job variants the gateway can submit. Modelling the
//! operations as an enum (rather than free-form strings) catches typos in
//! remote task names at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered job the queue backend's workers know how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Train (or retrain) the income prediction model.
    TrainModel,
    /// Run inference for a single user-feature record.
    Predict,
}

impl Operation {
    /// The task name this operation is registered under on the worker side.
    pub fn task_name(&self) -> &'static str {
        match self {
            Operation::TrainModel => "pipeline.tasks.train_model",
            Operation::Predict => "pipeline.tasks.predict",
        }
    }

    /// Default worker-pool queue for this operation.
    pub fn default_queue(&self) -> &'static str {
        match self {
            Operation::TrainModel => "tasks",
            Operation::Predict => "tasks",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names_are_namespaced() {
        assert_eq!(Operation::TrainModel.task_name(), "pipeline.tasks.train_model");
        assert_eq!(Operation::Predict.task_name(), "pipeline.tasks.predict");
    }

    #[test]
    fn test_operations_route_to_task_queue() {
        assert_eq!(Operation::TrainModel.default_queue(), "tasks");
        assert_eq!(Operation::Predict.default_queue(), "tasks");
    }
}
