//! Request bodies that are not feature records.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/models/train`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainRequest {
    /// Run hyperparameter search before fitting the final model.
    pub optimize_hyperparams: bool,
    /// Include accumulated user-submitted records in the training set.
    pub include_user_data: bool,
}
