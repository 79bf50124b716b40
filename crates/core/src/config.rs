//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services as a shared value. Request handling never reads
//! process-wide environment variables, which keeps behaviour consistent in
//! multi-threaded runtimes and test harnesses, and keeps the resolver and
//! wizard logic pure.

use crate::constants::{ASSESSMENTS_DIR_NAME, DEFAULT_GATED_PRODUCTS};
use crate::{AssessmentError, AssessmentResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    gated_products: Vec<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `gated_products` is the list of product codes whose purchase requires
    /// an approved risk assessment. Codes are stored lowercased; empty
    /// entries are rejected.
    pub fn new(data_dir: PathBuf, gated_products: Vec<String>) -> AssessmentResult<Self> {
        let mut products = Vec::with_capacity(gated_products.len());
        for code in gated_products {
            let code = code.trim().to_ascii_lowercase();
            if code.is_empty() {
                return Err(AssessmentError::InvalidInput(
                    "gated product codes cannot be empty".into(),
                ));
            }
            products.push(code);
        }

        Ok(Self {
            data_dir,
            gated_products: products,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn assessments_dir(&self) -> PathBuf {
        self.data_dir.join(ASSESSMENTS_DIR_NAME)
    }

    pub fn gated_products(&self) -> &[String] {
        &self.gated_products
    }

    /// Returns true if purchasing `product_code` requires an approved risk
    /// assessment. Comparison is case-insensitive.
    pub fn is_gated(&self, product_code: &str) -> bool {
        let code = product_code.trim().to_ascii_lowercase();
        self.gated_products.iter().any(|p| *p == code)
    }
}

/// Parse the gated-product list from an optional environment value.
///
/// The value is a comma-separated list of product codes. If `value` is
/// `None` or empty/whitespace, the built-in default list is returned.
pub fn gated_products_from_env_value(value: Option<String>) -> Vec<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(list) => list
            .split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect(),
        None => DEFAULT_GATED_PRODUCTS
            .iter()
            .map(|code| code.to_string())
            .collect(),
    }
}
