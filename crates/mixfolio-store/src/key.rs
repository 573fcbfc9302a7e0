// SPDX-License-Identifier: Apache-2.0

use crate::{StoreError, StoreErrorCode};
use std::fmt::{Display, Formatter};

/// Storage key relative to the asset root. Segments are separated by `/`
/// and can never climb out of the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        let reject = |reason: &str| {
            Err(StoreError::new(
                StoreErrorCode::Validation,
                format!("invalid asset path `{input}`: {reason}"),
            ))
        };
        if input.is_empty() {
            return reject("empty path");
        }
        if input.starts_with('/') {
            return reject("absolute paths are not allowed");
        }
        if input.contains('\\') || input.contains('\0') {
            return reject("path contains a forbidden character");
        }
        for segment in input.split('/') {
            match segment {
                "" => return reject("empty path segment"),
                "." | ".." => return reject("relative path segments are not allowed"),
                _ => {}
            }
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
