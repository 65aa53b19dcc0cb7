use serde::Serialize;

/// Uniform return value of every terraform operation.
///
/// Failures never produce one of these; they come back as
/// [`crate::TerraformError`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerraformResult<T> {
    pub success: bool,
    pub result: T,
}

impl<T> TerraformResult<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TerraformResult<U> {
        TerraformResult {
            success: self.success,
            result: f(self.result),
        }
    }

    pub fn into_inner(self) -> T {
        self.result
    }
}
