use crate::foundation::error::PressResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a renderer reacts when one item (a montage cell, a document page) fails.
pub enum FailurePolicy {
    /// Fail the whole artifact on the first item error.
    #[default]
    Abort,
    /// Log the item error, degrade that item, and keep going.
    Continue,
}

impl FailurePolicy {
    /// Apply the policy to an item result.
    ///
    /// `Ok(Some(v))` on success, `Ok(None)` when the error was absorbed, `Err` when it must
    /// propagate.
    pub fn absorb<T>(self, what: &str, result: PressResult<T>) -> PressResult<Option<T>> {
        match (self, result) {
            (_, Ok(v)) => Ok(Some(v)),
            (Self::Abort, Err(e)) => Err(e),
            (Self::Continue, Err(e)) => {
                tracing::warn!(item = what, error = %e, "continuing after item failure");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/policy.rs"]
mod tests;
