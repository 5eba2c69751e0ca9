use super::*;
use crate::foundation::error::PressError;

#[test]
fn abort_propagates_item_errors() {
    let r: PressResult<u8> = Err(PressError::rendering("cell 3"));
    let err = FailurePolicy::Abort.absorb("cell 3", r).unwrap_err();
    assert!(err.to_string().contains("cell 3"));
}

#[test]
fn continue_absorbs_item_errors() {
    let r: PressResult<u8> = Err(PressError::resource_unavailable("page 2"));
    assert_eq!(FailurePolicy::Continue.absorb("page 2", r).unwrap(), None);
}

#[test]
fn success_passes_through_either_policy() {
    for p in [FailurePolicy::Abort, FailurePolicy::Continue] {
        assert_eq!(p.absorb("ok", Ok(7u8)).unwrap(), Some(7));
    }
}

#[test]
fn policy_serializes_snake_case() {
    let s = serde_json::to_string(&FailurePolicy::Continue).unwrap();
    assert_eq!(s, "\"continue\"");
    let p: FailurePolicy = serde_json::from_str("\"abort\"").unwrap();
    assert_eq!(p, FailurePolicy::Abort);
}
