//! Strongly-typed identifiers for flow execution engine entities.
//!
//! Each identifier wraps a [`uuid::Uuid`] via [`domain_key::define_uuid`],
//! giving compile-time type safety that prevents passing, say, a
//! [`BranchId`] where a [`SketchId`] is expected. All types are `Copy`
//! (16 bytes) and support `v4()`, `nil()`, `parse`, and full serde.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

define_uuid!(SketchIdDomain => SketchId);
define_uuid!(ScanIdDomain => ScanId);
define_uuid!(NodeIdDomain => NodeId);
define_uuid!(BranchIdDomain => BranchId);
define_uuid!(StepIdDomain => StepId);
define_uuid!(UserIdDomain => UserId);
define_uuid!(FlowIdDomain => FlowId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_is_not_nil() {
        assert!(!SketchId::v4().is_nil());
        assert!(!ScanId::v4().is_nil());
    }

    #[test]
    fn nil_round_trips_through_display() {
        let id = NodeId::nil();
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn parse_roundtrips() {
        let id = BranchId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn distinct_id_types_cannot_be_confused() {
        fn accepts_sketch(_id: SketchId) {}
        fn accepts_scan(_id: ScanId) {}

        let sketch = SketchId::v4();
        let scan = ScanId::v4();
        accepts_sketch(sketch);
        accepts_scan(scan);
        // accepts_sketch(scan); // would not compile
    }

    #[test]
    fn serde_roundtrip() {
        let id = StepId::v4();
        let json = serde_json::to_string(&id).unwrap();
        let back: StepId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
