use crate::id::{SketchId, UserId};

/// The tenancy boundary every graph write and run is scoped to.
///
/// Carried end to end from the HTTP launch request through the task
/// runtime, the orchestrator, and into the graph writer, so that a sketch's
/// data never leaks across investigations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    sketch_id: SketchId,
    user_id: UserId,
}

impl Scope {
    /// Construct a scope for a sketch owned/viewed by `user_id`.
    pub fn new(sketch_id: SketchId, user_id: UserId) -> Self {
        Self {
            sketch_id,
            user_id,
        }
    }

    /// The sketch this scope is bound to.
    pub fn sketch_id(&self) -> SketchId {
        self.sketch_id
    }

    /// The user this scope is bound to — used by the Secret Store to
    /// resolve user-scoped vault entries.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_carries_both_ids() {
        let sketch = SketchId::v4();
        let user = UserId::v4();
        let scope = Scope::new(sketch, user);
        assert_eq!(scope.sketch_id(), sketch);
        assert_eq!(scope.user_id(), user);
    }
}
