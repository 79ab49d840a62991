use std::{hash::Hash, ops::Deref, sync::Arc};

/// A stable string identity for one actor instance.
///
/// Ids are unique among concurrently-live actors sharing a root. Actors
/// created without an explicit id get an `actor-{n}` fallback from their
/// system's counter.
///
/// Cheap to clone; compares by content, so ids survive round trips through
/// inspection events and filters.
#[derive(Debug, Clone)]
pub struct ActorId(Arc<str>);

impl ActorId {
    pub(crate) fn new(id: Arc<str>) -> Self {
        Self(id)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ActorId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ActorId {}

impl Hash for ActorId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq<str> for ActorId {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ActorId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}
