/// Marker trait for events flowing through an actor tree.
///
/// Implement this for your event type (usually an enum). Events must be
/// `Send + Sync + Clone + 'static` because they cross task boundaries, are
/// delivered to multiple listeners, and are echoed on the inspection stream.
///
/// Matching by name (the ordered-sequence conditions) additionally requires
/// [`Label`](crate::Label).
pub trait Event: Send + Sync + Clone + 'static {}
