use std::borrow::Cow;

pub trait Label {
    /// Returns a human-readable label for this item.
    /// For enum events this is typically the variant name; it is the
    /// discriminant the ordered-sequence conditions match against.
    fn label(&self) -> Cow<'static, str>;
}
