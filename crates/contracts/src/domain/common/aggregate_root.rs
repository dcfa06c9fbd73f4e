use super::AggregateId;

/// Static description of a record kind plus access to its id.
pub trait AggregateRoot {
    type Id: AggregateId;

    fn id(&self) -> Self::Id;

    /// Singular UI name
    fn element_name() -> &'static str;
}
