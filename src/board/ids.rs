use super::models::JobId;

/// Source of fresh job ids. `create_job` re-draws on collision, so an
/// implementation only has to be unlikely to repeat itself.
pub trait IdGenerator {
    fn next_id(&mut self) -> JobId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> JobId {
        (**self).next_id()
    }
}

/// Random v4 UUIDs. The default for real collections.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> JobId {
        JobId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Monotonic counter ids ("1", "2", ...).
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Continue after the largest numeric id already in `ids`. If that id
    /// is `u64::MAX` the counter starts over at 1 and relies on the caller's
    /// collision re-draw.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a JobId>) -> Self {
        let max = ids
            .into_iter()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self::starting_at(max.checked_add(1).unwrap_or(1))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> JobId {
        let id = JobId::new(self.next.to_string());
        self.next = self.next.checked_add(1).unwrap_or(1);
        id
    }
}
