/// Source of fresh identifiers for answers.
///
/// Injected wherever an id must be minted so callers control determinism; nothing in the
/// crate reads the wall clock to build ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// `<prefix>_<n>` with `n` counting up from a starting value.
#[derive(Clone, Debug)]
pub struct CounterIds {
    prefix: String,
    next: u64,
}

impl CounterIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl IdSource for CounterIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl<F> IdSource for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
