/// Maximum number of keys sent in one delete request
pub const DELETE_BATCH_LIMIT: usize = 1000;

/// Keys of expired archives waiting for a delete request
///
/// The batch never holds more than [`DELETE_BATCH_LIMIT`] keys as long as
/// [`DeleteBatch::take_flushable`] is called after every push.
#[derive(Debug, Default)]
pub struct DeleteBatch {
    keys: Vec<String>,
}

impl DeleteBatch {
    /// Creates an empty batch
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Vec::with_capacity(DELETE_BATCH_LIMIT),
        }
    }

    /// Queues a key for deletion
    pub fn push(&mut self, key: String) {
        self.keys.push(key);
    }

    /// Number of queued keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Takes the queued keys if they are due for a delete request
    ///
    /// Keys are due once the batch is full, or when `forced` and at least one key is
    /// queued. The batch is left empty whenever keys are returned.
    pub fn take_flushable(&mut self, forced: bool) -> Option<Vec<String>> {
        let due = self.keys.len() >= DELETE_BATCH_LIMIT || (forced && !self.keys.is_empty());
        if !due {
            return None;
        }

        Some(std::mem::replace(
            &mut self.keys,
            Vec::with_capacity(DELETE_BATCH_LIMIT),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(count: usize) -> DeleteBatch {
        let mut batch = DeleteBatch::new();
        for i in 0..count {
            batch.push(format!("key-{i}"));
        }
        batch
    }

    #[test]
    fn test_not_due_below_limit() {
        let mut batch = filled(DELETE_BATCH_LIMIT - 1);

        assert_eq!(batch.take_flushable(false), None);
        assert_eq!(batch.len(), DELETE_BATCH_LIMIT - 1);
    }

    #[test]
    fn test_due_at_limit() {
        let mut batch = filled(DELETE_BATCH_LIMIT);

        let keys = batch.take_flushable(false).unwrap();
        assert_eq!(keys.len(), DELETE_BATCH_LIMIT);
        assert_eq!(keys[0], "key-0");
        assert!(batch.is_empty());
    }

    #[test]
    fn test_forced_flushes_partial_batch() {
        let mut batch = filled(3);

        assert_eq!(
            batch.take_flushable(true),
            Some(vec!["key-0".to_string(), "key-1".to_string(), "key-2".to_string()])
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn test_forced_on_empty_batch_is_noop() {
        let mut batch = DeleteBatch::new();

        assert_eq!(batch.take_flushable(true), None);
    }
}
