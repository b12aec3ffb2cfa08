//! In-memory archive bucket for tests

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ArchiveBucket, BucketError, BucketResult, ListedObject, ObjectPage};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Default)]
struct State {
    objects: BTreeMap<String, String>,
    list_calls: usize,
    delete_calls: Vec<usize>,
}

/// Archive bucket kept in memory, listing keys in lexicographic order
pub struct InMemoryBucket {
    state: Mutex<State>,
    page_size: usize,
    fail_list_on_call: Option<usize>,
    fail_delete_on_call: Option<usize>,
}

impl InMemoryBucket {
    /// Creates an empty bucket listing up to 1000 objects per page
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size: DEFAULT_PAGE_SIZE,
            fail_list_on_call: None,
            fail_delete_on_call: None,
        }
    }

    /// Lists at most `page_size` objects per page
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fails the `call`-th list request (1-based)
    #[must_use]
    pub const fn fail_list_on_call(mut self, call: usize) -> Self {
        self.fail_list_on_call = Some(call);
        self
    }

    /// Fails the `call`-th delete request (1-based) without deleting anything
    #[must_use]
    pub const fn fail_delete_on_call(mut self, call: usize) -> Self {
        self.fail_delete_on_call = Some(call);
        self
    }

    /// Stores an object, replacing any object with the same key
    pub fn put(&self, key: impl Into<String>, last_modified: impl Into<String>) {
        self.state()
            .objects
            .insert(key.into(), last_modified.into());
    }

    /// Whether an object with `key` is stored
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state().objects.contains_key(key)
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().objects.len()
    }

    /// Whether the bucket holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().objects.is_empty()
    }

    /// Number of list requests served or failed so far
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    /// Key count of every delete request received, in order
    #[must_use]
    pub fn delete_calls(&self) -> Vec<usize> {
        self.state().delete_calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryBucket {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ArchiveBucket for InMemoryBucket {
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> BucketResult<ObjectPage> {
        let mut state = self.state();
        state.list_calls += 1;

        if self.fail_list_on_call == Some(state.list_calls) {
            return Err(BucketError::UpstreamError("injected list failure".to_string()));
        }

        // The continuation token is the last key of the previous page
        let mut matching = state
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| {
                continuation_token
                    .as_deref()
                    .is_none_or(|token| key.as_str() > token)
            });

        let objects: Vec<ListedObject> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, last_modified)| ListedObject {
                key: key.clone(),
                last_modified: last_modified.clone(),
            })
            .collect();

        let next_continuation_token = if matching.next().is_some() {
            objects.last().map(|object| object.key.clone())
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    async fn delete_batch(&self, keys: &[String]) -> BucketResult<()> {
        let mut state = self.state();
        state.delete_calls.push(keys.len());

        if self.fail_delete_on_call == Some(state.delete_calls.len()) {
            return Err(BucketError::UpstreamError("injected delete failure".to_string()));
        }

        for key in keys {
            state.objects.remove(key);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_in_pages_under_prefix() {
        let bucket = InMemoryBucket::new().with_page_size(2);
        for key in ["logs/a", "logs/b", "logs/c", "other/d"] {
            bucket.put(key, "2021-03-15T09:00:00Z");
        }

        let first = bucket.list_page("logs/", None).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert_eq!(first.next_continuation_token.as_deref(), Some("logs/b"));

        let second = bucket
            .list_page("logs/", first.next_continuation_token)
            .await
            .unwrap();
        assert_eq!(second.objects.len(), 1);
        assert_eq!(second.objects[0].key, "logs/c");
        assert_eq!(second.next_continuation_token, None);
        assert_eq!(bucket.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_exact_page_has_no_continuation() {
        let bucket = InMemoryBucket::new().with_page_size(2);
        bucket.put("a", "");
        bucket.put("b", "");

        let page = bucket.list_page("", None).await.unwrap();
        assert_eq!(page.objects.len(), 2);
        assert_eq!(page.next_continuation_token, None);
    }

    #[tokio::test]
    async fn test_injected_delete_failure_keeps_objects() {
        let bucket = InMemoryBucket::new().fail_delete_on_call(1);
        bucket.put("a", "");

        let result = bucket.delete_batch(&["a".to_string()]).await;
        assert!(matches!(result, Err(BucketError::UpstreamError(_))));
        assert!(bucket.contains("a"));
        assert_eq!(bucket.delete_calls(), vec![1]);
    }
}
