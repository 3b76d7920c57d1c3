//! The in-memory collection of samples that have been committed during a session
use crate::{
    core::{
        error::{Error, Result},
        timestamp,
    },
    sample::{Coordinates, Draft, ProjectTag, Sample},
    taxonomy::Taxonomy,
};
use time::{PrimitiveDateTime, macros::date, macros::datetime};
use tracing::{debug, warn};

/// An ordered collection of committed samples. It is the single source of truth for a session:
/// the store is created when the session starts and discarded, unsaved, when it ends.
///
/// Samples are only ever appended or replaced in place. There is no way to delete or reorder
/// them, so a position stays valid for as long as the store exists.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
    last_saved: Option<usize>,
}

impl SampleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that contains the example coral sample that every new session starts with
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let draft = Draft {
            name: "Coral Fragment 01".to_string(),
            project: ProjectTag::A,
            project_number: Some(12),
            sample_number: Some(1),
            taxonomy: Taxonomy::new("Animalia", "Acroporidae", "Acropora", "Acropora millepora"),
            acquired: Some(date!(2025 - 08 - 31)),
            coordinates: Some(Coordinates {
                x: 115.452,
                y: -8.672,
            }),
            ..Default::default()
        };
        if let Err(e) = store.seed(draft) {
            warn!("Unable to seed sample store: {e}");
        }
        store
    }

    fn seed(&mut self, draft: Draft) -> Result<()> {
        self.register_at(draft.clone(), datetime!(2025-08-31 10:00:00))?;
        self.update_at(0, draft, datetime!(2025-09-05 14:30:00))?;
        // seeding doesn't count as an edit made during the session
        self.last_saved = None;
        Ok(())
    }

    /// Add a committed sample to the end of the store. No uniqueness check is done: two samples
    /// with the same derived ID can coexist.
    pub fn append(&mut self, sample: Sample) {
        debug!(id = sample.id(), position = self.samples.len(), "appending sample");
        self.samples.push(sample);
        self.last_saved = Some(self.samples.len() - 1);
    }

    /// Replace the sample at the given position. Fails without modifying the store if `index` is
    /// out of bounds.
    pub fn replace_at(&mut self, index: usize, sample: Sample) -> Result<()> {
        let len = self.samples.len();
        let slot = self
            .samples
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        debug!(id = sample.id(), position = index, "replacing sample");
        *slot = sample;
        self.last_saved = Some(index);
        Ok(())
    }

    /// Validate the draft and add it to the store as a new sample registered right now
    pub fn register(&mut self, draft: Draft) -> Result<&Sample> {
        self.register_at(draft, timestamp::now())
    }

    /// Validate the draft and add it to the store as a new sample registered at `now`. The store
    /// is unchanged if validation fails.
    pub fn register_at(&mut self, draft: Draft, now: PrimitiveDateTime) -> Result<&Sample> {
        let sample = draft.commit(now)?;
        self.append(sample);
        Ok(&self.samples[self.samples.len() - 1])
    }

    /// Validate the draft and replace the sample at `index` with it, as of right now
    pub fn update(&mut self, index: usize, draft: Draft) -> Result<&Sample> {
        self.update_at(index, draft, timestamp::now())
    }

    /// Validate the draft and replace the sample at `index` with it. The original registration
    /// time is preserved and the edit time is set to `now`. The store is unchanged if `index` is
    /// out of bounds or validation fails.
    pub fn update_at(
        &mut self,
        index: usize,
        draft: Draft,
        now: PrimitiveDateTime,
    ) -> Result<&Sample> {
        let previous = self.samples.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.samples.len(),
        })?;
        let sample = draft.commit_over(previous, now)?;
        self.replace_at(index, sample)?;
        Ok(&self.samples[index])
    }

    /// Start an edit session for the sample at `index`
    pub fn draft_for(&self, index: usize) -> Result<Draft> {
        self.samples
            .get(index)
            .map(Draft::from)
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.samples.len(),
            })
    }

    /// The most recently appended sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// The sample that was most recently saved (created or updated) during this session
    pub fn latest_edited(&self) -> Option<&Sample> {
        self.last_saved.and_then(|i| self.samples.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// The position of the first sample with the given ID (ignoring case)
    pub fn position(&self, id: &str) -> Option<usize> {
        self.samples
            .iter()
            .position(|s| s.id().eq_ignore_ascii_case(id.trim()))
    }

    /// The first sample with the given ID (ignoring case)
    pub fn find(&self, id: &str) -> Option<&Sample> {
        self.position(id).and_then(|i| self.samples.get(i))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// A read-only view of all samples in store order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValidationError, sample::PhotoRef, sample::tests::coral_draft};
    use test_log::test;

    fn draft(name: &str, sample_number: u32) -> Draft {
        Draft {
            name: name.to_string(),
            sample_number: Some(sample_number),
            ..coral_draft()
        }
    }

    #[test]
    fn test_seeded() {
        let store = SampleStore::seeded();
        assert_eq!(store.len(), 1);
        let seed = store.latest().expect("no seed sample");
        assert_eq!(seed.id(), "A-0012-0001");
        assert_eq!(seed.name(), "Coral Fragment 01");
        assert_eq!(seed.registered(), datetime!(2025-08-31 10:00:00));
        assert_eq!(seed.edited(), datetime!(2025-09-05 14:30:00));
        assert!(store.latest_edited().is_none());
    }

    #[test]
    fn test_register() {
        let mut store = SampleStore::new();
        assert!(store.latest().is_none());
        let now = datetime!(2025-09-01 09:00:00);
        let sample = store.register_at(draft("first", 1), now).unwrap();
        assert_eq!(sample.id(), "A-0012-0001");
        assert_eq!(sample.registered(), now);
        assert_eq!(sample.edited(), now);

        store
            .register_at(draft("second", 2), datetime!(2025-09-02 09:00:00))
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().map(Sample::name), Some("second"));
        assert_eq!(store.latest_edited().map(Sample::name), Some("second"));
    }

    #[test]
    fn test_register_invalid() {
        let mut store = SampleStore::seeded();
        let mut d = coral_draft();
        d.name = String::new();
        assert_eq!(
            store.register(d).map(|_| ()),
            Err(Error::Validation(ValidationError::MissingAttribute("name")))
        );
        assert_eq!(store.len(), 1);
        assert!(store.latest_edited().is_none());
    }

    #[test]
    fn test_duplicate_ids_allowed() {
        let mut store = SampleStore::new();
        store.register(draft("one", 1)).unwrap();
        store.register(draft("two", 1)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().id(), store.get(1).unwrap().id());
        // lookups by id find the first one
        assert_eq!(store.position("a-0012-0001"), Some(0));
    }

    #[test]
    fn test_update_preserves_position_and_registration() {
        let mut store = SampleStore::new();
        let t0 = datetime!(2025-09-01 09:00:00);
        store.register_at(draft("first", 1), t0).unwrap();
        store
            .register_at(draft("second", 2), datetime!(2025-09-02 09:00:00))
            .unwrap();
        let untouched = store.get(1).unwrap().clone();

        let mut edit = store.draft_for(0).unwrap();
        edit.name = "first, renamed".into();
        edit.photos.sem = Some(PhotoRef::new("sem.tif"));
        let t1 = datetime!(2025-09-10 17:45:00);
        let updated = store.update_at(0, edit, t1).unwrap();
        assert_eq!(updated.name(), "first, renamed");
        assert_eq!(updated.id(), "A-0012-0001-SEM");
        assert_eq!(updated.registered(), t0);
        assert_eq!(updated.edited(), t1);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(&untouched));
        assert_eq!(store.latest().map(Sample::name), Some("second"));
        assert_eq!(store.latest_edited().map(Sample::name), Some("first, renamed"));
        assert_eq!(store.find("A-0012-0001-sem").map(Sample::name), Some("first, renamed"));
    }

    #[test]
    fn test_edited_never_before_registered() {
        let mut store = SampleStore::new();
        let t0 = datetime!(2025-09-01 09:00:00);
        store.register_at(draft("first", 1), t0).unwrap();
        let d = store.draft_for(0).unwrap();
        let s = store.update_at(0, d, datetime!(2024-01-01 00:00:00)).unwrap();
        assert_eq!(s.edited(), t0);
        assert!(store.iter().all(|s| s.edited() >= s.registered()));
    }

    #[test]
    fn test_replace_out_of_bounds() {
        let mut store = SampleStore::seeded();
        let before = store.samples().to_vec();
        let sample = coral_draft().commit(timestamp::now()).unwrap();
        assert_eq!(
            store.replace_at(1, sample),
            Err(Error::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            store.update(5, coral_draft()).map(|_| ()),
            Err(Error::IndexOutOfBounds { index: 5, len: 1 })
        );
        assert!(store.draft_for(1).is_err());
        assert_eq!(store.samples(), before.as_slice());
    }

    #[test]
    fn test_update_invalid_leaves_store_unchanged() {
        let mut store = SampleStore::seeded();
        let before = store.samples().to_vec();
        let mut d = store.draft_for(0).unwrap();
        d.sample_number = None;
        assert!(store.update(0, d).is_err());
        assert_eq!(store.samples(), before.as_slice());
        assert!(store.latest_edited().is_none());
    }
}
