//! Per-session state for a claims check.
//!
//! `SessionStore` holds what the user picked and the last results. It is
//! passed around explicitly; nothing here is global. Results live only in
//! memory and are replaced on every check.

use crate::error::{MlrError, Result};
use crate::experience::Experience;
use crate::poll::{poll_until_ready, CancelSignal, PollConfig};
use crate::source::ExperienceSource;
use crate::validation::Validator;
use crate::violation::ClaimResults;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Experience picked by the user. The index disambiguates repeated ids.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedExperience {
    index: usize,
    id: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    selected_experience: Option<SelectedExperience>,
    selected_libraries: BTreeSet<String>,
    results: BTreeMap<usize, ClaimResults>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_experience(&mut self, index: usize, id: &str) {
        self.selected_experience = Some(SelectedExperience {
            index,
            id: id.to_string(),
        });
    }

    pub fn selected_experience_id(&self) -> Option<&str> {
        self.selected_experience.as_ref().map(|sel| sel.id.as_str())
    }

    pub fn selected_experience_index(&self) -> Option<usize> {
        self.selected_experience.as_ref().map(|sel| sel.index)
    }

    pub fn select_library(&mut self, id: &str) {
        self.selected_libraries.insert(id.to_string());
    }

    pub fn deselect_library(&mut self, id: &str) -> bool {
        self.selected_libraries.remove(id)
    }

    pub fn selected_libraries(&self) -> Vec<&str> {
        self.selected_libraries.iter().map(String::as_str).collect()
    }

    pub fn has_library_selection(&self) -> bool {
        !self.selected_libraries.is_empty()
    }

    /// Keyed by position in the experience list.
    pub fn store_results(&mut self, experience_index: usize, results: ClaimResults) {
        self.results.insert(experience_index, results);
    }

    pub fn results_for(&self, experience_index: usize) -> Option<&ClaimResults> {
        self.results.get(&experience_index)
    }
}

/// Outcome of one check: which experience, its index in the list, results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub experience_id: String,
    pub experience_index: usize,
    pub results: ClaimResults,
}

/// A content source, a validator and the state of one user session.
pub struct ClaimsSession<S: ExperienceSource> {
    source: S,
    validator: Validator,
    store: SessionStore,
    experiences: Vec<Experience>,
}

impl<S: ExperienceSource> ClaimsSession<S> {
    pub fn new(source: S, validator: Validator) -> Self {
        Self {
            source,
            validator,
            store: SessionStore::new(),
            experiences: Vec::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    /// Fetch once. Returns whether any experiences are available.
    pub fn sync(&mut self) -> Result<bool> {
        let experiences = self.source.fetch_experiences()?;
        if experiences.is_empty() {
            return Ok(false);
        }
        info!("Synced {} experiences", experiences.len());
        self.set_experiences(experiences);
        Ok(true)
    }

    /// Poll the source until it has experiences.
    pub async fn wait_for_experiences(
        &mut self,
        config: &PollConfig,
        cancel: &mut CancelSignal,
    ) -> Result<usize> {
        let source = &self.source;
        let experiences = poll_until_ready(config, cancel, || async move {
            let experiences = source.fetch_experiences()?;
            Ok::<_, MlrError>((!experiences.is_empty()).then_some(experiences))
        })
        .await?;
        self.set_experiences(experiences);
        Ok(self.experiences.len())
    }

    fn set_experiences(&mut self, experiences: Vec<Experience>) {
        warn_on_repeated_ids(&experiences);
        self.experiences = experiences;
    }

    pub fn select_library(&mut self, id: &str) {
        if self.validator.registry().get(id).is_none() {
            debug!("Selected unknown library '{}'", id);
        }
        self.store.select_library(id);
    }

    /// Select the first experience with this id.
    pub fn select_experience(&mut self, id: &str) -> Result<usize> {
        let index = self
            .experiences
            .iter()
            .position(|exp| exp.id == id)
            .ok_or_else(|| MlrError::Source(format!("unknown experience '{}'", id)))?;
        self.store.set_selected_experience(index, id);
        Ok(index)
    }

    /// Select by position in the synced list.
    pub fn select_experience_at(&mut self, index: usize) -> Result<&str> {
        let exp = self.experiences.get(index).ok_or_else(|| {
            MlrError::Source(format!("no experience at position {}", index + 1))
        })?;
        self.store.set_selected_experience(index, &exp.id);
        Ok(exp.id.as_str())
    }

    /// Validate the selected experience against the selected libraries.
    pub fn run_check(&mut self) -> Result<CheckOutcome> {
        let index = self
            .store
            .selected_experience_index()
            .ok_or_else(|| MlrError::Source("no experience selected".to_string()))?;
        let id = self.store.selected_experience_id().unwrap_or_default();
        let experience = self
            .experiences
            .get(index)
            .filter(|exp| exp.id == id)
            .ok_or_else(|| MlrError::Source(format!("experience '{}' is gone", id)))?;

        let selected = self.store.selected_libraries();
        let results = self
            .validator
            .validate(Some(&experience.experience_fields), selected.as_slice());
        let experience_id = experience.id.clone();

        self.store.store_results(index, results.clone());
        Ok(CheckOutcome {
            experience_id,
            experience_index: index,
            results,
        })
    }
}

fn warn_on_repeated_ids(experiences: &[Experience]) {
    let mut seen = BTreeSet::new();
    for exp in experiences {
        if !seen.insert(exp.id.as_str()) {
            warn!("Experience id '{}' appears more than once", exp.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::cancel_pair;
    use crate::source::StaticSource;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn session() -> ClaimsSession<StaticSource> {
        let source = StaticSource::new(vec![
            Experience::new("e1").with_field("header", "Taken once daily."),
            Experience::new("e2").with_field("body", "Taken twice daily."),
        ]);
        ClaimsSession::new(source, Validator::default())
    }

    #[test]
    fn test_check_requires_selection() {
        let mut s = session();
        s.sync().unwrap();
        assert!(matches!(s.run_check(), Err(MlrError::Source(_))));
    }

    #[test]
    fn test_check_selected_experience() {
        let mut s = session();
        assert!(s.sync().unwrap());
        s.select_library("dosage-claims");
        assert_eq!(s.select_experience("e2").unwrap(), 1);

        let outcome = s.run_check().unwrap();
        assert_eq!(outcome.experience_index, 1);
        assert_eq!(outcome.results["body"].len(), 4);
        assert_eq!(s.store().results_for(1), Some(&outcome.results));
        assert!(s.store().results_for(0).is_none());
    }

    #[test]
    fn test_unknown_experience_rejected() {
        let mut s = session();
        s.sync().unwrap();
        assert!(s.select_experience("nope").is_err());
        assert_eq!(s.store().selected_experience_id(), None);
    }

    #[test]
    fn test_store_library_selection() {
        let mut store = SessionStore::new();
        assert!(!store.has_library_selection());
        store.select_library("safety-claims");
        store.select_library("dosage-claims");
        assert_eq!(store.selected_libraries(), ["dosage-claims", "safety-claims"]);
        assert!(store.deselect_library("safety-claims"));
        assert!(!store.deselect_library("safety-claims"));
    }

    #[test]
    fn test_repeated_ids_checked_separately() {
        let source = StaticSource::new(vec![
            Experience::new("x").with_field("body", "Relief that lasts."),
            Experience::new("x").with_field(
                "body",
                "Clinically proven to reduce joint inflammation by up to 80%.",
            ),
        ]);
        let mut s = ClaimsSession::new(source, Validator::default());
        s.sync().unwrap();
        s.select_library("efficacy-claims");

        assert_eq!(s.select_experience_at(1).unwrap(), "x");
        let second = s.run_check().unwrap();
        assert_eq!(second.experience_index, 1);
        assert!(second.results["body"].iter().any(|v| v.is_violated()));

        s.select_experience_at(0).unwrap();
        let first = s.run_check().unwrap();
        assert_eq!(first.experience_index, 0);
        assert!(!first.results["body"].iter().any(|v| v.is_violated()));
        assert_ne!(s.store().results_for(0), s.store().results_for(1));
    }

    #[test]
    fn test_select_out_of_range_position() {
        let mut s = session();
        s.sync().unwrap();
        assert!(matches!(s.select_experience_at(2), Err(MlrError::Source(_))));
        assert_eq!(s.store().selected_experience_index(), None);
    }

    /// Empty until the configured number of fetches has happened.
    struct LateSource {
        ready_after: u32,
        calls: AtomicU32,
    }

    impl ExperienceSource for LateSource {
        fn fetch_experiences(&self) -> Result<Vec<Experience>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < self.ready_after {
                return Ok(Vec::new());
            }
            Ok(vec![Experience::new("late").with_field("header", "Hello")])
        }
    }

    fn fast_poll(max_retries: u32) -> PollConfig {
        PollConfig {
            max_retries,
            interval: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_wait_until_source_is_ready() {
        let source = LateSource {
            ready_after: 3,
            calls: AtomicU32::new(0),
        };
        let mut s = ClaimsSession::new(source, Validator::default());
        let (_handle, mut signal) = cancel_pair();

        let count = s
            .wait_for_experiences(&fast_poll(5), &mut signal)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(s.experiences()[0].id, "late");
        assert_eq!(s.select_experience("late").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wait_gives_up_at_ceiling() {
        let source = LateSource {
            ready_after: 10,
            calls: AtomicU32::new(0),
        };
        let mut s = ClaimsSession::new(source, Validator::default());
        let (_handle, mut signal) = cancel_pair();

        let err = s
            .wait_for_experiences(&fast_poll(2), &mut signal)
            .await
            .unwrap_err();
        assert!(matches!(err, MlrError::PollExhausted { attempts: 2 }));
        assert!(s.experiences().is_empty());
    }
}
