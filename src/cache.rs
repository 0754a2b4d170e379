//! Process-wide cache of built video pipelines.
//!
//! Each video ID owns one slot. The first request for an uncached video runs
//! the build; concurrent requests for the same video wait on that build
//! instead of starting their own. A failed build leaves the slot empty so the
//! next request starts over.

use crate::error::Result;
use crate::pipeline::VideoPipeline;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::debug;

type Slot = Arc<OnceCell<Arc<VideoPipeline>>>;

/// Lifecycle of one video's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Never built, or the last build failed.
    Absent,
    /// A build is in flight.
    Building,
    /// Built and reusable for every later question.
    Ready,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Absent => write!(f, "absent"),
            PipelineState::Building => write!(f, "building"),
            PipelineState::Ready => write!(f, "ready"),
        }
    }
}

/// Single-flight cache from video ID to pipeline. No eviction.
#[derive(Default)]
pub struct PipelineCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl PipelineCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // The map is only touched in short non-panicking sections.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached pipeline, running `build` if there is none yet.
    ///
    /// Returns the pipeline and whether this call built it.
    pub async fn get_or_build<F, Fut>(&self, video_id: &str, build: F) -> Result<(Arc<VideoPipeline>, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<VideoPipeline>>,
    {
        let slot = self.slots().entry(video_id.to_string()).or_default().clone();

        if let Some(pipeline) = slot.get() {
            debug!("Cache hit for {}", video_id);
            return Ok((pipeline.clone(), false));
        }

        let mut built = false;
        let ran_build = &mut built;
        let outcome = slot
            .get_or_try_init(|| async move {
                *ran_build = true;
                build().await.map(Arc::new)
            })
            .await;

        match outcome {
            Ok(pipeline) => Ok((pipeline.clone(), built)),
            Err(e) => {
                self.discard_if_idle(video_id, &slot);
                Err(e)
            }
        }
    }

    /// Drop an empty slot nobody else is waiting on.
    fn discard_if_idle(&self, video_id: &str, slot: &Slot) {
        let mut slots = self.slots();
        let idle = slots.get(video_id).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if idle {
            slots.remove(video_id);
        }
    }

    /// Get a ready pipeline without building.
    pub fn get(&self, video_id: &str) -> Option<Arc<VideoPipeline>> {
        self.slots().get(video_id).and_then(|slot| slot.get().cloned())
    }

    /// Current state of a video's pipeline.
    pub fn state(&self, video_id: &str) -> PipelineState {
        match self.slots().get(video_id) {
            Some(slot) if slot.initialized() => PipelineState::Ready,
            // Anyone besides the map holding the slot is mid-build or waiting on one.
            Some(slot) if Arc::strong_count(slot) > 1 => PipelineState::Building,
            _ => PipelineState::Absent,
        }
    }

    /// Number of ready pipelines.
    pub fn len(&self) -> usize {
        self.slots().values().filter(|slot| slot.initialized()).count()
    }

    /// Whether no pipeline is ready.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// IDs of all ready pipelines, sorted.
    pub fn video_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .slots()
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}
