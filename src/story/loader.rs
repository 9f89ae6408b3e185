use std::{
    path::PathBuf,
    sync::mpsc::Sender,
};

use anyhow::Context;

use crate::{
    foundation::error::{StoryError, StoryResult},
    story::{
        decode::decode_frame,
        frames::{FrameOutcome, LoadEvent},
    },
};

/// One frame to fetch. `path` is relative to the loader's root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// Product the frame belongs to.
    pub product: String,
    /// 0-based slot in the frame set.
    pub index: usize,
    /// File path relative to the loader root.
    pub path: PathBuf,
}

/// Asynchronous frame source.
///
/// `request` must return promptly; the outcome is delivered later through `done`.
/// There is no cancellation: once issued, a request runs to completion (or never
/// completes, in which case its frame set stays pending).
pub trait FrameLoader {
    fn request(&mut self, request: FrameRequest, done: Sender<LoadEvent>);
}

/// Reads and decodes frames from a directory tree on a rayon pool.
pub struct FsFrameLoader {
    root: PathBuf,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for FsFrameLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsFrameLoader")
            .field("root", &self.root)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl FsFrameLoader {
    /// Loader rooted at `root`. `threads = None` lets rayon pick.
    pub fn new(root: impl Into<PathBuf>, threads: Option<usize>) -> StoryResult<Self> {
        Ok(Self {
            root: root.into(),
            pool: build_thread_pool(threads)?,
        })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl FrameLoader for FsFrameLoader {
    fn request(&mut self, request: FrameRequest, done: Sender<LoadEvent>) {
        let path = self.root.join(&request.path);
        self.pool.spawn(move || {
            let outcome = match load_frame(&path) {
                Ok(frame) => FrameOutcome::Loaded(frame),
                Err(e) => FrameOutcome::Failed(format!("{e:#}")),
            };
            // The engine may have been dropped; nobody is left to notify.
            let _ = done.send(LoadEvent {
                product: request.product,
                index: request.index,
                outcome,
            });
        });
    }
}

fn load_frame(path: &std::path::Path) -> anyhow::Result<crate::PreparedFrame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
    decode_frame(&bytes).with_context(|| format!("decode frame '{}'", path.display()))
}

fn build_thread_pool(threads: Option<usize>) -> StoryResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StoryError::validation(
            "frame loader 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("frame-loader-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StoryError::asset(format!("failed to build rayon thread pool: {e}")))
}

/// Loader that records requests and never completes them on its own.
///
/// Tests (and hosts with their own IO) feed outcomes back through
/// [`crate::StoryEngine::on_frame_event`].
#[derive(Clone, Debug, Default)]
pub struct ManualLoader {
    /// Requests in the order they were issued.
    pub requests: Vec<FrameRequest>,
}

impl FrameLoader for ManualLoader {
    fn request(&mut self, request: FrameRequest, _done: Sender<LoadEvent>) {
        self.requests.push(request);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/loader.rs"]
mod tests;
