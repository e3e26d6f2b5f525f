use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use roomscene_scene::Node;

use crate::{AssetError, parse_model};

/// Bytes read so far out of the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl LoadProgress {
    /// `None` when the total size is unknown or zero.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.loaded as f64 / self.total as f64)
    }
}

/// One observable transition of a load.
#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Loaded(Node),
    Failed(AssetError),
}

impl LoadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Starts model loads on background threads.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    chunk_size: usize,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
        }
    }
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes read between progress reports.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Begin reading and parsing `path`. Returns immediately.
    pub fn load(&self, path: impl AsRef<Path>) -> LoadTask {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker = {
            let path = path.clone();
            let cancel = Arc::clone(&cancel);
            let chunk_size = self.chunk_size;
            move || {
                let outcome = match fetch(&path, chunk_size, &cancel, &tx) {
                    Ok(node) => LoadEvent::Loaded(node),
                    Err(err) => LoadEvent::Failed(err),
                };
                // Receiver gone means nobody is waiting; drop the outcome.
                let _ = tx.send(outcome);
            }
        };

        if let Err(err) = thread::Builder::new()
            .name("model-loader".into())
            .spawn(worker)
        {
            tracing::error!(path = %path.display(), "failed to start loader thread: {err}");
        } else {
            tracing::debug!(path = %path.display(), "model load started");
        }

        LoadTask {
            path,
            events: rx,
            cancel,
            finished: false,
        }
    }
}

fn fetch(
    path: &Path,
    chunk_size: usize,
    cancel: &AtomicBool,
    tx: &Sender<LoadEvent>,
) -> Result<Node, AssetError> {
    let mut file = File::open(path)?;
    let total = file.metadata()?.len();
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; chunk_size];

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(AssetError::Cancelled);
        }
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        let _ = tx.send(LoadEvent::Progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        }));
    }

    if cancel.load(Ordering::Relaxed) {
        return Err(AssetError::Cancelled);
    }
    parse_model(&bytes)
}

/// Handle to one in-flight load.
///
/// Dropping the handle does not stop the worker; call [`LoadTask::cancel`].
#[derive(Debug)]
pub struct LoadTask {
    path: PathBuf,
    events: Receiver<LoadEvent>,
    cancel: Arc<AtomicBool>,
    finished: bool,
}

impl LoadTask {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the terminal event has been handed out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ask the worker to stop. A cancelled load ends in `Failed(Cancelled)`
    /// unless it had already produced its outcome.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Next pending event without blocking.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        if self.finished {
            return None;
        }
        match self.events.try_recv() {
            Ok(event) => {
                self.finished = event.is_terminal();
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(LoadEvent::Failed(AssetError::Interrupted))
            }
        }
    }

    /// Block until the load resolves, skipping progress events.
    pub fn wait(self) -> Result<Node, AssetError> {
        if self.finished {
            return Err(AssetError::Interrupted);
        }
        loop {
            match self.events.recv() {
                Ok(LoadEvent::Progress(_)) => continue,
                Ok(LoadEvent::Loaded(node)) => return Ok(node),
                Ok(LoadEvent::Failed(err)) => return Err(err),
                Err(_) => return Err(AssetError::Interrupted),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    const BOX_MODEL: &str = r#"{
        "metadata": { "version": 4.5, "type": "Object" },
        "geometries": [ { "uuid": "g", "type": "BoxGeometry", "width": 2, "height": 2, "depth": 2 } ],
        "materials": [ { "uuid": "m", "type": "MeshLambertMaterial", "color": 16777215 } ],
        "object": { "type": "Group", "name": "crate", "children": [
            { "type": "Mesh", "geometry": "g", "material": "m" }
        ] }
    }"#;

    fn model_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// Poll until the terminal event, collecting everything seen on the way.
    fn drain(task: &mut LoadTask) -> Vec<LoadEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while !task.is_finished() {
            assert!(Instant::now() < deadline, "load did not finish");
            match task.poll() {
                Some(event) => events.push(event),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }
        events
    }

    #[test]
    fn progress_then_exactly_one_success() {
        let file = model_file(BOX_MODEL);
        let mut task = ModelLoader::new().with_chunk_size(16).load(file.path());
        let events = drain(&mut task);

        let (last, rest) = events.split_last().unwrap();
        assert!(matches!(last, LoadEvent::Loaded(node) if node.subtree_len() == 2));
        assert!(!rest.is_empty());
        assert!(rest.iter().all(|e| matches!(e, LoadEvent::Progress(_))));

        let mut previous = 0;
        for event in rest {
            if let LoadEvent::Progress(p) = event {
                assert!(p.loaded > previous);
                assert_eq!(p.total, BOX_MODEL.len() as u64);
                previous = p.loaded;
            }
        }
        assert_eq!(previous, BOX_MODEL.len() as u64);
        assert!(task.poll().is_none());
    }

    #[test]
    fn missing_file_fails_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut task = ModelLoader::new().load(dir.path().join("missing.json"));
        let events = drain(&mut task);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LoadEvent::Failed(AssetError::Io(_))));
    }

    #[test]
    fn malformed_file_fails_after_progress() {
        let file = model_file("{ \"metadata\": ");
        let result = ModelLoader::new().load(file.path()).wait();
        assert!(matches!(result, Err(AssetError::Json(_))));
    }

    #[test]
    fn cancelled_fetch_stops_before_parsing() {
        let file = model_file(BOX_MODEL);
        let (tx, rx) = mpsc::channel();
        let result = fetch(file.path(), 16, &AtomicBool::new(true), &tx);
        assert!(matches!(result, Err(AssetError::Cancelled)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_resolves_the_task() {
        let file = model_file(BOX_MODEL);
        let task = ModelLoader::new().with_chunk_size(1).load(file.path());
        task.cancel();
        // The worker may have finished before the flag was seen.
        assert!(matches!(task.wait(), Err(AssetError::Cancelled) | Ok(_)));
    }

    #[test]
    fn wait_returns_the_subtree() {
        let file = model_file(BOX_MODEL);
        let node = ModelLoader::new().load(file.path()).wait().unwrap();
        assert_eq!(node.name.as_deref(), Some("crate"));
    }

    #[test]
    fn progress_ratio() {
        let p = LoadProgress {
            loaded: 25,
            total: 100,
        };
        assert_eq!(p.ratio(), Some(0.25));
        assert_eq!(
            LoadProgress {
                loaded: 0,
                total: 0
            }
            .ratio(),
            None
        );
    }
}
