//! Single-writer store service
//!
//! One worker thread owns the [`Coordinator`]. Callers on any thread send
//! requests over a channel and block on a per-request reply channel, so at
//! most one store operation is ever in flight and each call has an explicit
//! completion point.

use std::path::PathBuf;
use std::thread;
use crossbeam::channel::{self, Receiver, Sender};
use crate::coordinator::{Coordinator, StoreStats};
use crate::exchange::{self, DocumentPicker, ExportReceipt, ImportOutcome, ImportReceipt, ShareTarget};
use crate::record::NameRecord;
use crate::{Error, Result};

type Reply<T> = Sender<Result<T>>;

enum Request {
    List(Reply<Vec<NameRecord>>),
    Insert { name: String, reply: Reply<NameRecord> },
    Update { id: i64, name: String, reply: Reply<bool> },
    Delete { id: i64, reply: Reply<bool> },
    Export { target: Box<dyn ShareTarget>, reply: Reply<ExportReceipt> },
    Import { source: PathBuf, reply: Reply<ImportReceipt> },
    Stats(Reply<StoreStats>),
}

/// Cloneable front end to the store worker
#[derive(Clone)]
pub struct StoreService {
    tx: Sender<Request>,
}

/// The worker thread. Joining it hands the coordinator back for teardown.
pub struct ServiceWorker {
    handle: thread::JoinHandle<Coordinator>,
}

impl StoreService {
    /// Move `coordinator` onto a dedicated worker thread
    pub fn spawn(coordinator: Coordinator) -> Result<(Self, ServiceWorker)> {
        let (tx, rx) = channel::unbounded::<Request>();
        let handle = thread::Builder::new()
            .name("namebook-store".to_string())
            .spawn(move || run_worker(coordinator, rx))?;
        Ok((Self { tx }, ServiceWorker { handle }))
    }

    pub fn list_all(&self) -> Result<Vec<NameRecord>> {
        self.call(Request::List)
    }

    pub fn insert(&self, name: impl Into<String>) -> Result<NameRecord> {
        let name = name.into();
        self.call(|reply| Request::Insert { name, reply })
    }

    pub fn update(&self, id: i64, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        self.call(|reply| Request::Update { id, name, reply })
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        self.call(|reply| Request::Delete { id, reply })
    }

    pub fn export_snapshot(&self, target: Box<dyn ShareTarget>) -> Result<ExportReceipt> {
        self.call(|reply| Request::Export { target, reply })
    }

    /// The picker runs on the calling thread; only the file swap is queued
    pub fn import_snapshot(&self, picker: &dyn DocumentPicker) -> Result<ImportOutcome> {
        match exchange::pick_source(picker)? {
            Some(source) => Ok(ImportOutcome::Imported(self.import_from(source)?)),
            None => Ok(ImportOutcome::Cancelled),
        }
    }

    pub fn import_from(&self, source: PathBuf) -> Result<ImportReceipt> {
        self.call(|reply| Request::Import { source, reply })
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.call(Request::Stats)
    }

    fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Result<T> {
        let (reply, response) = channel::bounded(1);
        self.tx
            .send(request(reply))
            .map_err(|_| Error::WorkerStopped)?;
        response.recv().map_err(|_| Error::WorkerStopped)?
    }
}

impl ServiceWorker {
    /// Wait for the worker to drain its queue. Returns once every
    /// [`StoreService`] clone has been dropped.
    pub fn join(self) -> Result<Coordinator> {
        self.handle.join().map_err(|_| Error::WorkerStopped)
    }
}

fn run_worker(mut coordinator: Coordinator, rx: Receiver<Request>) -> Coordinator {
    tracing::debug!("Store worker started");
    for request in rx {
        // A caller that gave up on its reply is not an error for the worker.
        match request {
            Request::List(reply) => {
                reply.send(coordinator.list_all()).ok();
            }
            Request::Insert { name, reply } => {
                reply.send(coordinator.insert(&name)).ok();
            }
            Request::Update { id, name, reply } => {
                reply.send(coordinator.update(id, &name)).ok();
            }
            Request::Delete { id, reply } => {
                reply.send(coordinator.delete(id)).ok();
            }
            Request::Export { target, reply } => {
                reply.send(coordinator.export_snapshot(target.as_ref())).ok();
            }
            Request::Import { source, reply } => {
                reply.send(coordinator.import_from(&source)).ok();
            }
            Request::Stats(reply) => {
                reply.send(coordinator.stats()).ok();
            }
        }
    }
    tracing::debug!("Store worker stopped");
    coordinator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{CopyShare, PresetPicker};
    use crate::StoreLocation;

    fn spawn_in(dir: &std::path::Path) -> (StoreService, ServiceWorker) {
        let coordinator = Coordinator::init(StoreLocation::new(dir)).unwrap();
        StoreService::spawn(coordinator).unwrap()
    }

    #[test]
    fn test_operations_through_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (service, worker) = spawn_in(dir.path());

        let ada = service.insert("Ada").unwrap();
        assert!(service.update(ada.id, "Alan").unwrap());
        assert!(!service.delete(99).unwrap());
        assert_eq!(service.list_all().unwrap(), vec![NameRecord::new(ada.id, "Alan")]);

        drop(service);
        let coordinator = worker.join().unwrap();
        coordinator.teardown().unwrap();
    }

    #[test]
    fn test_concurrent_callers_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let (service, worker) = spawn_in(dir.path());

        let callers: Vec<_> = (0..4)
            .map(|i| {
                let service = service.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        service.insert(format!("caller-{}-{}", i, j)).unwrap();
                    }
                })
            })
            .collect();
        for caller in callers {
            caller.join().unwrap();
        }

        let all = service.list_all().unwrap();
        assert_eq!(all.len(), 100);
        let mut ids: Vec<_> = all.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);

        drop(service);
        worker.join().unwrap();
    }

    #[test]
    fn test_snapshot_exchange_through_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (service, worker) = spawn_in(&dir.path().join("live"));
        service.insert("Ada").unwrap();

        let snapshot = dir.path().join("snap.db");
        service
            .export_snapshot(Box::new(CopyShare::new(&snapshot)))
            .unwrap();
        service.insert("Grace").unwrap();

        assert!(service
            .import_snapshot(&PresetPicker::cancelled())
            .unwrap()
            .is_cancelled());
        assert_eq!(service.list_all().unwrap().len(), 2);

        let outcome = service
            .import_snapshot(&PresetPicker::new(Some(snapshot)))
            .unwrap();
        assert!(!outcome.is_cancelled());
        assert_eq!(service.list_all().unwrap(), vec![NameRecord::new(1, "Ada")]);
        assert_eq!(service.stats().unwrap().generation, 2);

        drop(service);
        worker.join().unwrap();
    }

    #[test]
    fn test_stopped_worker_is_reported() {
        let (tx, rx) = channel::unbounded::<Request>();
        drop(rx);
        let service = StoreService { tx };
        assert!(matches!(service.list_all(), Err(Error::WorkerStopped)));
        assert!(matches!(service.insert("Ada"), Err(Error::WorkerStopped)));
    }
}
