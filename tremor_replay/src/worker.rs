// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Off-thread viewport queries.
//!
//! A [`QueryWorker`] owns a thread holding shared handles to the store and spatial index.
//! Requests and replies travel over `crossbeam-channel`; each reply carries the sequence
//! number of its request so the caller can drop replies that a newer pan or zoom made stale.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use tremor_feed::{EventId, EventStore};

use crate::error::WorkerError;
use crate::spatial::SpatialIndex;
use crate::viewport::GeoBounds;

/// A viewport query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryRequest {
    /// Caller-chosen sequence number, echoed in the reply.
    pub seq: u64,
    /// Bounds to query.
    pub bounds: GeoBounds,
}

/// Events inside the requested bounds, in ascending key order.
///
/// Feed it to [`ReplayEngine::resolve_reply`](crate::engine::ReplayEngine::resolve_reply) or
/// [`resolve_hits`](crate::resolver::resolve_hits).
#[derive(Clone, Debug, PartialEq)]
pub struct QueryReply {
    /// Sequence number of the request.
    pub seq: u64,
    /// Bounds of the request.
    pub bounds: GeoBounds,
    /// Matching event ids.
    pub ids: Vec<EventId>,
}

/// Handle to the query thread. Dropping it closes the request channel and joins the thread.
#[derive(Debug)]
pub struct QueryWorker {
    requests: Option<Sender<QueryRequest>>,
    replies: Receiver<QueryReply>,
    handle: Option<JoinHandle<()>>,
    next_seq: u64,
}

fn answer(store: &EventStore, index: &SpatialIndex, request: QueryRequest) -> QueryReply {
    QueryReply {
        seq: request.seq,
        bounds: request.bounds,
        ids: index
            .query(&request.bounds)
            .into_iter()
            .filter_map(|pos| store.get(pos).map(|e| e.id()))
            .collect(),
    }
}

impl QueryWorker {
    /// Start the query thread.
    pub fn spawn(store: Arc<EventStore>, index: Arc<SpatialIndex>) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = unbounded::<QueryRequest>();
        let (reply_tx, reply_rx) = unbounded::<QueryReply>();
        let handle = thread::Builder::new()
            .name("tremor-query".to_owned())
            .spawn(move || {
                tracing::debug!(target: "tremor::replay", "worker.started");
                for request in request_rx.iter() {
                    if reply_tx.send(answer(&store, &index, request)).is_err() {
                        break;
                    }
                }
                tracing::debug!(target: "tremor::replay", "worker.stopped");
            })
            .map_err(WorkerError::Spawn)?;
        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
            next_seq: 0,
        })
    }

    /// Queue a request with an explicit sequence number.
    pub fn submit(&self, request: QueryRequest) -> Result<(), WorkerError> {
        self.requests
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(request)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Queue a query for `bounds` and return its sequence number.
    pub fn request(&mut self, bounds: GeoBounds) -> Result<u64, WorkerError> {
        let seq = self.next_seq;
        self.submit(QueryRequest { seq, bounds })?;
        self.next_seq += 1;
        Ok(seq)
    }

    /// Wait for the next reply.
    pub fn recv(&self) -> Result<QueryReply, WorkerError> {
        self.replies.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Wait up to `timeout` for the next reply.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<QueryReply>, WorkerError> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Ok(Some(reply)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Drain every reply that has arrived and keep the newest one.
    pub fn latest(&self) -> Option<QueryReply> {
        self.replies.try_iter().max_by_key(|r| r.seq)
    }
}

impl Drop for QueryWorker {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!(target: "tremor::replay", "worker.panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexSettings;
    use tremor_feed::RawRow;

    fn fixture() -> (Arc<EventStore>, Arc<SpatialIndex>) {
        let rows: Vec<RawRow> = (0..40_i32)
            .map(|i| {
                RawRow::new(
                    format!("{}", i * 4 - 80),
                    format!("{}", i * 9 - 175),
                    "5",
                    "10",
                    "07/04/1976",
                    format!("10:{:02}:00", i),
                )
            })
            .collect();
        let store = Arc::new(EventStore::from_rows(&rows).0);
        let index = Arc::new(SpatialIndex::build(&store, &IndexSettings::default()));
        (store, index)
    }

    #[test]
    fn replies_match_synchronous_queries() {
        let (store, index) = fixture();
        let mut worker =
            QueryWorker::spawn(Arc::clone(&store), Arc::clone(&index)).expect("spawn");
        let queries = [
            GeoBounds::WORLD,
            GeoBounds::new(-20.0, 20.0, -60.0, 60.0).expect("valid"),
            GeoBounds::new(-90.0, 90.0, 150.0, -150.0).expect("valid"),
        ];
        for bounds in queries {
            let seq = worker.request(bounds).expect("worker alive");
            let reply = worker.recv().expect("reply");
            assert_eq!(reply.seq, seq);
            let expected = answer(&store, &index, QueryRequest { seq, bounds });
            assert_eq!(reply, expected);
        }
    }

    #[test]
    fn latest_keeps_the_newest_reply() {
        let (store, index) = fixture();
        let worker = QueryWorker::spawn(store, index).expect("spawn");
        for seq in 0..5 {
            worker
                .submit(QueryRequest {
                    seq,
                    bounds: GeoBounds::WORLD,
                })
                .expect("worker alive");
        }
        let mut newest = None;
        while newest.as_ref().is_none_or(|r: &QueryReply| r.seq < 4) {
            if let Some(r) = worker
                .recv_timeout(Duration::from_secs(5))
                .expect("worker alive")
            {
                newest = Some(r);
            }
            if let Some(r) = worker.latest() {
                newest = Some(r);
            }
        }
        assert_eq!(newest.map(|r| r.ids.len()), Some(40));
    }

    #[test]
    fn drop_joins_the_thread() {
        let (store, index) = fixture();
        let worker = QueryWorker::spawn(store, index).expect("spawn");
        drop(worker);
    }
}
