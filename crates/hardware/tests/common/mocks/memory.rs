use graphsim_core::common::{AccessKind, CoherenceState};
use graphsim_core::core::timing::{EventKind, TimingRecord};
use graphsim_core::sim::SimContext;
use graphsim_core::soc::memory::controller::MemoryController;
use graphsim_core::soc::traits::{InvReq, MemObject, MemReq};
use graphsim_core::stats::NamedStats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Controller with a latency the test can change between accesses.
#[derive(Debug)]
pub struct MockMemoryController {
    latency: u64,
}

impl MockMemoryController {
    pub fn new(latency: u64) -> Self {
        Self { latency }
    }

    pub fn set_latency(&mut self, latency: u64) {
        self.latency = latency;
    }
}

impl MemoryController for MockMemoryController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// Handle on the requests a `MockMemory` has seen.
#[derive(Clone, Debug, Default)]
pub struct RequestLog(Arc<Mutex<Vec<MemReq>>>);

impl RequestLog {
    pub fn requests(&self) -> Vec<MemReq> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Memory object answering every request after a shared, adjustable latency.
///
/// With a context attached, reads leave a timing record (start → delay → end)
/// in the requester's recorder, the way main memory does.
#[derive(Debug)]
pub struct MockMemory {
    latency: Arc<AtomicU64>,
    log: RequestLog,
    ctx: Option<Arc<SimContext>>,
}

impl MockMemory {
    pub fn new(latency: u64) -> Self {
        Self {
            latency: Arc::new(AtomicU64::new(latency)),
            log: RequestLog::default(),
            ctx: None,
        }
    }

    /// Leaves timing records in `ctx`'s recorders.
    pub fn recording(mut self, ctx: Arc<SimContext>) -> Self {
        self.ctx = Some(ctx);
        self
    }

    pub fn log(&self) -> RequestLog {
        self.log.clone()
    }

    pub fn latency_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.latency)
    }
}

impl MemObject for MockMemory {
    fn access(&mut self, req: &mut MemReq) -> u64 {
        self.log.0.lock().unwrap().push(*req);
        let latency = self.latency.load(Ordering::Relaxed);
        let resp = req.cycle + latency;
        req.state = match req.kind {
            AccessKind::Gets => CoherenceState::Exclusive,
            AccessKind::Getx => CoherenceState::Modified,
            AccessKind::Putx => CoherenceState::Invalid,
        };

        if let Some(ctx) = self.ctx.as_ref().filter(|_| req.kind.is_read()) {
            let mut recorder = ctx.lock_recorder(req.src_id);
            let arena = recorder.arena_mut();
            let start = arena.add(EventKind::Dummy, req.cycle);
            let delay = arena.chain(start, EventKind::Delay(latency));
            let end = arena.chain_held(delay, EventKind::Dummy);
            recorder.push_record(TimingRecord {
                addr: req.line_addr,
                req_cycle: req.cycle,
                resp_cycle: resp,
                kind: req.kind,
                start,
                end,
            });
        }
        resp
    }

    fn invalidate(&mut self, req: &InvReq) -> u64 {
        req.cycle
    }

    fn name(&self) -> &str {
        "mock-mem"
    }

    fn collect_stats(&self, _out: &mut Vec<NamedStats>) {}
}
