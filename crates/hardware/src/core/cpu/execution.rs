//! Basic-Block Execution.
//!
//! The core is in order with an IPC of one except on memory stalls. It performs the following:
//! 1. **Instruction accounting:** The block's static instruction count advances the clock up front.
//! 2. **Instruction fetch:** Every line the block spans is fetched through the L1 instruction cache.
//! 3. **Phase synchronization:** Crossing the phase end replays contention and takes the barrier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TimingCore;

/// A pre-decoded basic block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BasicBlock {
    /// Address of the first instruction.
    pub addr: u64,
    /// Length of the block in bytes.
    pub bytes: u64,
    /// Static instruction count.
    pub instrs: u64,
}

/// What the core should do after a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BblOutcome {
    /// Keep executing the current context.
    Continue,
    /// The barrier handed the core a different context; the rest of the
    /// block's timing is abandoned.
    Switched(u32),
}

impl TimingCore {
    /// Executes `bbl` and synchronizes at any phase boundary it crosses.
    pub fn bbl(&mut self, bbl: &BasicBlock) -> BblOutcome {
        self.instrs += bbl.instrs;
        self.cur_cycle += bbl.instrs;
        if self.offload {
            self.offload_instrs += bbl.instrs;
        }

        let line_bytes = 1u64 << self.ctx.line_bits();
        let end = bbl.addr.saturating_add(bbl.bytes);
        let mut fetch_addr = bbl.addr & !(line_bytes - 1);
        while fetch_addr < end {
            self.fetch(fetch_addr);
            let Some(next) = fetch_addr.checked_add(line_bytes) else {
                break;
            };
            fetch_addr = next;
        }

        self.sync_phase()
    }

    /// Takes the barrier once per phase end the clock has passed.
    fn sync_phase(&mut self) -> BblOutcome {
        while self.cur_cycle > self.phase_end {
            self.cur_cycle = self.contention.end_phase(self.cur_cycle);
            self.phase_end += self.ctx.phase_length();

            let cid = self.context.unwrap_or(self.id);
            let next = self.ctx.barrier().take_barrier(self.id, cid);
            debug!(
                core = self.id,
                cur = self.cur_cycle,
                phase_end = self.phase_end,
                "phase boundary"
            );
            if next != cid {
                self.context = Some(next);
                return BblOutcome::Switched(next);
            }
        }
        BblOutcome::Continue
    }
}
