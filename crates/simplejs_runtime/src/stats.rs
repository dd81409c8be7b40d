//! Heap statistics.

use crate::core::Cell;
use crate::eval::FrameOutcomes;
use crate::interpreter::Interpreter;

/// Snapshot of arena occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub capacity: usize,
    pub used_bytes: usize,
    pub peak_bytes: usize,
    pub live_cells: usize,
    pub objects: usize,
    pub properties: usize,
    pub strings: usize,
    pub functions: usize,
    pub code_refs: usize,
    pub errors: usize,
    pub collections: u64,
    pub freed_total: u64,
    pub call_depth: usize,
    pub temp_roots: usize,
    pub persistent_roots: usize,
    pub frames: FrameOutcomes,
}

impl Interpreter {
    pub fn heap_stats(&self) -> HeapStats {
        let mut stats = HeapStats {
            capacity: self.heap.capacity(),
            used_bytes: self.heap.used_bytes,
            peak_bytes: self.heap.peak_bytes,
            live_cells: self.heap.live_cells,
            collections: self.heap.collections,
            freed_total: self.heap.freed_total,
            call_depth: self.frames.len(),
            temp_roots: self.roots.len(),
            persistent_roots: self.persistent_roots.iter().flatten().count(),
            frames: self.frame_outcomes,
            ..HeapStats::default()
        };
        for cell in self.heap.cells() {
            match cell {
                Cell::Object(_) => stats.objects += 1,
                Cell::Property(_) => stats.properties += 1,
                Cell::String(_) => stats.strings += 1,
                Cell::Function(_) => stats.functions += 1,
                Cell::CodeRef(_) => stats.code_refs += 1,
                Cell::Error(_) => stats.errors += 1,
            }
        }
        stats
    }

    /// Human-readable statistics report.
    pub fn dump_stats(&self) -> String {
        let s = self.heap_stats();
        let pct = if s.capacity > 0 {
            s.used_bytes as f64 / s.capacity as f64 * 100.0
        } else {
            0.0
        };
        format!(
            "=== Heap Stats ===\n\
             Used:        {:>8} / {} bytes ({:.1}%)\n\
             Peak:        {:>8} bytes\n\
             Objects:     {:>8}\n\
             Properties:  {:>8}\n\
             Strings:     {:>8}\n\
             Functions:   {:>8}\n\
             CodeRefs:    {:>8}\n\
             Errors:      {:>8}\n\
             ------------------\n\
             Live cells:  {:>8}\n\
             Collections: {:>8} ({} cells freed)\n\
             Call depth:  {:>8} / {}\n\
             Frames:      {:>8} returned, {} thrown, {} overflowed\n\
             Roots:       {:>8} temporary, {} persistent",
            s.used_bytes, s.capacity, pct,
            s.peak_bytes,
            s.objects,
            s.properties,
            s.strings,
            s.functions,
            s.code_refs,
            s.errors,
            s.live_cells,
            s.collections, s.freed_total,
            s.call_depth, self.config.max_stack_size,
            s.frames.returned, s.frames.thrown, s.frames.overflowed,
            s.temp_roots, s.persistent_roots,
        )
    }
}
