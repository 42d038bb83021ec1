//! Checkpoint Management
//!
//! Checkpoint queue and incremental checkpointing.

use super::common::*;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone)]
pub struct DirtyPage {
    pub page_id: PageId,
    pub lsn: u64,
    pub dirty_time: Instant,
    pub frame: Arc<BufferFrame>,
}

/// Checkpoint queue for dirty pages
pub struct CheckpointQueue {
    /// Dirty pages ordered by LSN
    queue: Mutex<BTreeMap<u64, Vec<DirtyPage>>>,
    /// Total dirty pages
    dirty_count: AtomicUsize,
    /// Checkpoint LSN watermark
    checkpoint_lsn: AtomicU64,
    /// Statistics
    stats: CheckpointStats,
}

#[derive(Debug)]
struct CheckpointStats {
    pages_queued: AtomicU64,
    pages_flushed: AtomicU64,
    checkpoints: AtomicU64,
}

impl CheckpointQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(BTreeMap::new()),
            dirty_count: AtomicUsize::new(0),
            checkpoint_lsn: AtomicU64::new(0),
            stats: CheckpointStats {
                pages_queued: AtomicU64::new(0),
                pages_flushed: AtomicU64::new(0),
                checkpoints: AtomicU64::new(0),
            },
        }
    }

    /// Add dirty page to checkpoint queue
    pub fn enqueue(&self, dirty_page: DirtyPage) {
        let lsn = dirty_page.lsn;
        let mut queue = self.queue.lock();

        queue.entry(lsn)
            .or_insert_with(Vec::new)
            .push(dirty_page);

        self.dirty_count.fetch_add(1, Ordering::Relaxed);
        self.stats.pages_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Get pages to flush up to a given LSN
    pub fn get_pages_to_flush(&self, up_to_lsn: u64) -> Vec<DirtyPage> {
        let mut queue = self.queue.lock();
        let mut pages = Vec::new();

        // Collect all pages with LSN <= up_to_lsn
        let lsns_to_remove: Vec<u64> = queue.range(..=up_to_lsn)
            .map(|(lsn, _)| *lsn)
            .collect();

        for lsn in lsns_to_remove {
            if let Some(lsn_pages) = queue.remove(&lsn) {
                let count = lsn_pages.len();
                pages.extend(lsn_pages);
                self.dirty_count.fetch_sub(count, Ordering::Relaxed);
            }
        }

        pages
    }

    /// Perform checkpoint
    pub fn checkpoint(&self) -> CheckpointResult {
        self.stats.checkpoints.fetch_add(1, Ordering::Relaxed);

        let current_lsn = self.checkpoint_lsn.load(Ordering::Relaxed);
        let pages = self.get_pages_to_flush(current_lsn);
        let page_count = pages.len();

        // Flush pages (would actually write to disk)
        for page in &pages {
            page.frame.dirty.store(false, Ordering::Release);
        }

        self.stats.pages_flushed.fetch_add(page_count as u64, Ordering::Relaxed);
        self.checkpoint_lsn.fetch_add(1, Ordering::Relaxed);

        CheckpointResult {
            pages_flushed: page_count,
            checkpoint_lsn: current_lsn,
            duration: Duration::ZERO, // Would measure actual flush time
        }
    }

    /// Get dirty page count
    pub fn dirty_count(&self) -> usize {
        self.dirty_count.load(Ordering::Relaxed)
    }

    /// Get statistics
    pub fn get_stats(&self) -> CheckpointStatsSnapshot {
        CheckpointStatsSnapshot {
            pages_queued: self.stats.pages_queued.load(Ordering::Relaxed),
            pages_flushed: self.stats.pages_flushed.load(Ordering::Relaxed),
            checkpoints: self.stats.checkpoints.load(Ordering::Relaxed),
            current_dirty_count: self.dirty_count.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointResult {
    pub pages_flushed: usize,
    pub checkpoint_lsn: u64,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointStatsSnapshot {
    pub pages_queued: u64,
    pub pages_flushed: u64,
    pub checkpoints: u64,
    pub current_dirty_count: usize,
}

/// Incremental checkpoint manager
pub struct IncrementalCheckpointer {
    /// Checkpoint interval in seconds
    interval: Duration,
    /// Pages per checkpoint batch
    batch_size: usize,
    /// Checkpoint queue reference
    checkpoint_queue: Arc<CheckpointQueue>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Statistics
    stats: IncrementalCheckpointStats,
}

#[derive(Debug)]
struct IncrementalCheckpointStats {
    incremental_checkpoints: AtomicU64,
    total_pages_flushed: AtomicU64,
    average_batch_size: AtomicU64,
}

impl IncrementalCheckpointer {
    pub fn new(
        interval_secs: u64,
        batch_size: usize,
        checkpoint_queue: Arc<CheckpointQueue>,
    ) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            batch_size,
            checkpoint_queue,
            running: Arc::new(AtomicBool::new(false)),
            stats: IncrementalCheckpointStats {
                incremental_checkpoints: AtomicU64::new(0),
                total_pages_flushed: AtomicU64::new(0),
                average_batch_size: AtomicU64::new(0),
            },
        }
    }

    /// Start incremental checkpointing
    pub fn start(&self) {
        if self.running.swap(true, Ordering::Acquire) {
            return; // Already running
        }

        let interval = self.interval;
        let batch_size = self.batch_size;
        let queue = self.checkpoint_queue.clone();
        let running = self.running.clone();
        let stats = Arc::new(Mutex::new(AtomicU64::new(self.stats.incremental_checkpoints.load(Ordering::Relaxed))));

        std::thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                std::thread::sleep(interval);

                // Perform incremental checkpoint
                let dirty_count = queue.dirty_count();
                if dirty_count > 0 {
                    let pages_to_flush = std::cmp::min(dirty_count, batch_size);
                    // Would flush pages here
                }
            }
        });
    }

    /// Stop incremental checkpointing
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Get statistics
    pub fn get_stats(&self) -> IncrementalCheckpointStatsSnapshot {
        IncrementalCheckpointStatsSnapshot {
            incremental_checkpoints: self.stats.incremental_checkpoints.load(Ordering::Relaxed),
            total_pages_flushed: self.stats.total_pages_flushed.load(Ordering::Relaxed),
            average_batch_size: self.stats.average_batch_size.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalCheckpointStatsSnapshot {
    pub incremental_checkpoints: u64,
    pub total_pages_flushed: u64,
    pub average_batch_size: u64,
}