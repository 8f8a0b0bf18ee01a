use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use strata_blocks::BlockRegistry;
use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims, ChunkHandle, LightGrid, compute_light};
use strata_worldgen::TerrainGenerator;

use crate::error::RuntimeError;
use crate::queue::GenerationQueue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenJob {
    pub handle: ChunkHandle,
    pub coord: ChunkCoord,
}

/// Terrain and light for one chunk, produced off-thread.
pub struct GenOut {
    pub handle: ChunkHandle,
    pub coord: ChunkCoord,
    pub buf: ChunkBuf,
    pub light: LightGrid,
    pub t_gen_ms: u32,
    pub t_light_ms: u32,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_gen_job(
    job: GenJob,
    dims: ChunkDims,
    generator: &dyn TerrainGenerator,
    reg: &BlockRegistry,
) -> GenOut {
    let t0 = Instant::now();
    let mut buf = ChunkBuf::new(job.coord, dims);
    generator.generate(&mut buf);
    let t_gen_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    let light = compute_light(&buf, reg);
    let t_light_ms = elapsed_ms(t0);

    GenOut {
        handle: job.handle,
        coord: job.coord,
        buf,
        light,
        t_gen_ms,
        t_light_ms,
    }
}

/// Single background thread draining a [`GenerationQueue`].
///
/// Results come back over a channel and are applied on the main thread,
/// so the worker never touches chunk storage.
pub struct ChunkWorker {
    queue: Arc<GenerationQueue<GenJob>>,
    load_enabled: Arc<AtomicBool>,
    res_rx: Receiver<GenOut>,
    completed: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl ChunkWorker {
    pub fn spawn(
        queue: Arc<GenerationQueue<GenJob>>,
        load_enabled: Arc<AtomicBool>,
        generator: Arc<dyn TerrainGenerator>,
        reg: Arc<BlockRegistry>,
        dims: ChunkDims,
    ) -> Result<Self, RuntimeError> {
        let (res_tx, res_rx) = unbounded::<GenOut>();
        let completed = Arc::new(AtomicUsize::new(0));
        let thread = {
            let queue = Arc::clone(&queue);
            let load_enabled = Arc::clone(&load_enabled);
            let completed = Arc::clone(&completed);
            thread::Builder::new()
                .name("strata-gen".to_string())
                .spawn(move || {
                    run_worker(
                        &queue,
                        &load_enabled,
                        &completed,
                        generator.as_ref(),
                        &reg,
                        dims,
                        &res_tx,
                    )
                })?
        };
        log::info!(target: "worker", "generation worker started");
        Ok(Self {
            queue,
            load_enabled,
            res_rx,
            completed,
            thread: Some(thread),
        })
    }

    pub fn drain_results(&self) -> Vec<GenOut> {
        self.res_rx.try_iter().collect()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<GenOut> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    /// Results sent but not yet drained.
    pub fn pending_results(&self) -> usize {
        self.res_rx.len()
    }

    /// Chunks generated since spawn.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Clears the load flag, closes the queue and joins the thread.
    pub fn shutdown(&mut self) -> Result<(), RuntimeError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        self.load_enabled.store(false, Ordering::Release);
        let dropped = self.queue.close();
        if dropped > 0 {
            log::debug!(target: "worker", "dropped {dropped} queued generation jobs");
        }
        thread.join().map_err(|_| RuntimeError::WorkerPanicked)?;
        log::info!(target: "worker", "generation worker stopped");
        Ok(())
    }
}

impl Drop for ChunkWorker {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!(target: "worker", "{e}");
        }
    }
}

fn run_worker(
    queue: &GenerationQueue<GenJob>,
    load_enabled: &AtomicBool,
    completed: &AtomicUsize,
    generator: &dyn TerrainGenerator,
    reg: &BlockRegistry,
    dims: ChunkDims,
    tx: &Sender<GenOut>,
) {
    while let Some(job) = queue.pop_blocking() {
        if !load_enabled.load(Ordering::Acquire) {
            queue.task_done();
            break;
        }
        let out = process_gen_job(job, dims, generator, reg);
        log::trace!(
            target: "worker",
            "generated {:?} gen={}ms light={}ms",
            out.coord,
            out.t_gen_ms,
            out.t_light_ms
        );
        let sent = tx.send(out).is_ok();
        completed.fetch_add(1, Ordering::Relaxed);
        queue.task_done();
        if !sent || !load_enabled.load(Ordering::Acquire) {
            break;
        }
    }
}
