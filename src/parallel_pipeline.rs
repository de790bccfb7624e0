// THEORY:
// The `CameraPool` runs several independent gesture pipelines side by side, one per
// camera. Each camera is an actor: a tokio task that owns its `GesturePipeline` outright
// and drains a private queue of frames in submission order, so per-camera state (motion,
// debounce) never needs a lock and frames of one camera are never reordered.
//
// A cycle is CPU-bound, so actors hand the pipeline to the blocking pool for the
// duration of one frame and take it back afterwards. A semaphore sized from the CPU
// count caps how many cycles run at once across all cameras. Events from every camera
// fan in to a single channel, tagged with the camera they came from.

use crate::core_modules::frame::Frame;
use crate::error::{Result, VisionError};
use crate::pipeline::{GestureEvent, GesturePipeline, PipelineConfig};
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub type CameraId = u32;

/// A gesture event together with the camera that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraEvent {
    pub camera_id: CameraId,
    pub event: GestureEvent,
}

pub struct FrameTask {
    pub frame: Frame,
    pub timestamp: Instant,
}

struct CameraWorker {
    task_sender: mpsc::UnboundedSender<FrameTask>,
    worker: JoinHandle<()>,
}

pub struct CameraPool {
    config: PipelineConfig,
    permits: Arc<Semaphore>,
    cameras: HashMap<CameraId, CameraWorker>,
    event_sender: mpsc::UnboundedSender<CameraEvent>,
}

impl CameraPool {
    /// Creates an empty pool with one concurrent cycle per CPU. Returns the pool and the
    /// receiving end of the shared event channel.
    pub fn new(config: PipelineConfig) -> Result<(Self, mpsc::UnboundedReceiver<CameraEvent>)> {
        Self::with_concurrency(config, num_cpus::get())
    }

    pub fn with_concurrency(
        config: PipelineConfig,
        max_concurrent_cycles: usize,
    ) -> Result<(Self, mpsc::UnboundedReceiver<CameraEvent>)> {
        config.validate()?;
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let pool = Self {
            config,
            permits: Arc::new(Semaphore::new(max_concurrent_cycles.max(1))),
            cameras: HashMap::new(),
            event_sender,
        };
        Ok((pool, event_receiver))
    }

    /// Registers a camera and starts its actor. Must be called from within a tokio
    /// runtime.
    pub fn add_camera(&mut self, camera_id: CameraId) -> Result<()> {
        if self.cameras.contains_key(&camera_id) {
            return Err(VisionError::DuplicateCamera(camera_id));
        }
        let pipeline = GesturePipeline::new(self.config.clone())?;
        let (task_sender, task_receiver) = mpsc::unbounded_channel::<FrameTask>();

        let worker = tokio::spawn(Self::run_camera(
            camera_id,
            pipeline,
            task_receiver,
            self.permits.clone(),
            self.event_sender.clone(),
        ));

        self.cameras.insert(
            camera_id,
            CameraWorker {
                task_sender,
                worker,
            },
        );
        info!(camera = camera_id, "camera added");
        Ok(())
    }

    /// Queues a frame for the given camera. Frames of one camera are processed in the
    /// order they are submitted.
    pub fn submit(&self, camera_id: CameraId, frame: Frame, timestamp: Instant) -> Result<()> {
        let camera = self
            .cameras
            .get(&camera_id)
            .ok_or(VisionError::UnknownCamera(camera_id))?;
        camera
            .task_sender
            .send(FrameTask { frame, timestamp })
            .map_err(|_| VisionError::PoolClosed)
    }

    pub fn camera_ids(&self) -> Vec<CameraId> {
        let mut ids: Vec<CameraId> = self.cameras.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Stops one camera after it has drained the frames already queued for it.
    pub async fn remove_camera(&mut self, camera_id: CameraId) -> anyhow::Result<()> {
        let camera = self
            .cameras
            .remove(&camera_id)
            .ok_or(VisionError::UnknownCamera(camera_id))?;
        drop(camera.task_sender);
        camera
            .worker
            .await
            .with_context(|| format!("camera {camera_id} worker failed"))?;
        info!(camera = camera_id, "camera removed");
        Ok(())
    }

    /// Drains every queue and joins every actor. The event channel closes once the
    /// last pending event has been delivered.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let Self {
            cameras,
            event_sender,
            ..
        } = self;
        drop(event_sender);

        let (ids, workers): (Vec<CameraId>, Vec<JoinHandle<()>>) = cameras
            .into_iter()
            .map(|(id, camera)| {
                drop(camera.task_sender);
                (id, camera.worker)
            })
            .unzip();

        let results = futures::future::join_all(workers).await;
        for (camera_id, result) in ids.into_iter().zip(results) {
            result.with_context(|| format!("camera {camera_id} worker failed"))?;
        }
        info!("camera pool shut down");
        Ok(())
    }

    async fn run_camera(
        camera_id: CameraId,
        mut pipeline: GesturePipeline,
        mut tasks: mpsc::UnboundedReceiver<FrameTask>,
        permits: Arc<Semaphore>,
        events: mpsc::UnboundedSender<CameraEvent>,
    ) {
        while let Some(task) = tasks.recv().await {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };

            let cycle = tokio::task::spawn_blocking(move || {
                let event = pipeline.process_frame(&task.frame, task.timestamp);
                (pipeline, event)
            })
            .await;
            drop(permit);

            let event = match cycle {
                Ok((returned, event)) => {
                    pipeline = returned;
                    event
                }
                Err(join_error) => {
                    error!(camera = camera_id, %join_error, "gesture cycle panicked, camera stopped");
                    return;
                }
            };

            if let Some(event) = event {
                debug!(camera = camera_id, gesture = %event.label, "camera event");
                if events.send(CameraEvent { camera_id, event }).is_err() {
                    debug!(camera = camera_id, "event receiver dropped");
                }
            }
        }
    }
}
