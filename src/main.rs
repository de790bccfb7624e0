// Replays a directory of still frames through the gesture engine and prints each
// debounced gesture on its own line. Diagnostics go to stderr; stdout carries nothing
// but gesture labels so it can be piped straight into a consumer.

use anyhow::Context;
use clap::Parser;
use gesture_vision::core_modules::utils::image_helper::image_helper;
use gesture_vision::{Frame, GesturePipeline, GestureSink, LineSink, PipelineConfig};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "gesture_vision", about = "Hand gesture recognition over recorded frames")]
struct Cli {
    /// Directory of frames, replayed in file-name order
    frames: PathBuf,

    /// JSON file overriding any subset of the pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Synthetic time between consecutive frames, in milliseconds
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,

    /// Write the cleaned mask of every frame as PNG into this directory
    #[arg(long)]
    dump_masks: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_vision=info".into()),
        )
        .init();

    eprintln!("Gesture Vision Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    debug!(?config, "configuration");

    if let Some(dir) = &cli.dump_masks {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating mask directory {}", dir.display()))?;
    }

    let frames = list_frames(&cli.frames)?;
    info!(count = frames.len(), dir = %cli.frames.display(), "replaying frames");

    let mut pipeline = GesturePipeline::new(config)?;
    let mut sink = LineSink::stdout();
    let interval = Duration::from_millis(cli.frame_interval_ms);

    let summary = replay(
        &frames,
        &mut pipeline,
        &mut sink,
        interval,
        cli.dump_masks.as_deref(),
    )?;

    info!(
        frames = summary.analyzed,
        skipped = summary.skipped,
        gestures = summary.gestures,
        "replay finished"
    );
    Ok(())
}

/// Counters reported at the end of a replay.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReplaySummary {
    analyzed: usize,
    skipped: usize,
    gestures: usize,
}

/// Feeds `frames` through the pipeline in order, one `interval` apart, and emits every
/// debounced gesture to `sink`. Frames that fail to decode are skipped.
fn replay<S: GestureSink>(
    frames: &[PathBuf],
    pipeline: &mut GesturePipeline,
    sink: &mut S,
    interval: Duration,
    mask_dir: Option<&Path>,
) -> anyhow::Result<ReplaySummary> {
    let started = Instant::now();
    let mut summary = ReplaySummary::default();

    for (position, path) in frames.iter().enumerate() {
        let image = match image::open(path) {
            Ok(image) => image,
            Err(err) => {
                warn!(file = %path.display(), %err, "skipping undecodable frame");
                summary.skipped += 1;
                continue;
            }
        };
        let timestamp = frame_timestamp(started, interval, position)?;

        let Some(analysis) = pipeline.analyze_frame(&Frame::from_image(image), timestamp) else {
            debug!(file = %path.display(), "empty frame");
            summary.skipped += 1;
            continue;
        };
        summary.analyzed += 1;

        debug!(
            file = %path.display(),
            fingers = ?analysis.shape.map(|s| s.finger_count),
            gesture = %analysis.classification.resolved,
            "frame analyzed"
        );

        if let Some(dir) = mask_dir {
            let mask_path = dir.join(image_helper::mask_file_name(analysis.frame_index));
            image_helper::save_mask(&mask_path, &analysis.mask)
                .with_context(|| format!("writing mask {}", mask_path.display()))?;
        }

        if let Some(event) = analysis.event {
            info!(frame = event.frame_index, gesture = %event.label, "gesture");
            sink.emit(&event).context("writing gesture")?;
            summary.gestures += 1;
        }
    }
    Ok(summary)
}

/// Synthetic capture time of the frame at `position`.
fn frame_timestamp(started: Instant, interval: Duration, position: usize) -> anyhow::Result<Instant> {
    let factor = u32::try_from(position).context("too many frames to timestamp")?;
    interval
        .checked_mul(factor)
        .and_then(|offset| started.checked_add(offset))
        .with_context(|| format!("frame {position} is out of range at an interval of {interval:?}"))
}

/// Image files in `dir`, sorted by file name. Anything else is skipped with a warning.
fn list_frames(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading frame directory {}", dir.display()))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if image::ImageFormat::from_path(&path).is_err() {
            warn!(file = %path.display(), "not an image, skipping");
            continue;
        }
        frames.push(path);
    }
    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    const SKIN: Rgb<u8> = Rgb([200, 150, 120]);
    const BACKDROP: Rgb<u8> = Rgb([20, 40, 200]);

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gesture_vision_{}_{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    /// `a.png` holds a fist, `b.png` an empty scene, `c.png` is not really a PNG and
    /// `notes.txt` is not an image at all. Written out of order on purpose.
    fn frame_dir(name: &str) -> PathBuf {
        let dir = scratch_dir(name);
        RgbImage::from_pixel(400, 220, BACKDROP)
            .save(dir.join("b.png"))
            .expect("write b.png");

        let mut fist = RgbImage::from_pixel(400, 220, BACKDROP);
        draw_filled_rect_mut(&mut fist, Rect::at(50, 60).of_size(100, 100), SKIN);
        fist.save(dir.join("a.png")).expect("write a.png");

        std::fs::write(dir.join("notes.txt"), "not a frame").expect("write notes.txt");
        std::fs::write(dir.join("c.png"), b"definitely not png data").expect("write c.png");
        dir
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn frames_are_listed_by_name_and_non_images_skipped() {
        let dir = frame_dir("listing");
        std::fs::create_dir(dir.join("nested.png")).expect("nested dir");

        let frames = list_frames(&dir).expect("readable dir");
        assert_eq!(file_names(&frames), vec!["a.png", "b.png", "c.png"]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_frame_directory_is_an_error() {
        assert!(list_frames(Path::new("/definitely/not/here/frames")).is_err());
    }

    #[test]
    fn replay_skips_undecodable_frames_and_prints_gestures() {
        let dir = frame_dir("replay");
        let frames = list_frames(&dir).expect("readable dir");
        let mut pipeline = GesturePipeline::new(PipelineConfig::default()).expect("valid config");
        let mut sink = LineSink::new(Vec::new());

        let summary = replay(&frames, &mut pipeline, &mut sink, Duration::from_millis(33), None)
            .expect("corrupt frame does not abort the replay");

        assert_eq!(
            summary,
            ReplaySummary {
                analyzed: 2,
                skipped: 1,
                gestures: 1,
            }
        );
        assert_eq!(String::from_utf8(sink.into_inner()).expect("utf8"), "ZOOM_OUT\n");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn replay_dumps_one_mask_per_analyzed_frame() {
        let dir = frame_dir("masks");
        let mask_dir = dir.join("masks");
        std::fs::create_dir(&mask_dir).expect("mask dir");
        let frames = list_frames(&dir).expect("readable dir");
        let mut pipeline = GesturePipeline::new(PipelineConfig::default()).expect("valid config");
        let mut sink = LineSink::new(Vec::new());

        replay(&frames, &mut pipeline, &mut sink, Duration::from_millis(33), Some(&mask_dir))
            .expect("replay");

        let mut masks: Vec<PathBuf> = std::fs::read_dir(&mask_dir)
            .expect("mask dir")
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        masks.sort();
        assert_eq!(file_names(&masks), vec!["mask_000000.png", "mask_000001.png"]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn timestamps_advance_by_the_interval() {
        let t0 = Instant::now();
        let interval = Duration::from_millis(33);
        assert_eq!(frame_timestamp(t0, interval, 0).expect("in range"), t0);
        assert_eq!(
            frame_timestamp(t0, interval, 3).expect("in range"),
            t0 + Duration::from_millis(99)
        );
    }

    #[test]
    fn huge_intervals_are_an_error_not_a_panic() {
        let t0 = Instant::now();
        // The largest interval the CLI accepts overflows a Duration by frame 2000.
        let interval = Duration::from_millis(u64::MAX);
        assert!(frame_timestamp(t0, interval, 2000).is_err());
        assert!(frame_timestamp(t0, Duration::MAX, 2).is_err());
        // Positions beyond u32 are rejected instead of silently truncated.
        assert!(frame_timestamp(t0, Duration::from_millis(1), usize::MAX).is_err());
    }
}
