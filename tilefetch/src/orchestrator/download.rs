//! Sequential tile download driver.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::observer::DownloadObserver;
use super::plan::DownloadPlan;
use super::types::{DownloadError, DownloadReport, DownloadStats};
use crate::config::DownloadConfig;
use crate::fetch::{FetchOutcome, TileFetcher};
use crate::provider::{Provider, ReqwestClient, TileServerProvider};
use crate::storage;

/// Waits between requests.
pub trait Pacer: Send + Sync {
    fn pause(&self, delay: Duration);
}

/// Pacer that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleepPacer;

impl Pacer for ThreadSleepPacer {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Downloads every tile of a [`DownloadPlan`], one request at a time.
///
/// Tiles are visited zoom by zoom, then x ascending, then y ascending.
/// Failed tiles are reported and counted but never stop the run. After each
/// freshly downloaded tile the configured delay is observed; cached and
/// failed tiles continue immediately.
///
/// # Example
///
/// ```ignore
/// use tilefetch::config::DownloadConfig;
/// use tilefetch::orchestrator::{DownloadPlan, NoopObserver, TileDownloader};
///
/// let config = DownloadConfig::default();
/// let plan = DownloadPlan::from_config(&config)?;
/// let downloader = TileDownloader::from_config(&config)?;
/// let report = downloader.run_and_report(&plan, &NoopObserver)?;
/// println!("{} downloaded, {} failed", report.stats.downloaded, report.stats.failed);
/// ```
pub struct TileDownloader<P: Provider> {
    fetcher: TileFetcher<P>,
    delay: Duration,
    progress_interval: u64,
    pacer: Box<dyn Pacer>,
    cancel: Arc<AtomicBool>,
}

impl TileDownloader<TileServerProvider<ReqwestClient>> {
    /// Creates a downloader talking to the configured tile server.
    pub fn from_config(config: &DownloadConfig) -> Result<Self, DownloadError> {
        let client = ReqwestClient::with_timeout(config.user_agent(), config.timeout())?;
        let provider = TileServerProvider::new(client, config.url_template().clone());
        let fetcher = TileFetcher::new(provider, config.output_dir());
        Ok(Self::new(fetcher, config))
    }
}

impl<P: Provider> TileDownloader<P> {
    /// Creates a downloader using the pacing settings of `config`.
    pub fn new(fetcher: TileFetcher<P>, config: &DownloadConfig) -> Self {
        Self {
            fetcher,
            delay: config.delay(),
            progress_interval: config.progress_interval().max(1),
            pacer: Box::new(ThreadSleepPacer),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the pacer used between downloads.
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// Share a cancellation flag, e.g. with a Ctrl-C handler.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn fetcher(&self) -> &TileFetcher<P> {
        &self.fetcher
    }

    /// Processes every tile of the plan and returns the counters.
    ///
    /// Stops before the next tile once cancellation has been requested and
    /// marks the returned stats as cancelled. A request arriving after the
    /// last tile leaves the run complete.
    pub fn run(&self, plan: &DownloadPlan, observer: &dyn DownloadObserver) -> DownloadStats {
        let mut stats = DownloadStats::new();

        for range in plan.ranges() {
            let zoom_total = range.tile_count();
            let mut zoom_done = 0u64;

            info!(
                zoom = range.zoom,
                tiles = zoom_total,
                x_min = range.x_min,
                x_max = range.x_max,
                y_min = range.y_min,
                y_max = range.y_max,
                "Starting zoom level"
            );
            observer.zoom_started(range);

            for tile in range {
                if self.is_cancelled() {
                    warn!(%tile, processed = stats.processed(), "Download cancelled");
                    stats.cancelled = true;
                    return stats;
                }

                let outcome = self.fetcher.fetch(&tile);
                stats.record(&outcome);
                zoom_done += 1;

                if let FetchOutcome::Failed { reason } = &outcome {
                    warn!(%tile, reason = %reason, "Tile failed");
                    observer.tile_failed(&tile, reason);
                }

                if zoom_done % self.progress_interval == 0 {
                    observer.progress(range.zoom, zoom_done, zoom_total);
                }

                if matches!(outcome, FetchOutcome::Downloaded { .. }) {
                    self.pacer.pause(self.delay);
                }
            }

            observer.zoom_finished(range);
        }

        stats
    }

    /// Runs the plan and summarises the output directory afterwards.
    pub fn run_and_report(
        &self,
        plan: &DownloadPlan,
        observer: &dyn DownloadObserver,
    ) -> Result<DownloadReport, DownloadError> {
        let root = self.fetcher.root().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| DownloadError::Storage {
            path: root.clone(),
            source,
        })?;

        info!(
            provider = self.fetcher.provider().name(),
            output = %root.display(),
            tiles = plan.total_tiles(),
            "Download started"
        );

        let start = Instant::now();
        let stats = self.run(plan, observer);
        let elapsed = start.elapsed();

        let storage = storage::summarize(&root).map_err(|source| DownloadError::Storage {
            path: root.clone(),
            source,
        })?;

        info!(
            downloaded = stats.downloaded,
            skipped = stats.skipped,
            failed = stats.failed,
            bytes_on_disk = storage.bytes,
            elapsed_secs = elapsed.as_secs_f64(),
            "Download finished"
        );

        Ok(DownloadReport {
            stats,
            storage,
            output_dir: root,
            elapsed,
            cancelled: stats.cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{BoundingBox, TileCoord, TileRange};
    use crate::provider::ProviderError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    /// Provider returning scripted results per tile; unknown tiles succeed.
    struct ScriptedProvider {
        failures: HashMap<TileCoord, ProviderError>,
        body: Vec<u8>,
        requests: Mutex<Vec<TileCoord>>,
    }

    impl ScriptedProvider {
        fn new(body: &[u8]) -> Self {
            Self {
                failures: HashMap::new(),
                body: body.to_vec(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, tile: TileCoord, error: ProviderError) -> Self {
            self.failures.insert(tile, error);
            self
        }
    }

    impl Provider for ScriptedProvider {
        fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(*tile);
            match self.failures.get(tile) {
                Some(e) => Err(e.clone()),
                None => Ok(self.body.clone()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn extension(&self) -> &str {
            "png"
        }
    }

    #[derive(Default)]
    struct RecordingPacer {
        pauses: Arc<Mutex<Vec<Duration>>>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, delay: Duration) {
            self.pauses.lock().unwrap().push(delay);
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: RefCell<Vec<String>>,
    }

    impl DownloadObserver for RecordingObserver {
        fn zoom_started(&self, range: &TileRange) {
            self.events.borrow_mut().push(format!("zoom {}", range.zoom));
        }

        fn tile_failed(&self, tile: &TileCoord, reason: &str) {
            self.events.borrow_mut().push(format!("failed {} {}", tile, reason));
        }

        fn progress(&self, zoom: u8, done: u64, total: u64) {
            self.events
                .borrow_mut()
                .push(format!("progress {} {}/{}", zoom, done, total));
        }
    }

    fn single_range_plan(zoom: u8, x: (u32, u32), y: (u32, u32)) -> DownloadPlan {
        // A tiny box inside tile (x.0, y.0) at `zoom`, widened by the buffer
        let nw = crate::coord::tile_to_lat_lon(&TileCoord::new(zoom, x.0, y.0));
        let se = crate::coord::tile_to_lat_lon(&TileCoord::new(zoom, x.1 + 1, y.1 + 1));
        let eps = 1e-9;
        let bounds = BoundingBox::new(nw.0 - eps, se.0 + eps, se.1 - eps, nw.1 + eps);
        DownloadPlan::new(&bounds, &[zoom], 0).unwrap()
    }

    fn config(delay_ms: u64, progress_interval: u64) -> DownloadConfig {
        DownloadConfig::default()
            .with_delay(Duration::from_millis(delay_ms))
            .with_progress_interval(progress_interval)
    }

    fn downloader(
        root: &Path,
        provider: ScriptedProvider,
        config: &DownloadConfig,
    ) -> (TileDownloader<ScriptedProvider>, Arc<Mutex<Vec<Duration>>>) {
        let pacer = RecordingPacer::default();
        let pauses = Arc::clone(&pacer.pauses);
        let downloader =
            TileDownloader::new(TileFetcher::new(provider, root), config).with_pacer(pacer);
        (downloader, pauses)
    }

    #[test]
    fn test_single_range_plan_helper() {
        let plan = single_range_plan(16, (100, 101), (200, 202));
        assert_eq!(
            plan.ranges(),
            &[TileRange {
                zoom: 16,
                x_min: 100,
                x_max: 101,
                y_min: 200,
                y_max: 202,
            }]
        );
    }

    #[test]
    fn test_transport_failure_counts_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let failing = TileCoord::new(16, 100, 200);
        let provider = ScriptedProvider::new(b"tile")
            .failing(failing, ProviderError::Transport("connection refused".into()));
        let (downloader, _) = downloader(temp.path(), provider, &config(0, 50));
        let plan = single_range_plan(16, (100, 100), (200, 201));

        let stats = downloader.run(&plan, &RecordingObserver::default());

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.downloaded, 1);
        assert_eq!(stats.skipped, 0);
        assert!(!temp.path().join("16/100/200.png").exists());
        assert!(temp.path().join("16/100/201.png").exists());
    }

    #[test]
    fn test_failure_event_names_tile_and_reason() {
        let temp = tempfile::TempDir::new().unwrap();
        let provider = ScriptedProvider::new(b"tile")
            .failing(TileCoord::new(16, 100, 201), ProviderError::HttpStatus(404));
        let (downloader, _) = downloader(temp.path(), provider, &config(0, 50));
        let observer = RecordingObserver::default();

        downloader.run(&single_range_plan(16, (100, 100), (200, 202)), &observer);

        assert_eq!(
            observer.events.into_inner(),
            vec!["zoom 16".to_string(), "failed 16/100/201 HTTP 404".to_string()]
        );
    }

    #[test]
    fn test_enumeration_order() {
        let temp = tempfile::TempDir::new().unwrap();
        let provider = ScriptedProvider::new(b"tile");
        let (downloader, _) = downloader(temp.path(), provider, &config(0, 50));

        downloader.run(&single_range_plan(12, (7, 8), (3, 4)), &RecordingObserver::default());

        let requests = downloader.fetcher().provider().requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                TileCoord::new(12, 7, 3),
                TileCoord::new(12, 7, 4),
                TileCoord::new(12, 8, 3),
                TileCoord::new(12, 8, 4),
            ]
        );
    }

    #[test]
    fn test_delay_only_after_downloads() {
        let temp = tempfile::TempDir::new().unwrap();
        // One tile already cached, one failing, two downloaded
        let cached = temp.path().join("10/5/5.png");
        fs::create_dir_all(cached.parent().unwrap()).unwrap();
        fs::write(&cached, b"old").unwrap();
        let provider = ScriptedProvider::new(b"new")
            .failing(TileCoord::new(10, 5, 6), ProviderError::HttpStatus(500));
        let (downloader, pauses) = downloader(temp.path(), provider, &config(150, 50));

        let stats = downloader.run(&single_range_plan(10, (5, 6), (5, 6)), &RecordingObserver::default());

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.downloaded, 2);
        assert_eq!(
            pauses.lock().unwrap().clone(),
            vec![Duration::from_millis(150); 2]
        );
    }

    #[test]
    fn test_progress_every_interval() {
        let temp = tempfile::TempDir::new().unwrap();
        let (downloader, _) = downloader(temp.path(), ScriptedProvider::new(b"t"), &config(0, 2));
        let observer = RecordingObserver::default();

        downloader.run(&single_range_plan(9, (1, 1), (1, 5)), &observer);

        let progress: Vec<_> = observer
            .events
            .into_inner()
            .into_iter()
            .filter(|e| e.starts_with("progress"))
            .collect();
        assert_eq!(progress, vec!["progress 9 2/5", "progress 9 4/5"]);
    }

    #[test]
    fn test_unordered_zoom_list_visits_each_zoom_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let (downloader, _) = downloader(temp.path(), ScriptedProvider::new(b"t"), &config(0, 50));
        let bounds = BoundingBox::new(39.119012, 39.097729, -77.841725, -77.868256);
        let plan = DownloadPlan::new(&bounds, &[15, 14, 14], 1).unwrap();

        let stats = downloader.run(&plan, &RecordingObserver::default());

        let requests = downloader.fetcher().provider().requests.lock().unwrap().clone();
        assert_eq!(requests.first().map(|t| t.zoom), Some(14));
        assert_eq!(requests.len(), 41);
        assert_eq!(stats.downloaded, 41);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_second_run_skips_everything() {
        let temp = tempfile::TempDir::new().unwrap();
        let plan = single_range_plan(11, (2, 3), (2, 3));

        let (first, _) = downloader(temp.path(), ScriptedProvider::new(b"abc"), &config(0, 50));
        let stats = first.run(&plan, &RecordingObserver::default());
        assert_eq!(stats.downloaded, 4);

        let (second, pauses) = downloader(temp.path(), ScriptedProvider::new(b"abc"), &config(10, 50));
        let stats = second.run(&plan, &RecordingObserver::default());

        assert_eq!(stats.skipped, 4);
        assert_eq!(stats.downloaded, 0);
        assert!(second.fetcher().provider().requests.lock().unwrap().is_empty());
        assert!(pauses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_run_stops_before_next_tile() {
        let temp = tempfile::TempDir::new().unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let (downloader, _) = downloader(temp.path(), ScriptedProvider::new(b"t"), &config(0, 50));
        let downloader = downloader.with_cancel_flag(Arc::clone(&cancel));

        let stats = downloader.run(&single_range_plan(8, (0, 1), (0, 1)), &RecordingObserver::default());

        assert_eq!(stats.processed(), 0);
        assert!(stats.cancelled);
        assert!(downloader.is_cancelled());
    }

    /// Sets the shared cancel flag once the given zoom level is finished.
    struct CancelAfterZoom {
        zoom: u8,
        cancel: Arc<AtomicBool>,
    }

    impl DownloadObserver for CancelAfterZoom {
        fn zoom_finished(&self, range: &TileRange) {
            if range.zoom == self.zoom {
                self.cancel.store(true, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_cancel_after_last_tile_reports_complete_run() {
        let temp = tempfile::TempDir::new().unwrap();
        let cancel = Arc::new(AtomicBool::new(false));
        let (downloader, _) = downloader(temp.path(), ScriptedProvider::new(b"t"), &config(0, 50));
        let downloader = downloader.with_cancel_flag(Arc::clone(&cancel));
        let observer = CancelAfterZoom { zoom: 8, cancel };

        let report = downloader
            .run_and_report(&single_range_plan(8, (0, 1), (0, 1)), &observer)
            .unwrap();

        assert_eq!(report.stats.downloaded, 4);
        assert!(!report.stats.cancelled);
        assert!(!report.cancelled);
        assert!(downloader.is_cancelled());
    }

    #[test]
    fn test_cancel_mid_run_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let cancel = Arc::new(AtomicBool::new(false));
        let (downloader, _) = downloader(temp.path(), ScriptedProvider::new(b"t"), &config(0, 50));
        let downloader = downloader.with_cancel_flag(Arc::clone(&cancel));
        let bounds = BoundingBox::new(39.119012, 39.097729, -77.841725, -77.868256);
        let plan = DownloadPlan::new(&bounds, &[14, 15], 1).unwrap();
        let observer = CancelAfterZoom { zoom: 14, cancel };

        let report = downloader.run_and_report(&plan, &observer).unwrap();

        assert_eq!(report.stats.downloaded, 16);
        assert!(report.cancelled);
    }

    #[test]
    fn test_run_and_report_sums_disk_usage() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("tiles");
        let (downloader, _) = downloader(&root, ScriptedProvider::new(&[0u8; 10]), &config(0, 50));

        let report = downloader
            .run_and_report(&single_range_plan(13, (1, 2), (1, 1)), &RecordingObserver::default())
            .unwrap();

        assert_eq!(report.stats.downloaded, 2);
        assert_eq!(report.stats.bytes_downloaded, 20);
        assert_eq!(report.storage.files, 2);
        assert_eq!(report.storage.bytes, 20);
        assert_eq!(report.output_dir, root);
        assert!(!report.cancelled);
    }
}
