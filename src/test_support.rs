//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).
//! Every collaborator has a recording fake; [`Harness`] wires them into a
//! [`Services`] value the way the session does.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::core::input::InputControl;
use crate::core::platform::{HostOs, Platform};
use crate::core::registry::CommandRegistry;
use crate::services::{
    Console, Device, FileSystem, HostEnv, InstallPipeline, LiveSync, LiveSyncOptions,
    PrepareController, PreparePipeline, ProcessSpawner, ProjectData, ServiceError, Services,
    StartService, StreamingProcess, Tone,
};

fn snapshot<T: Clone>(m: &Mutex<Vec<T>>) -> Vec<T> {
    m.lock().unwrap().clone()
}

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeInput {
    suspended: AtomicBool,
    suspends: AtomicUsize,
    resumes: AtomicUsize,
}

impl FakeInput {
    pub fn suspend_calls(&self) -> usize {
        self.suspends.load(Ordering::SeqCst)
    }

    pub fn resume_calls(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    pub fn is_suspended_now(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    /// Puts the fake in the suspended state without counting a call.
    pub fn force_suspended(&self) {
        self.suspended.store(true, Ordering::SeqCst);
    }
}

impl InputControl for FakeInput {
    fn suspend(&self) {
        self.suspends.fetch_add(1, Ordering::SeqCst);
        self.suspended.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.suspended.store(false, Ordering::SeqCst);
    }

    fn is_suspended(&self) -> bool {
        self.is_suspended_now()
    }
}

// ── Start service ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStart {
    calls: Mutex<Vec<&'static str>>,
}

impl FakeStart {
    pub fn calls(&self) -> Vec<&'static str> {
        snapshot(&self.calls)
    }
}

#[async_trait]
impl StartService for FakeStart {
    async fn run_android(&self) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push("android");
        Ok(())
    }

    async fn run_ios(&self) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push("ios");
        Ok(())
    }
}

// ── Live sync ───────────────────────────────────────────────────────────────

pub type Operation = (Vec<String>, Platform, LiveSyncOptions);

#[derive(Default)]
pub struct FakeLiveSync {
    operations: Mutex<Vec<Operation>>,
    device_requests: Mutex<Vec<Platform>>,
    stops: AtomicUsize,
    fail: AtomicBool,
    hold: AtomicBool,
    release: Notify,
}

impl FakeLiveSync {
    pub fn operations(&self) -> Vec<Operation> {
        snapshot(&self.operations)
    }

    pub fn device_requests(&self) -> Vec<Platform> {
        snapshot(&self.device_requests)
    }

    pub fn stop_calls(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Every live-sync operation from now on is rejected.
    pub fn fail_operations(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Operations wait for [`FakeLiveSync::release`] before settling.
    pub fn hold_operations(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl LiveSync for FakeLiveSync {
    fn validate_platform(&self, _platform: Platform) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn get_device_instances(&self, platform: Platform) -> Result<Vec<Device>, ServiceError> {
        self.device_requests.lock().unwrap().push(platform);
        Ok(vec![Device {
            identifier: "emulator-5554".to_string(),
            display_name: Some("Pixel_7".to_string()),
            platform: Some("Android".to_string()),
            status: Some("Connected".to_string()),
        }])
    }

    async fn execute_live_sync_operation(
        &self,
        devices: &[Device],
        platform: Platform,
        options: LiveSyncOptions,
    ) -> Result<(), ServiceError> {
        let ids = devices.iter().map(|d| d.identifier.clone()).collect();
        self.operations.lock().unwrap().push((ids, platform, options));
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Process {
                command: "ns run".to_string(),
                message: "live sync rejected".to_string(),
            });
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Pipelines ───────────────────────────────────────────────────────────────

/// Suspends input while "running", like the real attached pipelines.
pub struct FakePrepare {
    input: Arc<FakeInput>,
    calls: Mutex<Vec<Vec<Platform>>>,
    fail: AtomicBool,
}

impl FakePrepare {
    pub fn calls(&self) -> Vec<Vec<Platform>> {
        snapshot(&self.calls)
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PreparePipeline for FakePrepare {
    async fn execute(&self, platforms: &[Platform]) -> Result<(), ServiceError> {
        self.input.suspend();
        self.calls.lock().unwrap().push(platforms.to_vec());
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Validation("prepare failed".to_string()));
        }
        Ok(())
    }
}

pub struct FakeInstall {
    input: Arc<FakeInput>,
    calls: Mutex<Vec<Vec<String>>>,
    fail: AtomicBool,
}

impl FakeInstall {
    pub fn calls(&self) -> Vec<Vec<String>> {
        snapshot(&self.calls)
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl InstallPipeline for FakeInstall {
    async fn execute(&self, args: &[String]) -> Result<(), ServiceError> {
        self.input.suspend();
        self.calls.lock().unwrap().push(args.to_vec());
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Validation("install failed".to_string()));
        }
        Ok(())
    }
}

// ── Watcher ─────────────────────────────────────────────────────────────────

/// Replays queued responses; with none queued it flips a paused flag.
#[derive(Default)]
pub struct FakeWatcher {
    responses: Mutex<VecDeque<Result<bool, ServiceError>>>,
    paused: AtomicBool,
}

impl FakeWatcher {
    pub fn respond(&self, response: Result<bool, ServiceError>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl PrepareController for FakeWatcher {
    async fn toggle_file_watcher(&self) -> Result<bool, ServiceError> {
        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }
        Ok(!self.paused.fetch_xor(true, Ordering::SeqCst))
    }
}

// ── Project & file system ───────────────────────────────────────────────────

pub struct FakeProject {
    platforms_dir: PathBuf,
}

impl ProjectData for FakeProject {
    fn initialize_project_data(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    fn platforms_dir(&self) -> PathBuf {
        self.platforms_dir.clone()
    }
}

#[derive(Default)]
pub struct FakeFs {
    existing: Mutex<HashSet<PathBuf>>,
    dirs: Mutex<HashMap<PathBuf, Vec<PathBuf>>>,
}

impl FakeFs {
    pub fn add(&self, path: &str) {
        self.existing.lock().unwrap().insert(PathBuf::from(path));
    }

    /// Adds a directory and its entries.
    pub fn add_dir(&self, path: &str, entries: &[&str]) {
        let dir = PathBuf::from(path);
        let children: Vec<PathBuf> = entries.iter().map(|e| dir.join(e)).collect();
        {
            let mut existing = self.existing.lock().unwrap();
            existing.insert(dir.clone());
            existing.extend(children.iter().cloned());
        }
        self.dirs.lock().unwrap().insert(dir, children);
    }
}

impl FileSystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing.lock().unwrap().contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.dirs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
    }
}

// ── Processes ───────────────────────────────────────────────────────────────

/// Delivers scripted chunks; stops delivering once interrupted.
struct FakeProcess {
    chunks: VecDeque<String>,
    delivered: usize,
    interrupted: bool,
    interrupts: Arc<Mutex<Vec<usize>>>,
}

#[async_trait]
impl StreamingProcess for FakeProcess {
    async fn next_output(&mut self) -> Option<String> {
        if self.interrupted {
            return None;
        }
        let chunk = self.chunks.pop_front()?;
        self.delivered += 1;
        Some(chunk)
    }

    fn interrupt(&mut self) -> Result<(), ServiceError> {
        self.interrupted = true;
        self.interrupts.lock().unwrap().push(self.delivered);
        Ok(())
    }

    async fn wait(&mut self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSpawner {
    script: Mutex<Vec<String>>,
    spawned: Mutex<Vec<(String, Vec<String>)>>,
    launches: Mutex<Vec<(String, Vec<String>)>>,
    /// Chunks delivered at each interrupt.
    interrupts: Arc<Mutex<Vec<usize>>>,
}

impl FakeSpawner {
    /// Output for the next spawned process.
    pub fn script(&self, chunks: &[&str]) {
        *self.script.lock().unwrap() = chunks.iter().map(|c| c.to_string()).collect();
    }

    pub fn spawned(&self) -> Vec<(String, Vec<String>)> {
        snapshot(&self.spawned)
    }

    pub fn launches(&self) -> Vec<(String, Vec<String>)> {
        snapshot(&self.launches)
    }

    pub fn interrupts(&self) -> Vec<usize> {
        self.interrupts.lock().unwrap().clone()
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn_streaming(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<Box<dyn StreamingProcess>, ServiceError> {
        self.spawned
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        let chunks = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::new(FakeProcess {
            chunks: chunks.into(),
            delivered: 0,
            interrupted: false,
            interrupts: Arc::clone(&self.interrupts),
        }))
    }

    fn launch(&self, program: &str, args: &[String]) -> Result<(), ServiceError> {
        self.launches
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok(())
    }
}

// ── Console ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CaptureConsole {
    lines: Mutex<Vec<(Tone, String)>>,
    passthrough: Mutex<Vec<String>>,
}

impl CaptureConsole {
    pub fn lines(&self) -> Vec<(Tone, String)> {
        snapshot(&self.lines)
    }

    pub fn passthrough(&self) -> Vec<String> {
        snapshot(&self.passthrough)
    }
}

impl Console for CaptureConsole {
    fn line(&self, tone: Tone, text: &str) {
        self.lines.lock().unwrap().push((tone, text.to_string()));
    }

    fn passthrough(&self, text: &str) {
        self.passthrough.lock().unwrap().push(text.to_string());
    }
}

// ── Harness ─────────────────────────────────────────────────────────────────

/// All fakes plus the `Services` built from them. The project lives at
/// `/project`, the home directory at `/home/dev`, the host CLI is `ns`.
pub struct Harness {
    pub services: Arc<Services>,
    pub start: Arc<FakeStart>,
    pub live_sync: Arc<FakeLiveSync>,
    pub prepare: Arc<FakePrepare>,
    pub install: Arc<FakeInstall>,
    pub watcher: Arc<FakeWatcher>,
    pub fs: Arc<FakeFs>,
    pub spawner: Arc<FakeSpawner>,
    pub console: Arc<CaptureConsole>,
    pub input: Arc<FakeInput>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_host(HostOs::Linux)
    }

    pub fn with_host(os: HostOs) -> Self {
        let input = Arc::new(FakeInput::default());
        let start = Arc::new(FakeStart::default());
        let live_sync = Arc::new(FakeLiveSync::default());
        let prepare = Arc::new(FakePrepare {
            input: Arc::clone(&input),
            calls: Mutex::default(),
            fail: AtomicBool::new(false),
        });
        let install = Arc::new(FakeInstall {
            input: Arc::clone(&input),
            calls: Mutex::default(),
            fail: AtomicBool::new(false),
        });
        let watcher = Arc::new(FakeWatcher::default());
        let fs = Arc::new(FakeFs::default());
        let spawner = Arc::new(FakeSpawner::default());
        let console = Arc::new(CaptureConsole::default());

        let services = Arc::new(Services {
            start: start.clone(),
            live_sync: live_sync.clone(),
            prepare: prepare.clone(),
            install: install.clone(),
            watcher: watcher.clone(),
            project: Arc::new(FakeProject {
                platforms_dir: PathBuf::from("/project/platforms"),
            }),
            processes: spawner.clone(),
            fs: fs.clone(),
            console: console.clone(),
            input: input.clone(),
            host: HostEnv {
                os,
                home: Some(PathBuf::from("/home/dev")),
                cli: "ns".to_string(),
            },
            registry: OnceLock::new(),
        });
        services.attach_registry(Arc::new(CommandRegistry::with_defaults()));

        Self {
            services,
            start,
            live_sync,
            prepare,
            install,
            watcher,
            fs,
            spawner,
            console,
            input,
        }
    }
}
