//! Shared fixtures for pipeline integration tests: throwaway git
//! repositories (a bare origin plus a working clone) and canned price
//! sources, so no test touches the network or a real remote.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use corrtrack_coingecko::{PriceSource, SourceError};
use corrtrack_core::series::{PricePoint, MS_PER_DAY};
use corrtrack_core::token::TRACKED_TOKENS;

/// 2024-01-01 00:00:00 UTC in milliseconds; first day of fake series.
pub const DAY0_MS: i64 = 1_704_067_200_000;

/// A bare origin repository and a working clone of it, both inside one
/// temporary directory that is removed on drop.
pub struct TestRepos {
    _tmp: tempfile::TempDir,
    /// Bare repository acting as the push remote.
    pub origin: PathBuf,
    /// Clone the pipeline runs in.
    pub work: PathBuf,
}

/// Run a git command in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("git binary available");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create an origin + clone pair with one seed commit containing a
/// README and an initial correlation data file, already pushed.
pub fn init_repos() -> TestRepos {
    let tmp = tempfile::tempdir().expect("tempdir");
    let origin = tmp.path().join("origin.git");
    let work = tmp.path().join("work");

    git(tmp.path(), &["init", "--bare", origin.to_str().unwrap()]);
    git(
        tmp.path(),
        &[
            "clone",
            origin.to_str().unwrap(),
            work.to_str().unwrap(),
        ],
    );

    std::fs::create_dir_all(work.join("data/correlation")).expect("create data dir");
    std::fs::write(work.join("README.md"), "# correlation data\n").expect("write readme");
    std::fs::write(
        work.join("data/correlation/seed.json"),
        "{\n  \"seed\": true\n}",
    )
    .expect("write seed file");

    git(&work, &["add", "."]);
    git(
        &work,
        &[
            "-c",
            "user.name=seed",
            "-c",
            "user.email=seed@example.com",
            "commit",
            "-m",
            "seed data repo",
        ],
    );
    git(&work, &["push", "origin", "HEAD"]);

    TestRepos {
        _tmp: tmp,
        origin,
        work,
    }
}

/// HEAD commit hash of the bare origin repository.
pub fn origin_head(repos: &TestRepos) -> String {
    git(&repos.origin, &["rev-parse", "HEAD"])
}

/// Price source serving deterministic in-memory series per coin ID,
/// counting how often it is called.
pub struct FakeSource {
    series: BTreeMap<String, Vec<PricePoint>>,
    calls: AtomicUsize,
}

impl FakeSource {
    /// Source with an explicit series map; coins absent from the map
    /// fail with a source error.
    pub fn new(series: BTreeMap<String, Vec<PricePoint>>) -> Self {
        Self {
            series,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source serving `days` points for every tracked token, with
    /// distinct but deterministic price movement per token.
    pub fn with_tracked_tokens(days: usize) -> Self {
        let mut series = BTreeMap::new();
        for (index, token) in TRACKED_TOKENS.iter().enumerate() {
            series.insert(token.coin_id.to_string(), synthetic_series(index, days));
        }
        Self::new(series)
    }

    /// Source that fails every fetch.
    pub fn failing() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Number of `fetch_daily` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for FakeSource {
    async fn fetch_daily(&self, coin_id: &str, _days: u32) -> Result<Vec<PricePoint>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .get(coin_id)
            .cloned()
            .ok_or_else(|| SourceError::Other(format!("no canned series for {coin_id}")))
    }
}

/// Deterministic daily price series with non-constant returns, varied
/// per token by `seed` so pairwise correlations are defined but not
/// trivially 1.0.
pub fn synthetic_series(seed: usize, days: usize) -> Vec<PricePoint> {
    let base = 100.0 * (seed + 1) as f64;
    (0..days)
        .map(|i| PricePoint {
            timestamp: DAY0_MS + i as i64 * MS_PER_DAY,
            price: base + ((i * (seed + 3)) % 7) as f64 + i as f64 * 0.5,
        })
        .collect()
}
