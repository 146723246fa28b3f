//! Test helpers for building catalogs and answering routing calls.

use camino::Utf8PathBuf;
use tempfile::TempDir;
use yatra_core::test_support::{StubRoutingProvider, sample_route};

pub(super) const CATALOG: &str = r#"[
    {"id": 1, "name": "Simhachalam", "latitude": 17.7665, "longitude": 83.2505,
     "dtname": "Visakhapatnam", "god_categy": "Vishnu"},
    {"id": 2, "name": "Kanaka Durga", "latitude": 16.5158, "longitude": 80.6050,
     "dtname": "Krishna", "god_categy": "Shakti"},
    {"id": 3, "name": "Sri Kanaka Mahalakshmi", "latitude": 17.7128, "longitude": 83.3017,
     "dtname": "Visakhapatnam", "god_categy": "Shakti"},
    {"id": 4, "name": "Unmapped", "latitude": null, "longitude": 80.0,
     "dtname": "Krishna", "god_categy": "Shiva"}
]"#;

/// A temporary directory holding `temples.json`.
pub(super) struct CatalogDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl CatalogDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        yatra_fs::write_file(&root.join("temples.json"), CATALOG.as_bytes())
            .expect("write catalog");
        Self { _dir: dir, root }
    }

    pub(super) fn catalog(&self) -> Utf8PathBuf {
        self.root.join("temples.json")
    }

    pub(super) fn root(&self) -> &Utf8PathBuf {
        &self.root
    }
}

impl std::fmt::Debug for CatalogDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDir").field("root", &self.root).finish()
    }
}

/// Answer the next provider call with a fixed route once it is dispatched.
pub(super) fn answer_next_call(provider: StubRoutingProvider) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Some(call) = provider.last_call() {
                assert!(call.succeed(sample_route(call.waypoints(), 21_500.0)));
                break;
            }
            tokio::task::yield_now().await;
        }
    })
}
