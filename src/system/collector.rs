use std::path::Path;

use sysinfo::{Disks, System};
use tracing::debug;

use super::snapshot::UsageSnapshot;

/// Owns the sysinfo handles and turns refreshes into [`UsageSnapshot`]s.
///
/// CPU percentages need two refreshes separated by a sampling window before
/// they mean anything, so `new` performs a priming refresh and the first
/// ticked snapshot is already meaningful.
pub struct Collector {
    sys: System,
    disks: Disks,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        let disks = Disks::new_with_refreshed_list();
        Collector { sys, disks }
    }

    pub fn refresh(&mut self) -> UsageSnapshot {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.disks.refresh(true);

        let (disk_used, disk_total) = self.root_disk_usage();
        let snapshot = UsageSnapshot::from_totals(
            self.sys.global_cpu_usage(),
            self.sys.used_memory(),
            self.sys.total_memory(),
            disk_used,
            disk_total,
        );
        debug!(
            cpu = snapshot.cpu_percent,
            memory = snapshot.memory_percent,
            disk = snapshot.disk_percent,
            "metrics refreshed"
        );
        snapshot
    }

    /// Used/total bytes for the disk mounted at the filesystem root. When no
    /// root mount is reported (Windows), the largest disk stands in. No
    /// disks at all degrades to (0, 0).
    fn root_disk_usage(&self) -> (u64, u64) {
        let root = Path::new("/");
        let disk = self
            .disks
            .list()
            .iter()
            .find(|d| d.mount_point() == root)
            .or_else(|| self.disks.list().iter().max_by_key(|d| d.total_space()));

        match disk {
            Some(d) => (
                d.total_space().saturating_sub(d.available_space()),
                d.total_space(),
            ),
            None => (0, 0),
        }
    }
}
