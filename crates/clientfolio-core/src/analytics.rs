//! Aggregate statistics over the folder collection.
//!
//! Everything here is a pure function of `&[Folder]` and is cheap enough to
//! recompute on every render, so nothing is cached.

use serde::Serialize;

use crate::client::Client;
use crate::folder::Folder;

/// Default number of entries in the recent-clients list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Folder names longer than this are shortened in chart labels.
pub const LABEL_MAX_CHARS: usize = 15;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub folder_count: usize,
    pub total_active: usize,
    pub total_potential: usize,
    pub total_clients: usize,
    /// Percentage of clients that are active, rounded half-up.
    pub conversion_rate: u32,
    pub avg_clients_per_folder: usize,
    /// Name of the first folder holding the most clients.
    pub most_populated_folder: Option<String>,
}

impl Analytics {
    pub fn compute(folders: &[Folder]) -> Self {
        let total_active: usize = folders.iter().map(|f| f.active_clients.len()).sum();
        let total_potential: usize = folders.iter().map(|f| f.potential_clients.len()).sum();
        let total_clients = total_active + total_potential;

        let conversion_rate = if total_clients == 0 {
            0
        } else {
            round_div(100 * total_active, total_clients) as u32
        };
        let avg_clients_per_folder = if folders.is_empty() {
            0
        } else {
            round_div(total_clients, folders.len())
        };

        Self {
            folder_count: folders.len(),
            total_active,
            total_potential,
            total_clients,
            conversion_rate,
            avg_clients_per_folder,
            most_populated_folder: most_populated_folder(folders).map(|f| f.name.clone()),
        }
    }

    /// Display form of the most populated folder ("N/A" when there are none).
    pub fn most_populated_label(&self) -> &str {
        self.most_populated_folder.as_deref().unwrap_or("N/A")
    }
}

/// Round `num / den` half-up. `den` must be non-zero.
fn round_div(num: usize, den: usize) -> usize {
    (2 * num + den) / (2 * den)
}

/// The folder with the most clients; ties go to the earliest folder.
pub fn most_populated_folder(folders: &[Folder]) -> Option<&Folder> {
    folders.iter().fold(None, |best: Option<&Folder>, folder| match best {
        Some(b) if b.client_count() >= folder.client_count() => Some(b),
        _ => Some(folder),
    })
}

/// Newest clients first, at most `limit` of them.
///
/// Candidates are every folder's active clients followed by every folder's
/// potential clients; the sort is stable so equal timestamps keep that order.
pub fn recent_clients(folders: &[Folder], limit: usize) -> Vec<&Client> {
    let mut clients: Vec<&Client> = folders
        .iter()
        .flat_map(|f| f.active_clients.iter())
        .chain(folders.iter().flat_map(|f| f.potential_clients.iter()))
        .collect();
    clients.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    clients.truncate(limit);
    clients
}

/// Active vs. potential totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub active: usize,
    pub potential: usize,
}

pub fn distribution(folders: &[Folder]) -> Distribution {
    Distribution {
        active: folders.iter().map(|f| f.active_clients.len()).sum(),
        potential: folders.iter().map(|f| f.potential_clients.len()).sum(),
    }
}

/// Per-folder counts for a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderBreakdown {
    pub label: String,
    pub active: usize,
    pub potential: usize,
}

pub fn folder_breakdown(folders: &[Folder]) -> Vec<FolderBreakdown> {
    folders
        .iter()
        .map(|f| FolderBreakdown {
            label: chart_label(&f.name),
            active: f.active_clients.len(),
            potential: f.potential_clients.len(),
        })
        .collect()
}

fn chart_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let short: String = name.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", short)
    } else {
        name.to_string()
    }
}
