//! Plain-text export of clients and folders.

use crate::client::{Client, ClientKind};
use crate::folder::Folder;

/// The block copied to the clipboard for a single client.
pub fn clipboard_text(client: &Client) -> String {
    format!(
        "Business Name: {}\nContact Details: {}\nProblem: {}",
        client.business_name, client.contact_details, client.problem_description
    )
}

/// A whole folder as text: the name, then each section with its clients.
pub fn folder_text(folder: &Folder) -> String {
    let mut out = format!("{} ({} clients)\n", folder.name, folder.client_count());
    for kind in [ClientKind::Active, ClientKind::Potential] {
        let clients = folder.clients(kind);
        out.push_str(&format!("\n{} ({})\n", kind.section_title(), clients.len()));
        if clients.is_empty() {
            out.push_str("  (none)\n");
        }
        for client in clients {
            out.push('\n');
            for line in clipboard_text(client).lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}
