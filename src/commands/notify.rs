//! `grove notify` command.

use std::io::Read;
use std::path::Path;

use crate::notification::{PushPayload, PushToast};

/// Execute the `notify` command: show how a push payload would be presented.
///
/// Reads the payload from `file`, or from stdin when no file is given.
///
/// # Errors
///
/// Returns an error string if the payload cannot be read or is not valid JSON.
pub fn run(file: Option<&Path>, json: bool) -> Result<(), String> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            raw
        }
    };

    let toast = PushToast::from_payload(&PushPayload::parse(&raw)?);
    tracing::debug!(title = %toast.title, "presenting push notification");

    if json {
        let out = serde_json::to_string_pretty(&toast)
            .map_err(|e| format!("Failed to serialize notification: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", render(&toast));
    }
    Ok(())
}

fn render(toast: &PushToast) -> String {
    let mut out = format!("{}\n{}\nicon: {}\n", toast.title, toast.body, toast.icon);
    if let Some(data) = &toast.data {
        out.push_str(&format!("data: {data}\n"));
    }
    out
}
