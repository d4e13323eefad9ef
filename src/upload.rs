// Uploader: publishes every selected file, one at a time. A failed file is
// reported and the loop moves on.

use crate::api::{FileHost, UploadRequest, UploadResponse};
use crate::config::UploadConfig;
use crate::labels::labels_for;
use crate::select::SelectionSet;
use crate::ui::Transcript;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { location: String },
    Failed { status: u16, reason: String },
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        match response.location {
            Some(location) if !location.is_empty() => UploadOutcome::Succeeded { location },
            _ => UploadOutcome::Failed {
                status: response.status,
                reason: response.reason,
            },
        }
    }
}

/// Upload each file in `selection` (in filename order) and report the
/// result. Only errors writing the transcript are returned.
pub fn upload_all<H: FileHost, W: Write>(
    host: &H,
    config: &UploadConfig,
    credential: &str,
    selection: &SelectionSet,
    transcript: &mut Transcript<W>,
) -> Result<Vec<(String, UploadOutcome)>> {
    let mut outcomes = Vec::with_capacity(selection.len());
    for (filename, description) in selection {
        let path = config.dist_dir.join(filename);
        let labels = labels_for(filename);
        let request = UploadRequest {
            path: &path,
            project: &config.project,
            author: &config.author,
            credential,
            summary: description,
            labels: &labels,
        };

        let spinner = spinner(filename);
        let outcome = match host.upload(&request) {
            Ok(response) => UploadOutcome::from(response),
            Err(e) => {
                tracing::warn!(file = %filename, error = %format!("{:#}", e), "upload request failed");
                UploadOutcome::Failed {
                    status: 0,
                    reason: e.root_cause().to_string(),
                }
            }
        };
        spinner.finish_and_clear();

        transcript.outcome(&outcome)?;
        outcomes.push((filename.clone(), outcome));
    }
    Ok(outcomes)
}

fn spinner(filename: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Uploading {}...", filename));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    /// Answers from a script keyed by file name and records every request.
    struct ScriptedHost {
        calls: RefCell<Vec<(String, String, Vec<String>)>>,
    }

    impl FileHost for ScriptedHost {
        fn upload(&self, request: &UploadRequest<'_>) -> Result<UploadResponse> {
            let name = request.path.file_name().unwrap().to_str().unwrap().to_string();
            self.calls.borrow_mut().push((
                name.clone(),
                request.summary.to_string(),
                request.labels.iter().map(ToString::to_string).collect(),
            ));
            if name.contains("win32") {
                return Err(anyhow::anyhow!("connection reset")
                    .context("error sending request")
                    .context("Failed to send upload request"));
            }
            if name.contains("darwin") {
                return Ok(UploadResponse {
                    status: 403,
                    reason: "Forbidden".into(),
                    location: None,
                });
            }
            Ok(UploadResponse {
                status: 201,
                reason: "Created".into(),
                location: Some(format!("https://avbin.googlecode.com/files/{}", name)),
            })
        }
    }

    fn selection(names: &[&str]) -> SelectionSet {
        names.iter().map(|n| (n.to_string(), format!("desc {}", n))).collect()
    }

    #[test]
    fn response_without_location_is_failure() {
        let outcome = UploadOutcome::from(UploadResponse {
            status: 201,
            reason: "Created".into(),
            location: Some(String::new()),
        });
        assert_eq!(
            outcome,
            UploadOutcome::Failed {
                status: 201,
                reason: "Created".into()
            }
        );
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let host = ScriptedHost {
            calls: RefCell::new(Vec::new()),
        };
        let config = UploadConfig::new(Path::new("/r"), Path::new("/h"));
        let mut transcript = Transcript::plain(Vec::new());

        let outcomes = upload_all(
            &host,
            &config,
            "pw",
            &selection(&["avbin-win32-7.zip", "avbin-darwin-7.tar.gz", "avbin-linux-7.tar.gz"]),
            &mut transcript,
        )
        .unwrap();

        assert_eq!(host.calls.borrow().len(), 3);
        assert_eq!(
            outcomes.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            vec!["avbin-darwin-7.tar.gz", "avbin-linux-7.tar.gz", "avbin-win32-7.zip"]
        );
        let text = String::from_utf8(transcript.into_inner()).unwrap();
        assert_eq!(
            text,
            "Error: Forbidden (403)\n\
             OK: https://avbin.googlecode.com/files/avbin-linux-7.tar.gz\n\
             Error: connection reset (0)\n"
        );
    }

    #[test]
    fn request_carries_description_and_labels() {
        let host = ScriptedHost {
            calls: RefCell::new(Vec::new()),
        };
        let config = UploadConfig::new(Path::new("/r"), Path::new("/h"));
        let mut transcript = Transcript::plain(Vec::new());

        upload_all(&host, &config, "pw", &selection(&["avbin-1.0-src.zip"]), &mut transcript).unwrap();

        let calls = host.calls.borrow();
        assert_eq!(
            calls[0],
            (
                "avbin-1.0-src.zip".to_string(),
                "desc avbin-1.0-src.zip".to_string(),
                vec!["Featured".to_string(), "Type-Source".to_string()]
            )
        );
    }
}
