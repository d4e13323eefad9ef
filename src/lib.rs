// Library root
// -----------
// The binary (`main.rs`) builds an `UploadConfig` and a `GoogleCodeClient`
// and hands them to `ui::run`.
//
// Module responsibilities:
// - `config`: fixed paths, project/author literals and env overrides.
// - `context`: reads the credential, the release version and the
//   description table.
// - `select`: picks the release files that have a known description.
// - `labels`: platform labels derived from a file name.
// - `api`: the `FileHost` seam and the HTTP client for the file service.
// - `upload`: uploads each selected file and collects per-file outcomes.
// - `ui`: console transcript, confirmation prompt and the overall flow.
pub mod api;
pub mod config;
pub mod context;
pub mod labels;
pub mod select;
pub mod ui;
pub mod upload;
