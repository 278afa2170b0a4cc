// Résumé pipeline: schema prompt, payload recovery (JSON path + heuristic
// fallback), and the HTTP handlers tying upload → prompt → provider →
// recovery → store together. All generative API calls go through `providers`.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod recovery;
