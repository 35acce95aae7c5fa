//! # Dreamframe
//!
//! A generative-art picture frame pipeline. One run picks a random prompt
//! (from a static list or a live news feed), asks an external Stable
//! Diffusion process to paint it, stamps the prompt text onto a copy of the
//! result, and publishes everything under deterministic filenames so a
//! display consumer can always read one fixed path.
//!
//! # Architecture: One Sequential Pipeline
//!
//! ```text
//! prompt list / feed ─┐
//!                     ├→ combined prompt → identifier → synthesis process
//! style list ─────────┘                                       │
//!                                                      raw raster (.png)
//!                                                             │
//!                                            overlay copy (_with_prompt.png)
//!                                            sidecar (.txt)
//!                                            alias (output.png)
//! ```
//!
//! Every stage is fatal on failure — a bad prompt or a failed synthesis run
//! must never publish a partial artifact set, because the display consumer
//! reads the alias blindly on a timer.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | JSON string-list loading with schema validation |
//! | [`prompt`] | Prompt and style selection — static lists, explicit override, feed dispatch |
//! | [`feed`] | Live-feed branch: fetch a syndication feed, pick an entry title |
//! | [`naming`] | Deterministic, filesystem-safe artifact identifiers |
//! | [`synth`] | `Synthesizer` trait + OnnxStream process invocation |
//! | [`overlay`] | Word-wrapped prompt text with outline styling, stamped onto the raster |
//! | [`publish`] | Artifact persistence: raw, annotated copy, sidecar, stable alias |
//! | [`pipeline`] | End-to-end orchestration and the aggregate error type |
//! | [`display`] | Pre-display adaptation: orientation rotate + resize to panel resolution |
//! | [`library`] | Immich photo-library client — one random photo of one random person |
//! | [`output`] | CLI output formatting for run results |
//!
//! # Design Decisions
//!
//! ## External Synthesis Process
//!
//! Image synthesis is an opaque capability behind the [`synth::Synthesizer`]
//! trait. The production implementation shells out to OnnxStream's `sd`
//! binary — the only thing that fits in a Raspberry Pi's memory — and treats
//! it as a black box with binary success/failure. Tests swap in a mock that
//! writes a blank raster, so the whole pipeline is testable without a model.
//!
//! ## Deterministic Artifact Names
//!
//! The identifier encodes prompt, seed, steps, and resolution
//! ([`naming::derive_identifier`]). Same inputs, same filename — re-running
//! with identical parameters overwrites rather than accumulates, and the
//! four artifacts of one run are associable by stem alone.
//!
//! ## Explicit Randomness
//!
//! Every selection takes `&mut impl Rng`. The CLI picks a seed once at
//! startup and threads it down; tests inject `StdRng::seed_from_u64` and get
//! reproducible choices. No ambient RNG state anywhere in the library.
//!
//! ## Degrade-Not-Fail Fonts
//!
//! The overlay tries system TrueType faces and falls back to a built-in 5×7
//! bitmap face when none load. A missing font must never kill a run that
//! already spent minutes synthesizing an image.

pub mod config;
pub mod display;
pub mod feed;
pub mod library;
pub mod naming;
pub mod output;
pub mod overlay;
pub mod pipeline;
pub mod prompt;
pub mod publish;
pub mod synth;

#[cfg(test)]
pub(crate) mod test_helpers;
