//! Import ReaderBench, Coh-Metrix and GAMET exports and score them with
//! pre-trained regression ensembles.
//!
//! ```no_run
//! use std::path::Path;
//! use essay_scorer::{pipeline, Config};
//!
//! let config = Config::default().with_model_dir("models");
//! let scores = pipeline::cws_ciws_from_files(
//!     Path::new("readerbench.csv"),
//!     Path::new("gamet.csv"),
//!     &config,
//!     Some(Path::new("cws_ciws.csv")),
//! )?;
//! println!("scored {} essays", scores.len());
//! # Ok::<(), essay_scorer::ScoreError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod import;
pub mod pipeline;
pub mod predict;

pub use config::Config;
pub use data::identifier::IdRule;
pub use data::merge::merge_on_id;
pub use data::model::{Row, Table, Value, ID_COLUMN};
pub use error::{Result, ScoreError};
pub use export::{attach_predictions, export_predictions, write_csv};
pub use import::{import_cohmetrix, import_gamet, import_readerbench};
pub use predict::{predict, DirectoryModelSource, Mode, Model, ModelRegistry, ModelSource};
