//! Write a small deterministic data set for trying the scorer by hand:
//! ReaderBench, GAMET and Coh-Metrix exports plus model artifacts for every
//! default ensemble slot.
//!
//! Usage: `generate_sample [OUT_DIR]` (defaults to `sample_data`).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use essay_scorer::predict::artifact::{LinearModel, ModelArtifact, Node, Tree, TreeEnsemble};
use essay_scorer::predict::{Mode, ModelRegistry};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Per-essay measurements shared by the three exports.
struct Essay {
    id: String,
    words: u32,
    sentences: u32,
    grammar: u32,
    misspelling: u32,
    entropy: f64,
    ttr: f64,
}

fn essays(rng: &mut SimpleRng, n: usize) -> Vec<Essay> {
    (1..=n)
        .map(|i| {
            let words = rng.range(60.0, 400.0) as u32;
            Essay {
                id: format!("essay_{i:03}"),
                words,
                sentences: (words / rng.range(8.0, 20.0) as u32).max(1),
                grammar: rng.range(0.0, words as f64 * 0.05) as u32,
                misspelling: rng.range(0.0, words as f64 * 0.04) as u32,
                entropy: rng.range(4.0, 7.5),
                ttr: rng.range(0.4, 0.9),
            }
        })
        .collect()
}

fn windows_path(id: &str) -> String {
    format!("C:\\essays\\{id}.txt")
}

fn readerbench_csv(essays: &[Essay]) -> String {
    let mut out = String::from("SEP=,\nFile name,Words,Sentences,WordEntropy,AvgWordsList_joy,AvgWordsList_anger\n");
    for e in essays {
        let _ = writeln!(
            out,
            "{},{},{},{:.4},0.0,0.0",
            e.id, e.words, e.sentences, e.entropy
        );
    }
    out
}

fn gamet_csv(essays: &[Essay], rng: &mut SimpleRng) -> String {
    let mut out = String::from("filename,error_count,word_count,grammar,misspelling\n");
    for e in essays {
        let other = rng.range(0.0, 3.0) as u32;
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            windows_path(&e.id),
            e.grammar + e.misspelling + other,
            e.words,
            e.grammar,
            e.misspelling
        );
    }
    // Only in GAMET: dropped by the merge.
    let _ = writeln!(out, "{},1,50,0,1", windows_path("essay_orphan"));
    out
}

fn cohmetrix_csv(essays: &[Essay]) -> String {
    let mut out = String::from("TextID,DESWC,DESSC,LDTTRc\n");
    for e in essays {
        let _ = writeln!(
            out,
            "{},{},{},{:.4}",
            windows_path(&e.id),
            e.words,
            e.sentences,
            e.ttr
        );
    }
    out
}

fn linear(intercept: f64, coefs: &[(&str, f64)]) -> ModelArtifact {
    ModelArtifact::Linear(LinearModel {
        intercept,
        coefficients: coefs
            .iter()
            .map(|(f, c)| (f.to_string(), *c))
            .collect::<BTreeMap<_, _>>(),
    })
}

fn stump(base: f64, feature: &str, threshold: f64, low: f64, high: f64) -> ModelArtifact {
    ModelArtifact::TreeEnsemble(TreeEnsemble {
        base_score: base,
        scale: 1.0,
        trees: vec![Tree {
            nodes: vec![
                Node::split(feature, threshold, 1, 2),
                Node::leaf(low),
                Node::leaf(high),
            ],
        }],
    })
}

/// One artifact per model slot; each slot gets a slightly different fit.
fn artifact_for(mode: Mode, slot: usize, column: &str) -> ModelArtifact {
    let jitter = 1.0 + slot as f64 * 0.05;
    match (mode, column) {
        (Mode::HolisticQualityFromReaderbench, _) if slot % 2 == 0 => linear(
            1.0 * jitter,
            &[("Words", 0.004), ("Sentences", 0.02), ("WordEntropy", 0.3)],
        ),
        (Mode::HolisticQualityFromReaderbench, _) => stump(3.0, "Words", 180.0 * jitter, -0.6, 0.6),
        (Mode::HolisticQualityFromCohmetrix, _) if slot % 2 == 0 => {
            linear(0.8 * jitter, &[("DESWC", 0.005), ("LDTTRc", 2.0)])
        }
        (Mode::HolisticQualityFromCohmetrix, _) => stump(3.0, "LDTTRc", 0.6, -0.5, 0.5 * jitter),
        (Mode::CwsCiwsFromMerged, "predicted_ciws") => linear(
            -5.0,
            &[("Words", 0.85 * jitter), ("per_gram", -120.0), ("per_misspell", -150.0)],
        ),
        (Mode::CwsCiwsFromMerged, _) => linear(
            2.0,
            &[("Words", 0.9 * jitter), ("per_gram", -40.0), ("per_misspell", -60.0)],
        ),
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "sample_data".to_string());
    let out_dir = Path::new(&out_dir);
    let model_dir = out_dir.join("models");
    std::fs::create_dir_all(&model_dir)
        .with_context(|| format!("creating {}", model_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let essays = essays(&mut rng, 24);

    write(&out_dir.join("readerbench.csv"), &readerbench_csv(&essays))?;
    write(&out_dir.join("gamet.csv"), &gamet_csv(&essays, &mut rng))?;
    write(&out_dir.join("cohmetrix.csv"), &cohmetrix_csv(&essays))?;

    let registry = ModelRegistry::default();
    let mut n_models = 0;
    for mode in Mode::ALL {
        for target in registry.targets(mode)? {
            for (slot, name) in target.models.iter().enumerate() {
                let artifact = artifact_for(mode, slot, &target.column);
                let json = serde_json::to_string_pretty(&artifact)
                    .with_context(|| format!("serializing {name}"))?;
                write(&model_dir.join(format!("{name}.json")), &json)?;
                n_models += 1;
            }
        }
    }

    info!("wrote {n_models} model artifacts to {}", model_dir.display());
    println!(
        "Wrote {} essays and {n_models} models to {}",
        essays.len(),
        out_dir.display()
    );
    Ok(())
}
