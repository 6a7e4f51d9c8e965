//! Command-line operations over exported documents.

use crate::config::AppConfig;
use crate::editor::Editor;
use crate::error::AppResult;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tacmap_core::storage::ExportDocument;
use tacmap_core::Viewport;

/// Counts per floor of a validated document.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub floors: BTreeMap<i32, BTreeMap<&'static str, usize>>,
    pub viewport: Viewport,
}

impl Summary {
    pub fn of(document: &ExportDocument) -> Self {
        let floors = document
            .elements_by_floor
            .iter()
            .map(|(floor, elements)| {
                let mut kinds = BTreeMap::new();
                for element in elements {
                    *kinds.entry(element.kind().as_str()).or_insert(0) += 1;
                }
                (floor, kinds)
            })
            .collect();
        Self {
            floors,
            viewport: document.stage_state,
        }
    }

    pub fn total(&self) -> usize {
        self.floors.values().flat_map(BTreeMap::values).sum()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} elements on {} floors, view at ({:.1}, {:.1}) x{:.2}",
            self.total(),
            self.floors.len(),
            self.viewport.pan.x,
            self.viewport.pan.y,
            self.viewport.scale
        )?;
        for (floor, kinds) in &self.floors {
            let parts: Vec<String> = kinds.iter().map(|(kind, n)| format!("{n} {kind}")).collect();
            writeln!(f, "  floor {floor}: {}", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Validate a document file and summarize it.
pub fn check(path: &Path) -> AppResult<Summary> {
    let json = std::fs::read_to_string(path)?;
    // Goes through the same path as an interactive import.
    let mut editor = Editor::with_maps(AppConfig::default(), tacmap_core::MapCatalog::builtin());
    editor.import_json(&json)?;
    Ok(Summary::of(&editor.export_document()))
}

/// Re-export a document in canonical form into the configured export
/// directory, tagged with `map` when given.
pub fn export(config: AppConfig, document: &Path, map: Option<&str>) -> AppResult<PathBuf> {
    let json = std::fs::read_to_string(document)?;
    let mut editor = Editor::new(config);
    if let Some(map) = map {
        editor.open_map(map)?;
    }
    editor.import_json(&json)?;
    editor.export_to_dir()
}

/// What to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub document: PathBuf,
    pub map: Option<String>,
    pub floor: Option<i32>,
    pub out: PathBuf,
}

/// Render one floor of a document to SVG or PNG, chosen by the output extension.
pub fn render(config: AppConfig, job: &RenderJob) -> AppResult<()> {
    let json = std::fs::read_to_string(&job.document)?;
    let mut editor = Editor::new(config);
    if let Some(map) = &job.map {
        editor.open_map(map)?;
    }
    editor.import_json(&json)?;
    if let Some(floor) = job.floor {
        editor.set_floor(floor)?;
    }

    let is_svg = job
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        std::fs::write(&job.out, editor.render_svg()?)?;
    } else {
        std::fs::write(&job.out, editor.render_png()?)?;
    }
    log::info!("Wrote floor {} to {}", editor.floor(), job.out.display());
    Ok(())
}
